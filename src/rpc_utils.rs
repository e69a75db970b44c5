//! Various RPC utils used by the lib
//!
//! The dispatcher and the request side are private, only [Task] and [Completion] are exposed so that other vehicle
//! implementations (simulated or mocked) can hand out the same kind of command handle.

use crate::link::{Connection, Message};
use crate::{Error, Result};
use flume as channel;
use flume::{Receiver, Sender};
use rmpv::Value;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::sync::atomic::Ordering::Relaxed;
use std::sync::atomic::{AtomicBool, AtomicU32};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;

type Waiter = Sender<Result<Value>>;
pub(crate) type PendingCalls = Arc<Mutex<HashMap<u32, Waiter>>>;

/// Request side of the RPC link
///
/// Cloned into every subsystem. Requests are pushed to the uplink queue and the answer is delivered by the
/// [RpcDispatch] task to the waiter registered under the request id.
#[derive(Clone)]
pub(crate) struct Rpc {
    uplink: Sender<Message>,
    pending: PendingCalls,
    disconnect: Arc<AtomicBool>,
    next_msgid: Arc<AtomicU32>,
}

impl Rpc {
    pub(crate) fn new(uplink: Sender<Message>, pending: PendingCalls, disconnect: Arc<AtomicBool>) -> Self {
        Rpc {
            uplink,
            pending,
            disconnect,
            next_msgid: Arc::new(AtomicU32::new(0)),
        }
    }

    /// Send a request and return as soon as it is queued
    pub(crate) async fn request(&self, method: &str, params: Vec<Value>) -> Result<Task> {
        if self.disconnect.load(Relaxed) {
            return Err(Error::Disconnected);
        }

        let msgid = self.next_msgid.fetch_add(1, Relaxed);
        let (tx, rx) = channel::bounded(1);
        self.pending
            .lock()
            .map_err(|e| Error::SystemError(format!("{}", e)))?
            .insert(msgid, tx);

        // Shut down while registering
        if self.disconnect.load(Relaxed) {
            self.forget(msgid);
            return Err(Error::Disconnected);
        }

        log::debug!("-> {} (#{})", method, msgid);
        let request = Message::Request {
            msgid,
            method: method.to_owned(),
            params,
        };

        if let Err(e) = self.uplink.send_async(request).await {
            self.forget(msgid);
            return Err(e.into());
        }

        Ok(Task::new(rx))
    }

    fn forget(&self, msgid: u32) {
        if let Ok(mut pending) = self.pending.lock() {
            pending.remove(&msgid);
        }
    }

    /// Send a request and wait for its result
    pub(crate) async fn call(&self, method: &str, params: Vec<Value>) -> Result<Value> {
        self.request(method, params).await?.value().await
    }

    /// Send a request and decode the result
    pub(crate) async fn call_as<T: DeserializeOwned>(&self, method: &str, params: Vec<Value>) -> Result<T> {
        let value = self.call(method, params).await?;
        Ok(rmpv::ext::from_value(value)?)
    }
}

pub(crate) struct RpcDispatch {
    link: Arc<Connection>,
    pending: PendingCalls,
    disconnect: Arc<AtomicBool>,
}

impl RpcDispatch {
    pub(crate) fn new(link: Arc<Connection>, pending: PendingCalls, disconnect: Arc<AtomicBool>) -> Self {
        RpcDispatch {
            link,
            pending,
            disconnect,
        }
    }

    pub(crate) fn run(self) -> JoinHandle<()> {
        tokio::spawn(async move {
            while !self.disconnect.load(Relaxed) {
                match tokio::time::timeout(Duration::from_millis(200), self.link.recv_message()).await {
                    Ok(Ok(Message::Response { msgid, error, result })) => {
                        let waiter = self.pending.lock().ok().and_then(|mut p| p.remove(&msgid));
                        if let Some(waiter) = waiter {
                            let answer = match error {
                                Some(error) => Err(Error::RpcError(error_message(&error))),
                                None => Ok(result),
                            };
                            let _ = waiter.send(answer);
                        } else {
                            log::warn!("Received response for unknown request #{}", msgid);
                        }
                    }
                    Ok(Ok(Message::Notification { method, .. })) => {
                        log::debug!("Ignoring notification {}", method);
                    }
                    Ok(Ok(Message::Request { method, .. })) => {
                        log::warn!("Unexpected request {} from the server", method);
                    }
                    Ok(Err(Error::ProtocolError(reason))) if !self.link.is_closed() => {
                        log::warn!("Dropping malformed message: {}", reason);
                    }
                    Ok(Err(e)) => {
                        log::debug!("Downlink closed: {}", e);
                        break;
                    }
                    Err(_) => continue,
                }
            }

            shutdown(&self.pending, &self.disconnect);
        })
    }
}

/// Stop the link tasks and fail every pending call
///
/// The flag must be raised before the waiters are dropped. Dropped waiters wake their calls with
/// [Error::Disconnected].
pub(crate) fn shutdown(pending: &PendingCalls, disconnect: &AtomicBool) {
    disconnect.store(true, Relaxed);
    if let Ok(mut pending) = pending.lock() {
        pending.clear();
    }
}

/// Text of an error sent by the server
///
/// The simulator sends its errors as plain strings, anything else is rendered as text.
pub(crate) fn error_message(error: &Value) -> String {
    match error.as_str() {
        Some(message) => message.to_owned(),
        None => format!("{}", error),
    }
}

/// Handle to a command issued to the vehicle
///
/// Maneuver commands (take-off, move, land, ...) are answered by the simulator once the maneuver is over. Issuing
/// the command returns as soon as it is sent, [Task::wait()] blocks until the answer arrives.
///
/// ```no_run
/// # async fn fly(vehicle: &multirotor_lib::Multirotor) -> multirotor_lib::Result<()> {
/// let takeoff = vehicle.commander.takeoff(3.0).await?;
/// // ... other work while taking off
/// takeoff.wait().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Task {
    response: Receiver<Result<Value>>,
}

impl Task {
    pub(crate) fn new(response: Receiver<Result<Value>>) -> Self {
        Task { response }
    }

    /// A task that is already finished with the given result
    pub fn ready(result: Result<Value>) -> Self {
        let (tx, rx) = channel::bounded(1);
        let _ = tx.send(result);
        Task::new(rx)
    }

    /// A pending task together with the [Completion] that finishes it
    pub fn channel() -> (Completion, Task) {
        let (tx, rx) = channel::bounded(1);
        (Completion { waiter: tx }, Task::new(rx))
    }

    /// Wait for the command to finish
    pub async fn wait(self) -> Result<()> {
        self.value().await.map(|_| ())
    }

    /// Wait for the command to finish and return the raw result sent by the simulator
    pub async fn value(self) -> Result<Value> {
        self.response.recv_async().await?
    }

    /// Wait for the command to finish, giving up with [Error::Timeout] after `timeout`
    ///
    /// Giving up does not cancel the maneuver on the simulator, see
    /// [Commander::cancel_last_task()](crate::subsystems::commander::Commander::cancel_last_task).
    pub async fn wait_timeout(self, timeout: Duration) -> Result<()> {
        tokio::time::timeout(timeout, self.wait()).await?
    }
}

/// Finishing side of a [Task] created with [Task::channel()]
///
/// Dropping it without calling a method makes the task fail with [Error::Disconnected].
#[derive(Debug)]
pub struct Completion {
    waiter: Waiter,
}

impl Completion {
    /// Finish the task successfully
    pub fn complete(self) {
        let _ = self.waiter.send(Ok(Value::Boolean(true)));
    }

    /// Finish the task with an error
    pub fn fail(self, error: Error) {
        let _ = self.waiter.send(Err(error));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn task_waits_for_completion() {
        let (completion, task) = Task::channel();

        let waiting = tokio::spawn(task.wait());
        tokio::task::yield_now().await;
        assert!(!waiting.is_finished());

        completion.complete();
        assert!(waiting.await.unwrap().is_ok());
    }

    #[tokio::test]
    async fn ready_task_does_not_wait() {
        assert_eq!(Task::ready(Ok(Value::from(3))).value().await.unwrap(), Value::from(3));
        assert!(matches!(
            Task::ready(Err(Error::RpcError("busy".to_owned()))).wait().await,
            Err(Error::RpcError(_))
        ));
    }

    #[tokio::test]
    async fn wait_gives_up_after_timeout() {
        let (_completion, task) = Task::channel();

        let result = task.wait_timeout(Duration::from_millis(20)).await;

        assert!(matches!(result, Err(Error::Timeout)));
    }

    #[tokio::test]
    async fn requests_fail_once_shut_down() {
        let (uplink, queued) = channel::unbounded();
        let pending: PendingCalls = Default::default();
        let disconnect = Arc::new(AtomicBool::new(false));
        let rpc = Rpc::new(uplink, pending.clone(), disconnect.clone());

        let before = rpc.request("ping", vec![]).await.unwrap();
        shutdown(&pending, &disconnect);

        assert!(matches!(before.wait().await, Err(Error::Disconnected)));
        assert!(matches!(rpc.request("ping", vec![]).await, Err(Error::Disconnected)));
        assert_eq!(queued.len(), 1);
        assert!(pending.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn closed_uplink_forgets_the_waiter() {
        let (uplink, queued) = channel::unbounded::<Message>();
        drop(queued);
        let pending: PendingCalls = Default::default();
        let rpc = Rpc::new(uplink, pending.clone(), Arc::new(AtomicBool::new(false)));

        assert!(matches!(rpc.request("ping", vec![]).await, Err(Error::Disconnected)));
        assert!(pending.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn dropped_completion_disconnects() {
        let (completion, task) = Task::channel();
        drop(completion);

        assert!(matches!(task.wait().await, Err(Error::Disconnected)));
    }

    #[test]
    fn string_errors_are_passed_through() {
        assert_eq!(error_message(&Value::from("Vehicle is not armed")), "Vehicle is not armed");
        assert_eq!(error_message(&Value::from(42)), "42");
    }
}
