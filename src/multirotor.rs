use crate::link::{Connection, Message};
use crate::rpc_utils::{self, PendingCalls, Rpc, RpcDispatch};
use crate::subsystems::camera::Camera;
use crate::subsystems::commander::Commander;
use crate::subsystems::control::Control;
use crate::subsystems::platform::Platform;
use crate::subsystems::sensors::Sensors;
use crate::subsystems::state::State;

use crate::Result;
use flume as channel;
use futures::lock::Mutex;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering::Relaxed;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

/// # The Multirotor
///
/// Client of one simulated multirotor. This struct is one-time use: creating it connects to the simulator and once
/// disconnected, either as requested by the lib user or as a result of a connection loss, the object cannot be
/// reconnected. A new one need to be created to connect again.
///
/// See the [multirotor-lib crate root documentation](crate) for more context and information.
pub struct Multirotor {
    /// Connection check and version services
    pub platform: Platform,
    /// API control and arming
    pub control: Control,
    /// Sensor access
    pub sensors: Sensors,
    /// Maneuver commands
    pub commander: Commander,
    /// Vehicle state
    pub state: State,
    /// Camera access
    pub camera: Camera,
    uplink_task: Mutex<Option<JoinHandle<()>>>,
    dispatch_task: Mutex<Option<JoinHandle<()>>>,
    disconnect: Arc<AtomicBool>,
    link: Arc<Connection>,
}

impl Multirotor {
    /// Connect to a simulator RPC server
    ///
    /// This function opens a TCP link to `address`, for example [crate::DEFAULT_ADDRESS], and calls
    /// [Multirotor::connect_from_link()].
    ///
    /// `vehicle_name` selects the vehicle in simulations with more than one, an empty name selects the default one.
    ///
    /// An error is returned if the link cannot be opened. The connection is not confirmed, see
    /// [Platform::confirm_connection()].
    pub async fn connect_from_uri(address: &str, vehicle_name: &str) -> Result<Self> {
        let link = Connection::open(address).await?;

        Self::connect_from_link(link, vehicle_name).await
    }

    /// Connect a Multirotor using an existing link
    ///
    /// Must be called from within a tokio runtime, the uplink and dispatch tasks are spawned on it.
    pub async fn connect_from_link(link: Connection, vehicle_name: &str) -> Result<Self> {
        let disconnect = Arc::new(AtomicBool::new(false));
        let pending: PendingCalls = Default::default();

        // Downlink dispatcher
        let link = Arc::new(link);
        let dispatcher = RpcDispatch::new(link.clone(), pending.clone(), disconnect.clone());

        // Uplink queue
        let disconnect_uplink = disconnect.clone();
        let (uplink, rx) = channel::unbounded::<Message>();
        let link_uplink = link.clone();
        let pending_uplink = pending.clone();
        let uplink_task = tokio::spawn(async move {
            while !disconnect_uplink.load(Relaxed) {
                match tokio::time::timeout(Duration::from_millis(100), rx.recv_async()).await {
                    Ok(Ok(message)) => {
                        if let Err(e) = link_uplink.send_message(message).await {
                            log::warn!("Failed to send message: {}", e);
                            rpc_utils::shutdown(&pending_uplink, &disconnect_uplink);
                            return;
                        }
                    }
                    Err(_) => (),
                    Ok(Err(flume::RecvError::Disconnected)) => return,
                }
            }
        });

        let rpc = Rpc::new(uplink, pending, disconnect.clone());

        // Start the downlink message dispatcher
        let dispatch_task = dispatcher.run();

        Ok(Multirotor {
            platform: Platform::new(rpc.clone()),
            control: Control::new(rpc.clone(), vehicle_name),
            sensors: Sensors::new(rpc.clone(), vehicle_name),
            commander: Commander::new(rpc.clone(), vehicle_name),
            state: State::new(rpc.clone(), vehicle_name),
            camera: Camera::new(rpc, vehicle_name),
            uplink_task: Mutex::new(Some(uplink_task)),
            dispatch_task: Mutex::new(Some(dispatch_task)),
            disconnect,
            link,
        })
    }

    /// Disconnect from the simulator
    ///
    /// The Connection can be ended in two ways: either by dropping the [Multirotor] object or by calling this
    /// disconnect() function. Once this function return, the Multirotor is fully disconnected.
    ///
    /// Once disconnected, any methods that uses the communication to the simulator will return the error
    /// [crate::Error::Disconnected]
    pub async fn disconnect(&self) {
        // Set disconnect to true, will make both uplink and dispatcher task quit
        self.disconnect.store(true, Relaxed);

        // Wait for both task to finish
        if let Some(uplink_task) = self.uplink_task.lock().await.take() {
            let _ = uplink_task.await;
        }
        if let Some(dispatch_task) = self.dispatch_task.lock().await.take() {
            let _ = dispatch_task.await;
        }

        self.link.close().await;
    }

    /// Wait for the simulator to close the connection
    ///
    /// This function waits for the dispatch task to stop, which happens when the link is closed by the simulator or
    /// when [Multirotor::disconnect()] is called, and then fully disconnects.
    pub async fn wait_disconnect(&self) {
        if let Some(dispatch_task) = self.dispatch_task.lock().await.take() {
            let _ = dispatch_task.await;
        }

        self.disconnect().await;
    }
}

impl Drop for Multirotor {
    fn drop(&mut self) {
        self.disconnect.store(true, Relaxed);
    }
}
