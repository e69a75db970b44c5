//! # msgpack-RPC link
//!
//! The simulator exposes its API as a msgpack-RPC server. A [Connection] carries a stream of msgpack values over
//! any byte stream: a TCP socket for a real simulator or an in-memory pipe in tests. Each value is one [Message].

use crate::{Error, Result};
use rmpv::Value;
use std::io::{Cursor, ErrorKind};
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering::Relaxed;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, ReadHalf, WriteHalf};
use tokio::net::TcpStream;
use tokio::sync::Mutex;

const TYPE_REQUEST: u64 = 0;
const TYPE_RESPONSE: u64 = 1;
const TYPE_NOTIFICATION: u64 = 2;

/// msgpack-RPC message
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    /// `[0, msgid, method, params]`
    Request {
        /// Id echoed back in the matching response
        msgid: u32,
        /// Remote method name
        method: String,
        /// Positional parameters
        params: Vec<Value>,
    },
    /// `[1, msgid, error, result]`, `error` is nil on success
    Response {
        /// Id of the request this answers
        msgid: u32,
        /// Error sent by the server, if any
        error: Option<Value>,
        /// Result of the call, nil when an error is set
        result: Value,
    },
    /// `[2, method, params]`
    Notification {
        /// Remote method name
        method: String,
        /// Positional parameters
        params: Vec<Value>,
    },
}

impl Message {
    /// Encode the message as the msgpack array sent on the wire
    pub fn into_value(self) -> Value {
        match self {
            Message::Request { msgid, method, params } => Value::Array(vec![
                Value::from(TYPE_REQUEST),
                Value::from(msgid),
                Value::from(method),
                Value::Array(params),
            ]),
            Message::Response { msgid, error, result } => Value::Array(vec![
                Value::from(TYPE_RESPONSE),
                Value::from(msgid),
                error.unwrap_or(Value::Nil),
                result,
            ]),
            Message::Notification { method, params } => Value::Array(vec![
                Value::from(TYPE_NOTIFICATION),
                Value::from(method),
                Value::Array(params),
            ]),
        }
    }

    /// Decode a message from a msgpack value
    pub fn from_value(value: Value) -> Result<Self> {
        let mut fields = match value {
            Value::Array(fields) => fields.into_iter(),
            other => {
                return Err(Error::ProtocolError(format!(
                    "Message is not an array: {}",
                    other
                )))
            }
        };

        let kind = fields
            .next()
            .and_then(|v| v.as_u64())
            .ok_or_else(|| Error::ProtocolError("Missing message type".to_owned()))?;

        let message = match kind {
            TYPE_REQUEST => Message::Request {
                msgid: msgid(fields.next())?,
                method: method(fields.next())?,
                params: params(fields.next())?,
            },
            TYPE_RESPONSE => {
                let msgid = msgid(fields.next())?;
                let error = fields.next().filter(|e| !e.is_nil());
                let result = fields.next().unwrap_or(Value::Nil);
                Message::Response { msgid, error, result }
            }
            TYPE_NOTIFICATION => Message::Notification {
                method: method(fields.next())?,
                params: params(fields.next())?,
            },
            other => {
                return Err(Error::ProtocolError(format!(
                    "Unknown message type {}",
                    other
                )))
            }
        };

        Ok(message)
    }
}

fn msgid(value: Option<Value>) -> Result<u32> {
    value
        .as_ref()
        .and_then(Value::as_u64)
        .and_then(|id| u32::try_from(id).ok())
        .ok_or_else(|| Error::ProtocolError("Invalid message id".to_owned()))
}

fn method(value: Option<Value>) -> Result<String> {
    value
        .as_ref()
        .and_then(Value::as_str)
        .map(str::to_owned)
        .ok_or_else(|| Error::ProtocolError("Invalid method name".to_owned()))
}

fn params(value: Option<Value>) -> Result<Vec<Value>> {
    match value {
        Some(Value::Array(params)) => Ok(params),
        Some(Value::Nil) | None => Ok(Vec::new()),
        Some(other) => Err(Error::ProtocolError(format!(
            "Parameters are not an array: {}",
            other
        ))),
    }
}

type BoxedReader = Box<dyn AsyncRead + Send + Unpin>;
type BoxedWriter = Box<dyn AsyncWrite + Send + Unpin>;

struct Downlink {
    stream: BoxedReader,
    buffer: Vec<u8>,
}

impl Downlink {
    // Pops one complete value from the buffer, None if more bytes are needed
    fn try_decode(&mut self) -> Result<Option<Value>> {
        let (value, used) = {
            let mut cursor = Cursor::new(&self.buffer[..]);
            match rmpv::decode::read_value(&mut cursor) {
                Ok(value) => (value, cursor.position() as usize),
                Err(rmpv::decode::Error::InvalidMarkerRead(ref e))
                | Err(rmpv::decode::Error::InvalidDataRead(ref e))
                    if e.kind() == ErrorKind::UnexpectedEof =>
                {
                    return Ok(None)
                }
                Err(e) => return Err(Error::ProtocolError(format!("{:?}", e))),
            }
        };
        self.buffer.drain(..used);
        Ok(Some(value))
    }
}

/// A msgpack-RPC link to the simulator
///
/// Sending and receiving are independent: one task can wait on [Connection::recv_message()] while others send.
pub struct Connection {
    downlink: Mutex<Downlink>,
    uplink: Mutex<BoxedWriter>,
    closed: AtomicBool,
}

impl Connection {
    /// Open a TCP link to a simulator RPC server, for example `127.0.0.1:41451`
    pub async fn open(address: &str) -> Result<Self> {
        let stream = TcpStream::connect(address).await?;
        stream.set_nodelay(true)?;
        log::debug!("Connected to {}", address);

        Ok(Self::from_stream(stream))
    }

    /// Create a link on top of an already connected byte stream
    pub fn from_stream<S>(stream: S) -> Self
    where
        S: AsyncRead + AsyncWrite + Send + 'static,
    {
        let (reader, writer): (ReadHalf<S>, WriteHalf<S>) = tokio::io::split(stream);

        Connection {
            downlink: Mutex::new(Downlink {
                stream: Box::new(reader),
                buffer: Vec::with_capacity(4096),
            }),
            uplink: Mutex::new(Box::new(writer)),
            closed: AtomicBool::new(false),
        }
    }

    /// Send one message
    pub async fn send_message(&self, message: Message) -> Result<()> {
        if self.is_closed() {
            return Err(Error::Disconnected);
        }

        let mut bytes = Vec::new();
        rmpv::encode::write_value(&mut bytes, &message.into_value())
            .map_err(|e| Error::ProtocolError(format!("{:?}", e)))?;

        let mut uplink = self.uplink.lock().await;
        uplink.write_all(&bytes).await?;
        uplink.flush().await?;

        Ok(())
    }

    /// Receive the next message
    ///
    /// A value that is not a msgpack-RPC message is a [Error::ProtocolError] and the link stays usable. Bytes that
    /// are not msgpack close the link.
    ///
    /// Cancelling this future (for example with a timeout) does not lose data, partially received messages stay
    /// buffered for the next call.
    pub async fn recv_message(&self) -> Result<Message> {
        let mut downlink = self.downlink.lock().await;

        loop {
            // Undecodable bytes leave no way to find the next message
            match downlink.try_decode() {
                Ok(Some(value)) => return Message::from_value(value),
                Ok(None) => (),
                Err(e) => {
                    self.closed.store(true, Relaxed);
                    return Err(e);
                }
            }

            let Downlink { stream, buffer } = &mut *downlink;
            if buffer.capacity() - buffer.len() < 1024 {
                buffer.reserve(4096);
            }
            if stream.read_buf(buffer).await? == 0 {
                self.closed.store(true, Relaxed);
                return Err(Error::Disconnected);
            }
        }
    }

    /// Close the link
    pub async fn close(&self) {
        self.closed.store(true, Relaxed);
        let _ = self.uplink.lock().await.shutdown().await;
    }

    /// True once the link has been closed by either side
    pub fn is_closed(&self) -> bool {
        self.closed.load(Relaxed)
    }
}
