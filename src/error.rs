use crate::link::Message;

/// [Result] alias for return types of the crate API
pub type Result<T> = std::result::Result<T, Error>;

/// Error enum type
#[derive(Debug)]
pub enum Error {
    /// Client and simulator versions are not compatible. The String contains the reason.
    ///
    /// see [the crate documentation](crate#compatibility) for more information.
    VersionNotSupported(String),
    /// Unexpected protocol error. The String contains the reason.
    ProtocolError(String),
    /// The simulator refused or failed a remote call. The String is the message sent by the server.
    RpcError(String),
    /// Conversion error while decoding an answer from the simulator. The String contains the reason.
    ConversionError(String),
    /// Error on the underlying link (socket).
    LinkError(std::io::Error),
    /// The Multirotor object is currently disconnected.
    Disconnected,
    /// Error with the async runtime.
    SystemError(String),
    /// Operation timed out waiting for response.
    Timeout,
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::VersionNotSupported(reason) => write!(f, "Version not supported: {}", reason),
            Error::ProtocolError(reason) => write!(f, "Protocol error: {}", reason),
            Error::RpcError(message) => write!(f, "{}", message),
            Error::ConversionError(reason) => write!(f, "Conversion error: {}", reason),
            Error::LinkError(e) => write!(f, "Link error: {}", e),
            Error::Disconnected => write!(f, "Disconnected"),
            Error::SystemError(reason) => write!(f, "System error: {}", reason),
            Error::Timeout => write!(f, "Timeout"),
        }
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::LinkError(error)
    }
}

impl From<rmpv::ext::Error> for Error {
    fn from(e: rmpv::ext::Error) -> Self {
        Self::ConversionError(format!("{}", e))
    }
}

impl From<tokio::task::JoinError> for Error {
    fn from(error: tokio::task::JoinError) -> Self {
        Self::SystemError(format!("{}", error))
    }
}

impl From<tokio::time::error::Elapsed> for Error {
    fn from(_: tokio::time::error::Elapsed) -> Self {
        self::Error::Timeout
    }
}

impl From<flume::RecvError> for Error {
    fn from(_: flume::RecvError) -> Self {
        self::Error::Disconnected
    }
}

impl From<flume::SendError<Message>> for Error {
    fn from(_: flume::SendError<Message>) -> Self {
        self::Error::Disconnected
    }
}
