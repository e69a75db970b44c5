//! # Platform services
//!
//! Connection level services of the simulator RPC server: liveness check and version information. The versions are
//! used to make sure the client and the simulator speak a compatible API, see
//! [the crate documentation](crate#compatibility).

use crate::rpc_utils::Rpc;
use crate::{Error, Result, CLIENT_VERSION, MIN_REQUIRED_SERVER_VERSION};

/// Access to platform services
///
/// See the [platform module documentation](crate::subsystems::platform) for more context and information.
pub struct Platform {
    rpc: Rpc,
}

/// Access to the platform services
impl Platform {
    pub(crate) fn new(rpc: Rpc) -> Self {
        Self { rpc }
    }

    /// Ping the simulator, returns true when it answers
    pub async fn ping(&self) -> Result<bool> {
        self.rpc.call_as("ping", vec![]).await
    }

    /// Fetch the API version implemented by the simulator
    pub async fn server_version(&self) -> Result<u32> {
        self.rpc.call_as("getServerVersion", vec![]).await
    }

    /// Fetch the oldest client API version the simulator accepts
    pub async fn min_required_client_version(&self) -> Result<u32> {
        self.rpc.call_as("getMinRequiredClientVersion", vec![]).await
    }

    /// Check that the simulator is alive and compatible with this lib
    ///
    /// Returns [Error::VersionNotSupported] if either side is too old for the other one.
    pub async fn confirm_connection(&self) -> Result<()> {
        if !self.ping().await? {
            return Err(Error::ProtocolError("Simulator did not answer ping".to_owned()));
        }

        let server_version = self.server_version().await?;
        let min_client_version = self.min_required_client_version().await?;
        log::info!(
            "Connected! Client version {} (min required {}), server version {} (min required {})",
            CLIENT_VERSION,
            min_client_version,
            server_version,
            MIN_REQUIRED_SERVER_VERSION
        );

        if server_version < MIN_REQUIRED_SERVER_VERSION {
            return Err(Error::VersionNotSupported(format!(
                "Simulator API version {} is older than the required version {}, update the simulator",
                server_version, MIN_REQUIRED_SERVER_VERSION
            )));
        }
        if CLIENT_VERSION < min_client_version {
            return Err(Error::VersionNotSupported(format!(
                "Client API version {} is older than the version {} required by the simulator, update this lib",
                CLIENT_VERSION, min_client_version
            )));
        }

        Ok(())
    }
}
