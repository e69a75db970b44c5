//! # Vehicle state
//!
//! Estimated state of the multirotor: kinematics, GPS location and landed state.

use rmpv::Value;

use crate::rpc_utils::Rpc;
use crate::types::{LandedState, MultirotorState, Vector3r};
use crate::Result;

/// # Access to the vehicle state
///
/// Each call fetches a fresh state from the simulator, nothing is cached.
pub struct State {
    rpc: Rpc,
    vehicle_name: String,
}

impl State {
    pub(crate) fn new(rpc: Rpc, vehicle_name: &str) -> Self {
        Self {
            rpc,
            vehicle_name: vehicle_name.to_owned(),
        }
    }

    /// Fetch the full multirotor state
    pub async fn multirotor_state(&self) -> Result<MultirotorState> {
        self.rpc
            .call_as(
                "getMultirotorState",
                vec![Value::from(self.vehicle_name.as_str())],
            )
            .await
    }

    /// Estimated position in the local NED frame
    pub async fn position(&self) -> Result<Vector3r> {
        Ok(self.multirotor_state().await?.position())
    }

    /// Landed or flying
    pub async fn landed_state(&self) -> Result<LandedState> {
        Ok(self.multirotor_state().await?.landed_state)
    }
}
