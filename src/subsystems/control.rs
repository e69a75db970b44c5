//! # API control and arming
//!
//! The simulator only accepts movement commands from a client that has been granted API control. Once control is
//! enabled, the motors can be armed. Disabling API control hands the vehicle back to its default controller (RC or
//! nothing).
//!
//! ``` no_run
//! # async fn arm(vehicle: &multirotor_lib::Multirotor) -> multirotor_lib::Result<()> {
//! vehicle.control.enable_api_control(true).await?;
//! vehicle.control.arm_disarm(true).await?;
//! # Ok(())
//! # }
//! ```

use rmpv::Value;

use crate::rpc_utils::Rpc;
use crate::Result;

/// # Access to API control and arming
///
/// See the [control module documentation](crate::subsystems::control) for more context and information.
pub struct Control {
    rpc: Rpc,
    vehicle_name: String,
}

impl Control {
    pub(crate) fn new(rpc: Rpc, vehicle_name: &str) -> Self {
        Self {
            rpc,
            vehicle_name: vehicle_name.to_owned(),
        }
    }

    /// Request or release API control of the vehicle
    pub async fn enable_api_control(&self, enable: bool) -> Result<()> {
        self.rpc
            .call(
                "enableApiControl",
                vec![Value::from(enable), Value::from(self.vehicle_name.as_str())],
            )
            .await?;
        Ok(())
    }

    /// Returns true while this client holds API control
    pub async fn is_api_control_enabled(&self) -> Result<bool> {
        self.rpc
            .call_as(
                "isApiControlEnabled",
                vec![Value::from(self.vehicle_name.as_str())],
            )
            .await
    }

    /// Arm (`true`) or disarm (`false`) the motors
    ///
    /// Returns the value reported by the simulator, true if the request was applied.
    pub async fn arm_disarm(&self, arm: bool) -> Result<bool> {
        self.rpc
            .call_as(
                "armDisarm",
                vec![Value::from(arm), Value::from(self.vehicle_name.as_str())],
            )
            .await
    }
}
