//! # Maneuver commands
//!
//! This subsystem sends high-level maneuvers to the simulated flight controller: take-off, landing, hovering and
//! moves along a path or to a position. The trajectory generation and the control loops run in the simulator.
//!
//! Every maneuver returns a [Task] as soon as the command is sent. The simulator answers the command once the
//! maneuver is over (or has timed out), [Task::wait()] blocks until then:
//! ``` no_run
//! # use multirotor_lib::types::Vector3r;
//! # async fn square(vehicle: &multirotor_lib::Multirotor) -> multirotor_lib::Result<()> {
//! vehicle.commander.takeoff(5.0).await?.wait().await?;
//! vehicle.commander.hover().await?.wait().await?;
//!
//! for target in [(5.0, 0.0), (5.0, 5.0), (0.0, 5.0), (0.0, 0.0)] {
//!     let target = Vector3r::new(target.0, target.1, -10.0);
//!     vehicle.commander.move_to_position(target, 3.0, multirotor_lib::subsystems::commander::FOREVER,
//!         Default::default(), Default::default()).await?.wait().await?;
//! }
//!
//! vehicle.commander.land(60.0).await?.wait().await?;
//! # Ok(())
//! # }
//! ```
//!
//! Commands are not queued by the simulator: sending a new maneuver while another one runs cancels the running one.

use rmpv::Value;

use crate::rpc_utils::{Rpc, Task};
use crate::types::{DrivetrainType, Vector3r, YawMode};
use crate::Result;

/// Timeout value meaning "no timeout"
pub const FOREVER: f32 = f32::MAX;

/// Default landing timeout, seconds
pub const LAND_TIMEOUT: f32 = 60.0;

// Carrot following parameters, negative lookahead lets the simulator pick it from the velocity
const LOOKAHEAD: f32 = -1.0;
const ADAPTIVE_LOOKAHEAD: f32 = 1.0;

/// # Maneuver commands
///
/// See the [commander module documentation](crate::subsystems::commander) for more context and information.
pub struct Commander {
    rpc: Rpc,
    vehicle_name: String,
}

impl Commander {
    pub(crate) fn new(rpc: Rpc, vehicle_name: &str) -> Self {
        Self {
            rpc,
            vehicle_name: vehicle_name.to_owned(),
        }
    }

    fn vehicle(&self) -> Value {
        Value::from(self.vehicle_name.as_str())
    }
}

/// Vertical maneuvers
impl Commander {
    /// Take off and climb to a low hover altitude
    ///
    /// # Arguments
    /// * `timeout` - Seconds after which the simulator gives up the maneuver
    pub async fn takeoff(&self, timeout: f32) -> Result<Task> {
        self.rpc
            .request("takeoff", vec![Value::from(timeout), self.vehicle()])
            .await
    }

    /// Land at the current horizontal position
    ///
    /// # Arguments
    /// * `timeout` - Seconds after which the simulator gives up the maneuver, see [LAND_TIMEOUT]
    pub async fn land(&self, timeout: f32) -> Result<Task> {
        self.rpc
            .request("land", vec![Value::from(timeout), self.vehicle()])
            .await
    }

    /// Hold the current position
    ///
    /// The vehicle falls back to this mode when other maneuvers finish.
    pub async fn hover(&self) -> Result<Task> {
        self.rpc.request("hover", vec![self.vehicle()]).await
    }

    /// Fly back to the take-off location
    pub async fn go_home(&self, timeout: f32) -> Result<Task> {
        self.rpc
            .request("goHome", vec![Value::from(timeout), self.vehicle()])
            .await
    }
}

/// Position maneuvers
///
/// Positions are absolute, in the local NED frame: z is negative above the ground.
impl Commander {
    /// Follow a path through all the given points
    ///
    /// # Arguments
    /// * `path` - Points to fly through, in order
    /// * `velocity` - Speed along the path, m/s
    /// * `timeout` - Seconds after which the maneuver is abandoned, [FOREVER] or `f32::INFINITY` to never time out
    /// * `drivetrain` - Yaw alignment policy
    /// * `yaw_mode` - Heading control
    pub async fn move_on_path(
        &self,
        path: &[Vector3r],
        velocity: f32,
        timeout: f32,
        drivetrain: DrivetrainType,
        yaw_mode: YawMode,
    ) -> Result<Task> {
        let path = Value::Array(path.iter().copied().map(Value::from).collect());

        self.rpc
            .request(
                "moveOnPath",
                vec![
                    path,
                    Value::from(velocity),
                    Value::from(timeout),
                    Value::from(drivetrain),
                    Value::from(yaw_mode),
                    Value::from(LOOKAHEAD),
                    Value::from(ADAPTIVE_LOOKAHEAD),
                    self.vehicle(),
                ],
            )
            .await
    }

    /// Fly straight to a position
    ///
    /// # Arguments
    /// * `target` - Position to reach
    /// * `velocity` - Speed, m/s
    /// * `timeout` - Seconds after which the maneuver is abandoned, see [FOREVER]
    /// * `drivetrain` - Yaw alignment policy
    /// * `yaw_mode` - Heading control
    pub async fn move_to_position(
        &self,
        target: Vector3r,
        velocity: f32,
        timeout: f32,
        drivetrain: DrivetrainType,
        yaw_mode: YawMode,
    ) -> Result<Task> {
        self.rpc
            .request(
                "moveToPosition",
                vec![
                    Value::from(target.x_val),
                    Value::from(target.y_val),
                    Value::from(target.z_val),
                    Value::from(velocity),
                    Value::from(timeout),
                    Value::from(drivetrain),
                    Value::from(yaw_mode),
                    Value::from(LOOKAHEAD),
                    Value::from(ADAPTIVE_LOOKAHEAD),
                    self.vehicle(),
                ],
            )
            .await
    }

    /// Cancel the maneuver currently running
    ///
    /// The task of the cancelled maneuver is answered by the simulator.
    pub async fn cancel_last_task(&self) -> Result<()> {
        self.rpc.call("cancelLastTask", vec![self.vehicle()]).await?;
        Ok(())
    }
}
