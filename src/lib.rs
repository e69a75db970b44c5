//! # Multirotor library
//!
//! This crate allows to connect, communicate with and control a simulated multirotor through the msgpack-RPC API
//! exposed by the simulator. The simulator runs the vehicle physics, the flight controller and the sensor models;
//! this lib is the client side of the API.
//!
//! ## Status
//!
//! The crate aims at implementing a Rust API for the multirotor part of the simulator API. The functionalities are
//! implemented in subsystems. The current status is:
//!
//! | Subsystem | Support |
//! |-----------|---------|
//! | Platform (ping, versions) | Full |
//! | Control (API control, arming) | Full |
//! | Sensors | Partial (barometer, IMU, GPS, magnetometer) |
//! | Commander | Partial (take-off, land, hover, go home, path and position moves) |
//! | State | Full |
//! | Camera | Partial (image capture) |
//! | Velocity/angle-rate commands | None |
//! | Simulation control (pause, weather, ...) | None |
//!
//! ## Compatibility
//!
//! Client and simulator each declare an API version and the oldest version they accept from the other side.
//! [subsystems::platform::Platform::confirm_connection()] checks both, this lib implements API version
//! [CLIENT_VERSION] and requires a simulator with API version [MIN_REQUIRED_SERVER_VERSION] or newer.
//!
//! ## Usage
//!
//! The basic procedure to use the lib is:
//!  - Start the simulator, it listens on [DEFAULT_ADDRESS] by default
//!  - Create a Multirotor object from the address or a connected [link::Connection], this starts the background
//!    tasks that carry requests and answers
//!  - Confirm the connection with the platform subsystem
//!  - Subsystems are available as public fields of the [Multirotor] struct.
//!  - Maneuvers return a [Task], wait on it to know when the maneuver is over
//!  - Drop the Multirotor object or call [Multirotor::disconnect()]
//!
//! All subsystems functions are only taking an un-mutable reference to self (`&self`), the intention is for the
//! Multirotor object to be shared between tasks using `Arc<>`.
//!
//! For example:
//! ``` no_run
//! # async fn test() -> Result<(), Box<dyn std::error::Error>> {
//! let vehicle = multirotor_lib::Multirotor::connect_from_uri(multirotor_lib::DEFAULT_ADDRESS, "").await?;
//! vehicle.platform.confirm_connection().await?;
//!
//! vehicle.control.enable_api_control(true).await?;
//! vehicle.control.arm_disarm(true).await?;
//!
//! vehicle.commander.takeoff(5.0).await?.wait().await?;
//! println!("Position: {}", vehicle.state.position().await?);
//! vehicle.commander.land(60.0).await?.wait().await?;
//!
//! vehicle.control.arm_disarm(false).await?;
//! vehicle.control.enable_api_control(false).await?;
//! vehicle.disconnect().await;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod error;
mod multirotor;
mod rpc_utils;

pub mod link;
pub mod subsystems;
pub mod types;

pub use crate::error::{Error, Result};
pub use crate::multirotor::Multirotor;
pub use crate::rpc_utils::{Completion, Task};

/// Address of the simulator RPC server with the default settings
pub const DEFAULT_ADDRESS: &str = "127.0.0.1:41451";

/// API version implemented by this lib
///
/// see [the crate documentation](crate#compatibility) for more information.
pub const CLIENT_VERSION: u32 = 1;

/// Oldest simulator API version supported by this lib
///
/// see [the crate documentation](crate#compatibility) for more information.
pub const MIN_REQUIRED_SERVER_VERSION: u32 = 1;
