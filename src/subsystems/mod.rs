//! # Multirotor subsystems
//!
//! The simulator API is a flat list of remote procedures. The lib groups them in logical subsystems, each with one
//! role: connection checks, API control and arming, sensors, maneuvers, vehicle state and cameras.
//!
//! Modules here implement the Rust API for the different subsystems, they are the main way to communicate and
//! interact with the simulated vehicle.

pub mod camera;
pub mod commander;
pub mod control;
pub mod platform;
pub mod sensors;
pub mod state;
