//! Mission parameters
//!
//! Both demos run the same mission, they only differ by the parameters defined here.

use std::time::Duration;

/// How the generated waypoints are flown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Traversal {
    /// All waypoints, then the origin, sent as one path
    Path,
    /// One move per waypoint, each one awaited before the next
    Discrete,
}

/// Box around the origin in which waypoints are sampled, meters in NED frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    /// Half-width of the box on the x and y axis
    pub horizontal: f32,
    /// Lowest z offset, z grows downward so this is the highest altitude
    pub z_min: f32,
    pub z_max: f32,
}

impl Default for Bounds {
    fn default() -> Self {
        Bounds {
            horizontal: 20.0,
            z_min: -20.0,
            z_max: -10.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MissionConfig {
    pub traversal: Traversal,
    pub waypoint_count: usize,
    /// Traversal speed, m/s
    pub speed: f32,
    /// Speed of the final move back to the origin in discrete traversal, m/s
    pub return_speed: f32,
    /// Pause between take-off and hover
    pub hover_pause: Duration,
    /// Take-off timeout, seconds
    pub takeoff_timeout: f32,
    pub bounds: Bounds,
    /// Run the stereo camera poller while the mission has control
    pub poll_camera: bool,
}

impl MissionConfig {
    /// Fly 50 random waypoints as a single path while polling the stereo cameras
    pub fn continuous_path() -> Self {
        MissionConfig {
            traversal: Traversal::Path,
            waypoint_count: 50,
            speed: 15.0,
            return_speed: 15.0,
            hover_pause: Duration::from_secs(3),
            takeoff_timeout: 3.0,
            bounds: Bounds::default(),
            poll_camera: true,
        }
    }

    /// Fly 100 random waypoints one move at a time, then slowly back to the origin
    pub fn point_to_point() -> Self {
        MissionConfig {
            traversal: Traversal::Discrete,
            waypoint_count: 100,
            speed: 15.0,
            return_speed: 5.0,
            hover_pause: Duration::from_secs(5),
            takeoff_timeout: 3.0,
            bounds: Bounds::default(),
            poll_camera: false,
        }
    }
}
