//! The demo flight
//!
//! Take off, hover, fly random waypoints around the take-off position and land. The sequence runs on the calling
//! task, the optional camera poller runs in its own task and is joined before returning.

use std::sync::Arc;

use log::{debug, info};
use multirotor_lib::subsystems::commander::FOREVER;
use multirotor_lib::types::{DrivetrainType, Vector3r, YawMode};
use multirotor_lib::Result;
use rand::Rng;
use tokio::time::sleep;

use crate::camera_poller;
use crate::config::{MissionConfig, Traversal};
use crate::report;
use crate::vehicle::Vehicle;
use crate::waypoints;

/// What a completed mission did
#[derive(Debug, Clone, PartialEq)]
pub struct MissionReport {
    /// Position when hovering began
    pub origin: Vector3r,
    /// Generated waypoints, in flight order
    pub waypoints: Vec<Vector3r>,
    /// Number of stereo image polls, 0 when the poller did not run
    pub camera_polls: u64,
}

/// Fly the mission on a vehicle with a confirmed connection
pub async fn fly<V, R>(vehicle: Arc<V>, config: &MissionConfig, rng: &mut R) -> Result<MissionReport>
where
    V: Vehicle + ?Sized + 'static,
    R: Rng + ?Sized,
{
    vehicle.enable_api_control(true).await?;
    vehicle.arm_disarm(true).await?;

    report::print_lines(&report::barometer_lines(&vehicle.barometer_data().await?));
    report::print_lines(&report::imu_lines(&vehicle.imu_data().await?));
    report::print_lines(&report::gps_lines(&vehicle.gps_data().await?));
    report::print_lines(&report::magnetometer_lines(&vehicle.magnetometer_data().await?));

    let poller = if config.poll_camera {
        vehicle.enable_api_control(true).await?;
        Some(camera_poller::spawn(vehicle.clone()))
    } else {
        None
    };

    let (origin, waypoints) = match flight(vehicle.as_ref(), config, rng).await {
        Ok(flown) => flown,
        Err(e) => {
            if let Some(poller) = poller {
                poller.abort();
            }
            return Err(e);
        }
    };

    let camera_polls = match poller {
        Some(poller) => poller.await??,
        None => 0,
    };

    Ok(MissionReport {
        origin,
        waypoints,
        camera_polls,
    })
}

// From take-off to disarming, returns the origin and the generated waypoints
async fn flight<V, R>(vehicle: &V, config: &MissionConfig, rng: &mut R) -> Result<(Vector3r, Vec<Vector3r>)>
where
    V: Vehicle + ?Sized,
    R: Rng + ?Sized,
{
    println!("Takeoff");
    vehicle.takeoff(config.takeoff_timeout).await?.wait().await?;

    // Hover becomes the fallback once the moves are over
    sleep(config.hover_pause).await;
    vehicle.hover().await?.wait().await?;

    let origin = vehicle.position().await?;
    info!("Origin: {}", origin);
    let waypoints = waypoints::generate(origin, config.waypoint_count, &config.bounds, rng);

    match config.traversal {
        Traversal::Path => {
            let mut path = waypoints.clone();
            path.push(origin);
            let yaw_mode = YawMode {
                is_rate: false,
                yaw_or_rate: 0.0,
            };
            vehicle
                .move_on_path(&path, config.speed, FOREVER, DrivetrainType::ForwardOnly, yaw_mode)
                .await?
                .wait()
                .await?;
        }
        Traversal::Discrete => {
            for (i, waypoint) in waypoints.iter().enumerate() {
                debug!("Moving to waypoint {}: {}", i, waypoint);
                vehicle.move_to_position(*waypoint, config.speed).await?.wait().await?;
            }
            vehicle
                .move_to_position(origin, config.return_speed)
                .await?
                .wait()
                .await?;
        }
    }

    println!("Landing");
    vehicle.land().await?.wait().await?;

    vehicle.enable_api_control(false).await?;
    vehicle.arm_disarm(false).await?;

    Ok((origin, waypoints))
}
