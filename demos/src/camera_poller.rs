//! Background stereo camera polling

use std::sync::Arc;
use std::time::Instant;

use log::debug;
use multirotor_lib::types::{ImageRequest, ImageType};
use multirotor_lib::Result;
use tokio::task::JoinHandle;

use crate::vehicle::Vehicle;

const LEFT_CAMERA: &str = "front_left";
const RIGHT_CAMERA: &str = "front_right";

/// Poll the stereo cameras for as long as API control is enabled
///
/// The images are discarded, only the poll rate is printed. Returns the number of polls.
pub async fn poll<V: Vehicle + ?Sized>(vehicle: &V) -> Result<u64> {
    let requests = [
        ImageRequest::new(LEFT_CAMERA, ImageType::Scene, false),
        ImageRequest::new(RIGHT_CAMERA, ImageType::Scene, false),
    ];

    let start = Instant::now();
    let mut count = 0u64;

    while vehicle.is_api_control_enabled().await? {
        let _ = vehicle.images(&requests).await?;
        count += 1;
        println!("poll cam hz: {}", count as f64 / start.elapsed().as_secs_f64());
    }

    debug!("Camera poller stopped after {} polls", count);
    Ok(count)
}

/// Start [poll] in its own task
pub fn spawn<V: Vehicle + ?Sized + 'static>(vehicle: Arc<V>) -> JoinHandle<Result<u64>> {
    tokio::spawn(async move { poll(vehicle.as_ref()).await })
}
