//! # Camera subsystem
//!
//! Capture images from the cameras attached to the vehicle. Several cameras can be captured in one call, for
//! example the two cameras of a stereo pair:
//! ``` no_run
//! # use multirotor_lib::types::{ImageRequest, ImageType};
//! # async fn capture(vehicle: &multirotor_lib::Multirotor) -> multirotor_lib::Result<()> {
//! let requests = [
//!     ImageRequest::new("front_left", ImageType::Scene, false),
//!     ImageRequest::new("front_right", ImageType::Scene, false),
//! ];
//! let images = vehicle.camera.images(&requests).await?;
//! for image in images {
//!     println!("{}: {}x{}", image.camera_name, image.width, image.height);
//! }
//! # Ok(())
//! # }
//! ```

use std::convert::TryFrom;

use rmpv::Value;

use crate::rpc_utils::Rpc;
use crate::types::{ImageRequest, ImageResponse};
use crate::{Error, Result};

/// Access to the vehicle cameras
///
/// See the [camera module documentation](crate::subsystems::camera) for more context and information.
pub struct Camera {
    rpc: Rpc,
    vehicle_name: String,
}

impl Camera {
    pub(crate) fn new(rpc: Rpc, vehicle_name: &str) -> Self {
        Self {
            rpc,
            vehicle_name: vehicle_name.to_owned(),
        }
    }

    /// Capture one image per request, responses are in the same order as the requests
    pub async fn images(&self, requests: &[ImageRequest]) -> Result<Vec<ImageResponse>> {
        let requests = Value::Array(requests.iter().map(Value::from).collect());
        let answer = self
            .rpc
            .call(
                "simGetImages",
                vec![requests, Value::from(self.vehicle_name.as_str())],
            )
            .await?;

        match answer {
            Value::Array(responses) => responses.into_iter().map(ImageResponse::try_from).collect(),
            other => Err(Error::ConversionError(format!(
                "Image responses are not an array: {}",
                other
            ))),
        }
    }
}
