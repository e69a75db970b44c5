//! # Simulator data types
//!
//! Structures exchanged with the simulator. They are sent as msgpack maps keyed by field name; decoding goes
//! through serde and [rmpv::ext::from_value], encoding of the few types sent as parameters is done explicitly with
//! `From<T> for Value` so that the map layout expected by the server is kept.

use crate::{Error, Result};
use num_enum::{IntoPrimitive, TryFromPrimitive};
use rmpv::Value;
use serde::Deserialize;
use std::convert::TryFrom;
use std::fmt;

/// 3D vector in the local NED frame (x north/forward, y east/right, z down), in meters
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
pub struct Vector3r {
    #[allow(missing_docs)]
    pub x_val: f32,
    #[allow(missing_docs)]
    pub y_val: f32,
    #[allow(missing_docs)]
    pub z_val: f32,
}

impl Vector3r {
    #[allow(missing_docs)]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Vector3r {
            x_val: x,
            y_val: y,
            z_val: z,
        }
    }
}

impl std::ops::Add for Vector3r {
    type Output = Vector3r;

    fn add(self, rhs: Vector3r) -> Vector3r {
        Vector3r::new(self.x_val + rhs.x_val, self.y_val + rhs.y_val, self.z_val + rhs.z_val)
    }
}

impl fmt::Display for Vector3r {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{}\t{}", self.x_val, self.y_val, self.z_val)
    }
}

impl From<Vector3r> for Value {
    fn from(v: Vector3r) -> Self {
        Value::Map(vec![
            (Value::from("x_val"), Value::from(v.x_val)),
            (Value::from("y_val"), Value::from(v.y_val)),
            (Value::from("z_val"), Value::from(v.z_val)),
        ])
    }
}

/// Orientation quaternion
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Quaternionr {
    #[allow(missing_docs)]
    pub w_val: f32,
    #[allow(missing_docs)]
    pub x_val: f32,
    #[allow(missing_docs)]
    pub y_val: f32,
    #[allow(missing_docs)]
    pub z_val: f32,
}

impl Default for Quaternionr {
    fn default() -> Self {
        Quaternionr {
            w_val: 1.0,
            x_val: 0.0,
            y_val: 0.0,
            z_val: 0.0,
        }
    }
}

impl fmt::Display for Quaternionr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{}\t{}\t{}", self.w_val, self.x_val, self.y_val, self.z_val)
    }
}

/// Geographic position, degrees and meters above sea level
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
pub struct GeoPoint {
    #[allow(missing_docs)]
    pub latitude: f64,
    #[allow(missing_docs)]
    pub longitude: f64,
    #[allow(missing_docs)]
    pub altitude: f32,
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}, {}", self.latitude, self.longitude, self.altitude)
    }
}

/// Barometer sample
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct BarometerData {
    /// Simulation time, nanoseconds
    pub time_stamp: u64,
    /// Meters
    pub altitude: f32,
    /// Pascal
    pub pressure: f32,
    /// Reference pressure at sea level, hectopascal
    pub qnh: f32,
}

/// IMU sample
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct ImuData {
    /// Simulation time, nanoseconds
    pub time_stamp: u64,
    #[allow(missing_docs)]
    pub orientation: Quaternionr,
    /// rad/s, body frame
    pub angular_velocity: Vector3r,
    /// m/s², body frame
    pub linear_acceleration: Vector3r,
}

/// Quality of the GNSS solution
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive, IntoPrimitive, Deserialize)]
#[serde(try_from = "u8")]
#[repr(u8)]
#[allow(missing_docs)]
pub enum GnssFixType {
    NoFix = 0,
    TimeOnly = 1,
    Fix2D = 2,
    Fix3D = 3,
}

impl fmt::Display for GnssFixType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", u8::from(*self))
    }
}

/// GNSS solution
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct GnssReport {
    #[allow(missing_docs)]
    pub geo_point: GeoPoint,
    /// Horizontal position error, meters
    pub eph: f32,
    /// Vertical position error, meters
    pub epv: f32,
    #[allow(missing_docs)]
    pub velocity: Vector3r,
    #[allow(missing_docs)]
    pub fix_type: GnssFixType,
    /// UTC time, microseconds since epoch
    pub time_utc: u64,
}

/// GPS sample
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct GpsData {
    /// Simulation time, nanoseconds
    pub time_stamp: u64,
    #[allow(missing_docs)]
    pub gnss: GnssReport,
    #[allow(missing_docs)]
    #[serde(default)]
    pub is_valid: bool,
}

/// Magnetometer sample
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MagnetometerData {
    /// Simulation time, nanoseconds
    pub time_stamp: u64,
    /// Gauss, body frame
    pub magnetic_field_body: Vector3r,
    /// Not filled by the simulator sensor model
    #[serde(default)]
    pub magnetic_field_covariance: Vec<f32>,
}

/// Landed or flying, as estimated by the vehicle
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive, IntoPrimitive, Deserialize)]
#[serde(try_from = "u8")]
#[repr(u8)]
#[allow(missing_docs)]
pub enum LandedState {
    Landed = 0,
    Flying = 1,
}

/// Estimated kinematics of the vehicle
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[allow(missing_docs)]
pub struct KinematicsState {
    pub position: Vector3r,
    pub orientation: Quaternionr,
    pub linear_velocity: Vector3r,
    pub angular_velocity: Vector3r,
    pub linear_acceleration: Vector3r,
    pub angular_acceleration: Vector3r,
}

/// State of a multirotor as returned by `getMultirotorState`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MultirotorState {
    #[allow(missing_docs)]
    pub kinematics_estimated: KinematicsState,
    #[allow(missing_docs)]
    pub gps_location: GeoPoint,
    /// Simulation time, nanoseconds
    pub timestamp: u64,
    #[allow(missing_docs)]
    pub landed_state: LandedState,
    #[allow(missing_docs)]
    #[serde(default)]
    pub ready: bool,
    #[allow(missing_docs)]
    #[serde(default)]
    pub ready_message: String,
    #[allow(missing_docs)]
    #[serde(default)]
    pub can_arm: bool,
}

impl MultirotorState {
    /// Estimated position in the local NED frame
    pub fn position(&self) -> Vector3r {
        self.kinematics_estimated.position
    }
}

/// Heading control during a maneuver
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct YawMode {
    /// If true `yaw_or_rate` is a yaw rate in deg/s, otherwise an angle in degrees
    pub is_rate: bool,
    #[allow(missing_docs)]
    pub yaw_or_rate: f32,
}

impl Default for YawMode {
    fn default() -> Self {
        YawMode {
            is_rate: true,
            yaw_or_rate: 0.0,
        }
    }
}

impl From<YawMode> for Value {
    fn from(mode: YawMode) -> Self {
        Value::Map(vec![
            (Value::from("is_rate"), Value::from(mode.is_rate)),
            (Value::from("yaw_or_rate"), Value::from(mode.yaw_or_rate)),
        ])
    }
}

/// Yaw alignment policy while moving
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum DrivetrainType {
    /// Heading is independent from the direction of travel
    MaxDegreeOfFreedom = 0,
    /// Always face the direction of travel
    ForwardOnly = 1,
}

impl Default for DrivetrainType {
    fn default() -> Self {
        DrivetrainType::MaxDegreeOfFreedom
    }
}

impl From<DrivetrainType> for Value {
    fn from(drivetrain: DrivetrainType) -> Self {
        Value::from(u8::from(drivetrain))
    }
}

/// Kind of image produced by a camera
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive, IntoPrimitive)]
#[repr(u8)]
#[allow(missing_docs)]
pub enum ImageType {
    Scene = 0,
    DepthPlanar = 1,
    DepthPerspective = 2,
    DepthVis = 3,
    DisparityNormalized = 4,
    Segmentation = 5,
    SurfaceNormals = 6,
    Infrared = 7,
}

/// One image to capture in a `simGetImages` call
#[derive(Debug, Clone, PartialEq)]
pub struct ImageRequest {
    /// Camera name as configured in the simulator, for example `front_left`
    pub camera_name: String,
    #[allow(missing_docs)]
    pub image_type: ImageType,
    /// Return floating point pixels in `image_data_float` instead of bytes
    pub pixels_as_float: bool,
    /// Compress the image as PNG
    pub compress: bool,
}

impl ImageRequest {
    /// Request with compression enabled, the simulator default
    pub fn new(camera_name: &str, image_type: ImageType, pixels_as_float: bool) -> Self {
        ImageRequest {
            camera_name: camera_name.to_owned(),
            image_type,
            pixels_as_float,
            compress: true,
        }
    }
}

impl From<&ImageRequest> for Value {
    fn from(request: &ImageRequest) -> Self {
        Value::Map(vec![
            (Value::from("camera_name"), Value::from(request.camera_name.as_str())),
            (Value::from("image_type"), Value::from(u8::from(request.image_type))),
            (Value::from("pixels_as_float"), Value::from(request.pixels_as_float)),
            (Value::from("compress"), Value::from(request.compress)),
        ])
    }
}

/// Image returned by `simGetImages`
#[derive(Debug, Clone, PartialEq)]
#[allow(missing_docs)]
pub struct ImageResponse {
    pub image_data_uint8: Vec<u8>,
    pub image_data_float: Vec<f32>,
    pub camera_name: String,
    pub camera_position: Vector3r,
    pub camera_orientation: Quaternionr,
    pub time_stamp: u64,
    pub message: String,
    pub pixels_as_float: bool,
    pub compress: bool,
    pub width: u32,
    pub height: u32,
    pub image_type: ImageType,
}

// Image payloads come as msgpack binary or as arrays of integers depending on the server build, so the response is
// decoded by hand instead of through serde.
impl TryFrom<Value> for ImageResponse {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        let map = match value {
            Value::Map(map) => map,
            other => {
                return Err(Error::ConversionError(format!(
                    "Image response is not a map: {}",
                    other
                )))
            }
        };
        let field = |name: &str| {
            map.iter()
                .find(|(key, _)| key.as_str() == Some(name))
                .map(|(_, value)| value.clone())
                .unwrap_or(Value::Nil)
        };

        let image_type = field("image_type")
            .as_u64()
            .and_then(|t| u8::try_from(t).ok())
            .and_then(|t| ImageType::try_from(t).ok())
            .unwrap_or(ImageType::Scene);

        Ok(ImageResponse {
            image_data_uint8: bytes(field("image_data_uint8"))?,
            image_data_float: floats(field("image_data_float"))?,
            camera_name: field("camera_name").as_str().unwrap_or_default().to_owned(),
            camera_position: decode_or_default(field("camera_position"))?,
            camera_orientation: decode_or_default(field("camera_orientation"))?,
            time_stamp: field("time_stamp").as_u64().unwrap_or(0),
            message: field("message").as_str().unwrap_or_default().to_owned(),
            pixels_as_float: field("pixels_as_float").as_bool().unwrap_or(false),
            compress: field("compress").as_bool().unwrap_or(false),
            width: dimension(field("width"))?,
            height: dimension(field("height"))?,
            image_type,
        })
    }
}

// Missing dimensions are 0, out of range ones are an error
fn dimension(value: Value) -> Result<u32> {
    match value.as_u64() {
        Some(pixels) => u32::try_from(pixels)
            .map_err(|_| Error::ConversionError(format!("Image dimension out of range: {}", pixels))),
        None => Ok(0),
    }
}

fn bytes(value: Value) -> Result<Vec<u8>> {
    match value {
        Value::Binary(bytes) => Ok(bytes),
        Value::Nil => Ok(Vec::new()),
        other => Ok(rmpv::ext::from_value(other)?),
    }
}

fn floats(value: Value) -> Result<Vec<f32>> {
    match value {
        Value::Nil => Ok(Vec::new()),
        other => Ok(rmpv::ext::from_value(other)?),
    }
}

fn decode_or_default<T: serde::de::DeserializeOwned + Default>(value: Value) -> Result<T> {
    match value {
        Value::Nil => Ok(T::default()),
        other => Ok(rmpv::ext::from_value(other)?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vector(x: f32, y: f32, z: f32) -> Value {
        Value::from(Vector3r::new(x, y, z))
    }

    fn map(fields: Vec<(&str, Value)>) -> Value {
        Value::Map(fields.into_iter().map(|(k, v)| (Value::from(k), v)).collect())
    }

    #[test]
    fn gps_data_decodes_from_simulator_map() {
        let value = map(vec![
            ("time_stamp", Value::from(1_000u64)),
            (
                "gnss",
                map(vec![
                    (
                        "geo_point",
                        map(vec![
                            ("latitude", Value::from(47.641468)),
                            ("longitude", Value::from(-122.140165)),
                            ("altitude", Value::from(122.0f32)),
                        ]),
                    ),
                    ("eph", Value::from(0.3f32)),
                    ("epv", Value::from(0.4f32)),
                    ("velocity", vector(0.0, 0.0, 0.0)),
                    ("fix_type", Value::from(3)),
                    ("time_utc", Value::from(1_600_000_000_000_000u64)),
                ]),
            ),
            ("is_valid", Value::from(true)),
        ]);

        let gps: GpsData = rmpv::ext::from_value(value).unwrap();
        assert_eq!(gps.gnss.fix_type, GnssFixType::Fix3D);
        assert_eq!(gps.gnss.geo_point.altitude, 122.0);
        assert!(gps.is_valid);
    }

    #[test]
    fn unknown_fix_type_is_rejected() {
        assert!(rmpv::ext::from_value::<GnssFixType>(Value::from(9)).is_err());
    }

    #[test]
    fn image_request_is_sent_as_a_map() {
        let request = ImageRequest::new("front_left", ImageType::Scene, false);
        let value = Value::from(&request);

        let keys: Vec<_> = value
            .as_map()
            .unwrap()
            .iter()
            .filter_map(|(k, _)| k.as_str())
            .collect();
        assert_eq!(keys, vec!["camera_name", "image_type", "pixels_as_float", "compress"]);
    }

    #[test]
    fn image_response_accepts_binary_payload() {
        let value = map(vec![
            ("image_data_uint8", Value::Binary(vec![1, 2, 3])),
            ("camera_name", Value::from("front_right")),
            ("width", Value::from(2)),
            ("height", Value::from(1)),
            ("image_type", Value::from(0)),
        ]);

        let response = ImageResponse::try_from(value).unwrap();
        assert_eq!(response.image_data_uint8, vec![1, 2, 3]);
        assert_eq!(response.camera_name, "front_right");
        assert_eq!(response.camera_orientation, Quaternionr::default());
    }

    #[test]
    fn oversized_image_dimension_is_rejected() {
        let value = map(vec![
            ("camera_name", Value::from("front_left")),
            ("width", Value::from(u64::from(u32::MAX) + 1)),
            ("height", Value::from(1)),
        ]);

        assert!(matches!(ImageResponse::try_from(value), Err(Error::ConversionError(_))));
    }
}
