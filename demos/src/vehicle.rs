//! The vehicle operations a mission needs
//!
//! Missions are written against the [Vehicle] trait, implemented here for [Multirotor].

use async_trait::async_trait;
use multirotor_lib::subsystems::commander::{FOREVER, LAND_TIMEOUT};
use multirotor_lib::types::{
    BarometerData, DrivetrainType, GpsData, ImageRequest, ImageResponse, ImuData, MagnetometerData, Vector3r,
    YawMode,
};
use multirotor_lib::{Multirotor, Result, Task};

/// Remote operations used by the demo missions
///
/// Maneuvers return a [Task] as soon as the command is issued, the mission decides when to wait on it.
#[async_trait]
pub trait Vehicle: Send + Sync {
    async fn confirm_connection(&self) -> Result<()>;
    async fn enable_api_control(&self, enable: bool) -> Result<()>;
    async fn is_api_control_enabled(&self) -> Result<bool>;
    async fn arm_disarm(&self, arm: bool) -> Result<bool>;

    async fn barometer_data(&self) -> Result<BarometerData>;
    async fn imu_data(&self) -> Result<ImuData>;
    async fn gps_data(&self) -> Result<GpsData>;
    async fn magnetometer_data(&self) -> Result<MagnetometerData>;

    async fn takeoff(&self, timeout: f32) -> Result<Task>;
    async fn hover(&self) -> Result<Task>;
    async fn land(&self) -> Result<Task>;
    async fn move_on_path(
        &self,
        path: &[Vector3r],
        velocity: f32,
        timeout: f32,
        drivetrain: DrivetrainType,
        yaw_mode: YawMode,
    ) -> Result<Task>;
    async fn move_to_position(&self, target: Vector3r, velocity: f32) -> Result<Task>;

    /// Current estimated position
    async fn position(&self) -> Result<Vector3r>;

    async fn images(&self, requests: &[ImageRequest]) -> Result<Vec<ImageResponse>>;
}

// Empty name selects the first sensor of each kind
const DEFAULT_SENSOR: &str = "";

#[async_trait]
impl Vehicle for Multirotor {
    async fn confirm_connection(&self) -> Result<()> {
        self.platform.confirm_connection().await
    }

    async fn enable_api_control(&self, enable: bool) -> Result<()> {
        self.control.enable_api_control(enable).await
    }

    async fn is_api_control_enabled(&self) -> Result<bool> {
        self.control.is_api_control_enabled().await
    }

    async fn arm_disarm(&self, arm: bool) -> Result<bool> {
        self.control.arm_disarm(arm).await
    }

    async fn barometer_data(&self) -> Result<BarometerData> {
        self.sensors.barometer_data(DEFAULT_SENSOR).await
    }

    async fn imu_data(&self) -> Result<ImuData> {
        self.sensors.imu_data(DEFAULT_SENSOR).await
    }

    async fn gps_data(&self) -> Result<GpsData> {
        self.sensors.gps_data(DEFAULT_SENSOR).await
    }

    async fn magnetometer_data(&self) -> Result<MagnetometerData> {
        self.sensors.magnetometer_data(DEFAULT_SENSOR).await
    }

    async fn takeoff(&self, timeout: f32) -> Result<Task> {
        self.commander.takeoff(timeout).await
    }

    async fn hover(&self) -> Result<Task> {
        self.commander.hover().await
    }

    async fn land(&self) -> Result<Task> {
        self.commander.land(LAND_TIMEOUT).await
    }

    async fn move_on_path(
        &self,
        path: &[Vector3r],
        velocity: f32,
        timeout: f32,
        drivetrain: DrivetrainType,
        yaw_mode: YawMode,
    ) -> Result<Task> {
        self.commander
            .move_on_path(path, velocity, timeout, drivetrain, yaw_mode)
            .await
    }

    async fn move_to_position(&self, target: Vector3r, velocity: f32) -> Result<Task> {
        self.commander
            .move_to_position(
                target,
                velocity,
                FOREVER,
                DrivetrainType::MaxDegreeOfFreedom,
                YawMode::default(),
            )
            .await
    }

    async fn position(&self) -> Result<Vector3r> {
        self.state.position().await
    }

    async fn images(&self, requests: &[ImageRequest]) -> Result<Vec<ImageResponse>> {
        self.camera.images(requests).await
    }
}
