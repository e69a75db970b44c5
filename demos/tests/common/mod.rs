// Vehicle that records the mission calls instead of flying

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use demos::vehicle::Vehicle;
use multirotor_lib::types::{
    BarometerData, DrivetrainType, GeoPoint, GnssFixType, GnssReport, GpsData, ImageRequest, ImageResponse, ImuData,
    MagnetometerData, Quaternionr, Vector3r, YawMode,
};
use multirotor_lib::{Completion, Error, Result, Task};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    EnableApiControl(bool),
    ArmDisarm(bool),
    Barometer,
    Imu,
    Gps,
    Magnetometer,
    Takeoff(f32),
    Hover,
    Position,
    MoveOnPath {
        path: Vec<Vector3r>,
        velocity: f32,
        drivetrain: DrivetrainType,
        yaw_mode: YawMode,
    },
    MoveToPosition(Vector3r, f32),
    Land,
}

pub struct MockVehicle {
    pub calls: Mutex<Vec<Call>>,
    pub origin: Vector3r,
    /// Method name that fails with an RPC error
    pub fail_on: Option<&'static str>,
    /// When set, position moves are only finished by the receiver of the completions
    pub move_gate: Option<flume::Sender<Completion>>,
    control: AtomicBool,
    image_requests: AtomicU64,
    image_requests_at_release: AtomicU64,
}

impl MockVehicle {
    pub fn new(origin: Vector3r) -> Self {
        MockVehicle {
            calls: Mutex::new(Vec::new()),
            origin,
            fail_on: None,
            move_gate: None,
            control: AtomicBool::new(false),
            image_requests: AtomicU64::new(0),
            image_requests_at_release: AtomicU64::new(0),
        }
    }

    pub fn failing_on(method: &'static str) -> Self {
        MockVehicle {
            fail_on: Some(method),
            ..MockVehicle::new(Vector3r::default())
        }
    }

    pub fn with_move_gate(origin: Vector3r, gate: flume::Sender<Completion>) -> Self {
        MockVehicle {
            move_gate: Some(gate),
            ..MockVehicle::new(origin)
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn image_requests(&self) -> u64 {
        self.image_requests.load(Ordering::SeqCst)
    }

    /// Image requests already issued when API control was released
    pub fn image_requests_at_release(&self) -> u64 {
        self.image_requests_at_release.load(Ordering::SeqCst)
    }

    fn record(&self, method: &str, call: Call) -> Result<()> {
        self.check(method)?;
        self.calls.lock().unwrap().push(call);
        Ok(())
    }

    fn check(&self, method: &str) -> Result<()> {
        if self.fail_on == Some(method) {
            Err(Error::RpcError(format!("{} rejected by the simulator", method)))
        } else {
            Ok(())
        }
    }
}

fn finished() -> Task {
    let (completion, task) = Task::channel();
    completion.complete();
    task
}

#[async_trait]
impl Vehicle for MockVehicle {
    async fn confirm_connection(&self) -> Result<()> {
        self.check("confirm_connection")
    }

    async fn enable_api_control(&self, enable: bool) -> Result<()> {
        self.record("enable_api_control", Call::EnableApiControl(enable))?;
        self.control.store(enable, Ordering::SeqCst);
        if !enable {
            self.image_requests_at_release
                .store(self.image_requests.load(Ordering::SeqCst), Ordering::SeqCst);
        }
        Ok(())
    }

    async fn is_api_control_enabled(&self) -> Result<bool> {
        self.check("is_api_control_enabled")?;
        Ok(self.control.load(Ordering::SeqCst))
    }

    async fn arm_disarm(&self, arm: bool) -> Result<bool> {
        self.record("arm_disarm", Call::ArmDisarm(arm))?;
        Ok(true)
    }

    async fn barometer_data(&self) -> Result<BarometerData> {
        self.record("barometer_data", Call::Barometer)?;
        Ok(BarometerData {
            time_stamp: 1,
            altitude: 122.0,
            pressure: 99_887.0,
            qnh: 1013.25,
        })
    }

    async fn imu_data(&self) -> Result<ImuData> {
        self.record("imu_data", Call::Imu)?;
        Ok(ImuData {
            time_stamp: 1,
            orientation: Quaternionr::default(),
            angular_velocity: Vector3r::default(),
            linear_acceleration: Vector3r::new(0.0, 0.0, -9.81),
        })
    }

    async fn gps_data(&self) -> Result<GpsData> {
        self.record("gps_data", Call::Gps)?;
        Ok(GpsData {
            time_stamp: 1,
            gnss: GnssReport {
                geo_point: GeoPoint {
                    latitude: 47.641468,
                    longitude: -122.140165,
                    altitude: 122.0,
                },
                eph: 0.1,
                epv: 0.1,
                velocity: Vector3r::default(),
                fix_type: GnssFixType::Fix3D,
                time_utc: 1_700_000_000_000_000,
            },
            is_valid: true,
        })
    }

    async fn magnetometer_data(&self) -> Result<MagnetometerData> {
        self.record("magnetometer_data", Call::Magnetometer)?;
        Ok(MagnetometerData {
            time_stamp: 1,
            magnetic_field_body: Vector3r::new(0.2, 0.0, 0.4),
            magnetic_field_covariance: Vec::new(),
        })
    }

    async fn takeoff(&self, timeout: f32) -> Result<Task> {
        self.record("takeoff", Call::Takeoff(timeout))?;
        Ok(finished())
    }

    async fn hover(&self) -> Result<Task> {
        self.record("hover", Call::Hover)?;
        Ok(finished())
    }

    async fn land(&self) -> Result<Task> {
        self.record("land", Call::Land)?;
        Ok(finished())
    }

    async fn move_on_path(
        &self,
        path: &[Vector3r],
        velocity: f32,
        _timeout: f32,
        drivetrain: DrivetrainType,
        yaw_mode: YawMode,
    ) -> Result<Task> {
        self.record(
            "move_on_path",
            Call::MoveOnPath {
                path: path.to_vec(),
                velocity,
                drivetrain,
                yaw_mode,
            },
        )?;
        Ok(finished())
    }

    async fn move_to_position(&self, target: Vector3r, velocity: f32) -> Result<Task> {
        self.record("move_to_position", Call::MoveToPosition(target, velocity))?;
        match &self.move_gate {
            Some(gate) => {
                let (completion, task) = Task::channel();
                gate.send_async(completion)
                    .await
                    .map_err(|_| Error::Disconnected)?;
                Ok(task)
            }
            None => Ok(finished()),
        }
    }

    async fn position(&self) -> Result<Vector3r> {
        self.record("position", Call::Position)?;
        Ok(self.origin)
    }

    async fn images(&self, requests: &[ImageRequest]) -> Result<Vec<ImageResponse>> {
        self.check("images")?;
        assert_eq!(requests.len(), 2);
        self.image_requests.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;
        Ok(Vec::new())
    }
}
