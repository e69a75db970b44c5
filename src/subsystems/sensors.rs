//! # Sensors
//!
//! Synchronous reads of the simulated sensors attached to the vehicle. Every read takes the sensor name as configured
//! in the simulator settings, an empty name selects the first sensor of that kind.

use rmpv::Value;

use crate::rpc_utils::Rpc;
use crate::types::{BarometerData, GpsData, ImuData, MagnetometerData};
use crate::Result;

/// Access to the vehicle sensors
pub struct Sensors {
    rpc: Rpc,
    vehicle_name: String,
}

impl Sensors {
    pub(crate) fn new(rpc: Rpc, vehicle_name: &str) -> Self {
        Self {
            rpc,
            vehicle_name: vehicle_name.to_owned(),
        }
    }

    fn params(&self, sensor_name: &str) -> Vec<Value> {
        vec![
            Value::from(sensor_name),
            Value::from(self.vehicle_name.as_str()),
        ]
    }

    /// Read the barometer
    pub async fn barometer_data(&self, sensor_name: &str) -> Result<BarometerData> {
        self.rpc
            .call_as("getBarometerData", self.params(sensor_name))
            .await
    }

    /// Read the IMU
    pub async fn imu_data(&self, sensor_name: &str) -> Result<ImuData> {
        self.rpc.call_as("getImuData", self.params(sensor_name)).await
    }

    /// Read the GPS
    pub async fn gps_data(&self, sensor_name: &str) -> Result<GpsData> {
        self.rpc.call_as("getGpsData", self.params(sensor_name)).await
    }

    /// Read the magnetometer
    pub async fn magnetometer_data(&self, sensor_name: &str) -> Result<MagnetometerData> {
        self.rpc
            .call_as("getMagnetometerData", self.params(sensor_name))
            .await
    }
}
