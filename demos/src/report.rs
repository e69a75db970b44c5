//! Console output of the missions

use std::io::Write;

use multirotor_lib::types::{BarometerData, GpsData, ImuData, MagnetometerData};
use multirotor_lib::{Error, Result};

/// First line printed when the simulator rejects a call, followed by the simulator message
pub const API_ERROR_HEADER: &str = "Exception raised by the API, something went wrong.";

pub fn barometer_lines(data: &BarometerData) -> Vec<String> {
    vec![
        "Barometer data".to_owned(),
        format!("barometer_data.time_stamp \t{}", data.time_stamp),
        format!("barometer_data.altitude \t{}", data.altitude),
        format!("barometer_data.pressure \t{}", data.pressure),
        format!("barometer_data.qnh \t{}", data.qnh),
    ]
}

pub fn imu_lines(data: &ImuData) -> Vec<String> {
    vec![
        "IMU data".to_owned(),
        format!("imu_data.time_stamp \t{}", data.time_stamp),
        format!("imu_data.orientation \t{}", data.orientation),
        format!("imu_data.angular_velocity \t{}", data.angular_velocity),
        format!("imu_data.linear_acceleration \t{}", data.linear_acceleration),
    ]
}

pub fn gps_lines(data: &GpsData) -> Vec<String> {
    let gnss = &data.gnss;
    vec![
        "GPS data".to_owned(),
        format!("gps_data.time_stamp \t{}", data.time_stamp),
        format!("gps_data.gnss.time_utc \t{}", gnss.time_utc),
        format!("gps_data.gnss.geo_point \t{}", gnss.geo_point),
        format!("gps_data.gnss.eph \t{}", gnss.eph),
        format!("gps_data.gnss.epv \t{}", gnss.epv),
        format!("gps_data.gnss.velocity \t{}", gnss.velocity),
        format!("gps_data.gnss.fix_type \t{}", gnss.fix_type),
    ]
}

// The covariance is not filled by the simulator and is left out
pub fn magnetometer_lines(data: &MagnetometerData) -> Vec<String> {
    vec![
        "Magnetometer data".to_owned(),
        format!("magnetometer_data.time_stamp \t{}", data.time_stamp),
        format!("magnetometer_data.magnetic_field_body \t{}", data.magnetic_field_body),
    ]
}

pub fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{}", line);
    }
}

/// Top-level handling of a mission outcome
///
/// A call rejected by the simulator is reported on `out` and the mission is considered over. Any other error is
/// returned to the caller.
pub fn report_outcome<T, W: Write>(outcome: Result<T>, out: &mut W) -> std::result::Result<(), Box<dyn std::error::Error>> {
    match outcome {
        Ok(_) => Ok(()),
        Err(Error::RpcError(message)) => {
            writeln!(out, "{}", API_ERROR_HEADER)?;
            writeln!(out, "{}", message)?;
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}
