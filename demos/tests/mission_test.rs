// Fly the demo missions against a recording vehicle

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{Call, MockVehicle};
use demos::config::MissionConfig;
use demos::mission::fly;
use demos::report::{report_outcome, API_ERROR_HEADER};
use demos::vehicle::Vehicle;
use multirotor_lib::types::{DrivetrainType, Vector3r, YawMode};
use multirotor_lib::Error;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn continuous_path() -> MissionConfig {
    MissionConfig {
        hover_pause: Duration::ZERO,
        ..MissionConfig::continuous_path()
    }
}

fn point_to_point() -> MissionConfig {
    MissionConfig {
        hover_pause: Duration::ZERO,
        ..MissionConfig::point_to_point()
    }
}

#[tokio::test]
async fn calls_follow_the_flight_order() {
    let origin = Vector3r::new(0.0, 0.0, -1.0);
    let vehicle = Arc::new(MockVehicle::new(origin));
    let config = MissionConfig {
        waypoint_count: 3,
        ..point_to_point()
    };

    let report = fly(vehicle.clone(), &config, &mut StdRng::seed_from_u64(1))
        .await
        .unwrap();

    let mut expected = vec![
        Call::EnableApiControl(true),
        Call::ArmDisarm(true),
        Call::Barometer,
        Call::Imu,
        Call::Gps,
        Call::Magnetometer,
        Call::Takeoff(3.0),
        Call::Hover,
        Call::Position,
    ];
    expected.extend(report.waypoints.iter().map(|wp| Call::MoveToPosition(*wp, 15.0)));
    expected.extend([
        Call::MoveToPosition(origin, 5.0),
        Call::Land,
        Call::EnableApiControl(false),
        Call::ArmDisarm(false),
    ]);

    assert_eq!(vehicle.calls(), expected);
    assert_eq!(report.origin, origin);
    assert_eq!(report.camera_polls, 0);
}

#[tokio::test(flavor = "multi_thread")]
async fn continuous_path_mission() {
    let vehicle = Arc::new(MockVehicle::new(Vector3r::default()));

    let report = fly(vehicle.clone(), &continuous_path(), &mut StdRng::seed_from_u64(2))
        .await
        .unwrap();

    let calls = vehicle.calls();
    let count = |wanted: &Call| calls.iter().filter(|c| *c == wanted).count();
    assert_eq!(count(&Call::Takeoff(3.0)), 1);
    assert_eq!(count(&Call::Hover), 1);
    assert_eq!(count(&Call::Land), 1);

    let paths: Vec<_> = calls
        .iter()
        .enumerate()
        .filter_map(|(i, c)| match c {
            Call::MoveOnPath {
                path,
                velocity,
                drivetrain,
                yaw_mode,
            } => Some((i, path, *velocity, *drivetrain, *yaw_mode)),
            _ => None,
        })
        .collect();
    assert_eq!(paths.len(), 1);

    let (index, path, velocity, drivetrain, yaw_mode) = &paths[0];
    assert_eq!(path.len(), 51);
    assert_eq!(path[..50], report.waypoints[..]);
    assert_eq!(path[50], Vector3r::default());
    assert_eq!(*velocity, 15.0);
    assert_eq!(*drivetrain, DrivetrainType::ForwardOnly);
    assert_eq!(
        *yaw_mode,
        YawMode {
            is_rate: false,
            yaw_or_rate: 0.0
        }
    );

    // Path only flown once hovering
    let hover = calls.iter().position(|c| *c == Call::Hover).unwrap();
    assert!(*index > hover);

    assert_eq!(report.camera_polls, vehicle.image_requests());
}

#[tokio::test(flavor = "multi_thread")]
async fn camera_poller_stops_with_api_control() {
    let vehicle = Arc::new(MockVehicle::new(Vector3r::default()));

    let report = fly(vehicle.clone(), &continuous_path(), &mut StdRng::seed_from_u64(3))
        .await
        .unwrap();

    // At most the poll in flight when control was released
    assert!(vehicle.image_requests() <= vehicle.image_requests_at_release() + 1);

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(vehicle.image_requests(), report.camera_polls);
}

#[tokio::test(flavor = "multi_thread")]
async fn point_to_point_waits_for_each_move() {
    let (gate, moves) = flume::unbounded();
    let origin = Vector3r::new(1.0, 2.0, -3.0);
    let vehicle = Arc::new(MockVehicle::with_move_gate(origin, gate));
    let config = point_to_point();
    let waypoint_count = config.waypoint_count;

    let mission = {
        let vehicle = vehicle.clone();
        tokio::spawn(async move { fly(vehicle, &config, &mut StdRng::seed_from_u64(4)).await })
    };

    let move_count = || {
        vehicle
            .calls()
            .iter()
            .filter(|c| matches!(c, Call::MoveToPosition(..)))
            .count()
    };

    for i in 0..=waypoint_count {
        let completion = tokio::time::timeout(Duration::from_secs(5), moves.recv_async())
            .await
            .expect("Mission should issue the next move")
            .unwrap();

        tokio::time::sleep(Duration::from_millis(1)).await;
        assert_eq!(move_count(), i + 1);
        assert!(moves.is_empty());

        completion.complete();
    }

    let report = mission.await.unwrap().unwrap();

    let moved: Vec<_> = vehicle
        .calls()
        .into_iter()
        .filter(|c| matches!(c, Call::MoveToPosition(..)))
        .collect();
    assert_eq!(moved.len(), waypoint_count + 1);
    for (call, waypoint) in moved.iter().zip(&report.waypoints) {
        assert_eq!(*call, Call::MoveToPosition(*waypoint, 15.0));
    }
    assert_eq!(moved[waypoint_count], Call::MoveToPosition(origin, 5.0));
    assert_eq!(vehicle.calls().last(), Some(&Call::ArmDisarm(false)));
}

#[tokio::test(flavor = "multi_thread")]
async fn rpc_failure_prints_one_message() {
    let failures = [
        ("enable_api_control", continuous_path()),
        ("arm_disarm", continuous_path()),
        ("barometer_data", continuous_path()),
        ("imu_data", continuous_path()),
        ("gps_data", continuous_path()),
        ("magnetometer_data", continuous_path()),
        ("takeoff", continuous_path()),
        ("hover", continuous_path()),
        ("position", continuous_path()),
        ("move_on_path", continuous_path()),
        ("land", continuous_path()),
        ("is_api_control_enabled", continuous_path()),
        ("move_to_position", point_to_point()),
    ];

    for (method, config) in failures {
        let vehicle = Arc::new(MockVehicle::failing_on(method));

        let outcome = fly(vehicle.clone(), &config, &mut StdRng::seed_from_u64(5)).await;
        assert!(matches!(outcome, Err(Error::RpcError(_))), "{} should fail the mission", method);

        let mut out = Vec::new();
        report_outcome(outcome, &mut out).unwrap();

        let out = String::from_utf8(out).unwrap();
        assert_eq!(out.matches(API_ERROR_HEADER).count(), 1, "{}", method);
        assert!(out.ends_with(&format!("{} rejected by the simulator\n", method)));
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn failed_mission_stops_the_camera_poller() {
    let vehicle = Arc::new(MockVehicle::failing_on("land"));

    let outcome = fly(vehicle.clone(), &continuous_path(), &mut StdRng::seed_from_u64(6)).await;
    assert!(matches!(outcome, Err(Error::RpcError(_))));

    // API control is still enabled, only the mission can stop the poller
    tokio::time::sleep(Duration::from_millis(50)).await;
    let polls = vehicle.image_requests();
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(vehicle.image_requests(), polls);
}
