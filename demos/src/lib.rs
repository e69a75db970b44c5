//! Demo missions flown against the simulator
//!
//! Both demo binaries connect to the simulator, wait for the user to press Enter, then fly one [mission] with their
//! own [config::MissionConfig]. A call rejected by the simulator ends the mission with a message on stdout.

pub mod camera_poller;
pub mod config;
pub mod mission;
pub mod report;
pub mod vehicle;
pub mod waypoints;

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use multirotor_lib::Multirotor;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::config::MissionConfig;
use crate::mission::MissionReport;
use crate::vehicle::Vehicle;

/// Connect, wait for the user and fly `config`
///
/// The simulator address is taken from the first command line argument, [multirotor_lib::DEFAULT_ADDRESS] is used
/// otherwise.
pub async fn launch(config: MissionConfig) -> Result<(), Box<dyn std::error::Error>> {
    let address = std::env::args()
        .nth(1)
        .unwrap_or_else(|| multirotor_lib::DEFAULT_ADDRESS.to_owned());

    log::info!("Connecting to {}", address);
    let vehicle = Arc::new(Multirotor::connect_from_uri(&address, "").await?);

    let outcome = run(vehicle.clone(), &config).await;

    let reported = report::report_outcome(outcome, &mut std::io::stdout());
    vehicle.disconnect().await;

    reported
}

async fn run(vehicle: Arc<Multirotor>, config: &MissionConfig) -> multirotor_lib::Result<MissionReport> {
    vehicle.confirm_connection().await?;

    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|t| t.as_secs())
        .unwrap_or_default();
    let mut rng = StdRng::seed_from_u64(seed);

    println!("Press Enter to arm the drone");
    let mut line = String::new();
    BufReader::new(tokio::io::stdin()).read_line(&mut line).await?;

    mission::fly(vehicle, config, &mut rng).await
}
