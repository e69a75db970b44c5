// Takes off, flies to 100 random waypoints one at a time, comes back slowly to the take-off position and lands.
//
// Start the simulator first, its address can be given as first argument.

use demos::config::MissionConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    demos::launch(MissionConfig::point_to_point()).await
}
