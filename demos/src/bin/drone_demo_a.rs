// Takes off, flies 50 random waypoints around the take-off position as one path and lands, while polling the
// stereo cameras in the background.
//
// Start the simulator first, its address can be given as first argument.

use demos::config::MissionConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    demos::launch(MissionConfig::continuous_path()).await
}
