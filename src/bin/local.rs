// Runs a single pass with configuration read from environment variables

use feed_digest::core::source::EnvConfigSource;
use feed_digest::worker::handler::run_with_source;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    feed_digest::setup_logging();

    match run_with_source(&EnvConfigSource).await {
        Ok(report) => {
            info!(
                "{} delivered, {} failed (run {})",
                report.delivered(),
                report.failed(),
                report.run_id
            );
            Ok(())
        }
        Err(e) => {
            error!("Run failed: {}", e);
            Err(e.into())
        }
    }
}
