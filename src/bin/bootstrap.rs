// Lambda bootstrap entry point for the scheduled feed digest

#[tokio::main]
async fn main() -> Result<(), lambda_runtime::Error> {
    feed_digest::setup_logging();
    lambda_runtime::run(lambda_runtime::service_fn(feed_digest::worker::handler)).await
}
