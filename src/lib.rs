//! Feed digest - posts model-written summaries of new feed entries to Slack.
//!
//! Each invocation polls one syndication feed, keeps the entries updated
//! within a rolling look-back window, asks the `OpenAI` chat completions API
//! for a three-line Japanese summary of each and posts it to a Slack incoming
//! webhook.
//!
//! # Architecture
//!
//! - `feed` fetches the feed with reqwest, parses it with feed-rs and applies
//!   the time window
//! - `ai` builds the fixed prompt and calls the summarization service
//! - `slack` formats the Block Kit message and posts it to the webhook
//! - `worker` runs the pass entry by entry and hosts the Lambda handler
//! - `core` holds the data model and the configuration sources (environment
//!   or SSM parameter store)
//!
//! # Example
//!
//! ```no_run
//! use feed_digest::core::source::EnvConfigSource;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     feed_digest::setup_logging();
//!
//!     let report = feed_digest::worker::handler::run_with_source(&EnvConfigSource).await?;
//!     println!("{} delivered, {} failed", report.delivered(), report.failed());
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod ai;
pub mod core;
pub mod errors;
pub mod feed;
pub mod slack;
pub mod worker;

pub use errors::FeedDigestError;

/// Configure structured logging with JSON format for AWS Lambda environments.
///
/// This function sets up tracing-subscriber with a JSON formatter suitable for
/// `CloudWatch` Logs integration. Calling it again after a subscriber has been
/// installed is a no-op.
///
/// # Example
///
/// ```
/// feed_digest::setup_logging();
/// ```
pub fn setup_logging() {
    use tracing_subscriber::prelude::*;
    let fmt_layer = tracing_subscriber::fmt::layer().json().with_target(true);

    let _ = tracing_subscriber::registry().with(fmt_layer).try_init();
}
