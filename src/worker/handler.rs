use chrono::Utc;
use lambda_runtime::{Error, LambdaEvent};
use serde_json::Value;
use tracing::{error, info, warn};

use super::pipeline::{PipelineOrchestrator, RunReport};
use crate::ai::SummaryClient;
use crate::core::config::AppConfig;
use crate::core::source::{ConfigSource, SsmConfigSource};
use crate::errors::FeedDigestError;
use crate::feed::FeedWindowFilter;
use crate::slack::WebhookSender;

/// Wire the production components from `config` and run one pass.
///
/// # Errors
///
/// Returns a fatal error when a client cannot be built or the feed cannot be
/// fetched.
pub async fn run_once(config: &AppConfig) -> Result<RunReport, FeedDigestError> {
    let source = FeedWindowFilter::new(config.utc_offset)?;
    let summarizer = SummaryClient::from_config(config)?;
    let notifier = WebhookSender::new(config.slack_webhook_url.clone())?;

    let mut orchestrator = PipelineOrchestrator::new(
        source,
        summarizer,
        notifier,
        config.feed_url.clone(),
        config.lookback,
    );
    let reference_now = Utc::now().with_timezone(&config.utc_offset);
    orchestrator.run(reference_now).await
}

/// Load configuration from `source` and run one pass.
///
/// # Errors
///
/// Returns configuration errors and fatal pipeline errors.
pub async fn run_with_source(source: &dyn ConfigSource) -> Result<RunReport, FeedDigestError> {
    let config = AppConfig::load(source).await?;
    run_once(&config).await
}

/// Lambda handler for the scheduled trigger. The event payload is ignored.
pub async fn function_handler(event: LambdaEvent<Value>) -> Result<(), Error> {
    info!("Scheduled invocation received: {:?}", event.payload);

    let source = SsmConfigSource::from_env().await;
    match run_with_source(&source).await {
        Ok(report) => {
            info!(
                "Pipeline report: {}",
                serde_json::to_string(&report).unwrap_or_else(|e| format!("<unserializable: {e}>"))
            );
            Ok(())
        }
        Err(e) => {
            if e.is_fatal() {
                error!("Pipeline run failed: {}", e);
            } else {
                warn!("Pipeline run stopped on a per-entry error: {}", e);
            }
            Err(Error::from(e))
        }
    }
}

pub use self::function_handler as handler;
