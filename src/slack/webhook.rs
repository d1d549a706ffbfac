use reqwest::Client as HttpClient;
use std::time::Duration;
use tracing::{error, info};
use url::Url;

use super::message_formatter::NotificationMessage;
use crate::errors::FeedDigestError;

const WEBHOOK_TIMEOUT_SECS: u64 = 30;

/// Posts notifications to a Slack incoming webhook.
pub struct WebhookSender {
    http: HttpClient,
    endpoint: Url,
}

impl WebhookSender {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(endpoint: Url) -> Result<Self, FeedDigestError> {
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(WEBHOOK_TIMEOUT_SECS))
            .build()
            .map_err(|e| FeedDigestError::Delivery(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { http, endpoint })
    }

    /// Only the transport status is checked; the response body is not
    /// interpreted beyond logging it on failure.
    ///
    /// # Errors
    ///
    /// Returns `Delivery` on transport errors and non-success status codes.
    pub async fn send(&self, message: &NotificationMessage) -> Result<(), FeedDigestError> {
        let body = message.to_webhook_payload();

        let resp = self
            .http
            .post(self.endpoint.as_str())
            .json(&body)
            .send()
            .await
            .map_err(|e| FeedDigestError::Delivery(format!("Webhook POST failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            let body_text = resp
                .text()
                .await
                .unwrap_or_else(|_| "<failed to read body>".to_string());
            error!("Webhook POST failed: status={} body={}", status, body_text);
            return Err(FeedDigestError::Delivery(format!(
                "Webhook returned status {status}: {body_text}"
            )));
        }

        info!("Webhook accepted notification (status={})", status);
        Ok(())
    }
}
