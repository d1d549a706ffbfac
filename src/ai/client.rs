//! Summarization (`OpenAI` chat completions) client
//!
//! One request per entry, no retries. The first choice's message content is
//! trimmed and returned.

use openai_api_rs::v1::chat_completion::{ChatCompletionMessage, Content, MessageRole};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::{Value, json};
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

use crate::core::config::AppConfig;
use crate::core::models::{SummaryPrompt, SummaryResult};
use crate::errors::FeedDigestError;

/// Low temperature keeps the three-line summaries focused.
pub const SUMMARY_TEMPERATURE: f64 = 0.25;

const REQUEST_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Deserialize)]
struct ChatCompletionBody {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

fn message_to_json(msg: &ChatCompletionMessage) -> Value {
    let role_str = match msg.role {
        MessageRole::system => "system",
        MessageRole::user => "user",
        MessageRole::assistant => "assistant",
        MessageRole::function => "function",
        MessageRole::tool => "tool",
    };
    let content = match &msg.content {
        Content::Text(text) => json!(text),
        Content::ImageUrl(_) => json!(""),
    };
    json!({ "role": role_str, "content": content })
}

/// Extract the first completion's text from a chat completions response body.
///
/// # Errors
///
/// Returns `SummaryService` when the body has no choices or the first choice
/// is empty after trimming.
pub fn extract_summary(body: &Value) -> Result<SummaryResult, FeedDigestError> {
    let parsed: ChatCompletionBody = serde_json::from_value(body.clone()).map_err(|e| {
        FeedDigestError::SummaryService(format!("Malformed chat completion response: {e}"))
    })?;
    let text = parsed
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| {
            FeedDigestError::SummaryService("Response contained no completion".to_string())
        })?;

    let result = SummaryResult::new(&text);
    if result.text.is_empty() {
        return Err(FeedDigestError::SummaryService(
            "Completion text was empty".to_string(),
        ));
    }
    Ok(result)
}

/// Client for the chat completions endpoint.
pub struct SummaryClient {
    http: Client,
    api_key: String,
    org_id: Option<String>,
    model_name: String,
    endpoint: Url,
}

impl SummaryClient {
    /// `base_url` is the API root, e.g. `https://api.openai.com/v1`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built or the endpoint
    /// URL cannot be derived from `base_url`.
    pub fn new(
        api_key: String,
        org_id: Option<String>,
        model_name: String,
        base_url: &Url,
    ) -> Result<Self, FeedDigestError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| {
                FeedDigestError::SummaryService(format!("Failed to build OpenAI HTTP client: {e}"))
            })?;
        let mut root = base_url.clone();
        if !root.path().ends_with('/') {
            let path = format!("{}/", root.path());
            root.set_path(&path);
        }
        let endpoint = root.join("chat/completions")?;

        Ok(Self {
            http,
            api_key,
            org_id,
            model_name,
            endpoint,
        })
    }

    /// # Errors
    ///
    /// See [`SummaryClient::new`].
    pub fn from_config(config: &AppConfig) -> Result<Self, FeedDigestError> {
        Self::new(
            config.openai_api_key.clone(),
            config.openai_org_id.clone(),
            config.openai_model.clone(),
            &config.openai_base_url,
        )
    }

    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    #[must_use]
    pub fn request_body(&self, prompt: &SummaryPrompt) -> Value {
        let messages: Vec<Value> = prompt.to_messages().iter().map(message_to_json).collect();
        json!({
            "model": self.model_name,
            "messages": messages,
            "temperature": SUMMARY_TEMPERATURE
        })
    }

    /// # Errors
    ///
    /// Returns `SummaryService` on transport failures, authentication
    /// failures, non-success status codes and malformed or empty responses.
    pub async fn summarize(&self, prompt: &SummaryPrompt) -> Result<SummaryResult, FeedDigestError> {
        #[cfg(feature = "debug-logs")]
        debug!("Using prompt:\n{:?}", prompt);

        info!(
            "Requesting summary from {} ({} chars of user content)",
            self.model_name,
            prompt.user_content.chars().count()
        );

        let mut request = self
            .http
            .post(self.endpoint.as_str())
            .bearer_auth(&self.api_key)
            .json(&self.request_body(prompt));
        if let Some(org) = &self.org_id {
            request = request.header("OpenAI-Organization", org);
        }

        let response = request
            .send()
            .await
            .map_err(|e| FeedDigestError::SummaryService(format!("OpenAI API request failed: {e}")))?;

        let status = response.status();
        if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
            return Err(FeedDigestError::SummaryService(format!(
                "OpenAI API rejected credentials (status {status})"
            )));
        }
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_else(|e| {
                format!("Failed to read error response body (status {status}): {e}")
            });
            return Err(FeedDigestError::SummaryService(format!(
                "OpenAI API error (status {status}): {error_text}"
            )));
        }

        let body: Value = response.json().await.map_err(|e| {
            FeedDigestError::SummaryService(format!("Failed to parse OpenAI response: {e}"))
        })?;
        let result = extract_summary(&body)?;
        debug!("Summary is {} chars", result.text.chars().count());
        Ok(result)
    }
}
