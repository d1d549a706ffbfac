//! Where configuration values come from.
//!
//! The pipeline only sees an [`AppConfig`](super::config::AppConfig); the entry
//! point decides whether the values are read from the process environment or
//! from the SSM parameter store.

use async_trait::async_trait;
use aws_sdk_ssm::Client as SsmClient;
use std::env;
use tracing::debug;

use crate::errors::FeedDigestError;

/// Default parameter holding the `OpenAI` secret key.
pub const DEFAULT_OPENAI_KEY_PARAM: &str = "/openai/secret_key";

/// Default parameter holding the Slack incoming webhook URL.
pub const DEFAULT_WEBHOOK_PARAM: &str = "/slack/feed_openai/webhook";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigKey {
    FeedUrl,
    OpenAiApiKey,
    OpenAiOrgId,
    OpenAiModel,
    OpenAiBaseUrl,
    LookbackMinutes,
    UtcOffsetHours,
    SlackWebhookUrl,
}

impl ConfigKey {
    #[must_use]
    pub fn env_var(self) -> &'static str {
        match self {
            ConfigKey::FeedUrl => "FEED_URL",
            ConfigKey::OpenAiApiKey => "OPENAI_API_KEY",
            ConfigKey::OpenAiOrgId => "OPENAI_ORG_ID",
            ConfigKey::OpenAiModel => "OPENAI_MODEL",
            ConfigKey::OpenAiBaseUrl => "OPENAI_BASE_URL",
            ConfigKey::LookbackMinutes => "LOOKBACK_MINUTES",
            ConfigKey::UtcOffsetHours => "UTC_OFFSET_HOURS",
            ConfigKey::SlackWebhookUrl => "SLACK_WEBHOOK_URL",
        }
    }

    /// Secrets live in the parameter store; everything else is plain environment.
    #[must_use]
    pub fn is_secret(self) -> bool {
        matches!(self, ConfigKey::OpenAiApiKey | ConfigKey::SlackWebhookUrl)
    }
}

/// Capability to look up a configuration value by key.
#[async_trait]
pub trait ConfigSource: Send + Sync {
    /// Returns `Ok(None)` when the key is simply not set.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be reached.
    async fn get(&self, key: ConfigKey) -> Result<Option<String>, FeedDigestError>;
}

fn non_empty_env(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Reads every key from the process environment.
#[derive(Debug, Default, Clone, Copy)]
pub struct EnvConfigSource;

#[async_trait]
impl ConfigSource for EnvConfigSource {
    async fn get(&self, key: ConfigKey) -> Result<Option<String>, FeedDigestError> {
        Ok(non_empty_env(key.env_var()))
    }
}

/// Reads secrets from SSM `SecureString` parameters and the remaining keys
/// from the function environment.
pub struct SsmConfigSource {
    client: SsmClient,
    openai_key_param: String,
    webhook_param: String,
}

impl SsmConfigSource {
    #[must_use]
    pub fn new(client: SsmClient) -> Self {
        Self {
            client,
            openai_key_param: DEFAULT_OPENAI_KEY_PARAM.to_string(),
            webhook_param: DEFAULT_WEBHOOK_PARAM.to_string(),
        }
    }

    /// Build from the ambient AWS configuration (region, credentials).
    ///
    /// Parameter names can be overridden with `OPENAI_API_KEY_PARAM` and
    /// `SLACK_WEBHOOK_PARAM`.
    pub async fn from_env() -> Self {
        let shared = aws_config::from_env().load().await;
        let mut source = Self::new(SsmClient::new(&shared));
        if let Some(name) = non_empty_env("OPENAI_API_KEY_PARAM") {
            source.openai_key_param = name;
        }
        if let Some(name) = non_empty_env("SLACK_WEBHOOK_PARAM") {
            source.webhook_param = name;
        }
        source
    }

    fn parameter_name(&self, key: ConfigKey) -> Option<&str> {
        if !key.is_secret() {
            return None;
        }
        match key {
            ConfigKey::SlackWebhookUrl => Some(&self.webhook_param),
            _ => Some(&self.openai_key_param),
        }
    }

    async fn get_parameter(&self, name: &str) -> Result<Option<String>, FeedDigestError> {
        debug!("Reading SSM parameter {}", name);
        match self
            .client
            .get_parameter()
            .name(name)
            .with_decryption(true)
            .send()
            .await
        {
            Ok(resp) => Ok(resp
                .parameter
                .and_then(|p| p.value().map(str::to_string))
                .filter(|v| !v.trim().is_empty())),
            Err(e) => {
                let not_found = e
                    .as_service_error()
                    .is_some_and(|se| se.is_parameter_not_found());
                if not_found {
                    debug!("SSM parameter {} not found", name);
                    return Ok(None);
                }
                Err(e.into())
            }
        }
    }
}

#[async_trait]
impl ConfigSource for SsmConfigSource {
    async fn get(&self, key: ConfigKey) -> Result<Option<String>, FeedDigestError> {
        match self.parameter_name(key) {
            Some(name) => self.get_parameter(name).await,
            None => Ok(non_empty_env(key.env_var())),
        }
    }
}
