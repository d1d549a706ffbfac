use async_trait::async_trait;
use feed_digest::core::config::{AppConfig, DEFAULT_FEED_URL, DEFAULT_OPENAI_MODEL};
use feed_digest::core::source::{ConfigKey, ConfigSource};
use feed_digest::errors::FeedDigestError;
use std::collections::HashMap;

/// In-memory source standing in for the environment or SSM.
struct MapSource(HashMap<ConfigKey, String>);

impl MapSource {
    fn with(pairs: &[(ConfigKey, &str)]) -> Self {
        Self(pairs.iter().map(|(k, v)| (*k, (*v).to_string())).collect())
    }
}

#[async_trait]
impl ConfigSource for MapSource {
    async fn get(&self, key: ConfigKey) -> Result<Option<String>, FeedDigestError> {
        Ok(self.0.get(&key).cloned())
    }
}

struct UnreachableSource;

#[async_trait]
impl ConfigSource for UnreachableSource {
    async fn get(&self, _key: ConfigKey) -> Result<Option<String>, FeedDigestError> {
        Err(FeedDigestError::Aws("ssm get_parameter: dispatch failure".to_string()))
    }
}

fn secrets() -> Vec<(ConfigKey, &'static str)> {
    vec![
        (ConfigKey::OpenAiApiKey, "sk-fake"),
        (ConfigKey::SlackWebhookUrl, "https://hooks.slack.com/services/T/B/X"),
    ]
}

#[tokio::test]
async fn test_defaults_apply() {
    let config = AppConfig::load(&MapSource::with(&secrets())).await.unwrap();

    assert_eq!(config.feed_url.as_str(), DEFAULT_FEED_URL);
    assert_eq!(config.openai_model, DEFAULT_OPENAI_MODEL);
    assert_eq!(config.openai_api_key, "sk-fake");
    assert_eq!(config.openai_org_id, None);
    assert_eq!(config.lookback.num_minutes(), 60);
    assert_eq!(config.utc_offset.local_minus_utc(), 9 * 3600);
    assert_eq!(config.openai_base_url.as_str(), "https://api.openai.com/v1");
}

#[tokio::test]
async fn test_overrides_apply() {
    let mut pairs = secrets();
    pairs.extend([
        (ConfigKey::FeedUrl, "https://blog.example.com/atom.xml"),
        (ConfigKey::OpenAiModel, "gpt-4o-mini"),
        (ConfigKey::OpenAiOrgId, "org-1"),
        (ConfigKey::LookbackMinutes, "120"),
        (ConfigKey::UtcOffsetHours, "-5"),
    ]);
    let config = AppConfig::load(&MapSource::with(&pairs)).await.unwrap();

    assert_eq!(config.feed_url.as_str(), "https://blog.example.com/atom.xml");
    assert_eq!(config.openai_model, "gpt-4o-mini");
    assert_eq!(config.openai_org_id.as_deref(), Some("org-1"));
    assert_eq!(config.lookback.num_minutes(), 120);
    assert_eq!(config.utc_offset.local_minus_utc(), -5 * 3600);
}

#[tokio::test]
async fn test_missing_secret_is_config_error() {
    let source = MapSource::with(&[(ConfigKey::OpenAiApiKey, "sk-fake")]);

    match AppConfig::load(&source).await {
        Err(FeedDigestError::Config(msg)) => assert!(msg.contains("SLACK_WEBHOOK_URL")),
        other => panic!("unexpected result: {other:?}"),
    }
}

#[tokio::test]
async fn test_invalid_values_are_config_errors() {
    for (key, value) in [
        (ConfigKey::LookbackMinutes, "-10"),
        (ConfigKey::UtcOffsetHours, "JST"),
        (ConfigKey::FeedUrl, "not a url"),
    ] {
        let mut pairs = secrets();
        pairs.push((key, value));
        let result = AppConfig::load(&MapSource::with(&pairs)).await;
        assert!(
            matches!(result, Err(FeedDigestError::Config(_))),
            "{key:?}={value} should be rejected"
        );
    }
}

#[tokio::test]
async fn test_source_failure_propagates() {
    let result = AppConfig::load(&UnreachableSource).await;
    assert!(matches!(result, Err(FeedDigestError::Aws(_))));
}
