use chrono::{Duration, FixedOffset};
use url::Url;

use super::source::{ConfigKey, ConfigSource};
use crate::errors::FeedDigestError;

pub const DEFAULT_FEED_URL: &str = "https://dev.classmethod.jp/feed/";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_LOOKBACK_MINUTES: i64 = 60;
pub const DEFAULT_UTC_OFFSET_HOURS: i32 = 9;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub feed_url: Url,
    pub openai_api_key: String,
    pub openai_org_id: Option<String>,
    pub openai_model: String,
    pub openai_base_url: Url,
    pub lookback: Duration,
    pub utc_offset: FixedOffset,
    pub slack_webhook_url: Url,
}

impl AppConfig {
    /// # Errors
    ///
    /// Returns a `Config` error if a required value is missing or a value
    /// cannot be parsed, or whatever the source reports when it is unreachable.
    pub async fn load(source: &dyn ConfigSource) -> Result<Self, FeedDigestError> {
        let feed_url = source
            .get(ConfigKey::FeedUrl)
            .await?
            .unwrap_or_else(|| DEFAULT_FEED_URL.to_string());
        let openai_api_key = required(source, ConfigKey::OpenAiApiKey).await?;
        let openai_org_id = source.get(ConfigKey::OpenAiOrgId).await?;
        let openai_model = source
            .get(ConfigKey::OpenAiModel)
            .await?
            .unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string());
        let openai_base_url = source
            .get(ConfigKey::OpenAiBaseUrl)
            .await?
            .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string());
        let lookback_minutes = match source.get(ConfigKey::LookbackMinutes).await? {
            Some(raw) => parse_lookback_minutes(&raw)?,
            None => DEFAULT_LOOKBACK_MINUTES,
        };
        let offset_hours = match source.get(ConfigKey::UtcOffsetHours).await? {
            Some(raw) => raw.trim().parse::<i32>().map_err(|e| {
                FeedDigestError::Config(format!("{}: {e}", ConfigKey::UtcOffsetHours.env_var()))
            })?,
            None => DEFAULT_UTC_OFFSET_HOURS,
        };
        let lookback = Duration::try_minutes(lookback_minutes).ok_or_else(|| {
            FeedDigestError::Config(format!("lookback out of range: {lookback_minutes}"))
        })?;
        let slack_webhook_url = required(source, ConfigKey::SlackWebhookUrl).await?;

        Ok(Self {
            feed_url: Url::parse(feed_url.trim())?,
            openai_api_key,
            openai_org_id,
            openai_model,
            openai_base_url: Url::parse(openai_base_url.trim())?,
            lookback,
            utc_offset: utc_offset_from_hours(offset_hours)?,
            slack_webhook_url: Url::parse(slack_webhook_url.trim())?,
        })
    }
}

async fn required(source: &dyn ConfigSource, key: ConfigKey) -> Result<String, FeedDigestError> {
    source
        .get(key)
        .await?
        .ok_or_else(|| FeedDigestError::Config(format!("{} is not set", key.env_var())))
}

fn parse_lookback_minutes(raw: &str) -> Result<i64, FeedDigestError> {
    let name = ConfigKey::LookbackMinutes.env_var();
    let minutes = raw
        .trim()
        .parse::<i64>()
        .map_err(|e| FeedDigestError::Config(format!("{name}: {e}")))?;
    if minutes <= 0 {
        return Err(FeedDigestError::Config(format!(
            "{name} must be positive, got {minutes}"
        )));
    }
    Ok(minutes)
}

/// # Errors
///
/// Returns a `Config` error when the offset is outside UTC-23..=UTC+23.
pub fn utc_offset_from_hours(hours: i32) -> Result<FixedOffset, FeedDigestError> {
    hours
        .checked_mul(3600)
        .and_then(FixedOffset::east_opt)
        .ok_or_else(|| FeedDigestError::Config(format!("UTC offset out of range: {hours}")))
}
