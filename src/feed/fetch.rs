//! Feed retrieval
//!
//! Fetches the syndication document over HTTP and hands the parsed feed to
//! the window filter. Any failure here is fatal for the run.

use chrono::{DateTime, Duration, FixedOffset};
use feed_rs::model::Feed;
use feed_rs::parser;
use reqwest::Client;
use std::time::Duration as StdDuration;
use tracing::info;
use url::Url;

use super::window::select_recent_entries;
use crate::core::models::{FeedEntry, TimeWindow};
use crate::errors::FeedDigestError;

const FEED_TIMEOUT_SECS: u64 = 30;
const USER_AGENT: &str = concat!("feed-digest/", env!("CARGO_PKG_VERSION"));

/// Selects feed entries that fall inside the look-back window.
pub struct FeedWindowFilter {
    http: Client,
    offset: FixedOffset,
}

impl FeedWindowFilter {
    /// `offset` is the timezone every entry timestamp is compared in.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(offset: FixedOffset) -> Result<Self, FeedDigestError> {
        let http = Client::builder()
            .timeout(StdDuration::from_secs(FEED_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| FeedDigestError::FeedFetch(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { http, offset })
    }

    /// # Errors
    ///
    /// Returns `FeedFetch` on network errors, non-success status codes and
    /// documents that are not a recognizable feed.
    pub async fn fetch(&self, feed_url: &Url) -> Result<Feed, FeedDigestError> {
        let response = self
            .http
            .get(feed_url.as_str())
            .send()
            .await
            .map_err(|e| FeedDigestError::FeedFetch(format!("GET {feed_url} failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FeedDigestError::FeedFetch(format!(
                "GET {feed_url} returned status {status}"
            )));
        }

        let bytes = response.bytes().await.map_err(|e| {
            FeedDigestError::FeedFetch(format!("Failed to read feed body from {feed_url}: {e}"))
        })?;

        Ok(parser::parse(bytes.as_ref())?)
    }

    /// Fetch `feed_url` and return the entries updated strictly after
    /// `reference_now - lookback`, in feed order. Every call re-fetches.
    ///
    /// # Errors
    ///
    /// See [`FeedWindowFilter::fetch`].
    pub async fn select_recent(
        &self,
        feed_url: &Url,
        reference_now: DateTime<FixedOffset>,
        lookback: Duration,
    ) -> Result<Vec<FeedEntry>, FeedDigestError> {
        let feed = self.fetch(feed_url).await?;
        let window = TimeWindow::new(reference_now.with_timezone(&self.offset), lookback);
        let entries = select_recent_entries(&feed, &window, self.offset);

        info!(
            "Feed {} has {} entries, {} inside the last {} minutes",
            feed_url,
            feed.entries.len(),
            entries.len(),
            lookback.num_minutes()
        );

        Ok(entries)
    }
}
