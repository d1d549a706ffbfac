use chrono::{DateTime, Duration, FixedOffset};
use serde::{Deserialize, Serialize};

/// A single article taken from the source feed.
///
/// `updated_at` keeps the offset it was normalized to; the other fields are
/// copied from the feed unmodified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedEntry {
    pub title: String,
    pub summary_text: String,
    pub link: String,
    pub updated_at: DateTime<FixedOffset>,
}

/// The rolling look-back window for one poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub reference_now: DateTime<FixedOffset>,
    pub lookback: Duration,
}

impl TimeWindow {
    #[must_use]
    pub fn new(reference_now: DateTime<FixedOffset>, lookback: Duration) -> Self {
        Self {
            reference_now,
            lookback,
        }
    }

    /// Oldest instant that is still *not* recent enough.
    #[must_use]
    pub fn threshold(&self) -> DateTime<FixedOffset> {
        self.reference_now - self.lookback
    }

    /// Strictly newer than the threshold; an entry exactly on it is excluded.
    #[must_use]
    pub fn contains(&self, timestamp: DateTime<FixedOffset>) -> bool {
        timestamp > self.threshold()
    }
}

/// System instructions plus per-entry user text sent to the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryPrompt {
    pub system_instructions: String,
    pub user_content: String,
}

/// Trimmed text returned by the summarization service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryResult {
    pub text: String,
}

impl SummaryResult {
    #[must_use]
    pub fn new(text: &str) -> Self {
        Self {
            text: text.trim().to_string(),
        }
    }
}
