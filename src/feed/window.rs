use chrono::{DateTime, FixedOffset, Utc};
use feed_rs::model::{Entry, Feed};
use tracing::{debug, warn};

use crate::core::models::{FeedEntry, TimeWindow};

/// Convert a feed timestamp to the configured comparison offset.
///
/// The instant is unchanged; only the offset it is expressed in differs.
#[must_use]
pub fn normalize_timestamp(timestamp: DateTime<Utc>, offset: FixedOffset) -> DateTime<FixedOffset> {
    timestamp.with_timezone(&offset)
}

/// Prefer the `alternate` (or untyped) link, then any link, then a URL-shaped id.
fn entry_link(entry: &Entry) -> Option<String> {
    let hrefs = || {
        entry
            .links
            .iter()
            .filter(|l| !l.href.trim().is_empty())
    };
    hrefs()
        .find(|l| l.rel.as_deref().is_none_or(|rel| rel == "alternate"))
        .or_else(|| hrefs().next())
        .map(|l| l.href.trim().to_string())
        .or_else(|| {
            let id = entry.id.trim();
            (id.starts_with("http://") || id.starts_with("https://")).then(|| id.to_string())
        })
}

fn entry_summary(entry: &Entry) -> String {
    entry
        .summary
        .as_ref()
        .map(|t| t.content.clone())
        .or_else(|| entry.content.as_ref().and_then(|c| c.body.clone()))
        .unwrap_or_default()
}

/// Keep the entries strictly newer than the window threshold, in feed order.
///
/// Entries without an `updated` or `published` timestamp, or without any
/// link, are skipped with a warning instead of failing the run.
#[must_use]
pub fn select_recent_entries(
    feed: &Feed,
    window: &TimeWindow,
    offset: FixedOffset,
) -> Vec<FeedEntry> {
    let threshold = window.threshold();
    debug!("Selecting entries updated after {}", threshold);

    feed.entries
        .iter()
        .filter_map(|entry| {
            let Some(raw_ts) = entry.updated.or(entry.published) else {
                warn!("Skipping entry {} without a timestamp", entry.id);
                return None;
            };
            let updated_at = normalize_timestamp(raw_ts, offset);
            if !window.contains(updated_at) {
                debug!("Skipping entry {} updated at {}", entry.id, updated_at);
                return None;
            }
            let Some(link) = entry_link(entry) else {
                warn!("Skipping entry {} without a link", entry.id);
                return None;
            };
            Some(FeedEntry {
                title: entry
                    .title
                    .as_ref()
                    .map(|t| t.content.clone())
                    .unwrap_or_default(),
                summary_text: entry_summary(entry),
                link,
                updated_at,
            })
        })
        .collect()
}
