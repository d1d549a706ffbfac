//! Feed retrieval and look-back window filtering

pub mod fetch;
pub mod window;

pub use fetch::FeedWindowFilter;
pub use window::{normalize_timestamp, select_recent_entries};
