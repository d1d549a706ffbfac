//! All Slack-specific functionality

pub mod message_formatter;
pub mod webhook;

// Re-export main types for convenience
pub use message_formatter::{NotificationBlock, NotificationMessage, format_notification};
pub use webhook::WebhookSender;
