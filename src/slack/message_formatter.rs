//! Notification layout
//!
//! Every entry becomes the same three blocks: a hyperlinked title, the
//! summary body and a divider.

use serde::Serialize;

use crate::core::models::{FeedEntry, SummaryResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    LinkTitle,
    Body,
    Divider,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationBlock {
    LinkTitle { link: String, title: String },
    Body { text: String },
    Divider,
}

impl NotificationBlock {
    #[must_use]
    pub fn kind(&self) -> BlockKind {
        match self {
            NotificationBlock::LinkTitle { .. } => BlockKind::LinkTitle,
            NotificationBlock::Body { .. } => BlockKind::Body,
            NotificationBlock::Divider => BlockKind::Divider,
        }
    }

    /// Slack `mrkdwn` text for the block, `None` for the divider.
    #[must_use]
    pub fn mrkdwn(&self) -> Option<String> {
        match self {
            NotificationBlock::LinkTitle { link, title } => Some(format!("<{link}|{title}>")),
            NotificationBlock::Body { text } => Some(text.clone()),
            NotificationBlock::Divider => None,
        }
    }
}

/// A formatted notification; blocks are always `[LinkTitle, Body, Divider]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationMessage {
    blocks: Vec<NotificationBlock>,
}

impl NotificationMessage {
    #[must_use]
    pub fn blocks(&self) -> &[NotificationBlock] {
        &self.blocks
    }

    /// Incoming-webhook JSON with link unfurling disabled.
    #[must_use]
    pub fn to_webhook_payload(&self) -> WebhookPayload {
        WebhookPayload {
            blocks: self
                .blocks
                .iter()
                .map(|block| match block.mrkdwn() {
                    Some(text) => SlackBlock::Section {
                        text: MrkdwnText {
                            kind: "mrkdwn",
                            text,
                        },
                    },
                    None => SlackBlock::Divider,
                })
                .collect(),
            unfurl_links: false,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct WebhookPayload {
    pub blocks: Vec<SlackBlock>,
    pub unfurl_links: bool,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SlackBlock {
    Section { text: MrkdwnText },
    Divider,
}

#[derive(Debug, Serialize)]
pub struct MrkdwnText {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub text: String,
}

/// Pure formatting; the summary text is passed through unescaped.
#[must_use]
pub fn format_notification(entry: &FeedEntry, summary: &SummaryResult) -> NotificationMessage {
    NotificationMessage {
        blocks: vec![
            NotificationBlock::LinkTitle {
                link: entry.link.clone(),
                title: entry.title.clone(),
            },
            NotificationBlock::Body {
                text: summary.text.clone(),
            },
            NotificationBlock::Divider,
        ],
    }
}
