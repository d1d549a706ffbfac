//! One polling pass: select recent entries, then summarize and deliver each
//! of them in feed order.
//!
//! A feed failure aborts the pass. Summarization and delivery failures are
//! recorded on the entry and the pass moves on to the next one.

use async_trait::async_trait;
use chrono::{DateTime, Duration, FixedOffset};
use serde::Serialize;
use tracing::{Instrument, debug, error, info, info_span};
use url::Url;
use uuid::Uuid;

use crate::ai::{SummaryClient, SummaryRequestBuilder};
use crate::core::models::{FeedEntry, SummaryPrompt, SummaryResult};
use crate::errors::FeedDigestError;
use crate::feed::FeedWindowFilter;
use crate::slack::{NotificationMessage, WebhookSender, format_notification};

#[async_trait]
pub trait EntrySource: Send + Sync {
    async fn select_recent(
        &self,
        feed_url: &Url,
        reference_now: DateTime<FixedOffset>,
        lookback: Duration,
    ) -> Result<Vec<FeedEntry>, FeedDigestError>;
}

#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, prompt: &SummaryPrompt) -> Result<SummaryResult, FeedDigestError>;
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, message: &NotificationMessage) -> Result<(), FeedDigestError>;
}

#[async_trait]
impl EntrySource for FeedWindowFilter {
    async fn select_recent(
        &self,
        feed_url: &Url,
        reference_now: DateTime<FixedOffset>,
        lookback: Duration,
    ) -> Result<Vec<FeedEntry>, FeedDigestError> {
        FeedWindowFilter::select_recent(self, feed_url, reference_now, lookback).await
    }
}

#[async_trait]
impl Summarizer for SummaryClient {
    async fn summarize(&self, prompt: &SummaryPrompt) -> Result<SummaryResult, FeedDigestError> {
        SummaryClient::summarize(self, prompt).await
    }
}

#[async_trait]
impl Notifier for WebhookSender {
    async fn send(&self, message: &NotificationMessage) -> Result<(), FeedDigestError> {
        WebhookSender::send(self, message).await
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RunState {
    Idle,
    Polling,
    PerEntryProcessing,
    Done,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EntryStage {
    Summarize,
    Deliver,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum EntryOutcome {
    Delivered {
        title: String,
        link: String,
    },
    Failed {
        title: String,
        link: String,
        stage: EntryStage,
        reason: String,
    },
}

impl EntryOutcome {
    #[must_use]
    pub fn is_delivered(&self) -> bool {
        matches!(self, EntryOutcome::Delivered { .. })
    }

    #[must_use]
    pub fn link(&self) -> &str {
        match self {
            EntryOutcome::Delivered { link, .. } | EntryOutcome::Failed { link, .. } => link,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub state: RunState,
    pub outcomes: Vec<EntryOutcome>,
}

impl RunReport {
    #[must_use]
    pub fn delivered(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_delivered()).count()
    }

    #[must_use]
    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.delivered()
    }
}

pub struct PipelineOrchestrator<S, M, N> {
    source: S,
    summarizer: M,
    notifier: N,
    feed_url: Url,
    lookback: Duration,
    state: RunState,
}

impl<S, M, N> PipelineOrchestrator<S, M, N>
where
    S: EntrySource,
    M: Summarizer,
    N: Notifier,
{
    pub fn new(source: S, summarizer: M, notifier: N, feed_url: Url, lookback: Duration) -> Self {
        Self {
            source,
            summarizer,
            notifier,
            feed_url,
            lookback,
            state: RunState::Idle,
        }
    }

    #[must_use]
    pub fn state(&self) -> RunState {
        self.state
    }

    fn transition(&mut self, next: RunState) {
        debug!("Pipeline state {:?} -> {:?}", self.state, next);
        self.state = next;
    }

    /// Summarize and deliver a single entry. Never fails; errors are folded
    /// into the outcome.
    pub async fn process_entry(&self, entry: &FeedEntry) -> EntryOutcome {
        let prompt = SummaryRequestBuilder::build(entry);

        let summary = match self.summarizer.summarize(&prompt).await {
            Ok(summary) => summary,
            Err(e) => {
                error!("Failed to summarize {}: {}", entry.link, e);
                return EntryOutcome::Failed {
                    title: entry.title.clone(),
                    link: entry.link.clone(),
                    stage: EntryStage::Summarize,
                    reason: e.to_string(),
                };
            }
        };

        let message = format_notification(entry, &summary);
        match self.notifier.send(&message).await {
            Ok(()) => {
                info!("Delivered summary for {}", entry.link);
                EntryOutcome::Delivered {
                    title: entry.title.clone(),
                    link: entry.link.clone(),
                }
            }
            Err(e) => {
                error!("Failed to deliver summary for {}: {}", entry.link, e);
                EntryOutcome::Failed {
                    title: entry.title.clone(),
                    link: entry.link.clone(),
                    stage: EntryStage::Deliver,
                    reason: e.to_string(),
                }
            }
        }
    }

    /// Run one pass relative to `reference_now`.
    ///
    /// # Errors
    ///
    /// Returns the feed error when entry selection fails; nothing is sent in
    /// that case. Per-entry failures are reported in the [`RunReport`].
    pub async fn run(
        &mut self,
        reference_now: DateTime<FixedOffset>,
    ) -> Result<RunReport, FeedDigestError> {
        let run_id = Uuid::new_v4();
        let span = info_span!("pipeline_run", %run_id, feed_url = %self.feed_url);
        self.run_inner(run_id, reference_now).instrument(span).await
    }

    async fn run_inner(
        &mut self,
        run_id: Uuid,
        reference_now: DateTime<FixedOffset>,
    ) -> Result<RunReport, FeedDigestError> {
        self.transition(RunState::Polling);
        let entries = match self
            .source
            .select_recent(&self.feed_url, reference_now, self.lookback)
            .await
        {
            Ok(entries) => entries,
            Err(e) => {
                error!("Feed polling failed: {}", e);
                self.transition(RunState::Failed);
                return Err(e);
            }
        };

        self.transition(RunState::PerEntryProcessing);
        let mut outcomes = Vec::with_capacity(entries.len());
        for entry in &entries {
            outcomes.push(self.process_entry(entry).await);
        }

        self.transition(RunState::Done);
        let report = RunReport {
            run_id,
            state: self.state,
            outcomes,
        };
        info!(
            "Run finished: {} delivered, {} failed",
            report.delivered(),
            report.failed()
        );
        Ok(report)
    }
}
