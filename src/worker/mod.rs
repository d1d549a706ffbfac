//! Pipeline orchestration and the Lambda handler

pub mod handler;
pub mod pipeline;

// Re-export the main handler for convenience
pub use handler::{handler, run_once};
pub use pipeline::{EntryOutcome, PipelineOrchestrator, RunReport, RunState};
