//! All summarization (`OpenAI`) functionality

pub mod client;
pub mod prompt_builder;

// Re-export main types for convenience
pub use client::SummaryClient;
pub use prompt_builder::{SYSTEM_INSTRUCTIONS, SummaryRequestBuilder};
