use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeedDigestError {
    #[error("Failed to fetch feed: {0}")]
    FeedFetch(String),

    #[error("Failed to access summarization service: {0}")]
    SummaryService(String),

    #[error("Failed to deliver notification: {0}")]
    Delivery(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Failed to interact with AWS services: {0}")]
    Aws(String),
}

impl FeedDigestError {
    /// Fatal errors abort the whole run; the rest only affect a single entry.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            FeedDigestError::FeedFetch(_) | FeedDigestError::Config(_) | FeedDigestError::Aws(_)
        )
    }
}

impl From<feed_rs::parser::ParseFeedError> for FeedDigestError {
    fn from(error: feed_rs::parser::ParseFeedError) -> Self {
        FeedDigestError::FeedFetch(format!("feed parse: {error}"))
    }
}

impl From<url::ParseError> for FeedDigestError {
    fn from(error: url::ParseError) -> Self {
        FeedDigestError::Config(format!("invalid URL: {error}"))
    }
}

// Generic implementation for AWS SDK errors
impl<E> From<aws_sdk_ssm::error::SdkError<E>> for FeedDigestError
where
    E: std::fmt::Display,
{
    fn from(error: aws_sdk_ssm::error::SdkError<E>) -> Self {
        FeedDigestError::Aws(error.to_string())
    }
}
