use std::fmt;

use crate::journal::PayloadError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedError {
    LockPoisoned(&'static str),
    Payload(PayloadError),
    Replay(String),
    Config(String),
    /// No Tokio runtime to run fetches on.
    Runtime(String),
}

impl fmt::Display for FeedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedError::LockPoisoned(operation) => {
                write!(f, "session lock poisoned during {}", operation)
            }
            FeedError::Payload(err) => write!(f, "{}", err),
            FeedError::Replay(message) => write!(f, "replay error: {}", message),
            FeedError::Config(message) => write!(f, "invalid config: {}", message),
            FeedError::Runtime(message) => write!(f, "no runtime for fetches: {}", message),
        }
    }
}

impl std::error::Error for FeedError {}

impl From<PayloadError> for FeedError {
    fn from(err: PayloadError) -> Self {
        FeedError::Payload(err)
    }
}
