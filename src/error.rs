// src/error.rs
use thiserror::Error;

/// Failure of a single refresh cycle. Either kind aborts the whole cycle.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FeedError {
    /// The yearly request could not be completed or returned a non-success status.
    #[error("Treasury request for {year} failed: {reason}")]
    Transport { year: i32, reason: String },

    /// The yearly body did not have the expected shape.
    #[error("Unexpected Treasury data for {year}: {reason}")]
    Schema { year: i32, reason: String },
}

impl FeedError {
    pub fn transport(year: i32, reason: impl Into<String>) -> Self {
        FeedError::Transport {
            year,
            reason: reason.into(),
        }
    }

    pub fn schema(year: i32, reason: impl Into<String>) -> Self {
        FeedError::Schema {
            year,
            reason: reason.into(),
        }
    }

    pub fn year(&self) -> i32 {
        match self {
            FeedError::Transport { year, .. } | FeedError::Schema { year, .. } => *year,
        }
    }
}
