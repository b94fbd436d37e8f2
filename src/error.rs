//! Error types for the history store.

use crate::subscriptions::SubscriptionId;
use thiserror::Error;

/// Main error type for history store operations.
///
/// History navigation itself never fails; errors only come from
/// configuration and from the subscription surface.
#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    #[error("Subscription not found: {0:?}")]
    SubscriptionNotFound(SubscriptionId),
}

impl From<serde_json::Error> for HistoryError {
    fn from(e: serde_json::Error) -> Self {
        HistoryError::Deserialization(e.to_string())
    }
}

/// Result type for history store operations.
pub type Result<T> = std::result::Result<T, HistoryError>;
