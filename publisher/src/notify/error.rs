//! Error types for webhook notification

use thiserror::Error;

/// Result type for notification delivery
pub type NotifyResult<T> = Result<T, NotifyError>;

/// Errors that can occur while delivering a notification
#[derive(Error, Debug)]
pub enum NotifyError {
    /// The message payload could not be serialized
    #[error("failed to serialize notification payload: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The request failed or the endpoint rejected it
    #[error("webhook request failed: {0}")]
    Http(#[from] reqwest::Error),
}
