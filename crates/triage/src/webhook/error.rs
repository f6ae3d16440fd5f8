//! Webhook client error types.

use thiserror::Error;

/// Result type for webhook operations.
pub type WebhookResult<T> = Result<T, WebhookError>;

/// Errors that can occur while talking to the triage webhook.
#[derive(Debug, Error)]
pub enum WebhookError {
    /// HTTP request failed before a response arrived.
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// The webhook answered with a non-success status.
    #[error("HTTP error! status: {0}")]
    Status(u16),

    /// Reading the response body failed mid-stream.
    #[error("Stream interrupted: {0}")]
    StreamFailed(reqwest::Error),

    /// The HTTP client could not be constructed.
    #[error("Failed to create HTTP client: {0}")]
    ClientBuild(String),
}
