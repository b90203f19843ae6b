//! Error types for outbound dispatch.

use thiserror::Error;

/// Errors that can occur while delivering to an outbound channel.
///
/// Callers are expected to absorb these: a failed dispatch must never
/// affect the outcome of the operation that triggered it.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The channel could not be reached.
    #[error("channel unreachable: {0}")]
    Unreachable(String),

    /// The channel answered with a non-success status.
    #[error("channel rejected the message (status {status})")]
    Rejected { status: u16 },

    /// The backend was selected without its required settings.
    #[error("dispatcher not configured: {0}")]
    NotConfigured(&'static str),
}

impl From<reqwest::Error> for DispatchError {
    fn from(err: reqwest::Error) -> Self {
        Self::Unreachable(err.to_string())
    }
}
