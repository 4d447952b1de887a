//! Client-side error taxonomy.
//!
//! The repository's fallback behavior hinges on one distinction: a
//! [`Transport`](ApiError::Transport) failure means the server could not be
//! reached and the local store takes over; everything else is a real answer
//! from the server and propagates to the caller.

use brewdesk_core::ValidationError;
use thiserror::Error;

/// Errors from the remote data client and the repository built on it.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Network unreachable, timed out, or the response was unusable.
    /// The only fallback trigger.
    #[error("transport failure: {0}")]
    Transport(String),

    /// Credential missing, invalid, or expired (HTTP 401). Never swallowed.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// No record with the requested id (HTTP 404). Never swallowed.
    #[error("not found: {0}")]
    NotFound(String),

    /// Input rejected before any I/O, or by the server with HTTP 400.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),
}

impl ApiError {
    /// Whether this failure class degrades the operation to local mode.
    #[must_use]
    pub const fn triggers_fallback(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}
