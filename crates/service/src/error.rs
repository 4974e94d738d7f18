//! Typed error enum for the service layer.

use procura_transport::TransportError;
use thiserror::Error;

/// Errors from mutation submission.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The write could not reach the backend or the backend refused it.
    /// Caches stay valid; nothing was invalidated.
    #[error("transport: {0}")]
    Transport(#[from] TransportError),

    /// Caller input violates a mutation invariant. Raised before any
    /// network call.
    #[error("invalid input: {0}")]
    Validation(String),

    /// The referenced record is absent from the loaded snapshot.
    #[error("record not found: {0}")]
    NotFound(String),
}

impl ServiceError {
    /// Whether retrying the same submission might succeed. Retries are
    /// never automatic; this informs the user-facing message only.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_transient(),
            _ => false,
        }
    }
}
