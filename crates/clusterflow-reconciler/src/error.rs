//! Reconciler error types and temporary/permanent classification

use thiserror::Error;

/// Errors returned by [`crate::ReconcilerClient`] implementations
#[derive(Error, Debug)]
pub enum ReconcilerError {
    /// The request never produced a usable response (connect failure,
    /// timeout, connection reset). Temporary.
    #[error("Reconciler request failed: {0}")]
    Transport(String),

    /// The reconciler answered but is not in a position to serve
    /// (HTTP 5xx or 429). Temporary.
    #[error("Reconciler unavailable: HTTP {status}")]
    Unavailable { status: u16 },

    /// The reconciler rejected the request. Permanent.
    #[error("Reconciler rejected the request: HTTP {status}: {message}")]
    Rejected { status: u16, message: String },

    /// No configuration is registered for the runtime. Permanent.
    #[error("No cluster configuration registered for runtime {runtime_id}")]
    ClusterNotFound { runtime_id: String },

    /// The response body could not be decoded. Permanent.
    #[error("Invalid reconciler response: {0}")]
    InvalidResponse(String),

    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
}

impl ReconcilerError {
    /// Whether retrying the same call later can reasonably succeed.
    ///
    /// Steps use this as the single classification point: temporary errors
    /// are retried after a fixed interval without failing the operation,
    /// everything else transitions the operation to a terminal failed
    /// state.
    pub fn is_temporary(&self) -> bool {
        matches!(
            self,
            ReconcilerError::Transport(_) | ReconcilerError::Unavailable { .. }
        )
    }
}

impl From<reqwest::Error> for ReconcilerError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ReconcilerError::InvalidResponse(err.to_string())
        } else {
            // connect/timeout/body transfer failures are all worth a retry
            ReconcilerError::Transport(err.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, ReconcilerError>;
