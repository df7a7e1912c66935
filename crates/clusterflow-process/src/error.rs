//! Error types for the process engine

use thiserror::Error;

/// Terminal failure of a workflow operation
///
/// By the time this error is returned, the operation manager has already
/// persisted the failed state, so the record in storage and the error the
/// scheduler sees always agree. Storage hiccups never surface here; they
/// come back as retry outcomes instead.
#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("operation {operation_id} failed: {reason}")]
    OperationFailed {
        operation_id: String,
        reason: String,
    },
}

impl ProcessError {
    /// The human-readable failure reason, as persisted in the operation's
    /// description
    pub fn reason(&self) -> &str {
        match self {
            ProcessError::OperationFailed { reason, .. } => reason,
        }
    }
}

pub type Result<T> = std::result::Result<T, ProcessError>;
