//! Operation storage error types

use thiserror::Error;

/// Errors returned by [`crate::OperationStorage`] implementations
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Operation not found: {0}")]
    NotFound(String),

    #[error("Operation already exists: {0}")]
    AlreadyExists(String),

    #[error("Storage backend error: {0}")]
    Backend(String),
}

pub type Result<T> = std::result::Result<T, StorageError>;
