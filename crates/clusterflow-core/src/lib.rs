//! ClusterFlow Core
//!
//! This crate provides the operation model shared by every ClusterFlow
//! workflow: the persisted [`Operation`] record that steps read and mutate,
//! and the [`OperationStorage`] abstraction the operation manager persists
//! through.
//!
//! An operation tracks one provisioning or deprovisioning workflow for a
//! single managed cluster. Steps never talk to a database directly; they go
//! through `OperationStorage`, so a real store and the in-memory
//! [`MemoryStorage`] used in tests satisfy the same contract.

pub mod error;
pub mod operation;
pub mod storage;

// Re-exports
pub use error::{Result, StorageError};
pub use operation::{Operation, OperationKind, OperationState};
pub use storage::{MemoryStorage, OperationStorage};
