//! Keyed persistence for operations
//!
//! [`OperationStorage`] is the contract the operation manager persists
//! through. Implementations must survive concurrent access from independent
//! step invocations; per-operation write ordering is the scheduler's
//! responsibility, not the store's.

use crate::error::{Result, StorageError};
use crate::operation::Operation;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Operation persistence abstraction
///
/// A real deployment backs this with a database; tests use
/// [`MemoryStorage`]. Both satisfy the same contract.
#[async_trait]
pub trait OperationStorage: Send + Sync {
    /// Insert a new operation. Fails if the id is already present.
    async fn insert(&self, operation: Operation) -> Result<Operation>;

    /// Fetch an operation by id
    async fn get(&self, operation_id: &str) -> Result<Operation>;

    /// Replace a stored operation. Fails if the id is not present.
    async fn update(&self, operation: Operation) -> Result<Operation>;
}

/// インメモリ実装。テストとローカル開発用で、プロセス終了とともに消える。
#[derive(Debug, Default)]
pub struct MemoryStorage {
    operations: RwLock<HashMap<String, Operation>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OperationStorage for MemoryStorage {
    async fn insert(&self, operation: Operation) -> Result<Operation> {
        let mut operations = self.operations.write().await;
        if operations.contains_key(&operation.id) {
            return Err(StorageError::AlreadyExists(operation.id));
        }
        operations.insert(operation.id.clone(), operation.clone());
        Ok(operation)
    }

    async fn get(&self, operation_id: &str) -> Result<Operation> {
        let operations = self.operations.read().await;
        operations
            .get(operation_id)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(operation_id.to_string()))
    }

    async fn update(&self, operation: Operation) -> Result<Operation> {
        let mut operations = self.operations.write().await;
        if !operations.contains_key(&operation.id) {
            return Err(StorageError::NotFound(operation.id));
        }
        operations.insert(operation.id.clone(), operation.clone());
        Ok(operation)
    }
}
