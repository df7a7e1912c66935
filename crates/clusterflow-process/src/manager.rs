//! Operation persistence manager
//!
//! The manager is the only writer of `Operation.state`. Steps hand their
//! mutations to it; the manager refreshes `updated_at`, persists, and turns
//! storage failures into retry hints so a flaky store never aborts a
//! workflow, and a terminal transition is never silently dropped.

use crate::error::ProcessError;
use crate::step::{StepOutcome, StepResult};
use chrono::Utc;
use clusterflow_core::{Operation, OperationState, OperationStorage};
use std::sync::Arc;
use std::time::Duration;

/// Delay suggested to the scheduler while the operation store is failing
pub const STORAGE_RETRY_INTERVAL: Duration = Duration::from_secs(60);

/// Persists operation mutations and performs terminal state transitions
#[derive(Clone)]
pub struct OperationManager {
    storage: Arc<dyn OperationStorage>,
}

impl OperationManager {
    pub fn new(storage: Arc<dyn OperationStorage>) -> Self {
        Self { storage }
    }

    /// Apply `mutate` to the operation, refresh `updated_at` and persist.
    ///
    /// On a storage failure the mutated operation is returned together with
    /// `Some(STORAGE_RETRY_INTERVAL)`; the caller re-runs the step later and
    /// the write is retried then. `updated_at` must be refreshed on every
    /// persisted mutation because the provisioning deadline is computed from
    /// it.
    pub async fn update_operation<F>(
        &self,
        mut operation: Operation,
        mutate: F,
    ) -> (Operation, Option<Duration>)
    where
        F: FnOnce(&mut Operation),
    {
        mutate(&mut operation);
        operation.updated_at = Utc::now();

        match self.storage.update(operation.clone()).await {
            Ok(persisted) => (persisted, None),
            Err(err) => {
                tracing::error!(
                    "unable to persist operation {}, retrying in {:?}: {}",
                    operation.id,
                    STORAGE_RETRY_INTERVAL,
                    err
                );
                (operation, Some(STORAGE_RETRY_INTERVAL))
            }
        }
    }

    /// Transition the operation to `Failed` and return the terminal error.
    ///
    /// The error is only returned once the failed state has actually been
    /// persisted; if the store rejects the write the step is asked to retry
    /// instead, so the transition cannot get lost between invocations.
    pub async fn operation_failed(
        &self,
        operation: Operation,
        reason: impl Into<String>,
    ) -> StepResult {
        let reason = reason.into();
        tracing::warn!("operation {} failed: {}", operation.id, reason);

        let (operation, repeat) = self
            .update_operation(operation, |op| {
                op.state = OperationState::Failed;
                op.description = Some(reason.clone());
            })
            .await;
        if let Some(after) = repeat {
            return Ok(StepOutcome::Retry { operation, after });
        }

        Err(ProcessError::OperationFailed {
            operation_id: operation.id,
            reason,
        })
    }

    /// Transition the operation to `Succeeded`
    pub async fn operation_succeeded(&self, operation: Operation) -> StepResult {
        let (operation, repeat) = self
            .update_operation(operation, |op| {
                op.state = OperationState::Succeeded;
            })
            .await;
        if let Some(after) = repeat {
            return Ok(StepOutcome::Retry { operation, after });
        }

        tracing::info!("operation {} succeeded", operation.id);
        Ok(StepOutcome::Complete(operation))
    }
}
