//! Cluster deregistration
//!
//! Removes the applied configuration from the reconciler. The
//! `cluster_configuration_deleted` flag makes the step replay-safe: once
//! the removal is confirmed and persisted, later invocations return without
//! touching the reconciler again.

use crate::manager::OperationManager;
use crate::step::{Step, StepOutcome, StepResult};
use async_trait::async_trait;
use clusterflow_core::{Operation, OperationStorage};
use clusterflow_reconciler::ReconcilerClient;
use std::sync::Arc;
use std::time::Duration;

/// Retry interval after a temporarily failed delete
pub const DELETE_RETRY_INTERVAL: Duration = Duration::from_secs(10);

/// Removes a previously applied cluster configuration, idempotently
pub struct DeregisterClusterStep {
    operation_manager: OperationManager,
    reconciler: Arc<dyn ReconcilerClient>,
}

impl DeregisterClusterStep {
    pub fn new(storage: Arc<dyn OperationStorage>, reconciler: Arc<dyn ReconcilerClient>) -> Self {
        Self {
            operation_manager: OperationManager::new(storage),
            reconciler,
        }
    }
}

#[async_trait]
impl Step for DeregisterClusterStep {
    fn name(&self) -> &'static str {
        "deregister_cluster"
    }

    async fn run(&self, operation: Operation) -> StepResult {
        if operation.cluster_configuration_deleted {
            tracing::debug!(
                "cluster for runtime {} already deregistered, skipping",
                operation.runtime_id
            );
            return Ok(StepOutcome::Complete(operation));
        }

        // Absence counts as success on the reconciler side, so replaying
        // this call after a crash is harmless.
        match self.reconciler.delete_cluster(&operation.runtime_id).await {
            Ok(()) => {}
            Err(err) if err.is_temporary() => {
                tracing::info!(
                    "deregistration of runtime {} temporarily failed, retrying in {:?}: {}",
                    operation.runtime_id,
                    DELETE_RETRY_INTERVAL,
                    err
                );
                return Ok(StepOutcome::Retry {
                    operation,
                    after: DELETE_RETRY_INTERVAL,
                });
            }
            Err(err) => {
                return self
                    .operation_manager
                    .operation_failed(operation, format!("unable to deregister cluster: {}", err))
                    .await;
            }
        }

        let (operation, repeat) = self
            .operation_manager
            .update_operation(operation, |op| {
                op.cluster_configuration_deleted = true;
            })
            .await;
        if let Some(after) = repeat {
            return Ok(StepOutcome::Retry { operation, after });
        }

        tracing::info!("cluster for runtime {} deregistered", operation.runtime_id);
        Ok(StepOutcome::Complete(operation))
    }
}
