//! Cluster configuration status polling
//!
//! After a configuration has been applied the reconciler works through it
//! asynchronously. This step polls the reported status until the cluster
//! becomes ready, the reconciler reports a failure, or the provisioning
//! deadline passes.

use crate::manager::OperationManager;
use crate::step::{Step, StepOutcome, StepResult};
use async_trait::async_trait;
use chrono::Utc;
use clusterflow_core::{Operation, OperationStorage};
use clusterflow_reconciler::{ClusterStatus, ReconcilerClient};
use std::sync::Arc;
use std::time::Duration;

/// Poll interval while the reconciler reports pending / reconciling
pub const STATUS_POLL_INTERVAL: Duration = Duration::from_secs(30);

/// Retry interval after a temporary reconciler failure
pub const RECONCILER_RETRY_INTERVAL: Duration = Duration::from_secs(60);

/// Polls the reconciler until the applied configuration is ready
pub struct CheckClusterConfigurationStep {
    operation_manager: OperationManager,
    reconciler: Arc<dyn ReconcilerClient>,
    provisioning_timeout: Duration,
}

impl CheckClusterConfigurationStep {
    pub fn new(
        storage: Arc<dyn OperationStorage>,
        reconciler: Arc<dyn ReconcilerClient>,
        provisioning_timeout: Duration,
    ) -> Self {
        Self {
            operation_manager: OperationManager::new(storage),
            reconciler,
            provisioning_timeout,
        }
    }

    fn timed_out(&self, operation: &Operation) -> bool {
        // 時計が巻き戻っていた場合 (negative elapsed) はタイムアウト扱いにしない
        Utc::now()
            .signed_duration_since(operation.updated_at)
            .to_std()
            .is_ok_and(|elapsed| elapsed > self.provisioning_timeout)
    }
}

#[async_trait]
impl Step for CheckClusterConfigurationStep {
    fn name(&self) -> &'static str {
        "check_cluster_configuration"
    }

    async fn run(&self, operation: Operation) -> StepResult {
        // Deadline check precedes any network call: a permanently
        // unreachable reconciler must still terminate the workflow.
        if self.timed_out(&operation) {
            return self
                .operation_manager
                .operation_failed(
                    operation,
                    format!(
                        "operation has reached the time limit: {:?}",
                        self.provisioning_timeout
                    ),
                )
                .await;
        }

        let state = match self
            .reconciler
            .get_cluster(
                &operation.runtime_id,
                operation.cluster_configuration_version,
            )
            .await
        {
            Ok(state) => state,
            Err(err) if err.is_temporary() => {
                tracing::info!(
                    "cluster state for runtime {} unavailable, retrying in {:?}: {}",
                    operation.runtime_id,
                    RECONCILER_RETRY_INTERVAL,
                    err
                );
                return Ok(StepOutcome::Retry {
                    operation,
                    after: RECONCILER_RETRY_INTERVAL,
                });
            }
            Err(err) => {
                return self
                    .operation_manager
                    .operation_failed(operation, format!("unable to get cluster state: {}", err))
                    .await;
            }
        };

        tracing::debug!(
            "runtime {} configuration version {} reported as {}",
            operation.runtime_id,
            operation.cluster_configuration_version,
            state.status
        );
        match state.status {
            ClusterStatus::Pending | ClusterStatus::Reconciling => Ok(StepOutcome::Retry {
                operation,
                after: STATUS_POLL_INTERVAL,
            }),
            ClusterStatus::Ready => Ok(StepOutcome::Complete(operation)),
            ClusterStatus::Error => {
                self.operation_manager
                    .operation_failed(operation, "cluster reconciliation failed")
                    .await
            }
            // 未知のstatusはリトライせずfail-fastする
            ClusterStatus::Unknown => {
                self.operation_manager
                    .operation_failed(
                        operation,
                        format!("unsupported cluster status: {}", state.status),
                    )
                    .await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration as ChronoDuration;
    use clusterflow_core::{MemoryStorage, OperationKind, OperationState};
    use clusterflow_reconciler::{ClusterConfiguration, FakeClient, FakeFailure};
    use serde_json::json;

    const TEST_TIMEOUT: Duration = Duration::from_secs(3600);

    fn sample_step(
        storage: Arc<MemoryStorage>,
        reconciler: Arc<FakeClient>,
    ) -> CheckClusterConfigurationStep {
        CheckClusterConfigurationStep::new(storage, reconciler, TEST_TIMEOUT)
    }

    /// configurationをfakeに登録し、そのversionを持つoperationをstoreする
    async fn registered_operation(storage: &MemoryStorage, reconciler: &FakeClient) -> Operation {
        let configuration =
            ClusterConfiguration::new("runtime-a", json!({"components": ["istio"]}));
        let state = reconciler
            .apply_cluster_config(&configuration)
            .await
            .unwrap();
        let operation = Operation::new(OperationKind::Provision, "runtime-a")
            .with_configuration_version(state.configuration_version);
        storage.insert(operation).await.unwrap()
    }

    #[tokio::test]
    async fn test_ready_cluster_completes() {
        let storage = Arc::new(MemoryStorage::new());
        let reconciler = Arc::new(FakeClient::new());
        let step = sample_step(storage.clone(), reconciler.clone());
        let operation = registered_operation(&storage, &reconciler).await;

        let outcome = step.run(operation.clone()).await.unwrap();

        assert_eq!(outcome, StepOutcome::Complete(operation.clone()));
        // stepは成功transitionを行わない (workflow hostの仕事)
        let persisted = storage.get(&operation.id).await.unwrap();
        assert_eq!(persisted.state, OperationState::InProgress);
    }

    #[tokio::test]
    async fn test_reconciling_cluster_keeps_polling() {
        let storage = Arc::new(MemoryStorage::new());
        let reconciler = Arc::new(FakeClient::new());
        let step = sample_step(storage.clone(), reconciler.clone());
        let operation = registered_operation(&storage, &reconciler).await;
        reconciler.set_cluster_status(ClusterStatus::Reconciling).await;

        let outcome = step.run(operation.clone()).await.unwrap();

        assert_eq!(
            outcome,
            StepOutcome::Retry {
                operation: operation.clone(),
                after: STATUS_POLL_INTERVAL,
            }
        );

        // 外部状態が変わらない限り、再実行しても同じ結果になる
        let repeated = step.run(operation.clone()).await.unwrap();
        assert_eq!(repeated, outcome);
        assert_eq!(reconciler.get_cluster_calls().await, 2);
    }

    #[tokio::test]
    async fn test_pending_cluster_keeps_polling() {
        let storage = Arc::new(MemoryStorage::new());
        let reconciler = Arc::new(FakeClient::new());
        let step = sample_step(storage.clone(), reconciler.clone());
        let operation = registered_operation(&storage, &reconciler).await;
        reconciler.set_cluster_status(ClusterStatus::Pending).await;

        let outcome = step.run(operation).await.unwrap();

        assert!(matches!(
            outcome,
            StepOutcome::Retry { after, .. } if after == STATUS_POLL_INTERVAL
        ));
    }

    #[tokio::test]
    async fn test_timeout_fails_operation_before_any_network_call() {
        let storage = Arc::new(MemoryStorage::new());
        let reconciler = Arc::new(FakeClient::new());
        let step = sample_step(storage.clone(), reconciler.clone());
        let mut operation = registered_operation(&storage, &reconciler).await;
        operation.updated_at = Utc::now() - ChronoDuration::hours(2);

        let err = step.run(operation.clone()).await.unwrap_err();

        assert!(err.reason().contains("time limit"));
        let persisted = storage.get(&operation.id).await.unwrap();
        assert_eq!(persisted.state, OperationState::Failed);
        // deadline checkはstatus取得より先に走る
        assert_eq!(reconciler.get_cluster_calls().await, 0);
    }

    #[tokio::test]
    async fn test_future_updated_at_is_not_a_timeout() {
        let storage = Arc::new(MemoryStorage::new());
        let reconciler = Arc::new(FakeClient::new());
        let step = sample_step(storage.clone(), reconciler.clone());
        let mut operation = registered_operation(&storage, &reconciler).await;
        // clock skewでupdated_atが未来になっていてもタイムアウトさせない
        operation.updated_at = Utc::now() + ChronoDuration::hours(2);

        let outcome = step.run(operation).await.unwrap();
        assert!(outcome.is_complete());
    }

    #[tokio::test]
    async fn test_temporary_failure_retries_without_failing() {
        let storage = Arc::new(MemoryStorage::new());
        let reconciler = Arc::new(FakeClient::new());
        let step = sample_step(storage.clone(), reconciler.clone());
        let operation = registered_operation(&storage, &reconciler).await;
        reconciler.fail_get_cluster(FakeFailure::Temporary).await;

        let outcome = step.run(operation.clone()).await.unwrap();

        assert_eq!(
            outcome,
            StepOutcome::Retry {
                operation: operation.clone(),
                after: RECONCILER_RETRY_INTERVAL,
            }
        );
        let persisted = storage.get(&operation.id).await.unwrap();
        assert_eq!(persisted.state, OperationState::InProgress);
    }

    #[tokio::test]
    async fn test_permanent_failure_fails_operation() {
        let storage = Arc::new(MemoryStorage::new());
        let reconciler = Arc::new(FakeClient::new());
        let step = sample_step(storage.clone(), reconciler.clone());
        let operation = registered_operation(&storage, &reconciler).await;
        reconciler.fail_get_cluster(FakeFailure::Permanent).await;

        let err = step.run(operation.clone()).await.unwrap_err();

        assert!(err.reason().starts_with("unable to get cluster state"));
        let persisted = storage.get(&operation.id).await.unwrap();
        assert_eq!(persisted.state, OperationState::Failed);
    }

    #[tokio::test]
    async fn test_error_status_fails_operation() {
        let storage = Arc::new(MemoryStorage::new());
        let reconciler = Arc::new(FakeClient::new());
        let step = sample_step(storage.clone(), reconciler.clone());
        let operation = registered_operation(&storage, &reconciler).await;
        reconciler.set_cluster_status(ClusterStatus::Error).await;

        let err = step.run(operation.clone()).await.unwrap_err();

        assert_eq!(err.reason(), "cluster reconciliation failed");
        let persisted = storage.get(&operation.id).await.unwrap();
        assert_eq!(persisted.state, OperationState::Failed);
        assert_eq!(
            persisted.description.as_deref(),
            Some("cluster reconciliation failed")
        );
    }

    #[tokio::test]
    async fn test_unrecognized_status_fails_operation() {
        let storage = Arc::new(MemoryStorage::new());
        let reconciler = Arc::new(FakeClient::new());
        let step = sample_step(storage.clone(), reconciler.clone());
        let operation = registered_operation(&storage, &reconciler).await;
        reconciler.set_cluster_status(ClusterStatus::Unknown).await;

        let err = step.run(operation.clone()).await.unwrap_err();

        assert!(err.reason().contains("unsupported cluster status"));
        let persisted = storage.get(&operation.id).await.unwrap();
        assert_eq!(persisted.state, OperationState::Failed);
    }

    #[test]
    fn test_step_name() {
        let step = sample_step(
            Arc::new(MemoryStorage::new()),
            Arc::new(FakeClient::new()),
        );
        assert_eq!(step.name(), "check_cluster_configuration");
    }
}
