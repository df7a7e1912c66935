use clusterflow_core::{MemoryStorage, Operation, OperationKind, OperationState, OperationStorage};
use clusterflow_process::{
    CheckClusterConfigurationStep, DeregisterClusterStep, OperationManager, Step,
};
use clusterflow_reconciler::{ClusterConfiguration, ClusterStatus, FakeClient, ReconcilerClient};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

const PROVISIONING_TIMEOUT: Duration = Duration::from_secs(3600);

#[tokio::test]
async fn test_operation_lifecycle() {
    let storage = Arc::new(MemoryStorage::new());
    let reconciler = Arc::new(FakeClient::new());

    // 1. 登録 (Apply) — workflow hostがconfigurationを適用してoperationを作る
    let configuration = ClusterConfiguration::new(
        "runtime-lifecycle",
        json!({"components": ["istio", "serverless"], "kubernetes_version": "1.29"}),
    );
    let applied = reconciler
        .apply_cluster_config(&configuration)
        .await
        .unwrap();
    let operation = Operation::new(OperationKind::Provision, "runtime-lifecycle")
        .with_configuration_version(applied.configuration_version);
    let operation = storage.insert(operation).await.unwrap();

    // 2. 監視 (Check) — readyになるまでstepをpollする
    let check = CheckClusterConfigurationStep::new(
        storage.clone(),
        reconciler.clone(),
        PROVISIONING_TIMEOUT,
    );
    reconciler
        .set_cluster_status(ClusterStatus::Reconciling)
        .await;
    let outcome = check.run(operation).await.unwrap();
    assert!(!outcome.is_complete());

    reconciler.set_cluster_status(ClusterStatus::Ready).await;
    let outcome = check.run(outcome.into_operation()).await.unwrap();
    assert!(outcome.is_complete());

    // 3. 完了 (Succeeded) — hostがmanager経由で成功を確定する
    let manager = OperationManager::new(storage.clone());
    let outcome = manager
        .operation_succeeded(outcome.into_operation())
        .await
        .unwrap();
    let provisioned = outcome.into_operation();
    assert_eq!(provisioned.state, OperationState::Succeeded);
    assert_eq!(
        storage.get(&provisioned.id).await.unwrap().state,
        OperationState::Succeeded
    );

    // 4. 解除 (Deregister) — deprovisioning operationでconfigurationを外す
    let deprovision = Operation::new(OperationKind::Deprovision, "runtime-lifecycle")
        .with_configuration_version(provisioned.cluster_configuration_version);
    let deprovision = storage.insert(deprovision).await.unwrap();
    let deregister = DeregisterClusterStep::new(storage.clone(), reconciler.clone());
    let outcome = deregister.run(deprovision).await.unwrap();
    assert!(outcome.is_complete());

    // 検証: reconciler側から消えていること
    assert!(!reconciler.cluster_exists("runtime-lifecycle").await.unwrap());

    // 5. リプレイ — クラッシュ後の再実行でも副作用が増えないこと
    let replayed = deregister.run(outcome.into_operation()).await.unwrap();
    assert!(replayed.is_complete());
    assert_eq!(reconciler.delete_cluster_calls().await, 1);
}

#[tokio::test]
async fn test_failed_reconciliation_terminates_workflow() {
    let storage = Arc::new(MemoryStorage::new());
    let reconciler = Arc::new(FakeClient::new());

    let configuration = ClusterConfiguration::new("runtime-broken", json!({"components": []}));
    let applied = reconciler
        .apply_cluster_config(&configuration)
        .await
        .unwrap();
    let operation = Operation::new(OperationKind::Provision, "runtime-broken")
        .with_configuration_version(applied.configuration_version);
    let operation = storage.insert(operation).await.unwrap();
    let operation_id = operation.id.clone();

    let check = CheckClusterConfigurationStep::new(
        storage.clone(),
        reconciler.clone(),
        PROVISIONING_TIMEOUT,
    );
    reconciler.set_cluster_status(ClusterStatus::Error).await;

    // 検証: terminal errorが返り、failed stateがpersistされていること
    let err = check.run(operation).await.unwrap_err();
    assert_eq!(err.reason(), "cluster reconciliation failed");

    let persisted = storage.get(&operation_id).await.unwrap();
    assert_eq!(persisted.state, OperationState::Failed);
    assert!(persisted.state.is_terminal());
}
