//! Reconciler client trait definition

use crate::error::Result;
use crate::model::{ClusterConfiguration, ClusterState};
use async_trait::async_trait;

/// Reconciler capability set
///
/// Everything the workflow steps need from the reconciliation service,
/// expressed as a trait so the HTTP client and the in-memory
/// [`FakeClient`](crate::fake::FakeClient) satisfy the same contract.
///
/// All capabilities are idempotent from the caller's point of view:
/// re-applying an identical configuration yields the already-assigned
/// version, and deleting an absent configuration is a success.
#[async_trait]
pub trait ReconcilerClient: Send + Sync {
    /// Register a cluster configuration and return the reconciler's view
    /// of it, including the assigned configuration version
    async fn apply_cluster_config(&self, configuration: &ClusterConfiguration)
    -> Result<ClusterState>;

    /// Report the reconciliation status of one registered configuration
    /// version
    async fn get_cluster(
        &self,
        runtime_id: &str,
        configuration_version: i64,
    ) -> Result<ClusterState>;

    /// Remove the registered configuration for a runtime. Absence is
    /// success.
    async fn delete_cluster(&self, runtime_id: &str) -> Result<()>;

    /// Whether any configuration is currently registered for the runtime
    async fn cluster_exists(&self, runtime_id: &str) -> Result<bool>;
}
