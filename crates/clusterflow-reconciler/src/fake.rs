//! テスト用インメモリreconciler
//!
//! 実サービスの代わりに登録済みconfigurationをメモリ上で管理する。
//! 呼び出し回数カウンタと失敗注入で、stepの副作用とリトライ挙動を
//! 検証できる。

use crate::client::ReconcilerClient;
use crate::error::{ReconcilerError, Result};
use crate::model::{ClusterConfiguration, ClusterState, ClusterStatus};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::Mutex;

/// Failure mode injected into a [`FakeClient`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FakeFailure {
    /// Behaves like an outage; classified temporary
    Temporary,
    /// Behaves like a rejected request; classified permanent
    Permanent,
}

impl FakeFailure {
    fn to_error(self) -> ReconcilerError {
        match self {
            FakeFailure::Temporary => ReconcilerError::Unavailable { status: 503 },
            FakeFailure::Permanent => ReconcilerError::Rejected {
                status: 422,
                message: "invalid cluster configuration".to_string(),
            },
        }
    }
}

#[derive(Debug, Clone)]
struct Registration {
    configuration: ClusterConfiguration,
    version: i64,
}

#[derive(Debug)]
struct FakeState {
    registrations: HashMap<String, Registration>,
    next_version: i64,
    status: ClusterStatus,
    get_failure: Option<FakeFailure>,
    delete_failure: Option<FakeFailure>,
    get_calls: u32,
    delete_calls: u32,
}

impl Default for FakeState {
    fn default() -> Self {
        Self {
            registrations: HashMap::new(),
            next_version: 0,
            status: ClusterStatus::Ready,
            get_failure: None,
            delete_failure: None,
            get_calls: 0,
            delete_calls: 0,
        }
    }
}

/// In-memory [`ReconcilerClient`] double
#[derive(Debug, Default)]
pub struct FakeClient {
    state: Mutex<FakeState>,
}

impl FakeClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Status reported by `get_cluster` from now on (default: `Ready`)
    pub async fn set_cluster_status(&self, status: ClusterStatus) {
        self.state.lock().await.status = status;
    }

    /// Make every `get_cluster` call fail until cleared
    pub async fn fail_get_cluster(&self, failure: FakeFailure) {
        self.state.lock().await.get_failure = Some(failure);
    }

    /// Make every `delete_cluster` call fail until cleared
    pub async fn fail_delete_cluster(&self, failure: FakeFailure) {
        self.state.lock().await.delete_failure = Some(failure);
    }

    pub async fn clear_failures(&self) {
        let mut state = self.state.lock().await;
        state.get_failure = None;
        state.delete_failure = None;
    }

    /// Number of `get_cluster` attempts, including failed ones
    pub async fn get_cluster_calls(&self) -> u32 {
        self.state.lock().await.get_calls
    }

    /// Number of `delete_cluster` attempts, including failed ones
    pub async fn delete_cluster_calls(&self) -> u32 {
        self.state.lock().await.delete_calls
    }

    /// Version assigned to the runtime's registration, if any
    pub async fn applied_version(&self, runtime_id: &str) -> Option<i64> {
        self.state
            .lock()
            .await
            .registrations
            .get(runtime_id)
            .map(|r| r.version)
    }
}

#[async_trait]
impl ReconcilerClient for FakeClient {
    async fn apply_cluster_config(
        &self,
        configuration: &ClusterConfiguration,
    ) -> Result<ClusterState> {
        let mut state = self.state.lock().await;

        // Identical re-apply keeps the already-assigned version
        if let Some(existing) = state.registrations.get(&configuration.runtime_id) {
            if existing.configuration == *configuration {
                return Ok(ClusterState {
                    runtime_id: configuration.runtime_id.clone(),
                    configuration_version: existing.version,
                    status: ClusterStatus::Pending,
                });
            }
        }

        state.next_version += 1;
        let version = state.next_version;
        state.registrations.insert(
            configuration.runtime_id.clone(),
            Registration {
                configuration: configuration.clone(),
                version,
            },
        );
        Ok(ClusterState {
            runtime_id: configuration.runtime_id.clone(),
            configuration_version: version,
            status: ClusterStatus::Pending,
        })
    }

    async fn get_cluster(
        &self,
        runtime_id: &str,
        configuration_version: i64,
    ) -> Result<ClusterState> {
        let mut state = self.state.lock().await;
        state.get_calls += 1;

        if let Some(failure) = state.get_failure {
            return Err(failure.to_error());
        }
        if !state.registrations.contains_key(runtime_id) {
            return Err(ReconcilerError::ClusterNotFound {
                runtime_id: runtime_id.to_string(),
            });
        }
        Ok(ClusterState {
            runtime_id: runtime_id.to_string(),
            configuration_version,
            status: state.status,
        })
    }

    async fn delete_cluster(&self, runtime_id: &str) -> Result<()> {
        let mut state = self.state.lock().await;
        state.delete_calls += 1;

        if let Some(failure) = state.delete_failure {
            return Err(failure.to_error());
        }
        // Absence is success, so remove() needs no presence check
        state.registrations.remove(runtime_id);
        Ok(())
    }

    async fn cluster_exists(&self, runtime_id: &str) -> Result<bool> {
        Ok(self
            .state
            .lock()
            .await
            .registrations
            .contains_key(runtime_id))
    }
}
