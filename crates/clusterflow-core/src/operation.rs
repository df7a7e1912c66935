//! Operation model
//!
//! An [`Operation`] is the persisted state record of one workflow instance.
//! Steps receive it, may mutate it, and hand it back together with a
//! scheduling hint; the operation manager is the only component that writes
//! it to storage.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Persisted record of one provisioning/deprovisioning workflow instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    /// Unique operation id, used as the storage key
    pub id: String,

    /// Which workflow this operation drives
    pub kind: OperationKind,

    /// Identifier of the managed cluster instance this operation belongs to.
    /// Stable once assigned.
    pub runtime_id: String,

    /// Version of the configuration registered with the reconciler.
    /// 0 means no configuration has been applied yet.
    #[serde(default)]
    pub cluster_configuration_version: i64,

    /// Set once deregistration has been confirmed. Write-once: never
    /// reverts to false.
    #[serde(default)]
    pub cluster_configuration_deleted: bool,

    /// Workflow status, mutated only by the operation manager
    pub state: OperationState,

    /// Human-readable detail for the current state (failure reason etc.)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// When the operation was created
    pub created_at: DateTime<Utc>,

    /// Timestamp of the last persisted mutation. Deadline checks are
    /// computed from this field alone, so every persisted mutation must
    /// refresh it.
    pub updated_at: DateTime<Utc>,
}

impl Operation {
    /// Create a fresh in-progress operation for the given cluster instance
    pub fn new(kind: OperationKind, runtime_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            kind,
            runtime_id: runtime_id.into(),
            cluster_configuration_version: 0,
            cluster_configuration_deleted: false,
            state: OperationState::InProgress,
            description: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_configuration_version(mut self, version: i64) -> Self {
        self.cluster_configuration_version = version;
        self
    }
}

/// Kind of workflow an operation belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    /// Apply a cluster configuration and wait for readiness
    Provision,
    /// Remove the applied configuration and wait for absence
    Deprovision,
}

impl std::fmt::Display for OperationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OperationKind::Provision => write!(f, "provision"),
            OperationKind::Deprovision => write!(f, "deprovision"),
        }
    }
}

/// Workflow status of an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationState {
    /// The workflow is still being driven by steps
    InProgress,
    /// All steps finished; terminal
    Succeeded,
    /// A step failed permanently; terminal
    Failed,
}

impl OperationState {
    /// Terminal states are never left again
    pub fn is_terminal(&self) -> bool {
        matches!(self, OperationState::Succeeded | OperationState::Failed)
    }
}

impl std::fmt::Display for OperationState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OperationState::InProgress => write!(f, "in_progress"),
            OperationState::Succeeded => write!(f, "succeeded"),
            OperationState::Failed => write!(f, "failed"),
        }
    }
}
