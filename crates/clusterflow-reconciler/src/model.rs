//! Cluster configuration and status model

use serde::{Deserialize, Serialize};

/// Configuration payload registered with the reconciler for one cluster
///
/// Configuration versions are assigned by the reconciler, not by the
/// caller: re-applying an identical payload is idempotent and yields the
/// version already registered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterConfiguration {
    /// Managed cluster instance the configuration belongs to
    pub runtime_id: String,

    /// Provider-specific configuration payload
    pub config: serde_json::Value,
}

impl ClusterConfiguration {
    pub fn new(runtime_id: impl Into<String>, config: serde_json::Value) -> Self {
        Self {
            runtime_id: runtime_id.into(),
            config,
        }
    }
}

/// Reconciler-side view of one registered cluster configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterState {
    /// Managed cluster instance
    pub runtime_id: String,

    /// Version assigned to the registered configuration
    pub configuration_version: i64,

    /// Reconciliation status of that version
    pub status: ClusterStatus,
}

/// Reconciliation status reported for a cluster configuration
///
/// The set is closed: `Unknown` only exists to absorb wire values this
/// crate does not recognize, and steps treat it as a defect rather than a
/// state to wait on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClusterStatus {
    /// Queued, reconciliation has not started
    Pending,
    /// The reconciler is applying the configuration
    Reconciling,
    /// The configuration is fully applied
    Ready,
    /// Reconciliation failed on the reconciler side
    Error,
    /// Unrecognized wire value
    #[serde(other)]
    Unknown,
}

impl std::fmt::Display for ClusterStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClusterStatus::Pending => write!(f, "pending"),
            ClusterStatus::Reconciling => write!(f, "reconciling"),
            ClusterStatus::Ready => write!(f, "ready"),
            ClusterStatus::Error => write!(f, "error"),
            ClusterStatus::Unknown => write!(f, "unknown"),
        }
    }
}
