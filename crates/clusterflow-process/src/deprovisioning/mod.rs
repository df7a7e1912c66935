//! Deprovisioning steps
//!
//! Steps that tear a cluster back down. Deregistration is the mirror of the
//! provisioning apply: it removes the configuration from the reconciler and
//! records the removal on the operation so replays stay side-effect free.

mod deregister_cluster;

pub use deregister_cluster::{DeregisterClusterStep, DELETE_RETRY_INTERVAL};
