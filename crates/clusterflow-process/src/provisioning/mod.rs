//! Provisioning steps
//!
//! Steps that run while a cluster is being brought up. The apply itself is
//! performed by the workflow host; this module owns the polling that waits
//! for the reconciler to finish working through an applied configuration.

mod check_cluster_configuration;

pub use check_cluster_configuration::{
    CheckClusterConfigurationStep, RECONCILER_RETRY_INTERVAL, STATUS_POLL_INTERVAL,
};
