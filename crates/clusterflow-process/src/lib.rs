//! ClusterFlow Process Engine
//!
//! A long-running provisioning or deprovisioning workflow is decomposed
//! into small, idempotent **steps**. The host's scheduler (not part of this
//! crate) repeatedly invokes a step with the persisted operation; the step
//! reads the operation and the external cluster state, persists any
//! mutation through the [`OperationManager`], and reports one of exactly
//! three outcomes: complete, retry-after-delay, or terminal failure.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │             workflow host / scheduler            │
//! │        (re-invokes steps, owns the queue)        │
//! └─────────────────┬───────────────────────────────┘
//!                   │ run(operation)
//! ┌─────────────────▼───────────────────────────────┐
//! │              clusterflow-process                 │
//! │  ┌──────────────────────────────────────────┐   │
//! │  │            Step contract                  │   │
//! │  │  trait Step { name, run } -> StepResult   │   │
//! │  └─────────┬──────────────────┬─────────────┘   │
//! │  ┌─────────▼────────┐ ┌───────▼─────────────┐   │
//! │  │ CheckCluster     │ │ DeregisterCluster   │   │
//! │  │ Configuration    │ │                     │   │
//! │  └─────────┬────────┘ └───────┬─────────────┘   │
//! │            └───────┬──────────┘                 │
//! │          ┌─────────▼──────────┐                 │
//! │          │  OperationManager  │                 │
//! │          └─────────┬──────────┘                 │
//! └────────────────────┼───────────────────────────┘
//!                      │
//!     ┌────────────────┴────────────────┐
//!     │                                 │
//! ┌───▼──────────────┐   ┌──────────────▼───┐
//! │ OperationStorage │   │ ReconcilerClient │
//! │ (core)           │   │ (reconciler)     │
//! └──────────────────┘   └──────────────────┘
//! ```
//!
//! Steps survive process restarts: every external effect is guarded by a
//! pre-check or a write-once flag on the operation, so replaying a step
//! after a crash never produces a duplicate side effect.

pub mod deprovisioning;
pub mod error;
pub mod manager;
pub mod provisioning;
pub mod step;

// Re-exports
pub use deprovisioning::DeregisterClusterStep;
pub use error::{ProcessError, Result};
pub use manager::{OperationManager, STORAGE_RETRY_INTERVAL};
pub use provisioning::CheckClusterConfigurationStep;
pub use step::{Step, StepOutcome, StepResult};
