//! ClusterFlow Reconciler Client
//!
//! This crate provides the client abstraction for the external
//! reconciliation service that applies cluster configurations and reports
//! their status.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │              clusterflow-process                 │
//! │        (provisioning / deprovisioning steps)     │
//! └─────────────────┬───────────────────────────────┘
//!                   │
//! ┌─────────────────▼───────────────────────────────┐
//! │            clusterflow-reconciler                │
//! │  ┌──────────────────────────────────────────┐   │
//! │  │          Client Abstraction               │   │
//! │  │  trait ReconcilerClient { ... }           │   │
//! │  └──────────────────────────────────────────┘   │
//! │  ┌──────────────┐  ┌──────────────┐            │
//! │  │ Error        │  │ Cluster      │            │
//! │  │ classifier   │  │ model        │            │
//! │  └──────────────┘  └──────────────┘            │
//! └───────┬─────────────────┬───────────────────────┘
//!         │                 │
//! ┌───────▼───────┐ ┌───────▼───────┐
//! │ HTTP client   │ │ FakeClient    │
//! │ (reqwest)     │ │ (test-utils)  │
//! └───────────────┘ └───────────────┘
//! ```
//!
//! Errors carry a temporary/permanent classification
//! ([`ReconcilerError::is_temporary`]); steps retry temporary failures
//! without failing the operation and treat everything else as terminal.

pub mod client;
pub mod error;
pub mod http;
pub mod model;

#[cfg(any(test, feature = "test-utils"))]
pub mod fake;

// Re-exports
pub use client::ReconcilerClient;
pub use error::{ReconcilerError, Result};
pub use http::HttpReconcilerClient;
pub use model::{ClusterConfiguration, ClusterState, ClusterStatus};

#[cfg(any(test, feature = "test-utils"))]
pub use fake::{FakeClient, FakeFailure};
