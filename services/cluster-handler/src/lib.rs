//! kubeprov Cluster Handler Library
//!
//! Reconciles one managed Kubernetes cluster against a remote cluster API on
//! behalf of an external orchestrator. The orchestrator delivers lifecycle
//! events and polls for completion; this crate turns each of those calls into
//! remote API calls.
//!
//! ## Architecture
//!
//! ```text
//! orchestrator
//! ├── on_event     ──► ClusterResourceHandler ──► ClusterApi (create/update/delete)
//! └── is_complete  ──► ClusterResourceHandler ──► ClusterApi (describe)
//! ```
//!
//! ## Modules
//!
//! - `dispatch`: orchestrator entry points
//! - `handler`: create/update/delete and completion checks
//! - `config`: environment configuration for the binary
//! - `error`: handler error taxonomy

pub mod config;
pub mod dispatch;
pub mod error;
pub mod handler;

// Re-export commonly used types
pub use dispatch::{is_complete, on_event};
pub use error::{HandlerError, HandlerResult};
pub use handler::{generate_cluster_name, ClusterResourceHandler};
