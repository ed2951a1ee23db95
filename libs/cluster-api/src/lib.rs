//! # kubeprov-cluster-api
//!
//! The capability set the cluster handler consumes from the remote control
//! plane, plus an HTTP/JSON implementation of it.
//!
//! ## Capabilities
//!
//! - `create_cluster`: start provisioning a cluster
//! - `describe_cluster`: observe live cluster state (fails with `NotFound`)
//! - `delete_cluster`: start deprovisioning (fails with `NotFound`)
//! - `update_cluster_config`: replace logging / endpoint access configuration
//! - `update_cluster_version`: upgrade the Kubernetes version
//!
//! Every mutating call returns as soon as the remote side accepts it;
//! convergence is observed through `describe_cluster`.

mod client;
mod error;
mod http;
mod types;

pub use client::ClusterApi;
pub use error::{ClusterApiError, RESOURCE_NOT_FOUND};
pub use http::{Credentials, HttpClusterApi};
pub use types::*;
