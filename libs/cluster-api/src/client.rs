//! Remote cluster API interface.

use async_trait::async_trait;

use crate::error::ClusterApiError;
use crate::types::{
    Cluster, CreateClusterRequest, UpdateClusterConfigRequest, UpdateClusterVersionRequest,
};

/// Remote cluster API interface.
///
/// Implementations must surface a missing cluster as
/// [`ClusterApiError::NotFound`]; callers rely on it for idempotent deletes.
#[async_trait]
pub trait ClusterApi: Send + Sync {
    /// Start creating a cluster.
    async fn create_cluster(&self, request: &CreateClusterRequest)
        -> Result<Cluster, ClusterApiError>;

    /// Fetch the live state of a cluster.
    async fn describe_cluster(&self, name: &str) -> Result<Cluster, ClusterApiError>;

    /// Start deleting a cluster.
    async fn delete_cluster(&self, name: &str) -> Result<(), ClusterApiError>;

    /// Replace the logging and network access configuration of a cluster.
    async fn update_cluster_config(
        &self,
        request: &UpdateClusterConfigRequest,
    ) -> Result<(), ClusterApiError>;

    /// Start a Kubernetes version upgrade.
    async fn update_cluster_version(
        &self,
        request: &UpdateClusterVersionRequest,
    ) -> Result<(), ClusterApiError>;
}
