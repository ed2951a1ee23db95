//! Cluster lifecycle handler.
//!
//! Drives a single managed cluster through create, update and delete by
//! issuing calls to the remote cluster API, and answers the orchestrator's
//! repeated "is it done yet" checks. The handler never waits for convergence
//! itself and keeps no state between activations; every observation comes
//! from a fresh describe call.
//!
//! Idempotency under redelivery:
//! - Generated names derive from the request ID, so a repeated create targets
//!   the same cluster
//! - A version update to the live version is skipped
//! - Deleting a missing cluster succeeds

use std::sync::Arc;

use kubeprov_cluster_api::{
    ClusterApi, ClusterStatus, CreateClusterRequest, UpdateClusterConfigRequest,
    UpdateClusterVersionRequest,
};
use kubeprov_events::{ClusterAttributes, ClusterConfig, IsCompleteResponse, OnEventResponse};
use kubeprov_reconcile::{analyze_update, InPlaceUpdates, UpdatePlan};
use tracing::{debug, info, instrument, warn};

use crate::error::{HandlerError, HandlerResult};

/// Derive the cluster name used when the caller does not supply one.
pub fn generate_cluster_name(request_id: &str) -> String {
    format!("cluster-{}", request_id)
}

/// Lifecycle handler for one activation.
pub struct ClusterResourceHandler {
    api: Arc<dyn ClusterApi>,
}

impl ClusterResourceHandler {
    /// Create a handler bound to a cluster API client.
    pub fn new(api: Arc<dyn ClusterApi>) -> Self {
        Self { api }
    }

    // ------
    // CREATE
    // ------

    /// Start creating a cluster.
    ///
    /// Returns the remote cluster name as the physical resource ID.
    #[instrument(skip(self, config))]
    pub async fn on_create(
        &self,
        request_id: &str,
        config: ClusterConfig,
    ) -> HandlerResult<OnEventResponse> {
        // An empty name counts as absent.
        let name = config
            .name
            .clone()
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| generate_cluster_name(request_id));

        let request = CreateClusterRequest::from_config(name, config)
            .ok_or_else(|| HandlerError::validation("\"roleArn\" is required"))?;

        info!(
            cluster = %request.name,
            role_arn = %request.role_arn,
            version = ?request.version,
            "Creating cluster"
        );
        let cluster = self.api.create_cluster(&request).await?;
        debug!(cluster = %cluster.name, status = %cluster.status, "Create accepted");

        Ok(OnEventResponse::new(cluster.name))
    }

    /// Check whether a newly created cluster is active.
    pub async fn is_create_complete(&self, name: &str) -> HandlerResult<IsCompleteResponse> {
        self.is_active(name).await
    }

    // ------
    // DELETE
    // ------

    /// Start deleting a cluster. A cluster that is already gone counts as deleted.
    #[instrument(skip(self))]
    pub async fn on_delete(&self, name: &str) -> HandlerResult<OnEventResponse> {
        info!(cluster = %name, "Deleting cluster");

        match self.api.delete_cluster(name).await {
            Ok(()) => {}
            Err(e) if e.is_not_found() => {
                info!(cluster = %name, "Cluster not found, delete idempotently succeeded");
            }
            Err(e) => return Err(e.into()),
        }

        Ok(OnEventResponse::new(name))
    }

    /// Check whether a cluster is gone.
    #[instrument(skip(self))]
    pub async fn is_delete_complete(&self, name: &str) -> HandlerResult<IsCompleteResponse> {
        debug!(cluster = %name, "Waiting for cluster to be deleted");

        match self.api.describe_cluster(name).await {
            Ok(cluster) => {
                debug!(cluster = %name, status = %cluster.status, "Cluster still exists");
                Ok(IsCompleteResponse::pending())
            }
            Err(e) if e.is_not_found() => {
                info!(cluster = %name, "Cluster not found, deletion complete");
                Ok(IsCompleteResponse::complete())
            }
            Err(e) => Err(e.into()),
        }
    }

    // ------
    // UPDATE
    // ------

    /// Apply a configuration change.
    ///
    /// Changes the remote API cannot apply in place produce a brand new
    /// cluster, whose name is returned as the new physical resource ID. The
    /// superseded cluster is left for the orchestrator to delete. Returns
    /// `None` when nothing needed to change.
    #[instrument(skip(self, old, new))]
    pub async fn on_update(
        &self,
        request_id: &str,
        name: &str,
        old: &ClusterConfig,
        new: ClusterConfig,
    ) -> HandlerResult<Option<OnEventResponse>> {
        let updates = analyze_update(old, &new);
        debug!(cluster = %name, %updates, "Analyzed update");

        match updates.plan() {
            UpdatePlan::Replace => {
                info!(cluster = %name, "Update requires replacement, creating a new cluster");
                self.on_create(request_id, new).await.map(Some)
            }
            UpdatePlan::InPlace(in_place) => {
                self.apply_in_place(name, old, new, in_place).await?;
                Ok(Some(OnEventResponse::new(name)))
            }
            UpdatePlan::NoOp => {
                debug!(cluster = %name, "No updates");
                Ok(None)
            }
        }
    }

    /// Check whether an updated cluster is active again.
    pub async fn is_update_complete(&self, name: &str) -> HandlerResult<IsCompleteResponse> {
        self.is_active(name).await
    }

    /// Issue in-place updates, version first. The remote API refuses a second
    /// mutation while one is in progress, so the calls are strictly sequential.
    async fn apply_in_place(
        &self,
        name: &str,
        old: &ClusterConfig,
        new: ClusterConfig,
        updates: InPlaceUpdates,
    ) -> HandlerResult<()> {
        if updates.version {
            let Some(version) = new.version.as_deref().filter(|v| !v.is_empty()) else {
                return Err(HandlerError::validation(format!(
                    "Cannot remove cluster version configuration. Current version is {}",
                    old.version.as_deref().unwrap_or_default()
                )));
            };

            self.update_cluster_version(name, version).await?;
        }

        if updates.config {
            info!(cluster = %name, "Updating cluster logging and access configuration");
            let request = UpdateClusterConfigRequest {
                name: name.to_string(),
                logging: new.logging,
                resources_vpc_config: new.resources_vpc_config,
            };
            self.api.update_cluster_config(&request).await?;
        }

        Ok(())
    }

    /// Upgrade the cluster version unless it is already there.
    async fn update_cluster_version(&self, name: &str, version: &str) -> HandlerResult<()> {
        // The remote API rejects an update to the current version.
        let cluster = self.api.describe_cluster(name).await?;
        if cluster.version.as_deref() == Some(version) {
            info!(
                cluster = %name,
                version = %version,
                "Cluster already at version, skipping version update"
            );
            return Ok(());
        }

        info!(
            cluster = %name,
            from = ?cluster.version,
            to = %version,
            "Updating cluster version"
        );
        let request = UpdateClusterVersionRequest {
            name: name.to_string(),
            version: version.to_string(),
        };
        self.api.update_cluster_version(&request).await?;

        Ok(())
    }

    // ------
    // STATUS
    // ------

    /// Shared completion check for create and update.
    ///
    /// A missing cluster is an error here: the cluster is expected to exist.
    #[instrument(skip(self))]
    async fn is_active(&self, name: &str) -> HandlerResult<IsCompleteResponse> {
        debug!(cluster = %name, "Waiting for cluster to become ACTIVE");
        let cluster = self.api.describe_cluster(name).await?;

        match cluster.status {
            ClusterStatus::Active => {}
            ClusterStatus::Failed => {
                warn!(cluster = %name, "Cluster reported FAILED status");
                return Ok(IsCompleteResponse::pending());
            }
            status => {
                debug!(cluster = %name, status = %status, "Cluster not active yet");
                return Ok(IsCompleteResponse::pending());
            }
        }

        info!(cluster = %name, "Cluster is ACTIVE");
        let certificate_authority_data = cluster.certificate_authority_data().map(str::to_string);
        Ok(IsCompleteResponse::complete_with(ClusterAttributes {
            name: cluster.name,
            endpoint: cluster.endpoint,
            arn: cluster.arn,
            certificate_authority_data,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_name_is_deterministic() {
        assert_eq!(
            generate_cluster_name("fake-request-id"),
            "cluster-fake-request-id"
        );
        assert_eq!(generate_cluster_name("r1"), generate_cluster_name("r1"));
    }
}
