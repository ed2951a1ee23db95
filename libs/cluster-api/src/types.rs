//! Request and response shapes of the remote cluster API.

use kubeprov_events::{ClusterConfig, Logging, VpcConfig};
use serde::{Deserialize, Serialize};

// =============================================================================
// Requests
// =============================================================================

/// Body of a create call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateClusterRequest {
    pub name: String,
    pub role_arn: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub resources_vpc_config: Option<VpcConfig>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub logging: Option<Logging>,
}

impl CreateClusterRequest {
    /// Build a create request from desired configuration.
    ///
    /// Returns `None` when the configuration has no role ARN. The `name`
    /// argument takes precedence over the configured name.
    pub fn from_config(name: impl Into<String>, config: ClusterConfig) -> Option<Self> {
        let role_arn = config.role_arn.filter(|r| !r.is_empty())?;
        Some(Self {
            name: name.into(),
            role_arn,
            version: config.version,
            resources_vpc_config: config.resources_vpc_config,
            logging: config.logging,
        })
    }
}

/// Body of a configuration update call.
///
/// Both blocks are sent whole; the remote API does not merge partial blocks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateClusterConfigRequest {
    /// Target cluster (path parameter).
    #[serde(skip)]
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub logging: Option<Logging>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub resources_vpc_config: Option<VpcConfig>,
}

/// Body of a version update call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateClusterVersionRequest {
    /// Target cluster (path parameter).
    #[serde(skip)]
    pub name: String,

    pub version: String,
}

// =============================================================================
// Responses
// =============================================================================

/// Cluster lifecycle status as reported by the remote API.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClusterStatus {
    Creating,
    Active,
    Updating,
    Deleting,
    Failed,
    Pending,
    #[default]
    #[serde(other)]
    Unknown,
}

impl ClusterStatus {
    /// Returns true for the terminal status of a provisioned, usable cluster.
    pub fn is_active(&self) -> bool {
        matches!(self, ClusterStatus::Active)
    }
}

impl std::fmt::Display for ClusterStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ClusterStatus::Creating => "CREATING",
            ClusterStatus::Active => "ACTIVE",
            ClusterStatus::Updating => "UPDATING",
            ClusterStatus::Deleting => "DELETING",
            ClusterStatus::Failed => "FAILED",
            ClusterStatus::Pending => "PENDING",
            ClusterStatus::Unknown => "UNKNOWN",
        };
        write!(f, "{}", s)
    }
}

/// Certificate authority of the cluster API server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificateAuthority {
    /// Base64 encoded certificate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
}

/// Live cluster state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cluster {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arn: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role_arn: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resources_vpc_config: Option<VpcConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logging: Option<Logging>,

    #[serde(default)]
    pub status: ClusterStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certificate_authority: Option<CertificateAuthority>,
}

impl Cluster {
    /// Returns the certificate authority data, if the cluster has one yet.
    pub fn certificate_authority_data(&self) -> Option<&str> {
        self.certificate_authority
            .as_ref()
            .and_then(|ca| ca.data.as_deref())
    }
}

/// Envelope the remote API wraps single-cluster responses in.
#[derive(Debug, Deserialize)]
pub(crate) struct ClusterResponse {
    pub cluster: Cluster,
}
