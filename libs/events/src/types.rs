//! Desired cluster configuration.
//!
//! These are the caller-declared properties of the managed cluster. Field
//! names follow the remote cluster API (camelCase) so the same values can be
//! forwarded to it without translation.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// =============================================================================
// Desired Configuration
// =============================================================================

/// Full desired configuration of a cluster.
///
/// Every field is optional on the wire. Absence is meaningful: a field that
/// goes from present to absent between two snapshots is a change.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterConfig {
    /// Cluster name. Generated from the request ID when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// IAM role the cluster control plane runs as. Required on create.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role_arn: Option<String>,

    /// Kubernetes version, e.g. `"1.14"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Network placement.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resources_vpc_config: Option<VpcConfig>,

    /// Control plane logging.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logging: Option<Logging>,
}

impl ClusterConfig {
    /// Returns the network placement, treating an absent block as empty.
    pub fn vpc_config(&self) -> VpcConfig {
        self.resources_vpc_config.clone().unwrap_or_default()
    }

    /// Returns a copy of this configuration with the given name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// Network placement of the cluster control plane.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VpcConfig {
    /// Subnets for the control plane network interfaces. Order is significant.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subnet_ids: Option<Vec<String>>,

    /// Security groups for the control plane network interfaces. Order is significant.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub security_group_ids: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint_public_access: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint_private_access: Option<bool>,

    /// Keys not modelled above, forwarded unchanged.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl VpcConfig {
    /// Creates a placement from subnet and security group IDs.
    pub fn new<S, G>(subnet_ids: S, security_group_ids: G) -> Self
    where
        S: IntoIterator,
        S::Item: Into<String>,
        G: IntoIterator,
        G::Item: Into<String>,
    {
        Self {
            subnet_ids: Some(subnet_ids.into_iter().map(Into::into).collect()),
            security_group_ids: Some(security_group_ids.into_iter().map(Into::into).collect()),
            ..Default::default()
        }
    }
}

/// Control plane logging configuration.
///
/// Treated as an opaque blob: unknown keys and log types survive a round trip
/// and take part in equality.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Logging {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster_logging: Option<Vec<LogSetup>>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One group of log types sharing an enabled flag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogSetup {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub types: Option<Vec<LogType>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Control plane log stream.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LogType {
    Api,
    Audit,
    Authenticator,
    ControllerManager,
    Scheduler,

    /// A log type this build does not know about.
    #[serde(untagged)]
    Other(String),
}

impl std::fmt::Display for LogType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            LogType::Api => "api",
            LogType::Audit => "audit",
            LogType::Authenticator => "authenticator",
            LogType::ControllerManager => "controllerManager",
            LogType::Scheduler => "scheduler",
            LogType::Other(other) => other.as_str(),
        };
        write!(f, "{}", s)
    }
}
