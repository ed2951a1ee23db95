//! Lifecycle event envelope - the orchestrator's request and response shapes.

use serde::{Deserialize, Serialize};

use crate::error::EventError;
use crate::types::ClusterConfig;

/// Kind of lifecycle transition being requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestType {
    Create,
    Update,
    Delete,
}

impl std::fmt::Display for RequestType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RequestType::Create => write!(f, "Create"),
            RequestType::Update => write!(f, "Update"),
            RequestType::Delete => write!(f, "Delete"),
        }
    }
}

/// Resource properties as delivered by the orchestrator.
///
/// The cluster configuration lives under `Config`; a missing block reads as
/// an empty configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ResourceProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_token: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<ClusterConfig>,
}

impl ResourceProperties {
    /// Wraps a cluster configuration.
    pub fn new(config: ClusterConfig) -> Self {
        Self {
            service_token: None,
            config: Some(config),
        }
    }

    /// Returns the cluster configuration, or an empty one.
    pub fn cluster_config(&self) -> ClusterConfig {
        self.config.clone().unwrap_or_default()
    }
}

/// The lifecycle event envelope.
///
/// The same envelope is delivered to the mutating entry point and, repeatedly,
/// to the completion check. Orchestrator bookkeeping keys that the handler has
/// no use for (`StackId`, `ResponseURL`, `ResourceType`, ...) are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LifecycleEvent {
    /// Requested transition.
    pub request_type: RequestType,

    /// Unique token for the triggering request. Stable across redelivery.
    pub request_id: String,

    /// Identifier of the provisioned cluster. Absent on create.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub physical_resource_id: Option<String>,

    /// Orchestrator-side name of the resource, for log correlation only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logical_resource_id: Option<String>,

    /// New desired properties.
    #[serde(default)]
    pub resource_properties: ResourceProperties,

    /// Previous desired properties. Present only on update.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_resource_properties: Option<ResourceProperties>,
}

impl LifecycleEvent {
    /// Creates a create event.
    pub fn create(request_id: impl Into<String>, config: ClusterConfig) -> Self {
        Self {
            request_type: RequestType::Create,
            request_id: request_id.into(),
            physical_resource_id: None,
            logical_resource_id: None,
            resource_properties: ResourceProperties::new(config),
            old_resource_properties: None,
        }
    }

    /// Creates an update event for an existing cluster.
    pub fn update(
        request_id: impl Into<String>,
        physical_resource_id: impl Into<String>,
        new_config: ClusterConfig,
        old_config: ClusterConfig,
    ) -> Self {
        Self {
            request_type: RequestType::Update,
            request_id: request_id.into(),
            physical_resource_id: Some(physical_resource_id.into()),
            logical_resource_id: None,
            resource_properties: ResourceProperties::new(new_config),
            old_resource_properties: Some(ResourceProperties::new(old_config)),
        }
    }

    /// Creates a delete event for an existing cluster.
    pub fn delete(request_id: impl Into<String>, physical_resource_id: impl Into<String>) -> Self {
        Self {
            request_type: RequestType::Delete,
            request_id: request_id.into(),
            physical_resource_id: Some(physical_resource_id.into()),
            logical_resource_id: None,
            resource_properties: ResourceProperties::default(),
            old_resource_properties: None,
        }
    }

    /// Sets the physical resource ID (as the orchestrator does after create).
    #[must_use]
    pub fn with_physical_resource_id(mut self, id: impl Into<String>) -> Self {
        self.physical_resource_id = Some(id.into());
        self
    }

    /// Decodes an envelope from JSON.
    pub fn from_json(json: &str) -> Result<Self, EventError> {
        Ok(serde_json::from_str(json)?)
    }

    /// New desired configuration.
    pub fn desired_config(&self) -> ClusterConfig {
        self.resource_properties.cluster_config()
    }

    /// Previous desired configuration; empty when the envelope carries none.
    pub fn previous_config(&self) -> ClusterConfig {
        self.old_resource_properties
            .as_ref()
            .map(ResourceProperties::cluster_config)
            .unwrap_or_default()
    }

    /// Returns the physical resource ID, failing if the envelope lacks one.
    pub fn require_physical_resource_id(&self) -> Result<&str, EventError> {
        self.physical_resource_id
            .as_deref()
            .ok_or_else(|| EventError::MissingField {
                field: "PhysicalResourceId",
                request_type: self.request_type.to_string(),
            })
    }
}

/// Result of the mutating entry point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OnEventResponse {
    pub physical_resource_id: String,
}

impl OnEventResponse {
    pub fn new(physical_resource_id: impl Into<String>) -> Self {
        Self {
            physical_resource_id: physical_resource_id.into(),
        }
    }
}

/// Result of the completion check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct IsCompleteResponse {
    pub is_complete: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<ClusterAttributes>,
}

impl IsCompleteResponse {
    /// Still converging.
    pub fn pending() -> Self {
        Self {
            is_complete: false,
            data: None,
        }
    }

    /// Converged, with no output attributes.
    pub fn complete() -> Self {
        Self {
            is_complete: true,
            data: None,
        }
    }

    /// Converged, exposing cluster attributes to the orchestrator.
    pub fn complete_with(data: ClusterAttributes) -> Self {
        Self {
            is_complete: true,
            data: Some(data),
        }
    }
}

/// Output attributes of an active cluster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ClusterAttributes {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arn: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certificate_authority_data: Option<String>,
}
