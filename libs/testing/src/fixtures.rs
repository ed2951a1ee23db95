//! Envelopes and configurations shared across test suites.

use kubeprov_events::{ClusterConfig, LifecycleEvent, VpcConfig};

/// Request ID carried by every fixture envelope.
pub const REQUEST_ID: &str = "fake-request-id";

/// Physical resource ID carried by update and delete fixture envelopes.
pub const PHYSICAL_RESOURCE_ID: &str = "physical-resource-id";

/// Minimal valid configuration: a role and a network placement.
pub fn minimal_config() -> ClusterConfig {
    ClusterConfig {
        role_arn: Some("arn:of:role".to_string()),
        resources_vpc_config: Some(VpcConfig::new(
            ["subnet1", "subnet2"],
            ["sg1", "sg2", "sg3"],
        )),
        ..Default::default()
    }
}

/// Create envelope for `config`.
pub fn create_event(config: ClusterConfig) -> LifecycleEvent {
    LifecycleEvent::create(REQUEST_ID, config)
}

/// Update envelope from `old` to `new` for the fixture cluster.
pub fn update_event(new: ClusterConfig, old: ClusterConfig) -> LifecycleEvent {
    LifecycleEvent::update(REQUEST_ID, PHYSICAL_RESOURCE_ID, new, old)
}

/// Delete envelope for the fixture cluster.
pub fn delete_event() -> LifecycleEvent {
    LifecycleEvent::delete(REQUEST_ID, PHYSICAL_RESOURCE_ID)
}
