//! Orchestrator entry points.
//!
//! The orchestrator calls `on_event` once per lifecycle event and then
//! `is_complete` on a fixed interval until it reports completion or the
//! orchestrator gives up. Each call builds a fresh handler.

use std::sync::Arc;

use kubeprov_cluster_api::ClusterApi;
use kubeprov_events::{IsCompleteResponse, LifecycleEvent, OnEventResponse, RequestType};
use tracing::{info, instrument};

use crate::error::HandlerResult;
use crate::handler::ClusterResourceHandler;

/// Apply a lifecycle event.
///
/// Returns `None` for an update that required no remote changes; the
/// orchestrator then keeps the existing physical resource ID.
#[instrument(
    skip(api, event),
    fields(
        request_type = %event.request_type,
        request_id = %event.request_id,
        logical_resource_id = ?event.logical_resource_id,
    )
)]
pub async fn on_event(
    api: Arc<dyn ClusterApi>,
    event: &LifecycleEvent,
) -> HandlerResult<Option<OnEventResponse>> {
    info!("Handling lifecycle event");
    let handler = ClusterResourceHandler::new(api);

    match event.request_type {
        RequestType::Create => handler
            .on_create(&event.request_id, event.desired_config())
            .await
            .map(Some),
        RequestType::Update => {
            let name = event.require_physical_resource_id()?;
            handler
                .on_update(
                    &event.request_id,
                    name,
                    &event.previous_config(),
                    event.desired_config(),
                )
                .await
        }
        RequestType::Delete => {
            let name = event.require_physical_resource_id()?;
            handler.on_delete(name).await.map(Some)
        }
    }
}

/// Check whether the last lifecycle event has converged.
#[instrument(
    skip(api, event),
    fields(
        request_type = %event.request_type,
        request_id = %event.request_id,
    )
)]
pub async fn is_complete(
    api: Arc<dyn ClusterApi>,
    event: &LifecycleEvent,
) -> HandlerResult<IsCompleteResponse> {
    let handler = ClusterResourceHandler::new(api);
    let name = event.require_physical_resource_id()?;

    match event.request_type {
        RequestType::Create => handler.is_create_complete(name).await,
        RequestType::Update => handler.is_update_complete(name).await,
        RequestType::Delete => handler.is_delete_complete(name).await,
    }
}
