//! Health check endpoint.

use axum::{Json, extract::State};
use stockroom_core::traits::ItemStore;

use crate::dto::{HealthResponse, ServiceStatus, WorkerPoolStatus};
use crate::state::AppState;

/// Health check endpoint.
///
/// Returns the server version along with store and worker pool status.
/// An unreachable store reports `degraded` rather than failing the request.
#[utoipa::path(
    get,
    path = "/api/health",
    responses(
        (status = 200, description = "Server is running", body = HealthResponse),
    ),
    tag = "system"
)]
pub async fn health_check<S: ItemStore>(State(state): State<AppState<S>>) -> Json<HealthResponse> {
    let database = match state.store.health_check().await {
        Ok(()) => ServiceStatus {
            healthy: true,
            message: None,
        },
        Err(e) => ServiceStatus {
            healthy: false,
            message: Some(e.to_string()),
        },
    };

    let status = if database.healthy { "healthy" } else { "degraded" };

    Json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database,
        workers: WorkerPoolStatus::from(&state.workers),
    })
}
