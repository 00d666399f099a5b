//! Response DTOs for API endpoints.

use serde::Serialize;
use utoipa::ToSchema;

use stockroom_core::{Item, WorkerPool};

// =============================================================================
// Health
// =============================================================================

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Health status ("healthy" or "degraded")
    pub status: String,
    /// Server version
    pub version: String,
    /// Database connectivity status
    pub database: ServiceStatus,
    /// Worker pool status
    pub workers: WorkerPoolStatus,
}

/// Status of an individual service component.
#[derive(Debug, Serialize, ToSchema)]
pub struct ServiceStatus {
    /// Whether the service is reachable
    pub healthy: bool,
    /// Optional message (e.g., error details)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Snapshot of the worker pool.
#[derive(Debug, Serialize, ToSchema)]
pub struct WorkerPoolStatus {
    /// Tasks admitted and not yet finished
    pub in_flight: usize,
    /// Maximum tasks running at once
    pub concurrency: usize,
    /// Maximum tasks waiting for a running slot
    pub queue_capacity: usize,
    /// Whether the pool has stopped accepting work
    pub shutting_down: bool,
}

impl From<&WorkerPool> for WorkerPoolStatus {
    fn from(pool: &WorkerPool) -> Self {
        Self {
            in_flight: pool.in_flight(),
            concurrency: pool.config().concurrency,
            queue_capacity: pool.config().queue_capacity,
            shutting_down: pool.is_shutting_down(),
        }
    }
}

// =============================================================================
// Items
// =============================================================================

/// Item representation returned by the API.
#[derive(Debug, Serialize, ToSchema)]
pub struct ItemResponse {
    /// Storage-assigned identifier
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub status: String,
    pub email: Option<String>,
}

impl From<Item> for ItemResponse {
    fn from(item: Item) -> Self {
        Self {
            id: item.id,
            name: item.name,
            description: item.description,
            status: item.status,
            email: item.email,
        }
    }
}
