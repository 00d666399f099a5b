//! OpenAPI documentation configuration.

use utoipa::OpenApi;

use crate::dto::{HealthResponse, ItemRequest, ItemResponse, ServiceStatus, WorkerPoolStatus};
use crate::error::{ErrorResponse, FieldError};
use crate::handlers::{health, items};

/// OpenAPI documentation for the Stockroom API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Stockroom API",
        version = "1.0.0",
        description = "Item management with asynchronous batch processing.

## Features

- **Items**: Create, read, replace and delete items
- **Processing**: Mark every stored item as `PROCESSED` on a bounded worker pool

## Quick Start

1. Check server health: `GET /api/health`
2. Create an item: `POST /api/items`
3. Process all items: `GET /api/items/process`
",
        license(
            name = "Apache-2.0",
            url = "https://www.apache.org/licenses/LICENSE-2.0"
        )
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server")
    ),
    paths(
        health::health_check,
        items::list_items,
        items::create_item,
        items::get_item,
        items::update_item,
        items::delete_item,
        items::process_items,
    ),
    components(
        schemas(
            // Request types
            ItemRequest,
            // Response types
            ItemResponse,
            HealthResponse,
            ServiceStatus,
            WorkerPoolStatus,
            ErrorResponse,
            FieldError,
        )
    ),
    tags(
        (name = "system", description = "System health"),
        (name = "items", description = "Item management and batch processing"),
    )
)]
pub struct ApiDoc;
