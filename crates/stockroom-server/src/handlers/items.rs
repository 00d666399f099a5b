//! Item CRUD and batch processing endpoints.

use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::info;

use stockroom_core::traits::ItemStore;
use stockroom_core::{ItemId, NewItem, TracingProcessReporter};

use crate::dto::{ItemRequest, ItemResponse};
use crate::error::{ApiError, ErrorResponse};
use crate::state::AppState;

/// List all items.
#[utoipa::path(
    get,
    path = "/api/items",
    responses(
        (status = 200, description = "All stored items", body = Vec<ItemResponse>),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "items"
)]
pub async fn list_items<S: ItemStore>(
    State(state): State<AppState<S>>,
) -> Result<Json<Vec<ItemResponse>>, ApiError> {
    let items = state.store.find_all().await?;
    Ok(Json(items.into_iter().map(ItemResponse::from).collect()))
}

/// Create an item.
///
/// The identifier is assigned by the store.
#[utoipa::path(
    post,
    path = "/api/items",
    request_body = ItemRequest,
    responses(
        (status = 201, description = "Item created", body = ItemResponse),
        (status = 400, description = "Malformed body or validation failure", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "items"
)]
pub async fn create_item<S: ItemStore>(
    State(state): State<AppState<S>>,
    payload: Result<Json<ItemRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ItemResponse>), ApiError> {
    let Json(request) = payload?;
    let new_item = NewItem::from(request);
    new_item.validate()?;

    let created = state.store.insert(&new_item).await?;
    info!(item_id = created.id, "Item created");

    Ok((StatusCode::CREATED, Json(ItemResponse::from(created))))
}

/// Get an item by ID.
#[utoipa::path(
    get,
    path = "/api/items/{id}",
    params(
        ("id" = i64, Path, description = "Item identifier")
    ),
    responses(
        (status = 200, description = "Item found", body = ItemResponse),
        (status = 400, description = "Malformed identifier", body = ErrorResponse),
        (status = 404, description = "Item not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "items"
)]
pub async fn get_item<S: ItemStore>(
    State(state): State<AppState<S>>,
    id: Result<Path<ItemId>, PathRejection>,
) -> Result<Json<ItemResponse>, ApiError> {
    let Path(id) = id?;
    let item = state
        .store
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Item not found: {}", id)))?;

    Ok(Json(ItemResponse::from(item)))
}

/// Replace an item.
///
/// Every field is overwritten; the path identifier wins over any id in the body.
#[utoipa::path(
    put,
    path = "/api/items/{id}",
    params(
        ("id" = i64, Path, description = "Item identifier")
    ),
    request_body = ItemRequest,
    responses(
        (status = 200, description = "Item updated", body = ItemResponse),
        (status = 400, description = "Malformed request or validation failure", body = ErrorResponse),
        (status = 404, description = "Item not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "items"
)]
pub async fn update_item<S: ItemStore>(
    State(state): State<AppState<S>>,
    id: Result<Path<ItemId>, PathRejection>,
    payload: Result<Json<ItemRequest>, JsonRejection>,
) -> Result<Json<ItemResponse>, ApiError> {
    let Path(id) = id?;
    let Json(request) = payload?;
    let new_item = NewItem::from(request);
    new_item.validate()?;

    let updated = state.store.save(&new_item.into_item(id)).await?;
    info!(item_id = id, "Item updated");

    Ok(Json(ItemResponse::from(updated)))
}

/// Delete an item.
#[utoipa::path(
    delete,
    path = "/api/items/{id}",
    params(
        ("id" = i64, Path, description = "Item identifier")
    ),
    responses(
        (status = 204, description = "Item deleted"),
        (status = 400, description = "Malformed identifier", body = ErrorResponse),
        (status = 404, description = "Item not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "items"
)]
pub async fn delete_item<S: ItemStore>(
    State(state): State<AppState<S>>,
    id: Result<Path<ItemId>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(id) = id?;

    if state.store.delete_by_id(id).await? {
        info!(item_id = id, "Item deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound(format!("Item not found: {}", id)))
    }
}

/// Mark every item as processed.
///
/// Waits for the whole batch. Items that fail are left out of the response
/// and logged. Failing to enumerate items, or a worker pool that shuts down
/// before admitting every item, is an error.
#[utoipa::path(
    get,
    path = "/api/items/process",
    responses(
        (status = 200, description = "Items processed", body = Vec<ItemResponse>),
        (status = 204, description = "No item was processed"),
        (status = 500, description = "Batch could not start", body = ErrorResponse),
    ),
    tag = "items"
)]
pub async fn process_items<S: ItemStore>(
    State(state): State<AppState<S>>,
) -> Result<Response, ApiError> {
    let outcome = state
        .processor
        .process_all_with_progress(&TracingProcessReporter)
        .await?;

    if outcome.processed.is_empty() {
        return Ok(StatusCode::NO_CONTENT.into_response());
    }

    let body: Vec<ItemResponse> = outcome
        .processed
        .into_iter()
        .map(ItemResponse::from)
        .collect();
    Ok(Json(body).into_response())
}
