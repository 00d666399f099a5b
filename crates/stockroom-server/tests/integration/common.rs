//! Test utilities for driving the router in-process.

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use stockroom_core::traits::ItemStore;
use stockroom_core::{
    AppError, InMemoryItemStore, Item, ItemId, NewItem, WorkerPool, WorkerPoolConfig,
};
use stockroom_server::{AppState, create_router};

/// Builds a router over the given store with a small worker pool.
pub fn test_app<S: ItemStore>(store: S) -> Router {
    let workers = WorkerPool::new(WorkerPoolConfig::default().with_concurrency(4));
    create_router(AppState::new(store, workers), "*")
}

/// Store pre-populated with `count` valid items.
pub fn seeded_store(count: usize) -> InMemoryItemStore {
    InMemoryItemStore::with_items(
        (1..=count).map(|n| NewItem::new(format!("item-{}", n), "NEW")),
    )
}

/// Sends a request and returns the status and parsed JSON body
/// (`Value::Null` when the body is empty).
pub async fn send(
    app: Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    send_request(app, request).await
}

pub async fn send_request(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();

    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

// =============================================================================
// BrokenStore
// =============================================================================

/// Store whose every operation fails as if the database were down.
#[derive(Clone, Default)]
pub struct BrokenStore;

fn db_down() -> AppError {
    AppError::DatabaseError(sqlx::Error::PoolTimedOut)
}

impl ItemStore for BrokenStore {
    async fn find_all(&self) -> Result<Vec<Item>, AppError> {
        Err(db_down())
    }

    async fn find_by_id(&self, _id: ItemId) -> Result<Option<Item>, AppError> {
        Err(db_down())
    }

    async fn insert(&self, _item: &NewItem) -> Result<Item, AppError> {
        Err(db_down())
    }

    async fn save(&self, _item: &Item) -> Result<Item, AppError> {
        Err(db_down())
    }

    async fn delete_by_id(&self, _id: ItemId) -> Result<bool, AppError> {
        Err(db_down())
    }

    async fn find_all_ids(&self) -> Result<Vec<ItemId>, AppError> {
        Err(db_down())
    }

    async fn exists_by_id(&self, _id: ItemId) -> Result<bool, AppError> {
        Err(db_down())
    }

    async fn health_check(&self) -> Result<(), AppError> {
        Err(db_down())
    }
}
