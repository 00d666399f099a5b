//! Router configuration and route composition.

use std::time::Duration;

use axum::http::{HeaderValue, Method};
use axum::{Router, routing::get};
use stockroom_core::traits::ItemStore;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::handlers::{health, items};
use crate::openapi::ApiDoc;
use crate::state::AppState;

/// Creates the main application router with all routes and middleware.
pub fn create_router<S: ItemStore>(state: AppState<S>, cors_origins: &str) -> Router {
    let api_routes = Router::new()
        .route("/health", get(health::health_check::<S>))
        .route(
            "/items",
            get(items::list_items::<S>).post(items::create_item::<S>),
        )
        .route("/items/process", get(items::process_items::<S>))
        .route(
            "/items/:id",
            get(items::get_item::<S>)
                .put(items::update_item::<S>)
                .delete(items::delete_item::<S>),
        );

    let cors_layer = build_cors_layer(cors_origins);

    Router::new()
        .nest("/api", api_routes)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Middleware layers (order matters: bottom layers run first)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
        .with_state(state)
}

/// Build CORS layer from configuration.
///
/// If `origins` is "*", allows any origin (for development).
/// Otherwise, parses comma-separated origins.
fn build_cors_layer(origins: &str) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::header::ACCEPT,
        ])
        .max_age(Duration::from_secs(3600));

    if origins == "*" {
        cors.allow_origin(tower_http::cors::Any)
    } else {
        let allowed: Vec<HeaderValue> = origins
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect();
        cors.allow_origin(allowed)
    }
}
