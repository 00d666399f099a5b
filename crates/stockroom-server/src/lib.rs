//! Stockroom Server - REST API for Stockroom item management
//!
//! This crate provides an HTTP API over the Stockroom core:
//!
//! - **Items**: CRUD operations under `/api/items`
//! - **Processing**: `/api/items/process` runs the batch processor and
//!   waits for every item to finish
//! - **Health**: `/api/health` reports store and worker pool status
//!
//! # API Documentation
//!
//! When running the server, interactive API documentation is available
//! at `/swagger-ui`.

pub mod config;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod openapi;
pub mod router;
pub mod state;
pub mod store;

pub use config::ServerConfig;
pub use error::ApiError;
pub use router::create_router;
pub use state::AppState;
pub use store::ItemStoreEnum;
