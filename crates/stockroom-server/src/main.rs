//! Stockroom REST API Server
//!
//! This binary starts the Stockroom REST API server, exposing item CRUD
//! endpoints and the batch processing endpoint.

use std::net::SocketAddr;

use anyhow::Context;
use clap::Parser;
use dotenvy::dotenv;
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use stockroom_core::{DrainOutcome, InMemoryItemStore, WorkerPool};
use stockroom_db::ItemRepository;
use stockroom_server::{AppState, ItemStoreEnum, ServerConfig, create_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // Parse command line arguments
    let config = ServerConfig::parse();
    config.validate().context("Invalid configuration")?;

    let store = match &config.database_url {
        Some(url) => {
            info!("Connecting to database...");
            let pool = PgPoolOptions::new()
                .max_connections(config.db_max_connections)
                .connect(url)
                .await
                .context("Failed to connect to database")?;
            info!("Database connection established");
            ItemStoreEnum::Postgres(ItemRepository::new(pool))
        }
        None => {
            warn!("DATABASE_URL not set, items will be kept in memory and lost on exit");
            ItemStoreEnum::InMemory(InMemoryItemStore::new())
        }
    };

    // The pool outlives the HTTP server so in-flight batches can drain
    let pool_config = config.worker_pool_config();
    info!(
        concurrency = pool_config.concurrency,
        queue_capacity = pool_config.queue_capacity,
        "Starting worker pool"
    );
    let workers = WorkerPool::new(pool_config);

    info!(backend = store.backend_name(), "Item store ready");
    let app_state = AppState::new(store, workers.clone());

    // Build router
    let app = create_router(app_state, &config.cors_origins);

    // Bind to address
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .context("Invalid address")?;

    let listener = TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    info!("Starting Stockroom API server on http://{}", addr);
    info!("Swagger UI available at http://{}/swagger-ui", addr);

    // Start server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    match workers.shutdown().await {
        DrainOutcome::Drained => info!("Server shutdown complete"),
        DrainOutcome::TimedOut { remaining } => {
            warn!(remaining, "Server shutdown complete with unfinished work")
        }
    }
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown...");
}
