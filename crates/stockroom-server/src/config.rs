use std::time::Duration;

use clap::Parser;
use stockroom_core::pool::{DEFAULT_CONCURRENCY, DEFAULT_QUEUE_CAPACITY};
use stockroom_core::{AppError, WorkerPoolConfig};

/// Server configuration parsed from command line arguments and environment variables
#[derive(Parser, Debug, Clone)]
#[command(name = "stockroom-server")]
#[command(author, version, about = "REST API server for Stockroom item management")]
pub struct ServerConfig {
    /// PostgreSQL database connection URL. Without it items are kept in memory.
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Maximum number of pooled database connections
    #[arg(long, env = "DB_MAX_CONNECTIONS", default_value_t = 10)]
    pub db_max_connections: u32,

    /// Server port to listen on
    #[arg(short, long, env = "PORT", default_value_t = 8080)]
    pub port: u16,

    /// Server host to bind to
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Number of items processed at once
    #[arg(long, env = "WORKER_CONCURRENCY", default_value_t = DEFAULT_CONCURRENCY)]
    pub worker_concurrency: usize,

    /// Number of items allowed to wait for a worker
    #[arg(long, env = "WORKER_QUEUE_CAPACITY", default_value_t = DEFAULT_QUEUE_CAPACITY)]
    pub worker_queue_capacity: usize,

    /// Seconds to wait for in-flight work on shutdown
    #[arg(long, env = "WORKER_SHUTDOWN_TIMEOUT_SECS", default_value_t = 30)]
    pub worker_shutdown_timeout_secs: u64,

    /// Allowed CORS origins, comma-separated, or "*" for any
    #[arg(long, env = "CORS_ORIGINS", default_value = "*")]
    pub cors_origins: String,
}

impl ServerConfig {
    /// Rejects values the server cannot run with.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.worker_concurrency == 0 {
            return Err(AppError::ConfigError(
                "WORKER_CONCURRENCY must be at least 1".to_string(),
            ));
        }
        if self.db_max_connections == 0 {
            return Err(AppError::ConfigError(
                "DB_MAX_CONNECTIONS must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn worker_pool_config(&self) -> WorkerPoolConfig {
        WorkerPoolConfig::default()
            .with_concurrency(self.worker_concurrency)
            .with_queue_capacity(self.worker_queue_capacity)
            .with_shutdown_timeout(Duration::from_secs(self.worker_shutdown_timeout_secs))
    }
}
