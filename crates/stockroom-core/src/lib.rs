//! Stockroom Core - Domain types, validation, and the batch processor.
//!
//! This crate provides the core functionality for Stockroom, including:
//!
//! - **Domain models**: [`Item`], [`NewItem`]
//! - **Validation**: field constraints collected into [`ValidationErrors`]
//! - **Services**: [`BatchProcessor`] that marks every item as processed
//! - **Concurrency**: [`WorkerPool`], a bounded and drainable task pool
//! - **Traits**: [`ItemStore`] for dependency injection
//! - **Progress reporting**: [`ProcessReporter`] trait for decoupled logging
//!
//! # Architecture
//!
//! This crate is designed to be reusable by different frontends. Business
//! logic is decoupled from I/O concerns through traits:
//!
//! - [`ItemStore`] - abstracts persistence (PostgreSQL in `stockroom-db`,
//!   [`InMemoryItemStore`] here)
//!
//! # Example
//!
//! ```no_run
//! use stockroom_core::{
//!     BatchProcessor, InMemoryItemStore, NewItem, TracingProcessReporter, WorkerPool,
//!     WorkerPoolConfig,
//! };
//!
//! # async fn run() -> Result<(), stockroom_core::AppError> {
//! let store = InMemoryItemStore::with_items([NewItem::new("Widget", "NEW")]);
//! let pool = WorkerPool::new(WorkerPoolConfig::default().with_concurrency(4));
//!
//! let processor = BatchProcessor::new(store, pool.clone());
//! let outcome = processor
//!     .process_all_with_progress(&TracingProcessReporter)
//!     .await?;
//! assert!(outcome.failures.is_empty());
//!
//! pool.shutdown().await;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod memory;
pub mod models;
pub mod pool;
pub mod processor;
pub mod traits;
pub mod validation;

// Error handling
pub use error::AppError;

// Domain models
pub use models::{Item, ItemId, NewItem, PROCESSED_STATUS};

// Validation
pub use validation::{FieldViolation, ValidationErrors};

// Traits for dependency injection
pub use traits::ItemStore;

// In-memory store
pub use memory::InMemoryItemStore;

// Worker pool
pub use pool::{DrainOutcome, PoolError, TaskHandle, WorkerPool, WorkerPoolConfig};

// Batch processing and progress reporting
pub use processor::{
    BatchOutcome, BatchProcessor, FailureStage, ItemFailure, ProcessEvent, ProcessReporter,
    ProcessingOutcome, SilentProcessReporter, TracingProcessReporter,
};
