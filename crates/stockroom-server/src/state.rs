use stockroom_core::traits::ItemStore;
use stockroom_core::{BatchProcessor, WorkerPool};

use crate::store::ItemStoreEnum;

/// Shared application state for all handlers.
///
/// This is cloned into every handler by Axum, so all fields must be cheap
/// to clone (they share their internals via `Arc`).
#[derive(Clone)]
pub struct AppState<S: ItemStore = ItemStoreEnum> {
    /// Item store for CRUD operations
    pub store: S,

    /// Batch processor backing the process endpoint
    pub processor: BatchProcessor<S>,

    /// Worker pool owned by the server and drained on shutdown
    pub workers: WorkerPool,
}

impl<S: ItemStore> AppState<S> {
    /// Creates the application state, wiring the processor to the pool.
    pub fn new(store: S, workers: WorkerPool) -> Self {
        Self {
            processor: BatchProcessor::new(store.clone(), workers.clone()),
            store,
            workers,
        }
    }
}
