//! Batch processor that marks every stored item as processed.
//!
//! # Architecture
//!
//! ```text
//! find_all_ids ──► one unit per id ──► WorkerPool ──► join_all ──► outcome
//!                   load → mark PROCESSED → save
//! ```
//!
//! Each unit produces its own [`ProcessingOutcome`]; nothing is shared
//! between units. The batch resolves once every unit has reached a terminal
//! state. A failing unit never aborts its siblings. Units are admitted as
//! pool slots free up, so a batch larger than the pool still runs every
//! item. Only failing to enumerate the ids, or the pool shutting down before
//! every unit is admitted, fails the batch.
//!
//! # Example
//!
//! ```no_run
//! use stockroom_core::{BatchProcessor, InMemoryItemStore, WorkerPool, WorkerPoolConfig};
//!
//! # async fn run() -> Result<(), stockroom_core::AppError> {
//! let pool = WorkerPool::new(WorkerPoolConfig::default());
//! let processor = BatchProcessor::new(InMemoryItemStore::new(), pool.clone());
//!
//! let processed = processor.process_all().await?;
//! println!("processed {} items", processed.len());
//!
//! pool.shutdown().await;
//! # Ok(())
//! # }
//! ```

use std::fmt;

use futures::future::join_all;
use tracing::{debug, error, info, warn};

use crate::error::AppError;
use crate::models::{Item, ItemId};
use crate::pool::WorkerPool;
use crate::traits::ItemStore;

// =============================================================================
// Outcomes
// =============================================================================

/// Step of a unit of work that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FailureStage {
    /// The item was absent or could not be loaded.
    Load,
    /// The updated item could not be persisted.
    Save,
    /// The unit's task died before producing an outcome.
    Aborted,
}

impl FailureStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureStage::Load => "load",
            FailureStage::Save => "save",
            FailureStage::Aborted => "aborted",
        }
    }
}

impl fmt::Display for FailureStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A unit of work that did not complete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemFailure {
    pub id: ItemId,
    pub stage: FailureStage,
    pub error: String,
}

impl ItemFailure {
    fn new(id: ItemId, stage: FailureStage, error: impl fmt::Display) -> Self {
        Self {
            id,
            stage,
            error: error.to_string(),
        }
    }
}

/// Terminal state of one unit of work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessingOutcome {
    Success(Item),
    Failure(ItemFailure),
}

/// Aggregated result of a batch run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchOutcome {
    /// Items that reached the saved state, in no particular order.
    pub processed: Vec<Item>,
    pub failures: Vec<ItemFailure>,
}

impl BatchOutcome {
    /// Number of units that ran, successful or not.
    pub fn total(&self) -> usize {
        self.processed.len() + self.failures.len()
    }

    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}

impl FromIterator<ProcessingOutcome> for BatchOutcome {
    fn from_iter<I: IntoIterator<Item = ProcessingOutcome>>(iter: I) -> Self {
        let mut outcome = BatchOutcome::default();
        for unit in iter {
            match unit {
                ProcessingOutcome::Success(item) => outcome.processed.push(item),
                ProcessingOutcome::Failure(failure) => outcome.failures.push(failure),
            }
        }
        outcome
    }
}

// =============================================================================
// Process Events
// =============================================================================

/// Events emitted during a batch run.
#[derive(Debug, Clone)]
pub enum ProcessEvent<'a> {
    /// Identifiers were enumerated; `total` units will run.
    Started { total: usize },
    /// An item was marked processed and saved.
    ItemProcessed { id: ItemId },
    /// A unit of work failed.
    ItemFailed {
        id: ItemId,
        stage: FailureStage,
        error: &'a str,
    },
    /// Every unit reached a terminal state.
    Completed { processed: usize, failed: usize },
}

/// Trait for reporting batch progress.
pub trait ProcessReporter: Send + Sync {
    /// Called when a batch event occurs.
    ///
    /// The default implementation does nothing (silent mode).
    fn report(&self, event: ProcessEvent<'_>) {
        let _ = event;
    }
}

/// Reporter that ignores all events.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentProcessReporter;

impl ProcessReporter for SilentProcessReporter {}

/// Tracing-based reporter for server logging.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingProcessReporter;

impl ProcessReporter for TracingProcessReporter {
    fn report(&self, event: ProcessEvent<'_>) {
        match event {
            ProcessEvent::Started { total } => {
                info!(total, "Batch processing started");
            }
            ProcessEvent::ItemProcessed { id } => {
                debug!(item_id = id, "Item processed");
            }
            ProcessEvent::ItemFailed { id, stage, error } => {
                warn!(item_id = id, %stage, error, "Item processing failed");
            }
            ProcessEvent::Completed { processed, failed } => {
                info!(processed, failed, "Batch processing completed");
            }
        }
    }
}

// =============================================================================
// Batch Processor
// =============================================================================

/// Runs one unit of work per stored item on a bounded [`WorkerPool`].
///
/// The pool is injected so that its owner controls sizing and shutdown.
#[derive(Clone)]
pub struct BatchProcessor<S: ItemStore> {
    store: S,
    pool: WorkerPool,
}

impl<S: ItemStore> BatchProcessor<S> {
    pub fn new(store: S, pool: WorkerPool) -> Self {
        Self { store, pool }
    }

    pub fn pool(&self) -> &WorkerPool {
        &self.pool
    }

    /// Processes every stored item and returns the ones that were saved.
    ///
    /// Per-item failures are logged and left out of the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the item ids could not be enumerated, or if the
    /// worker pool shut down before every unit was admitted.
    pub async fn process_all(&self) -> Result<Vec<Item>, AppError> {
        let outcome = self
            .process_all_with_progress(&SilentProcessReporter)
            .await?;
        Ok(outcome.processed)
    }

    /// Like [`process_all`](Self::process_all), but reports progress and
    /// returns the failures as well.
    pub async fn process_all_with_progress<R: ProcessReporter>(
        &self,
        reporter: &R,
    ) -> Result<BatchOutcome, AppError> {
        let ids = self.store.find_all_ids().await?;
        reporter.report(ProcessEvent::Started { total: ids.len() });

        if ids.is_empty() {
            reporter.report(ProcessEvent::Completed {
                processed: 0,
                failed: 0,
            });
            return Ok(BatchOutcome::default());
        }

        // Admitted units start running while later ones wait for a slot.
        let total = ids.len();
        let mut handles = Vec::with_capacity(total);
        let mut refused = None;
        for id in ids {
            match self
                .pool
                .submit_wait(process_item(self.store.clone(), id))
                .await
            {
                Ok(handle) => handles.push((id, handle)),
                Err(e) => {
                    refused = Some(e);
                    break;
                }
            }
        }

        let outcomes = join_all(handles.into_iter().map(|(id, handle)| async move {
            match handle.await {
                Ok(outcome) => outcome,
                Err(e) => {
                    ProcessingOutcome::Failure(ItemFailure::new(id, FailureStage::Aborted, e))
                }
            }
        }))
        .await;

        if let Some(e) = refused {
            error!(
                error = %e,
                admitted = outcomes.len(),
                total,
                "Worker pool refused batch"
            );
            return Err(e.into());
        }

        for outcome in &outcomes {
            match outcome {
                ProcessingOutcome::Success(item) => {
                    reporter.report(ProcessEvent::ItemProcessed { id: item.id });
                }
                ProcessingOutcome::Failure(failure) => {
                    reporter.report(ProcessEvent::ItemFailed {
                        id: failure.id,
                        stage: failure.stage,
                        error: &failure.error,
                    });
                }
            }
        }

        let batch: BatchOutcome = outcomes.into_iter().collect();
        reporter.report(ProcessEvent::Completed {
            processed: batch.processed.len(),
            failed: batch.failures.len(),
        });

        Ok(batch)
    }
}

/// Load, mark and save a single item.
async fn process_item<S: ItemStore>(store: S, id: ItemId) -> ProcessingOutcome {
    let mut item = match store.find_by_id(id).await {
        Ok(Some(item)) => item,
        Ok(None) => {
            return ProcessingOutcome::Failure(ItemFailure::new(
                id,
                FailureStage::Load,
                AppError::ItemNotFound(id),
            ));
        }
        Err(e) => {
            return ProcessingOutcome::Failure(ItemFailure::new(id, FailureStage::Load, e));
        }
    };

    item.mark_processed();

    match store.save(&item).await {
        Ok(saved) => ProcessingOutcome::Success(saved),
        Err(e) => ProcessingOutcome::Failure(ItemFailure::new(id, FailureStage::Save, e)),
    }
}
