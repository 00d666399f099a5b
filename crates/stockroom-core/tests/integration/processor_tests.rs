//! Integration tests for BatchProcessor.
//!
//! These tests verify the batch semantics using fault-injecting stores.

use std::collections::BTreeSet;
use std::sync::atomic::Ordering;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use stockroom_core::{
    AppError, BatchProcessor, FailureStage, InMemoryItemStore, Item, ItemId, ItemStore,
    ProcessEvent, ProcessReporter, SilentProcessReporter, WorkerPool, WorkerPoolConfig,
};

use crate::integration::common::{FlakyItemStore, sample_items, test_pool};

fn ids_of(items: &[Item]) -> BTreeSet<ItemId> {
    items.iter().map(|item| item.id).collect()
}

/// Reporter that records event names for assertions.
#[derive(Default)]
struct RecordingReporter {
    events: Mutex<Vec<String>>,
}

impl ProcessReporter for RecordingReporter {
    fn report(&self, event: ProcessEvent<'_>) {
        let name = match event {
            ProcessEvent::Started { total } => format!("started:{}", total),
            ProcessEvent::ItemProcessed { id } => format!("processed:{}", id),
            ProcessEvent::ItemFailed { id, stage, .. } => format!("failed:{}:{}", id, stage),
            ProcessEvent::Completed { processed, failed } => {
                format!("completed:{}:{}", processed, failed)
            }
        };
        self.events.lock().unwrap().push(name);
    }
}

/// Test 1: N items with M induced failures yield exactly N - M successes.
///
/// Delays on a subset of items make units finish out of order; the batch
/// must still only resolve once every unit is terminal.
#[tokio::test]
async fn test_partial_failures_are_isolated() {
    // Arrange
    let store = FlakyItemStore::new(sample_items(10))
        .fail_load(3)
        .fail_save(7)
        .fail_load(9)
        .delay_load(1, Duration::from_millis(40))
        .delay_load(5, Duration::from_millis(20))
        .delay_load(9, Duration::from_millis(30));
    let processor = BatchProcessor::new(store.clone(), test_pool(4));

    // Act
    let processed = processor.process_all().await.unwrap();

    // Assert
    assert_eq!(processed.len(), 7, "10 items minus 3 induced failures");
    assert_eq!(
        store.terminal_units.load(Ordering::SeqCst),
        10,
        "All units must be terminal before the batch resolves"
    );
    assert_eq!(
        ids_of(&processed),
        BTreeSet::from([1, 2, 4, 5, 6, 8, 10])
    );
    assert!(processed.iter().all(Item::is_processed));
}

/// Test 2: A load failure on one item leaves the other processed.
#[tokio::test]
async fn test_load_failure_skips_save() {
    // Arrange
    let store = FlakyItemStore::new(sample_items(2)).fail_load(2);
    let processor = BatchProcessor::new(store.clone(), test_pool(2));

    // Act
    let processed = processor.process_all().await.unwrap();

    // Assert
    assert_eq!(ids_of(&processed), BTreeSet::from([1]));
    assert_eq!(store.save_count(), 1, "Save is never attempted after a failed load");
    assert_eq!(*store.save_calls.lock().unwrap(), vec![1]);
    assert!(store.item(1).unwrap().is_processed());
    assert_eq!(store.item(2).unwrap().status, "NEW");
}

/// Test 3: A save failure on one item leaves the other processed.
#[tokio::test]
async fn test_save_failure_is_excluded() {
    // Arrange
    let store = FlakyItemStore::new(sample_items(2)).fail_save(1);
    let processor = BatchProcessor::new(store.clone(), test_pool(2));

    // Act
    let processed = processor.process_all().await.unwrap();

    // Assert
    assert_eq!(ids_of(&processed), BTreeSet::from([2]));
    assert_eq!(store.save_count(), 2, "Both saves are attempted");
    assert_eq!(
        store.item(1).unwrap().status,
        "NEW",
        "Failed save must not leak the in-memory mutation"
    );
    assert!(store.item(2).unwrap().is_processed());
}

/// Test 4: An empty store resolves immediately without touching items.
#[tokio::test]
async fn test_empty_store_returns_empty() {
    // Arrange
    let store = FlakyItemStore::new(Vec::new());
    let pool = test_pool(2);
    let processor = BatchProcessor::new(store.clone(), pool.clone());

    // Act
    let processed = processor.process_all().await.unwrap();

    // Assert
    assert!(processed.is_empty());
    assert_eq!(store.load_count(), 0);
    assert_eq!(store.save_count(), 0);
    assert_eq!(pool.in_flight(), 0);
}

/// Test 5: Running the batch twice yields the same state and result set.
#[tokio::test]
async fn test_reprocessing_is_idempotent() {
    // Arrange
    let store = InMemoryItemStore::with_items(sample_items(5));
    let processor = BatchProcessor::new(store.clone(), test_pool(3));

    // Act
    let first = processor.process_all().await.unwrap();
    let state_after_first = store.find_all().await.unwrap();
    let second = processor.process_all().await.unwrap();
    let state_after_second = store.find_all().await.unwrap();

    // Assert
    assert_eq!(ids_of(&first), ids_of(&second));
    assert_eq!(state_after_first, state_after_second);
    assert!(state_after_second.iter().all(Item::is_processed));
}

/// Test 6: Pool size does not change which items succeed.
#[tokio::test]
async fn test_pool_size_does_not_change_results() {
    let mut results = Vec::new();

    for concurrency in [1, 16] {
        // Arrange
        let store = FlakyItemStore::new(sample_items(12))
            .fail_load(4)
            .fail_save(11);
        let processor = BatchProcessor::new(store, test_pool(concurrency));

        // Act
        let processed = processor.process_all().await.unwrap();
        results.push(ids_of(&processed));
    }

    // Assert
    assert_eq!(results[0], results[1]);
    assert_eq!(results[0].len(), 10);
}

/// Test 7: Failing to enumerate ids aborts the batch.
#[tokio::test]
async fn test_enumeration_failure_propagates() {
    // Arrange
    let store = FlakyItemStore::new(sample_items(3)).fail_enumeration();
    let processor = BatchProcessor::new(store.clone(), test_pool(2));

    // Act
    let result = processor.process_all().await;

    // Assert
    assert!(matches!(result, Err(AppError::Generic(_))));
    assert_eq!(store.load_count(), 0);
}

/// Test 8: The detailed outcome reports each failure with its stage.
#[tokio::test]
async fn test_outcome_reports_failure_stages() {
    // Arrange
    let store = FlakyItemStore::new(sample_items(3))
        .fail_load(1)
        .fail_save(2);
    let processor = BatchProcessor::new(store, test_pool(2));

    // Act
    let outcome = processor
        .process_all_with_progress(&SilentProcessReporter)
        .await
        .unwrap();

    // Assert
    let mut failures: Vec<_> = outcome
        .failures
        .iter()
        .map(|f| (f.id, f.stage))
        .collect();
    failures.sort();
    assert_eq!(
        failures,
        vec![(1, FailureStage::Load), (2, FailureStage::Save)]
    );
    assert_eq!(ids_of(&outcome.processed), BTreeSet::from([3]));
    assert_eq!(outcome.total(), 3);
}

/// Test 9: An item deleted mid-batch is a load failure, not an abort.
#[tokio::test]
async fn test_item_deleted_before_load() {
    // Arrange
    let store = FlakyItemStore::new(sample_items(2)).delay_load(2, Duration::from_millis(30));
    let processor = BatchProcessor::new(store.clone(), test_pool(2));

    let deleter = store.clone();
    let delete_task = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(5)).await;
        deleter.delete_by_id(2).await.unwrap();
    });

    // Act
    let outcome = processor
        .process_all_with_progress(&SilentProcessReporter)
        .await
        .unwrap();
    delete_task.await.unwrap();

    // Assert
    assert_eq!(ids_of(&outcome.processed), BTreeSet::from([1]));
    assert_eq!(outcome.failures.len(), 1);
    assert_eq!(outcome.failures[0].id, 2);
    assert_eq!(outcome.failures[0].stage, FailureStage::Load);
    assert!(outcome.failures[0].error.contains("not found"));
}

/// Test 10: Reporter receives start, per-item and completion events.
#[tokio::test]
async fn test_reporter_receives_events() {
    // Arrange
    let store = FlakyItemStore::new(sample_items(2)).fail_save(2);
    let processor = BatchProcessor::new(store, test_pool(1));
    let reporter = Arc::new(RecordingReporter::default());

    // Act
    processor
        .process_all_with_progress(reporter.as_ref())
        .await
        .unwrap();

    // Assert
    let events = reporter.events.lock().unwrap().clone();
    assert_eq!(events.first().map(String::as_str), Some("started:2"));
    assert_eq!(events.last().map(String::as_str), Some("completed:1:1"));
    assert!(events.contains(&"processed:1".to_string()));
    assert!(events.contains(&"failed:2:save".to_string()));
}

/// Test 11: A batch larger than the pool's capacity still processes every item.
#[tokio::test]
async fn test_batch_beyond_pool_capacity_processes_every_item() {
    // Arrange
    let store = FlakyItemStore::new(sample_items(12))
        .delay_load(1, Duration::from_millis(20))
        .delay_load(2, Duration::from_millis(20));
    let pool = WorkerPool::new(
        WorkerPoolConfig::default()
            .with_concurrency(1)
            .with_queue_capacity(2),
    );
    let processor = BatchProcessor::new(store.clone(), pool.clone());

    // Act
    let outcome = processor
        .process_all_with_progress(&SilentProcessReporter)
        .await
        .unwrap();

    // Assert
    assert_eq!(pool.config().capacity(), 3);
    assert_eq!(ids_of(&outcome.processed), (1..=12).collect::<BTreeSet<_>>());
    assert!(outcome.failures.is_empty());
    assert_eq!(store.load_count(), 12);
    assert_eq!(store.terminal_units.load(Ordering::SeqCst), 12);
}
