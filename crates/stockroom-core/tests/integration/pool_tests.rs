//! Integration tests for WorkerPool lifecycle alongside the processor.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use stockroom_core::{
    AppError, BatchProcessor, DrainOutcome, PoolError, WorkerPool, WorkerPoolConfig,
};

use crate::integration::common::{FlakyItemStore, sample_items, test_pool};

/// Test 1: Shutdown waits for a batch that is already running.
#[tokio::test]
async fn test_shutdown_drains_running_batch() {
    // Arrange
    let store = FlakyItemStore::new(sample_items(4))
        .delay_load(1, Duration::from_millis(30))
        .delay_load(4, Duration::from_millis(30));
    let pool = test_pool(2);
    let processor = BatchProcessor::new(store.clone(), pool.clone());

    let batch = tokio::spawn(async move { processor.process_all().await });
    // Let the batch submit its units.
    tokio::time::sleep(Duration::from_millis(5)).await;

    // Act
    let drain = pool.shutdown().await;

    // Assert
    assert_eq!(drain, DrainOutcome::Drained);
    assert_eq!(store.terminal_units.load(Ordering::SeqCst), 4);
    let processed = batch.await.unwrap().unwrap();
    assert_eq!(processed.len(), 4);
}

/// Test 2: A drained pool fails every later batch before any unit runs.
#[tokio::test]
async fn test_batch_after_shutdown_fails() {
    // Arrange
    let store = FlakyItemStore::new(sample_items(3));
    let pool = test_pool(2);
    pool.shutdown().await;
    let processor = BatchProcessor::new(store.clone(), pool);

    // Act
    let result = processor.process_all().await;

    // Assert
    assert!(matches!(
        result,
        Err(AppError::WorkerPool(PoolError::ShutDown))
    ));
    assert_eq!(store.load_count(), 0);
}

/// Test 3: Shutdown during admission fails the batch but still finishes
/// the units that were already admitted.
#[tokio::test]
async fn test_shutdown_while_batch_waits_for_admission() {
    // Arrange
    let store = FlakyItemStore::new(sample_items(3)).delay_load(1, Duration::from_millis(30));
    let pool = WorkerPool::new(
        WorkerPoolConfig::default()
            .with_concurrency(1)
            .with_queue_capacity(0),
    );
    let processor = BatchProcessor::new(store.clone(), pool.clone());

    let batch = tokio::spawn(async move { processor.process_all().await });
    // Let the first unit be admitted and the second wait for a slot.
    tokio::time::sleep(Duration::from_millis(5)).await;

    // Act
    let drain = pool.shutdown().await;

    // Assert
    assert_eq!(drain, DrainOutcome::Drained);
    let result = batch.await.unwrap();
    assert!(matches!(
        result,
        Err(AppError::WorkerPool(PoolError::ShutDown))
    ));
    assert_eq!(store.terminal_units.load(Ordering::SeqCst), 1);
    assert!(store.item(1).unwrap().is_processed());
    assert_eq!(store.item(2).unwrap().status, "NEW");
}

/// Test 4: Concurrent submitters never push admissions past capacity.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_capacity_holds_under_concurrent_submitters() {
    // Arrange
    let pool = WorkerPool::new(
        WorkerPoolConfig::default()
            .with_concurrency(2)
            .with_queue_capacity(3),
    );
    let accepted = Arc::new(AtomicUsize::new(0));
    let rejected = Arc::new(AtomicUsize::new(0));
    let gate = Arc::new(tokio::sync::Notify::new());

    // Act
    let submitters: Vec<_> = (0..4)
        .map(|_| {
            let pool = pool.clone();
            let accepted = Arc::clone(&accepted);
            let rejected = Arc::clone(&rejected);
            let gate = Arc::clone(&gate);
            tokio::spawn(async move {
                for _ in 0..5 {
                    let gate = Arc::clone(&gate);
                    match pool.submit(async move { gate.notified().await }) {
                        Ok(_) => accepted.fetch_add(1, Ordering::SeqCst),
                        Err(PoolError::Saturated { .. }) => {
                            rejected.fetch_add(1, Ordering::SeqCst)
                        }
                        Err(other) => panic!("unexpected pool error: {other}"),
                    };
                }
            })
        })
        .collect();
    for submitter in submitters {
        submitter.await.unwrap();
    }

    // Assert
    assert_eq!(accepted.load(Ordering::SeqCst), 5);
    assert_eq!(rejected.load(Ordering::SeqCst), 15);
    assert_eq!(pool.in_flight(), 5);

    // Release the blocked tasks so the pool drains.
    while pool.in_flight() > 0 {
        gate.notify_waiters();
        tokio::task::yield_now().await;
    }
    assert_eq!(pool.shutdown().await, DrainOutcome::Drained);
}

/// Test 5: A task admitted while shutdown begins is either refused or
/// drained, never left running after the drain reports success.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_submission_racing_shutdown_is_drained() {
    for _ in 0..200 {
        // Arrange
        let pool = WorkerPool::new(
            WorkerPoolConfig::default()
                .with_concurrency(2)
                .with_queue_capacity(2),
        );
        let finished = Arc::new(AtomicBool::new(false));
        let submitter = {
            let pool = pool.clone();
            let finished = Arc::clone(&finished);
            tokio::spawn(async move {
                pool.submit(async move {
                    tokio::task::yield_now().await;
                    finished.store(true, Ordering::SeqCst);
                })
                .is_ok()
            })
        };

        // Act
        let drain = pool.shutdown().await;
        let admitted = submitter.await.unwrap();

        // Assert
        assert_eq!(drain, DrainOutcome::Drained);
        if admitted {
            assert!(
                finished.load(Ordering::SeqCst),
                "Admitted task must finish before the drain completes"
            );
        }
    }
}
