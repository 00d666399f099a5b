//! Bounded worker pool for units of work.
//!
//! The pool is an explicitly constructed resource: whoever creates it owns
//! its lifecycle and is expected to call [`WorkerPool::shutdown`] before the
//! process exits.
//!
//! # Admission
//!
//! ```text
//! submit ──► admitted? ──no──► PoolError::Saturated / PoolError::ShutDown
//!               │              (submit_wait waits here instead of Saturated)
//!              yes
//!               ▼
//!        wait for running slot (FIFO, at most `concurrency` at once)
//!               ▼
//!             run task ──► TaskHandle resolves
//! ```
//!
//! At most `concurrency + queue_capacity` tasks are admitted and unfinished at
//! any moment. [`WorkerPool::submit`] fails immediately past that bound;
//! [`WorkerPool::submit_wait`] instead waits until a slot frees up.
//!
//! # Shutdown
//!
//! [`WorkerPool::shutdown`] stops admitting new tasks and waits (up to the
//! configured timeout) for every admitted task, queued or running, to finish.
//! In-flight tasks are never aborted.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::task::{Context, Poll};
use std::time::Duration;

use thiserror::Error;
use tokio::sync::{OwnedSemaphorePermit, Semaphore, TryAcquireError};
use tokio::task::JoinHandle;
use tokio_util::task::TaskTracker;
use tracing::{info, warn};

/// Default number of tasks allowed to run at once.
pub const DEFAULT_CONCURRENCY: usize = 10;

/// Default number of tasks allowed to wait for a running slot.
pub const DEFAULT_QUEUE_CAPACITY: usize = 500;

/// Default time [`WorkerPool::shutdown`] waits for admitted tasks.
pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors raised by the worker pool.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PoolError {
    /// Every running and queued slot is taken.
    #[error("worker pool '{pool}' is saturated ({capacity} tasks already admitted)")]
    Saturated { pool: String, capacity: usize },

    /// The pool no longer accepts submissions.
    #[error("worker pool is shutting down")]
    ShutDown,

    /// The task panicked or was aborted by the runtime.
    #[error("task failed: {0}")]
    TaskFailed(String),
}

/// Sizing and shutdown policy for a [`WorkerPool`].
#[derive(Debug, Clone)]
pub struct WorkerPoolConfig {
    /// Pool name used in logs and errors.
    pub name: String,
    /// Maximum number of tasks running at once.
    pub concurrency: usize,
    /// Maximum number of admitted tasks waiting for a running slot.
    pub queue_capacity: usize,
    /// How long shutdown waits for admitted tasks to finish.
    pub shutdown_timeout: Duration,
}

impl Default for WorkerPoolConfig {
    fn default() -> Self {
        Self {
            name: "item-worker".to_string(),
            concurrency: DEFAULT_CONCURRENCY,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            shutdown_timeout: DEFAULT_SHUTDOWN_TIMEOUT,
        }
    }
}

impl WorkerPoolConfig {
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the running limit. Values below 1 are raised to 1.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }

    pub fn with_shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.shutdown_timeout = timeout;
        self
    }

    /// Total number of tasks that may be admitted and unfinished at once.
    pub fn capacity(&self) -> usize {
        self.concurrency + self.queue_capacity
    }
}

/// Result of [`WorkerPool::shutdown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrainOutcome {
    /// Every admitted task finished.
    Drained,
    /// The timeout elapsed with tasks still unfinished.
    TimedOut { remaining: usize },
}

struct PoolInner {
    config: WorkerPoolConfig,
    running: Arc<Semaphore>,
    admitted: Arc<Semaphore>,
    tracker: TaskTracker,
    shutting_down: AtomicBool,
}

/// Bounded, drainable pool of async tasks on the tokio runtime.
///
/// Cheap to clone; clones share the same slots and lifecycle.
#[derive(Clone)]
pub struct WorkerPool {
    inner: Arc<PoolInner>,
}

impl WorkerPool {
    /// Creates a pool. Must be called from within a tokio runtime before
    /// tasks are submitted.
    ///
    /// A `concurrency` below 1 is raised to 1.
    pub fn new(mut config: WorkerPoolConfig) -> Self {
        config.concurrency = config.concurrency.max(1);

        Self {
            inner: Arc::new(PoolInner {
                running: Arc::new(Semaphore::new(config.concurrency)),
                admitted: Arc::new(Semaphore::new(config.capacity())),
                tracker: TaskTracker::new(),
                shutting_down: AtomicBool::new(false),
                config,
            }),
        }
    }

    pub fn config(&self) -> &WorkerPoolConfig {
        &self.inner.config
    }

    /// Number of admitted tasks that have not finished yet.
    pub fn in_flight(&self) -> usize {
        self.inner.tracker.len()
    }

    pub fn is_shutting_down(&self) -> bool {
        self.inner.shutting_down.load(Ordering::SeqCst)
    }

    /// Admits a task, or fails immediately if the pool cannot take it.
    ///
    /// # Errors
    ///
    /// - [`PoolError::Saturated`] if `concurrency + queue_capacity` tasks are
    ///   already admitted and unfinished
    /// - [`PoolError::ShutDown`] once [`shutdown`](Self::shutdown) has begun
    pub fn submit<F, T>(&self, task: F) -> Result<TaskHandle<T>, PoolError>
    where
        F: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        let slot = match Arc::clone(&self.inner.admitted).try_acquire_owned() {
            Ok(slot) => slot,
            Err(TryAcquireError::NoPermits) => {
                return Err(PoolError::Saturated {
                    pool: self.inner.config.name.clone(),
                    capacity: self.inner.config.capacity(),
                });
            }
            Err(TryAcquireError::Closed) => return Err(PoolError::ShutDown),
        };

        self.spawn_admitted(slot, task)
    }

    /// Admits a task, waiting for a free slot if the pool is saturated.
    ///
    /// # Errors
    ///
    /// - [`PoolError::ShutDown`] if [`shutdown`](Self::shutdown) begins before
    ///   the task is admitted
    pub async fn submit_wait<F, T>(&self, task: F) -> Result<TaskHandle<T>, PoolError>
    where
        F: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        let slot = Arc::clone(&self.inner.admitted)
            .acquire_owned()
            .await
            .map_err(|_| PoolError::ShutDown)?;

        self.spawn_admitted(slot, task)
    }

    fn spawn_admitted<F, T>(
        &self,
        slot: OwnedSemaphorePermit,
        task: F,
    ) -> Result<TaskHandle<T>, PoolError>
    where
        F: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        // The token keeps the tracker non-empty until the task is spawned, so a
        // drain that starts after the closed check below cannot miss it.
        let _token = self.inner.tracker.token();
        if self.inner.admitted.is_closed() {
            return Err(PoolError::ShutDown);
        }

        let running = Arc::clone(&self.inner.running);
        let handle = self.inner.tracker.spawn(async move {
            let _slot = slot;
            let _permit = running
                .acquire_owned()
                .await
                .map_err(|_| PoolError::ShutDown)?;
            Ok(task.await)
        });

        Ok(TaskHandle { inner: handle })
    }

    /// Stops admitting tasks and waits for admitted ones to finish.
    ///
    /// Queued tasks still get to run. Calling this more than once is harmless;
    /// later calls wait on the same drain.
    pub async fn shutdown(&self) -> DrainOutcome {
        let name = &self.inner.config.name;
        if !self.inner.shutting_down.swap(true, Ordering::SeqCst) {
            info!(pool = %name, in_flight = self.in_flight(), "Draining worker pool");
        }

        self.inner.admitted.close();
        self.inner.tracker.close();

        let timeout = self.inner.config.shutdown_timeout;
        match tokio::time::timeout(timeout, self.inner.tracker.wait()).await {
            Ok(()) => {
                info!(pool = %name, "Worker pool drained");
                DrainOutcome::Drained
            }
            Err(_) => {
                let remaining = self.in_flight();
                warn!(
                    pool = %name,
                    remaining,
                    timeout_secs = timeout.as_secs(),
                    "Worker pool drain timed out"
                );
                DrainOutcome::TimedOut { remaining }
            }
        }
    }
}

/// Handle to a task admitted by a [`WorkerPool`].
///
/// Resolves to the task's output, or [`PoolError::TaskFailed`] if it panicked.
/// Dropping the handle does not cancel the task.
#[derive(Debug)]
pub struct TaskHandle<T> {
    inner: JoinHandle<Result<T, PoolError>>,
}

impl<T> Future for TaskHandle<T> {
    type Output = Result<T, PoolError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.inner).poll(cx) {
            Poll::Ready(Ok(result)) => Poll::Ready(result),
            Poll::Ready(Err(join_err)) => {
                Poll::Ready(Err(PoolError::TaskFailed(join_err.to_string())))
            }
            Poll::Pending => Poll::Pending,
        }
    }
}
