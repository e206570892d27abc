//! Bounded-parallelism task pool.

use std::future::Future;
use std::sync::Arc;

use futures::stream::{FuturesUnordered, StreamExt};
use log::{debug, warn};
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Runs futures on the Tokio runtime with at most `workers` in flight.
///
/// A slot is taken before a task starts and released when it finishes,
/// panics or is cancelled. Results come back in completion order.
pub struct TaskPool<T> {
    semaphore: Arc<Semaphore>,
    cancellation: CancellationToken,
    tasks: FuturesUnordered<JoinHandle<Option<T>>>,
}

impl<T: Send + 'static> TaskPool<T> {
    /// Pool with `workers` slots (at least one).
    pub fn new(workers: usize) -> Self {
        Self::with_cancellation(workers, CancellationToken::new())
    }

    /// Pool whose tasks stop when `cancellation` fires.
    pub fn with_cancellation(workers: usize, cancellation: CancellationToken) -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(workers.max(1))),
            cancellation,
            tasks: FuturesUnordered::new(),
        }
    }

    /// Waits for a free slot, then spawns `future`.
    ///
    /// Returns `false` without spawning once the pool is cancelled.
    pub async fn put<F>(&mut self, future: F) -> bool
    where
        F: Future<Output = T> + Send + 'static,
    {
        let permit = tokio::select! {
            biased;
            _ = self.cancellation.cancelled() => return false,
            permit = Arc::clone(&self.semaphore).acquire_owned() => match permit {
                Ok(permit) => permit,
                Err(_) => {
                    warn!("Semaphore closed, task not started");
                    return false;
                }
            },
        };

        let cancellation = self.cancellation.clone();
        self.tasks.push(tokio::spawn(async move {
            let _permit = permit;
            tokio::select! {
                biased;
                _ = cancellation.cancelled() => None,
                value = future => Some(value),
            }
        }));
        true
    }

    /// Number of tasks spawned and not yet collected.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Whether no task is pending.
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Waits for every task. Panicked and cancelled tasks are logged and
    /// left out of the results.
    pub async fn join(mut self) -> Vec<T> {
        let mut results = Vec::with_capacity(self.tasks.len());
        while let Some(task_result) = self.tasks.next().await {
            match task_result {
                Ok(Some(value)) => results.push(value),
                Ok(None) => debug!("Task cancelled"),
                Err(join_error) => warn!("Task panicked: {:?}", join_error),
            }
        }
        results
    }
}
