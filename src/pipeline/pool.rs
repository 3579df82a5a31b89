//! Bounded worker pool
//!
//! A job is spawned onto the tokio runtime only once it holds a semaphore
//! permit, so at most `width` of them run at once. Results come back in
//! completion order, each tagged with the key it was submitted under.

use futures::FutureExt;
use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Why a pooled job produced no value
#[derive(Debug, Error)]
pub enum TaskFailure {
    #[error("task panicked: {0}")]
    Panicked(String),
}

/// A fixed-width pool of workers
#[derive(Debug, Clone)]
pub struct WorkerPool {
    name: &'static str,
    width: usize,
    permits: Arc<Semaphore>,
}

impl WorkerPool {
    /// Creates a pool running at most `width` jobs at once (minimum 1)
    pub fn new(name: &'static str, width: usize) -> Self {
        let width = width.max(1);
        Self {
            name,
            width,
            permits: Arc::new(Semaphore::new(width)),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Runs `job` once per item and waits for all of them
    ///
    /// A job that panics yields `Err(TaskFailure::Panicked)` for its own key;
    /// its siblings are unaffected.
    pub async fn run_all<K, T, I, F, Fut>(&self, items: I, job: F) -> Vec<(K, Result<T, TaskFailure>)>
    where
        I: IntoIterator<Item = K>,
        K: Clone + Send + 'static,
        T: Send + 'static,
        F: Fn(K) -> Fut,
        Fut: Future<Output = T> + Send + 'static,
    {
        let mut tasks = JoinSet::new();

        for item in items {
            let permit = match Arc::clone(&self.permits).acquire_owned().await {
                Ok(permit) => permit,
                Err(e) => {
                    tracing::error!("{} pool: no more permits: {}", self.name, e);
                    break;
                }
            };
            let work = job(item.clone());

            tasks.spawn(async move {
                let _permit = permit;

                let outcome = AssertUnwindSafe(work)
                    .catch_unwind()
                    .await
                    .map_err(|panic| TaskFailure::Panicked(panic_message(panic)));

                (item, outcome)
            });
        }

        let mut results = Vec::with_capacity(tasks.len());
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(result) => results.push(result),
                // Only reachable if the runtime cancels the task
                Err(e) => tracing::error!("{} pool: task did not complete: {}", self.name, e),
            }
        }

        results
    }
}

fn panic_message(panic: Box<dyn Any + Send>) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[test]
    fn test_width_is_at_least_one() {
        assert_eq!(WorkerPool::new("test", 0).width(), 1);
        assert_eq!(WorkerPool::new("test", 5).width(), 5);
    }

    #[tokio::test]
    async fn test_runs_every_item() {
        let pool = WorkerPool::new("test", 3);
        let mut results = pool.run_all(1..=10u32, |n| async move { n * 2 }).await;

        results.sort_by_key(|(key, _)| *key);
        assert_eq!(results.len(), 10);
        for (key, value) in results {
            assert_eq!(value.unwrap(), key * 2);
        }
    }

    #[tokio::test]
    async fn test_empty_input() {
        let pool = WorkerPool::new("test", 3);
        let results = pool.run_all(Vec::<u32>::new(), |n| async move { n }).await;
        assert!(results.is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrency_is_bounded() {
        let pool = WorkerPool::new("test", 2);
        let running = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let results = pool
            .run_all(0..8, |_| {
                let running = Arc::clone(&running);
                let peak = Arc::clone(&peak);
                async move {
                    let now = running.fetch_add(1, Ordering::SeqCst) + 1;
                    peak.fetch_max(now, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(20)).await;
                    running.fetch_sub(1, Ordering::SeqCst);
                }
            })
            .await;

        assert_eq!(results.len(), 8);
        assert!(peak.load(Ordering::SeqCst) <= 2);
    }

    #[tokio::test]
    async fn test_width_one_serializes() {
        let pool = WorkerPool::new("test", 1);
        let running = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        pool.run_all(0..4, |_| {
            let running = Arc::clone(&running);
            let peak = Arc::clone(&peak);
            async move {
                let now = running.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(5)).await;
                running.fetch_sub(1, Ordering::SeqCst);
            }
        })
        .await;

        assert_eq!(peak.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_panic_is_contained() {
        let pool = WorkerPool::new("test", 2);
        let results = pool
            .run_all(vec!["ok", "boom", "fine"], |name| async move {
                if name == "boom" {
                    panic!("exploded on {}", name);
                }
                name.len()
            })
            .await;

        assert_eq!(results.len(), 3);
        for (name, result) in results {
            match name {
                "boom" => match result {
                    Err(TaskFailure::Panicked(message)) => assert!(message.contains("exploded")),
                    other => panic!("unexpected result: {:?}", other),
                },
                _ => assert_eq!(result.unwrap(), name.len()),
            }
        }
    }
}
