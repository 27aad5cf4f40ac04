//! Bounded, rate-limited worker pool
//!
//! The reusable fan-out primitive behind both pipeline stages: N independent
//! work items, at most C in flight, every request additionally gated by a
//! shared [`RateLimiter`]. Results come back index-aligned with the input so
//! callers that care about ordering can rely on slot positions; failed items
//! yield `None` in their slot rather than being omitted.

use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::sync::Semaphore;

use crate::fetch::limiter::RateLimiter;

/// Passive observer of pool progress
///
/// Implementations are notified as items complete. This is advisory operator
/// feedback only; the pool never consults an observer for control flow.
pub trait ProgressObserver: Send + Sync {
    /// A stage is about to run `total` items
    fn stage_started(&self, _stage: &str, _total: usize) {}

    /// One item finished (successfully or not)
    fn item_completed(&self) {}

    /// The stage joined all of its items
    fn stage_finished(&self) {}
}

/// Observer that ignores all events
pub struct NullObserver;

impl ProgressObserver for NullObserver {}

/// Observer exposing a monotonically increasing completed-count
#[derive(Default)]
pub struct CountingObserver {
    completed: AtomicUsize,
}

impl CountingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of items completed so far
    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::Relaxed)
    }
}

impl ProgressObserver for CountingObserver {
    fn item_completed(&self) {
        self.completed.fetch_add(1, Ordering::Relaxed);
    }
}

/// Worker pool executing N items with a concurrency ceiling and a shared
/// rate limit
pub struct BoundedPool {
    concurrency: usize,
    limiter: Arc<RateLimiter>,
}

impl BoundedPool {
    /// Creates a pool with the given ceiling and shared limiter
    pub fn new(concurrency: usize, limiter: Arc<RateLimiter>) -> Self {
        Self {
            concurrency: concurrency.max(1),
            limiter,
        }
    }

    /// Runs `worker` over every item, returning one result slot per input
    ///
    /// At most the configured ceiling of workers is in flight at once, and
    /// each worker additionally waits for a rate-limiter token before
    /// starting. The returned vector is index-aligned with `items`; a worker
    /// that returns `None` (or panics) leaves `None` in its slot. Individual
    /// failures never abort the batch.
    pub async fn run<I, T, F, Fut>(
        &self,
        stage: &str,
        items: Vec<I>,
        observer: Arc<dyn ProgressObserver>,
        worker: F,
    ) -> Vec<Option<T>>
    where
        I: Send + 'static,
        T: Send + 'static,
        F: Fn(I) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Option<T>> + Send + 'static,
    {
        let total = items.len();
        observer.stage_started(stage, total);

        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let worker = Arc::new(worker);

        let mut handles = Vec::with_capacity(total);
        for item in items {
            let semaphore = semaphore.clone();
            let limiter = self.limiter.clone();
            let worker = worker.clone();
            let observer = observer.clone();

            handles.push(tokio::spawn(async move {
                // Semaphore bounds how many are in flight; the limiter paces
                // how often a new one may start.
                let _permit = match semaphore.acquire_owned().await {
                    Ok(permit) => permit,
                    Err(_) => return None,
                };
                limiter.acquire().await;

                let result = worker(item).await;
                observer.item_completed();
                result
            }));
        }

        let mut results = Vec::with_capacity(total);
        for handle in handles {
            match handle.await {
                Ok(result) => results.push(result),
                Err(e) => {
                    tracing::error!("worker task failed: {}", e);
                    results.push(None);
                }
            }
        }

        observer.stage_finished();
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    fn pool(concurrency: usize) -> BoundedPool {
        // High rate so the limiter never dominates these tests
        BoundedPool::new(concurrency, Arc::new(RateLimiter::new(1000.0)))
    }

    #[tokio::test]
    async fn test_results_are_index_aligned() {
        let results = pool(4)
            .run(
                "test",
                vec![1u32, 2, 3, 4, 5],
                Arc::new(NullObserver),
                |n| async move { Some(n * 10) },
            )
            .await;

        assert_eq!(
            results,
            vec![Some(10), Some(20), Some(30), Some(40), Some(50)]
        );
    }

    #[tokio::test]
    async fn test_failed_items_leave_none_slots() {
        let results = pool(2)
            .run("test", vec![1u32, 2, 3], Arc::new(NullObserver), |n| {
                async move {
                    if n == 2 {
                        None
                    } else {
                        Some(n)
                    }
                }
            })
            .await;

        assert_eq!(results, vec![Some(1), None, Some(3)]);
    }

    #[tokio::test]
    async fn test_concurrency_never_exceeds_ceiling() {
        let in_flight = Arc::new(AtomicUsize::new(0));
        let max_seen = Arc::new(AtomicUsize::new(0));

        let in_flight_w = in_flight.clone();
        let max_seen_w = max_seen.clone();
        let results = pool(3)
            .run(
                "test",
                (0..20).collect::<Vec<u32>>(),
                Arc::new(NullObserver),
                move |n| {
                    let in_flight = in_flight_w.clone();
                    let max_seen = max_seen_w.clone();
                    async move {
                        let current = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                        max_seen.fetch_max(current, Ordering::SeqCst);
                        tokio::time::sleep(Duration::from_millis(10)).await;
                        in_flight.fetch_sub(1, Ordering::SeqCst);
                        Some(n)
                    }
                },
            )
            .await;

        assert_eq!(results.len(), 20);
        assert!(
            max_seen.load(Ordering::SeqCst) <= 3,
            "ceiling exceeded: {}",
            max_seen.load(Ordering::SeqCst)
        );
    }

    #[tokio::test]
    async fn test_observer_counts_all_completions() {
        let observer = Arc::new(CountingObserver::new());

        pool(4)
            .run(
                "test",
                (0..12).collect::<Vec<u32>>(),
                observer.clone(),
                |n| async move { if n % 3 == 0 { None } else { Some(n) } },
            )
            .await;

        // Failures count as completions too
        assert_eq!(observer.completed(), 12);
    }

    #[tokio::test]
    async fn test_empty_input() {
        let results: Vec<Option<u32>> = pool(4)
            .run("test", Vec::<u32>::new(), Arc::new(NullObserver), |n| {
                async move { Some(n) }
            })
            .await;

        assert!(results.is_empty());
    }
}
