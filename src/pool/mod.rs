//! Bounded-concurrency task pool.
//!
//! Runs a worker over a sequence of items with at most `limit` tasks in
//! flight, returning outcomes in input order once every task settles. Tasks
//! are launched eagerly: each one is spawned the moment its item is reached,
//! and admission of the next item is gated only once the in-flight set has
//! filled.
//!
//! Task identity is singular. Each completion is observed twice — once to
//! fill the task's slot in the result sequence and once to vacate the
//! in-flight set — but the two observers share one completion signal; the
//! worker runs exactly once per item.

use std::future::Future;

use anyhow::Result;
use futures::stream::FuturesUnordered;
use futures::{FutureExt, StreamExt};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::error_handling::FetchError;

/// Runs `worker` over `items` with at most `limit` tasks in flight and
/// returns per-item outcomes in input order.
///
/// This is the partial-success variant: every task runs to completion
/// regardless of sibling failures, and each slot holds that task's own
/// outcome. A panicking task yields [`FetchError::TaskPanic`] at its slot
/// without affecting the others.
///
/// If `limit >= items.len()` every task is launched immediately with no
/// gating. An empty `items` resolves to an empty vector without invoking the
/// worker.
///
/// Arguments beyond the item itself are closure captures:
///
/// ```no_run
/// # async fn example(client: reqwest::Client, urls: Vec<String>) -> anyhow::Result<()> {
/// let outcomes = fetch_pool::run_pool_settled(8, urls, |url| {
///     let client = client.clone();
///     async move { fetch_pool::fetch_text(&client, &url).await }
/// })
/// .await?;
/// # Ok(())
/// # }
/// ```
///
/// # Errors
///
/// Returns [`FetchError::Usage`] immediately if `limit` is zero; task
/// failures are reported per slot, never as a top-level error.
pub async fn run_pool_settled<I, It, F, Fut, T>(
    limit: usize,
    items: I,
    mut worker: F,
) -> Result<Vec<Result<T>>>
where
    I: IntoIterator<Item = It>,
    F: FnMut(It) -> Fut,
    Fut: Future<Output = Result<T>> + Send + 'static,
    T: Send + 'static,
{
    if limit == 0 {
        return Err(FetchError::Usage("concurrency limit must be at least 1".into()).into());
    }

    let items: Vec<It> = items.into_iter().collect();
    let total = items.len();

    let mut all: Vec<JoinHandle<Result<T>>> = Vec::with_capacity(total);
    let mut in_flight: FuturesUnordered<oneshot::Receiver<()>> = FuturesUnordered::new();

    for item in items {
        let task = worker(item);
        let (done_tx, done_rx) = oneshot::channel::<()>();
        all.push(tokio::spawn(async move {
            let outcome = task.await;
            // Signals terminal state to the in-flight set. If the task
            // panicked the sender is dropped instead, which vacates the slot
            // just the same.
            let _ = done_tx.send(());
            outcome
        }));

        if limit >= total {
            // No backpressure needed; the tracking receiver is simply dropped.
            continue;
        }
        in_flight.push(done_rx);
        if in_flight.len() < limit {
            continue;
        }
        // Wait for any one in-flight task to settle before admitting the
        // next item.
        in_flight.next().await;
        // Clear trackers that settled while we were suspended so the set
        // size reflects tasks that are actually still running.
        while let Some(Some(_)) = in_flight.next().now_or_never() {}
    }

    let mut outcomes = Vec::with_capacity(total);
    for handle in all {
        match handle.await {
            Ok(outcome) => outcomes.push(outcome),
            Err(join_error) => {
                log::warn!("pooled task panicked: {join_error}");
                outcomes.push(Err(FetchError::TaskPanic(join_error.to_string()).into()));
            }
        }
    }
    Ok(outcomes)
}

/// Runs `worker` over `items` with at most `limit` tasks in flight and
/// returns results in input order.
///
/// This is the all-or-nothing aggregation: the pool always waits for every
/// task to settle, then returns either all results or the first failure in
/// input order. Sibling tasks are never cancelled by a failure; they run to
/// completion and their results are discarded. Use [`run_pool_settled`] to
/// observe per-item outcomes.
///
/// # Errors
///
/// Returns [`FetchError::Usage`] if `limit` is zero, or the first failed
/// task's reason if any task failed.
pub async fn run_pool<I, It, F, Fut, T>(limit: usize, items: I, worker: F) -> Result<Vec<T>>
where
    I: IntoIterator<Item = It>,
    F: FnMut(It) -> Fut,
    Fut: Future<Output = Result<T>> + Send + 'static,
    T: Send + 'static,
{
    let outcomes = run_pool_settled(limit, items, worker).await?;
    outcomes.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::Barrier;

    #[tokio::test]
    async fn test_results_preserve_input_order() {
        // B finishes first, A last; slots still match input order.
        let delays = vec![("a", 100u64), ("b", 1), ("c", 50)];
        let results = run_pool(3, delays, |(name, ms)| async move {
            tokio::time::sleep(Duration::from_millis(ms)).await;
            Ok(name)
        })
        .await
        .unwrap();

        assert_eq!(results, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_results_preserve_order_under_gating() {
        let delays: Vec<(usize, u64)> =
            vec![(0, 60), (1, 5), (2, 40), (3, 10), (4, 25), (5, 1)];
        let results = run_pool(2, delays, |(index, ms)| async move {
            tokio::time::sleep(Duration::from_millis(ms)).await;
            Ok(index)
        })
        .await
        .unwrap();

        assert_eq!(results, vec![0, 1, 2, 3, 4, 5]);
    }

    #[tokio::test]
    async fn test_in_flight_never_exceeds_limit() {
        let limit = 3;
        let current = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let results = run_pool(limit, 0..20, {
            let current = Arc::clone(&current);
            let peak = Arc::clone(&peak);
            move |n: i32| {
                let current = Arc::clone(&current);
                let peak = Arc::clone(&peak);
                async move {
                    let running = current.fetch_add(1, Ordering::SeqCst) + 1;
                    peak.fetch_max(running, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(10)).await;
                    current.fetch_sub(1, Ordering::SeqCst);
                    Ok(n)
                }
            }
        })
        .await
        .unwrap();

        assert_eq!(results.len(), 20);
        assert!(
            peak.load(Ordering::SeqCst) <= limit,
            "observed {} tasks in flight with limit {limit}",
            peak.load(Ordering::SeqCst)
        );
    }

    #[tokio::test]
    async fn test_limit_at_least_items_launches_everything_at_once() {
        // All three workers rendezvous on one barrier; this only completes
        // if every task was launched without waiting on any completion.
        let barrier = Arc::new(Barrier::new(4));
        let pool = run_pool(10, 0..3, {
            let barrier = Arc::clone(&barrier);
            move |n: i32| {
                let barrier = Arc::clone(&barrier);
                async move {
                    barrier.wait().await;
                    Ok(n)
                }
            }
        });

        let (results, _) = tokio::join!(pool, barrier.wait());
        assert_eq!(results.unwrap(), vec![0, 1, 2]);
    }

    #[tokio::test]
    async fn test_empty_items_resolves_immediately() {
        let invoked = AtomicUsize::new(0);
        let results = run_pool(4, Vec::<u32>::new(), |n| {
            invoked.fetch_add(1, Ordering::SeqCst);
            async move { Ok(n) }
        })
        .await
        .unwrap();

        assert!(results.is_empty());
        assert_eq!(invoked.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_zero_limit_is_a_usage_error() {
        let invoked = AtomicUsize::new(0);
        let result = run_pool(0, vec![1, 2], |n: i32| {
            invoked.fetch_add(1, Ordering::SeqCst);
            async move { Ok(n) }
        })
        .await;

        let err = result.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<FetchError>(),
            Some(FetchError::Usage(_))
        ));
        assert_eq!(invoked.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_failure_does_not_affect_siblings() {
        let completed = Arc::new(AtomicUsize::new(0));
        let outcomes = run_pool_settled(2, 0..5, {
            let completed = Arc::clone(&completed);
            move |n: i32| {
                let completed = Arc::clone(&completed);
                async move {
                    tokio::time::sleep(Duration::from_millis(5)).await;
                    if n == 2 {
                        return Err(anyhow!("task {n} failed"));
                    }
                    completed.fetch_add(1, Ordering::SeqCst);
                    Ok(n)
                }
            }
        })
        .await
        .unwrap();

        // Every sibling still ran to completion.
        assert_eq!(completed.load(Ordering::SeqCst), 4);
        assert_eq!(outcomes.len(), 5);
        assert!(outcomes[2].is_err());
        for (index, outcome) in outcomes.iter().enumerate() {
            if index != 2 {
                assert_eq!(*outcome.as_ref().unwrap(), index as i32);
            }
        }
    }

    #[tokio::test]
    async fn test_aggregate_surfaces_first_failure_after_all_settle() {
        let completed = Arc::new(AtomicUsize::new(0));
        let result = run_pool(3, 0..6, {
            let completed = Arc::clone(&completed);
            move |n: i32| {
                let completed = Arc::clone(&completed);
                async move {
                    tokio::time::sleep(Duration::from_millis(5)).await;
                    completed.fetch_add(1, Ordering::SeqCst);
                    if n == 1 || n == 4 {
                        Err(anyhow!("task {n} failed"))
                    } else {
                        Ok(n)
                    }
                }
            }
        })
        .await;

        // Collect-all policy: everything settled before the failure surfaced,
        // and the failure is the first one in input order.
        assert_eq!(completed.load(Ordering::SeqCst), 6);
        assert_eq!(result.unwrap_err().to_string(), "task 1 failed");
    }

    #[tokio::test]
    async fn test_panicking_task_yields_failure_at_its_slot() {
        let outcomes = run_pool_settled(2, 0..4, |n: i32| async move {
            if n == 1 {
                panic!("boom");
            }
            Ok(n)
        })
        .await
        .unwrap();

        assert_eq!(outcomes.len(), 4);
        let err = outcomes[1].as_ref().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<FetchError>(),
            Some(FetchError::TaskPanic(_))
        ));
        assert_eq!(*outcomes[0].as_ref().unwrap(), 0);
        assert_eq!(*outcomes[2].as_ref().unwrap(), 2);
        assert_eq!(*outcomes[3].as_ref().unwrap(), 3);
    }

    #[tokio::test]
    async fn test_worker_invoked_once_per_item() {
        let invocations = Arc::new(AtomicUsize::new(0));
        let results = run_pool(2, 0..10, {
            let invocations = Arc::clone(&invocations);
            move |n: i32| {
                invocations.fetch_add(1, Ordering::SeqCst);
                async move { Ok(n) }
            }
        })
        .await
        .unwrap();

        // The completion is observed twice (result slot + gating) but the
        // worker must run exactly once per item.
        assert_eq!(results.len(), 10);
        assert_eq!(invocations.load(Ordering::SeqCst), 10);
    }
}
