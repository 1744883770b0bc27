//! Fan-out/fan-in for independent sub-requests.
//!
//! [`settle_all`] runs one future per key with bounded parallelism and
//! waits for all of them, yielding a `(key, Result)` pair per key in
//! completion order. Merging is left to the caller, typically through
//! [`keep_successes`], which logs and drops the failures.

use std::fmt::Display;
use std::future::Future;

use futures::stream::{self, StreamExt as _};

/// Runs `task` for every key with at most `concurrency` in flight.
///
/// Never short-circuits: every key gets a result.
pub async fn settle_all<K, T, E, I, F, Fut>(
    keys: I,
    concurrency: usize,
    task: F,
) -> Vec<(K, Result<T, E>)>
where
    I: IntoIterator<Item = K>,
    K: Clone,
    F: Fn(K) -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    stream::iter(keys.into_iter().map(|key| {
        let fut = task(key.clone());
        async move { (key, fut.await) }
    }))
    .buffer_unordered(concurrency.max(1))
    .collect()
    .await
}

/// Keeps successful results, logging each failure at `warn`.
pub fn keep_successes<K, T, E>(settled: Vec<(K, Result<T, E>)>) -> Vec<(K, T)>
where
    K: Display,
    E: Display,
{
    settled
        .into_iter()
        .filter_map(|(key, result)| match result {
            Ok(value) => Some((key, value)),
            Err(e) => {
                log::warn!("sub-request {key} failed: {e}");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn every_key_is_settled() {
        let settled = settle_all(1..=5, 2, |n: u32| async move {
            if n % 2 == 0 { Err(format!("even {n}")) } else { Ok(n * 10) }
        })
        .await;

        assert_eq!(settled.len(), 5);
        let mut ok: Vec<u32> = keep_successes(settled).into_iter().map(|(_, v)| v).collect();
        ok.sort_unstable();
        assert_eq!(ok, vec![10, 30, 50]);
    }

    #[tokio::test]
    async fn failures_do_not_abort_the_batch() {
        let settled = settle_all(["AL", "AK", "AZ"], 8, |abbr: &str| async move {
            if abbr == "AK" {
                Err("HTTP 500")
            } else {
                Ok(abbr.to_lowercase())
            }
        })
        .await;

        let kept = keep_successes(settled);
        assert_eq!(kept.len(), 2);
        assert!(kept.iter().all(|(k, _)| *k != "AK"));
    }

    #[tokio::test]
    async fn results_arrive_in_completion_order() {
        let settled = settle_all([100_u64, 0, 50], 3, |delay| async move {
            tokio::time::sleep(Duration::from_millis(delay)).await;
            Ok::<_, String>(delay)
        })
        .await;

        let order: Vec<u64> = settled.into_iter().map(|(k, _)| k).collect();
        assert_eq!(order, vec![0, 50, 100]);
    }

    #[tokio::test]
    async fn zero_concurrency_still_runs() {
        let settled = settle_all([1], 0, |n: i32| async move { Ok::<_, String>(n) }).await;
        assert_eq!(settled.len(), 1);
    }
}
