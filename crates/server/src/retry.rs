use std::future::Future;
use std::time::Duration;

use rand::Rng;

use crate::config::RetryConfig;

/// Runs a repository call, retrying only transient failures with a
/// jittered doubling backoff. Non-transient errors propagate on the first
/// attempt; the last error is returned once attempts are exhausted.
pub async fn with_db_retry<F, Fut, T>(
    policy: &RetryConfig,
    mut operation: F,
) -> Result<T, sqlx::Error>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, sqlx::Error>>,
{
    let mut attempt: u32 = 0;
    let mut backoff = policy.base_backoff();

    loop {
        attempt += 1;
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !is_transient(&err) || attempt >= policy.max_attempts.max(1) {
                    return Err(err);
                }

                let jittered = apply_jitter(backoff, policy.jitter);
                tracing::debug!(
                    attempt,
                    backoff_ms = jittered.as_millis() as u64,
                    error = %err,
                    "retrying after backoff"
                );
                tokio::time::sleep(jittered).await;
                backoff = backoff.saturating_mul(2);
            }
        }
    }
}

/// Connection-level failures are worth a retry; everything else (constraint
/// violations, decode errors, missing rows) is not.
pub fn is_transient(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Io(_) | sqlx::Error::PoolTimedOut | sqlx::Error::WorkerCrashed
    )
}

fn apply_jitter(dur: Duration, factor: f64) -> Duration {
    if factor <= 0.0 {
        return dur;
    }
    let factor = factor.clamp(0.0, 1.0);
    let base_nanos = dur.as_nanos() as f64;
    let min_nanos = base_nanos * (1.0 - factor);
    let max_nanos = base_nanos * (1.0 + factor);
    let jittered = rand::thread_rng().gen_range(min_nanos..=max_nanos);
    Duration::from_nanos(jittered as u64)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    use super::*;

    fn test_policy() -> RetryConfig {
        RetryConfig {
            max_attempts: 3,
            base_backoff_ms: 1,
            jitter: 0.0,
        }
    }

    fn transient_error() -> sqlx::Error {
        sqlx::Error::Io(std::io::Error::new(
            std::io::ErrorKind::ConnectionReset,
            "connection reset",
        ))
    }

    #[tokio::test]
    async fn success_on_first_attempt() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&calls);
        let result = with_db_retry(&test_policy(), || {
            let counter = Arc::clone(&counter);
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok::<_, sqlx::Error>(7)
            }
        })
        .await;
        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn transient_failure_is_retried() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&calls);
        let result = with_db_retry(&test_policy(), || {
            let counter = Arc::clone(&counter);
            async move {
                if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                    Err(transient_error())
                } else {
                    Ok::<_, sqlx::Error>("ok")
                }
            }
        })
        .await;
        assert_eq!(result.unwrap(), "ok");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn attempts_are_bounded() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&calls);
        let result: Result<(), _> = with_db_retry(&test_policy(), || {
            let counter = Arc::clone(&counter);
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Err(transient_error())
            }
        })
        .await;
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn non_transient_failure_is_not_retried() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&calls);
        let result: Result<(), _> = with_db_retry(&test_policy(), || {
            let counter = Arc::clone(&counter);
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Err(sqlx::Error::RowNotFound)
            }
        })
        .await;
        assert!(matches!(result.unwrap_err(), sqlx::Error::RowNotFound));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn classification_covers_pool_timeout() {
        assert!(is_transient(&sqlx::Error::PoolTimedOut));
        assert!(is_transient(&transient_error()));
        assert!(!is_transient(&sqlx::Error::RowNotFound));
    }

    #[test]
    fn zero_jitter_is_identity() {
        let dur = Duration::from_millis(100);
        assert_eq!(apply_jitter(dur, 0.0), dur);
    }

    #[test]
    fn jitter_stays_within_bounds() {
        let dur = Duration::from_millis(1000);
        for _ in 0..100 {
            let jittered = apply_jitter(dur, 0.25).as_millis();
            assert!((750..=1250).contains(&jittered), "{jittered}ms out of bounds");
        }
    }
}
