//! Retry with exponential backoff for geocoder requests.
//!
//! Public geocoders throttle aggressively, so 429 responses and network
//! failures are retried. Anything else (404, bad JSON, other statuses) is
//! returned immediately.

use std::future::Future;
use std::time::Duration;

use crate::error::GeoError;

/// Returns `true` if `err` is transient and worth another attempt.
///
/// Retriable: [`GeoError::RateLimited`] and [`GeoError::Http`].
/// Everything else would fail the same way again.
fn is_retriable(err: &GeoError) -> bool {
    matches!(err, GeoError::RateLimited { .. } | GeoError::Http(_))
}

/// Executes `operation`, retrying transient errors up to `max_retries` extra
/// times.
///
/// The wait before retry `n` (1-based) is `backoff_base_secs * 2^(n-1)`
/// seconds. With `max_retries = 2` the operation runs at most 3 times.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_secs: u64,
    mut operation: F,
) -> Result<T, GeoError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, GeoError>>,
{
    let mut attempt = 0u32;

    loop {
        let err = match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };
        if !is_retriable(&err) || attempt >= max_retries {
            return Err(err);
        }

        let delay_secs = backoff_base_secs.saturating_mul(1u64 << attempt.min(62));
        tracing::warn!(
            attempt,
            max_retries,
            delay_secs,
            error = %err,
            "transient geocoder error, retrying after backoff"
        );
        tokio::time::sleep(Duration::from_secs(delay_secs)).await;
        attempt += 1;
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};

    use super::*;

    fn throttled() -> GeoError {
        GeoError::RateLimited {
            host: "geocoder.test".to_owned(),
            retry_after_secs: 0,
        }
    }

    /// Runs `retry_with_backoff` over a script of per-attempt results and
    /// returns the outcome with the number of attempts made.
    async fn run_script(
        max_retries: u32,
        script: Vec<Result<u32, GeoError>>,
    ) -> (Result<u32, GeoError>, usize) {
        let attempts = Cell::new(0usize);
        let script = RefCell::new(script.into_iter());
        let result = retry_with_backoff(max_retries, 0, || {
            attempts.set(attempts.get() + 1);
            let next = script.borrow_mut().next().unwrap_or_else(|| Err(throttled()));
            async move { next }
        })
        .await;
        (result, attempts.get())
    }

    #[tokio::test]
    async fn first_success_is_returned_without_retry() {
        let (result, attempts) = run_script(3, vec![Ok(7)]).await;
        assert_eq!(result.unwrap(), 7);
        assert_eq!(attempts, 1);
    }

    #[tokio::test]
    async fn throttling_is_retried_until_success() {
        let (result, attempts) = run_script(3, vec![Err(throttled()), Err(throttled()), Ok(99)]).await;
        assert_eq!(result.unwrap(), 99);
        assert_eq!(attempts, 3);
    }

    #[tokio::test]
    async fn retries_stop_at_the_limit() {
        let (result, attempts) = run_script(1, vec![]).await;
        assert!(matches!(result, Err(GeoError::RateLimited { .. })));
        assert_eq!(attempts, 2);
    }

    #[tokio::test]
    async fn permanent_errors_are_not_retried() {
        let missing = GeoError::NotFound {
            url: "http://geocoder.test/details".to_owned(),
        };
        let (result, attempts) = run_script(3, vec![Err(missing), Ok(1)]).await;
        assert!(matches!(result, Err(GeoError::NotFound { .. })));
        assert_eq!(attempts, 1);
    }
}
