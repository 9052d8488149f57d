//! Bounded retry with a fixed backoff, used for uploads.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use crate::error::UfileResult;

/// Pause between two upload attempts.
pub const DEFAULT_PUT_BACKOFF: Duration = Duration::from_secs(1);

/// Run `attempt` until it succeeds or `max_retries` retries are used up.
///
/// At most `max_retries + 1` attempts are made, separated by `backoff`. Errors
/// that are not [retryable](crate::UfileError::is_retryable) end the loop at
/// once. The last error is returned when the budget is exhausted.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    operation: &str,
    max_retries: u32,
    backoff: Duration,
    mut attempt: F,
) -> UfileResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = UfileResult<T>>,
{
    let mut remaining = max_retries;
    loop {
        match attempt().await {
            Ok(value) => return Ok(value),
            Err(err) if remaining > 0 && err.is_retryable() => {
                remaining -= 1;
                warn!(
                    operation,
                    error = %err,
                    retries_left = remaining,
                    backoff_ms = u64::try_from(backoff.as_millis()).unwrap_or(u64::MAX),
                    "attempt failed, retrying"
                );
                tokio::time::sleep(backoff).await;
            }
            Err(err) => return Err(err),
        }
    }
}
