//! Retry with exponential backoff for transport failures

use std::time::Duration;

use crate::http::HttpError;

/// Maximum retry attempts for retryable HTTP failures
pub const MAX_RETRIES: u32 = 3;

/// Exponential backoff: 2^attempt seconds (2s, 4s, 8s, ...)
pub const fn backoff_duration(attempt: u32) -> Duration {
    Duration::from_secs(2u64.pow(attempt))
}

/// Retry a fallible HTTP operation with exponential backoff.
///
/// On retryable errors (rate limits, 5xx, connection failures), logs the
/// failure, sleeps, and retries up to [`MAX_RETRIES`]. Returns `Ok(T)` on
/// first success, or the final `Err` on exhaustion / non-retryable error.
pub fn retry_with_backoff<T>(
    label: &str,
    mut attempt_fn: impl FnMut() -> Result<T, HttpError>,
) -> Result<T, HttpError> {
    let mut attempt = 0u32;
    loop {
        match attempt_fn() {
            Ok(v) => return Ok(v),
            Err(e) if attempt < MAX_RETRIES && e.is_retryable() => {
                attempt += 1;
                let delay = backoff_duration(attempt);
                log::warn!("{label}: attempt {attempt}/{MAX_RETRIES} failed: {e}, retrying in {delay:?}");
                std::thread::sleep(delay);
            }
            Err(e) => return Err(e),
        }
    }
}
