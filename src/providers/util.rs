use crate::core::error::GatewayError;
use std::future::Future;
use std::time::Duration;
use tracing::debug;

/// Retries an async operation while it fails with a retryable error
///
/// # Parameters
/// - `operation`: Closure returning a future
/// - `retries`: Number of retry attempts (total runs = 1 initial + retries)
/// - `delay_ms`: Delay before the first retry, doubled for each one after
///
/// # Returns
/// Either the successful result, the first non-retryable error, or the last
/// error once attempts run out
pub async fn with_retry<F, Fut, T>(
    mut operation: F,
    retries: usize,
    delay_ms: u64,
) -> Result<T, GatewayError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, GatewayError>>,
{
    let mut attempt = 1;
    let mut delay = delay_ms;
    loop {
        match operation().await {
            Ok(val) => return Ok(val),
            Err(err) => {
                if attempt > retries || !err.is_retryable() {
                    return Err(err);
                }
                debug!(
                    "Attempt {}/{} failed: {:?}. Retrying in {}ms...",
                    attempt, retries, err, delay
                );
                attempt += 1;
                tokio::time::sleep(Duration::from_millis(delay)).await;
                delay = delay.saturating_mul(2);
            }
        }
    }
}
