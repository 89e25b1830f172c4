//! Retry policy for per-row store writes.

use std::future::Future;
use std::time::Duration;

use crate::errors::AppError;

/// How often and how eagerly a failing operation is reattempted.
///
/// `max_retries` counts retries after the first attempt, so an operation
/// runs at most `1 + max_retries` times. The delay applies between
/// attempts; the resume importer keeps it at zero and paces itself through
/// its inter-batch sleep instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub retry_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_retries: u32) -> Self {
        Self {
            max_retries,
            retry_delay: Duration::ZERO,
        }
    }
}

/// Run `op` until it succeeds or the policy's attempts are spent, returning
/// the last error.
pub async fn retry<T, F, Fut>(policy: RetryPolicy, mut op: F) -> Result<T, AppError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, AppError>>,
{
    let mut failed_attempts = 0;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                failed_attempts += 1;
                if failed_attempts > policy.max_retries {
                    return Err(err);
                }
                tracing::debug!(
                    "Attempt {} failed, retrying: {}",
                    failed_attempts,
                    err
                );
                if !policy.retry_delay.is_zero() {
                    tokio::time::sleep(policy.retry_delay).await;
                }
            }
        }
    }
}
