// src/client/retry.rs
// DOCUMENTATION: Retry and timeout policy applied to every network call
// PURPOSE: One policy object instead of per-call retry loops and abort timers

use crate::errors::{GuideError, GuideResult};
use std::future::Future;
use std::time::Duration;

/// Retry/timeout policy
/// DOCUMENTATION: Each attempt is bounded by `timeout`; only retryable errors
/// (network, timeout, 5xx) trigger another attempt, up to `max_attempts`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first one (min 1)
    pub max_attempts: u32,
    /// Deadline for a single attempt
    pub timeout: Duration,
    /// Delay before retry n is `backoff * n`
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::single(Duration::from_secs(10))
    }
}

impl RetryPolicy {
    /// One attempt, no retries
    pub fn single(timeout: Duration) -> Self {
        Self {
            max_attempts: 1,
            timeout,
            backoff: Duration::ZERO,
        }
    }

    /// Fixed number of attempts with linear backoff
    pub fn fixed(max_attempts: u32, timeout: Duration, backoff: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            timeout,
            backoff,
        }
    }

    /// Policy for attraction/restaurant detail fetches (3 attempts by default)
    pub fn detail(max_attempts: u32, timeout: Duration) -> Self {
        Self::fixed(max_attempts, timeout, Duration::from_millis(500))
    }

    /// Same policy with a single attempt; used for mutations
    pub fn without_retries(&self) -> Self {
        Self::single(self.timeout)
    }

    /// Run an operation under this policy
    ///
    /// # Arguments
    /// * `label` - Human readable operation name used in logs and timeout errors
    /// * `op` - Called once per attempt with the 1-based attempt number
    pub async fn run<T, F, Fut>(&self, label: &str, mut op: F) -> GuideResult<T>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = GuideResult<T>>,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            let result = match tokio::time::timeout(self.timeout, op(attempt)).await {
                Ok(result) => result,
                Err(_) => Err(GuideError::Timeout(format!(
                    "{} after {} ms",
                    label,
                    self.timeout.as_millis()
                ))),
            };

            match result {
                Ok(value) => return Ok(value),
                Err(e) if e.is_retryable() && attempt < max_attempts => {
                    log::warn!(
                        "{} failed (attempt {}/{}): {}",
                        label,
                        attempt,
                        max_attempts,
                        e
                    );
                    let delay = self.backoff * attempt;
                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                    attempt += 1;
                }
                Err(e) => {
                    if attempt > 1 {
                        log::error!("{} failed after {} attempts: {}", label, attempt, e);
                    }
                    return Err(e);
                }
            }
        }
    }
}
