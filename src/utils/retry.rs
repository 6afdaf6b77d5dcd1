//! Bounded retry with exponential backoff.

use std::future::Future;
use std::time::Duration;

use log::debug;
use tokio_retry::Retry;

use crate::config::{RETRY_BASE_BACKOFF_MS, RETRY_MAX_ATTEMPTS};
use crate::models::AttemptOutcome;

/// Retry parameters for one logical operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryConfig {
    /// Total attempts including the first one. Zero behaves like one.
    pub max_attempts: usize,
    /// Delay before the second attempt
    pub base_backoff: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: RETRY_MAX_ATTEMPTS,
            base_backoff: Duration::from_millis(RETRY_BASE_BACKOFF_MS),
        }
    }
}

impl RetryConfig {
    /// A policy that never retries.
    pub fn single_attempt() -> Self {
        Self {
            max_attempts: 1,
            base_backoff: Duration::ZERO,
        }
    }

    /// Delays between attempts: `base`, `2 * base`, `4 * base`, ... bounded
    /// to `max_attempts - 1` entries. No jitter.
    pub fn strategy(&self) -> std::iter::Take<DoublingBackoff> {
        DoublingBackoff::new(self.base_backoff).take(self.max_attempts.saturating_sub(1))
    }
}

/// Deterministic exponential backoff: each delay is twice the previous one.
///
/// `tokio_retry::strategy::ExponentialBackoff` raises the base to a power
/// instead, so it cannot express `base * 2^n` for arbitrary bases.
#[derive(Debug, Clone)]
pub struct DoublingBackoff {
    next: Duration,
}

impl DoublingBackoff {
    pub fn new(base: Duration) -> Self {
        Self { next: base }
    }
}

impl Iterator for DoublingBackoff {
    type Item = Duration;

    fn next(&mut self) -> Option<Duration> {
        let current = self.next;
        self.next = current.checked_mul(2).unwrap_or(Duration::MAX);
        Some(current)
    }
}

/// Runs `operation` until it returns a non-transient outcome or attempts are
/// exhausted.
///
/// Only `TransportError` and `Timeout` are retried. After exhaustion the last
/// outcome is returned unchanged. The backoff sleep only suspends the calling
/// task.
pub async fn run_with_retry<F, Fut>(mut operation: F, config: &RetryConfig) -> AttemptOutcome
where
    F: FnMut() -> Fut,
    Fut: Future<Output = AttemptOutcome>,
{
    let max_attempts = config.max_attempts.max(1);
    let mut attempt = 0usize;

    let result = Retry::spawn(config.strategy(), || {
        attempt += 1;
        let current = attempt;
        let pending = operation();
        async move {
            let outcome = pending.await;
            if outcome.is_transient() {
                if current < max_attempts {
                    debug!(
                        "Attempt {current}/{max_attempts} failed ({}), retrying",
                        outcome.describe()
                    );
                }
                Err(outcome)
            } else {
                Ok(outcome)
            }
        }
    })
    .await;

    match result {
        Ok(outcome) | Err(outcome) => outcome,
    }
}
