//! Retry policy with exponential backoff
//!
//! Bounded retries for the network-backed gateway:
//! - Only transient errors are retried (see `AgentError::is_transient`)
//! - Delay doubles per attempt, capped at `max_delay_ms`
//! - Optional ±25% jitter
//! - The last error is returned once attempts run out

use crate::errors::Result;
use std::time::Duration;
use tokio::time::sleep;
use tracing::warn;

/// Default number of attempts (first try included)
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Base delay for exponential backoff
const BASE_DELAY_MS: u64 = 200;

/// Maximum delay cap
const MAX_DELAY_MS: u64 = 5000;

#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts, first try included
    max_attempts: u32,

    /// Base delay in milliseconds
    base_delay_ms: u64,

    /// Maximum delay cap in milliseconds
    max_delay_ms: u64,

    /// Enable jitter
    enable_jitter: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl RetryPolicy {
    pub fn new() -> Self {
        Self::with_config(DEFAULT_MAX_ATTEMPTS, BASE_DELAY_MS)
    }

    pub fn with_config(max_attempts: u32, base_delay_ms: u64) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay_ms,
            max_delay_ms: MAX_DELAY_MS,
            enable_jitter: true,
        }
    }

    /// Single attempt, no retries
    pub fn none() -> Self {
        Self::with_config(1, 0)
    }

    pub fn without_jitter(mut self) -> Self {
        self.enable_jitter = false;
        self
    }

    /// Run `operation` until it succeeds, fails permanently, or attempts run out
    pub async fn execute<F, Fut, T>(&self, label: &str, mut operation: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<T>>,
    {
        let mut attempt = 0;

        loop {
            attempt += 1;
            match operation().await {
                Ok(result) => return Ok(result),
                Err(e) => {
                    if !e.is_transient() || attempt >= self.max_attempts {
                        return Err(e);
                    }

                    let delay = self.delay_for(attempt);
                    warn!(
                        tool = label,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "Retrying tool call"
                    );
                    sleep(delay).await;
                }
            }
        }
    }

    /// Delay before the attempt following `attempt`
    fn delay_for(&self, attempt: u32) -> Duration {
        let exponential = self
            .base_delay_ms
            .saturating_mul(2u64.saturating_pow(attempt.saturating_sub(1)));
        let delay_ms = exponential.min(self.max_delay_ms);

        let final_delay = if self.enable_jitter {
            let jitter = (delay_ms / 4) as i64;
            let random_jitter = (rand::random::<f64>() * 2.0 - 1.0) * jitter as f64;
            ((delay_ms as i64) + random_jitter as i64).max(0) as u64
        } else {
            delay_ms
        };

        Duration::from_millis(final_delay)
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AgentError;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    #[tokio::test(start_paused = true)]
    async fn test_success_first_attempt() {
        let policy = RetryPolicy::new();
        let count = Arc::new(AtomicU32::new(0));

        let c = count.clone();
        let result = policy
            .execute("search", move || {
                let c = c.clone();
                async move {
                    c.fetch_add(1, Ordering::SeqCst);
                    Ok::<i32, AgentError>(42)
                }
            })
            .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_after_transient_failures() {
        let policy = RetryPolicy::with_config(3, 10).without_jitter();
        let count = Arc::new(AtomicU32::new(0));

        let c = count.clone();
        let result = policy
            .execute("search", move || {
                let c = c.clone();
                async move {
                    let current = c.fetch_add(1, Ordering::SeqCst) + 1;
                    if current < 3 {
                        Err(AgentError::tool_failure("search", "reset"))
                    } else {
                        Ok(7)
                    }
                }
            })
            .await;

        assert_eq!(result.unwrap(), 7);
        assert_eq!(count.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_attempts_exhausted_returns_last_error() {
        let policy = RetryPolicy::with_config(2, 10);
        let count = Arc::new(AtomicU32::new(0));

        let c = count.clone();
        let result = policy
            .execute("notify", move || {
                let c = c.clone();
                async move {
                    c.fetch_add(1, Ordering::SeqCst);
                    Err::<i32, _>(AgentError::tool_failure("notify", "down"))
                }
            })
            .await;

        assert!(matches!(result, Err(AgentError::ToolFailure { .. })));
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_permanent_error_not_retried() {
        let policy = RetryPolicy::new();
        let count = Arc::new(AtomicU32::new(0));

        let c = count.clone();
        let result = policy
            .execute("search", move || {
                let c = c.clone();
                async move {
                    c.fetch_add(1, Ordering::SeqCst);
                    Err::<i32, _>(AgentError::ConfigError("bad url".to_string()))
                }
            })
            .await;

        assert!(result.is_err());
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_backoff_doubles_and_caps() {
        let policy = RetryPolicy::with_config(10, 1000).without_jitter();
        assert_eq!(policy.delay_for(1), Duration::from_millis(1000));
        assert_eq!(policy.delay_for(2), Duration::from_millis(2000));
        assert_eq!(policy.delay_for(3), Duration::from_millis(4000));
        assert_eq!(policy.delay_for(4), Duration::from_millis(5000));
    }

    #[test]
    fn test_none_is_single_attempt() {
        assert_eq!(RetryPolicy::none().max_attempts(), 1);
    }
}
