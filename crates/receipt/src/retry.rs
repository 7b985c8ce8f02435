//! Retry with exponential backoff for transient failures

use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// Bounded exponential backoff
///
/// Applied to remote calls that can fail transiently (database connect,
/// document persistence). Rendering is never retried.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Total attempts, the first one included
    pub max_attempts: u32,
    pub base_delay_ms: u64,
    pub multiplier: f64,
    pub max_delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 200,
            multiplier: 2.0,
            max_delay_ms: 5_000,
        }
    }
}

impl RetryPolicy {
    /// A policy that tries exactly once
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Delay before retry number `attempt` (1 = first retry)
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(31) as i32;
        let delay = self.base_delay_ms as f64 * self.multiplier.max(1.0).powi(exponent);
        let capped = delay.min(self.max_delay_ms as f64);
        Duration::from_millis(capped as u64)
    }

    /// Run `op` until it succeeds, fails permanently, or attempts run out
    ///
    /// `is_retryable` decides which errors are worth another attempt.
    pub async fn run<T, E, F, Fut>(&self, mut op: F, is_retryable: impl Fn(&E) -> bool) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: std::fmt::Display,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(e) if attempt < max_attempts && is_retryable(&e) => {
                    let delay = self.delay_for(attempt);
                    warn!(
                        attempt,
                        max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "transient failure, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast() -> RetryPolicy {
        RetryPolicy {
            max_attempts: 3,
            base_delay_ms: 1,
            multiplier: 2.0,
            max_delay_ms: 4,
        }
    }

    #[test]
    fn test_delay_grows_and_caps() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_for(1), Duration::from_millis(200));
        assert_eq!(policy.delay_for(2), Duration::from_millis(400));
        assert_eq!(policy.delay_for(3), Duration::from_millis(800));
        assert_eq!(policy.delay_for(20), Duration::from_millis(5_000));
    }

    #[tokio::test]
    async fn test_retries_transient_until_success() {
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let result: Result<u32, String> = fast()
            .run(
                move || async move {
                    let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
                    if n < 3 {
                        Err("busy".to_string())
                    } else {
                        Ok(n)
                    }
                },
                |_| true,
            )
            .await;
        assert_eq!(result, Ok(3));
        assert_eq!(counter.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_attempts() {
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let result: Result<(), String> = fast()
            .run(
                move || async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Err("down".to_string())
                },
                |_| true,
            )
            .await;
        assert_eq!(result, Err("down".to_string()));
        assert_eq!(counter.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_permanent_error_not_retried() {
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let result: Result<(), String> = fast()
            .run(
                move || async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Err("not found".to_string())
                },
                |_| false,
            )
            .await;
        assert!(result.is_err());
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }
}
