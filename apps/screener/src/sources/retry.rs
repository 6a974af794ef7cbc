//! Retry/backoff as an explicit, reusable policy object.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use crate::config::NetworkPolicy;
use crate::sources::FetchError;

/// Fixed attempt budget with linearly increasing backoff: the wait before
/// attempt N+1 is `base_delay * N`. Terminal failures (not-found,
/// restricted) stop immediately; only transient failures consume attempts.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(2),
        }
    }
}

impl From<&NetworkPolicy> for RetryPolicy {
    fn from(policy: &NetworkPolicy) -> Self {
        Self {
            max_attempts: policy.max_attempts,
            base_delay: Duration::from_millis(policy.base_delay_ms),
        }
    }
}

impl RetryPolicy {
    pub async fn run<T, F, Fut>(&self, label: &str, mut op: F) -> Result<T, FetchError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, FetchError>>,
    {
        let mut last_error: Option<FetchError> = None;

        for attempt in 1..=self.max_attempts {
            if attempt > 1 {
                let delay = self.base_delay * (attempt - 1);
                warn!(
                    label,
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    "retrying after transient failure"
                );
                tokio::time::sleep(delay).await;
            }

            match op().await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_retryable() => last_error = Some(e),
                Err(e) => return Err(e),
            }
        }

        Err(last_error
            .unwrap_or_else(|| FetchError::Transient("retry budget exhausted".to_string())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    fn policy() -> RetryPolicy {
        RetryPolicy {
            max_attempts: 3,
            base_delay: Duration::from_secs(2),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_two_transient_failures_then_success_takes_three_attempts() {
        let attempts = Arc::new(AtomicU32::new(0));
        let counter = attempts.clone();
        let result = policy()
            .run("test", move || {
                let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
                async move {
                    if n < 3 {
                        Err(FetchError::Transient("flaky".to_string()))
                    } else {
                        Ok("profile")
                    }
                }
            })
            .await;
        assert_eq!(result.unwrap(), "profile");
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_terminal_failure_stops_after_one_attempt() {
        let attempts = Arc::new(AtomicU32::new(0));
        let counter = attempts.clone();
        let result: Result<(), _> = policy()
            .run("test", move || {
                counter.fetch_add(1, Ordering::SeqCst);
                async { Err(FetchError::NotFound) }
            })
            .await;
        assert!(matches!(result, Err(FetchError::NotFound)));
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_budget_exhaustion_returns_last_transient_error() {
        let attempts = Arc::new(AtomicU32::new(0));
        let counter = attempts.clone();
        let result: Result<(), _> = policy()
            .run("test", move || {
                let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
                async move { Err(FetchError::Transient(format!("failure {n}"))) }
            })
            .await;
        match result {
            Err(FetchError::Transient(msg)) => assert_eq!(msg, "failure 3"),
            other => panic!("expected transient error, got {other:?}"),
        }
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_attempt_has_no_delay() {
        let start = tokio::time::Instant::now();
        let _ = policy().run("test", || async { Ok(1u32) }).await;
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_backoff_grows_linearly() {
        // Two retries under a 2s base delay: 2s before attempt 2, 4s before
        // attempt 3, 6s total.
        let start = tokio::time::Instant::now();
        let attempts = Arc::new(AtomicU32::new(0));
        let counter = attempts.clone();
        let _: Result<(), _> = policy()
            .run("test", move || {
                counter.fetch_add(1, Ordering::SeqCst);
                async { Err(FetchError::Transient("always".to_string())) }
            })
            .await;
        assert_eq!(start.elapsed(), Duration::from_secs(6));
    }
}
