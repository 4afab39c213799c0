use std::future::Future;
use std::time::Duration;

use tokio::time::{sleep, timeout};
use tracing::warn;

use super::{ClientError, Result};

/// Bounded exponential backoff with a per-attempt timeout
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub multiplier: f64,
    pub max_delay: Duration,
    pub attempt_timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(500),
            multiplier: 2.0,
            max_delay: Duration::from_secs(8),
            attempt_timeout: Duration::from_secs(30),
        }
    }
}

impl RetryPolicy {
    /// Single attempt, no waiting
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Delay before retry number `retry` (1 = first retry)
    pub fn delay_for(&self, retry: u32) -> Duration {
        let factor = self.multiplier.max(1.0).powi(retry.saturating_sub(1) as i32);
        let millis = (self.base_delay.as_millis() as f64 * factor).min(self.max_delay.as_millis() as f64);
        Duration::from_millis(millis as u64)
    }

    /// Run `op` until it succeeds, fails permanently, or attempts run out.
    /// Each attempt is bounded by `attempt_timeout`.
    pub async fn run<T, F, Fut>(&self, label: &str, mut op: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let attempts = self.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            let error = match timeout(self.attempt_timeout, op()).await {
                Ok(Ok(value)) => return Ok(value),
                Ok(Err(e)) => e,
                Err(_) => ClientError::Timeout(self.attempt_timeout),
            };

            if !error.is_transient() {
                return Err(error);
            }
            if attempt >= attempts {
                return Err(if attempts == 1 {
                    error
                } else {
                    ClientError::RetriesExhausted {
                        attempts,
                        last: Box::new(error),
                    }
                });
            }

            let delay = self.delay_for(attempt);
            warn!("{} failed (attempt {}/{}): {}; retrying in {:?}", label, attempt, attempts, error, delay);
            sleep(delay).await;
            attempt += 1;
        }
    }
}
