// Retry and reconnect delay policies
use std::future::Future;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
#[error("failed after {retries} retries: {source}")]
pub struct RetryError<E: std::error::Error + 'static> {
    pub retries: u32,
    #[source]
    pub source: E,
}

/// Bounded retry with a linear delay: the k-th retry waits `base_delay + k * backoff_step`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    base_delay: Duration,
    max_retries: u32,
    backoff_step: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(Duration::from_millis(250), 5, Duration::from_millis(1_000))
    }
}

impl RetryPolicy {
    pub fn new(base_delay: Duration, max_retries: u32, backoff_step: Duration) -> Self {
        Self {
            base_delay,
            max_retries,
            backoff_step,
        }
    }

    /// Delay before retry number `retry` (1-indexed)
    pub fn delay_for(&self, retry: u32) -> Duration {
        self.base_delay + self.backoff_step * retry
    }

    /// Run `op` until it succeeds or `max_retries` retries have failed too
    pub async fn retry<T, E, F, Fut>(&self, mut op: F) -> Result<T, RetryError<E>>
    where
        E: std::error::Error + 'static,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let mut retries = 0;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(e) if retries < self.max_retries => {
                    retries += 1;
                    let delay = self.delay_for(retries);
                    tracing::warn!("Attempt failed ({}), retry {} in {:?}", e, retries, delay);
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(RetryError { retries, source: e }),
            }
        }
    }
}

/// Unbounded reconnect schedule: the same linear growth as [`RetryPolicy`], capped at `max_delay`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReconnectPolicy {
    base_delay: Duration,
    backoff_step: Duration,
    max_delay: Duration,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self::new(Duration::from_millis(250), Duration::from_millis(1_000), Duration::from_secs(10))
    }
}

impl ReconnectPolicy {
    pub fn new(base_delay: Duration, backoff_step: Duration, max_delay: Duration) -> Self {
        Self {
            base_delay,
            backoff_step,
            max_delay,
        }
    }

    /// Delay after failed connect attempt number `attempt` (1-indexed)
    pub fn delay_for(&self, attempt: u32) -> Duration {
        (self.base_delay + self.backoff_step * attempt).min(self.max_delay)
    }
}
