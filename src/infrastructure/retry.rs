use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::domain::errors::{ConfigClientError, ConfigClientResult};
use crate::domain::models::RetryConfig;

/// Retry policy with exponential backoff for idempotent config reads
///
/// Backoff doubles with each retry and is capped at `max_backoff_ms`.
/// Only transient errors (`RemoteUnavailable`) are retried; a missing key,
/// a rejected request or a decode failure is returned immediately.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum number of retry attempts after the first call
    max_retries: u32,
    /// Initial backoff duration in milliseconds
    initial_backoff_ms: u64,
    /// Maximum backoff duration in milliseconds
    max_backoff_ms: u64,
}

impl RetryPolicy {
    /// Create a new retry policy
    ///
    /// # Arguments
    /// * `max_retries` - Retry attempts after the first call (0 disables retry)
    /// * `initial_backoff_ms` - Starting backoff delay
    /// * `max_backoff_ms` - Maximum backoff delay
    ///
    /// # Example
    /// ```
    /// use remote_config::infrastructure::retry::RetryPolicy;
    ///
    /// let policy = RetryPolicy::new(3, 100, 2_000);
    /// assert_eq!(policy.max_retries(), 3);
    /// ```
    pub const fn new(max_retries: u32, initial_backoff_ms: u64, max_backoff_ms: u64) -> Self {
        Self {
            max_retries,
            initial_backoff_ms,
            max_backoff_ms,
        }
    }

    /// A policy that makes exactly one attempt
    pub const fn none() -> Self {
        Self::new(0, 0, 0)
    }

    /// Policy from loaded retry settings
    pub const fn from_config(config: &RetryConfig) -> Self {
        Self::new(
            config.max_retries,
            config.initial_backoff_ms,
            config.max_backoff_ms,
        )
    }

    /// Retry attempts after the first call
    pub const fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Execute an operation with exponential backoff retry logic
    ///
    /// # Returns
    /// * `Ok(T)` - Operation succeeded
    /// * `Err(ConfigClientError)` - Permanent error, or the last transient
    ///   error once retries are exhausted
    pub async fn execute<F, Fut, T>(&self, mut operation: F) -> ConfigClientResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = ConfigClientResult<T>>,
    {
        let mut attempt = 0;

        loop {
            match operation().await {
                Ok(result) => {
                    if attempt > 0 {
                        debug!("Operation succeeded after {} retries", attempt);
                    }
                    return Ok(result);
                }
                Err(err) => {
                    if self.should_retry(&err, attempt) {
                        let backoff = self.calculate_backoff(attempt);
                        warn!(
                            "Attempt {} failed with transient error: {}. Retrying in {:?}...",
                            attempt + 1,
                            err,
                            backoff
                        );
                        sleep(backoff).await;
                        attempt += 1;
                    } else {
                        if err.is_transient() && attempt > 0 {
                            warn!("Operation failed after {} attempts: {}", attempt + 1, err);
                        } else {
                            debug!("Not retrying: {}", err);
                        }
                        return Err(err);
                    }
                }
            }
        }
    }

    /// Formula: min(initial_backoff * 2^attempt, max_backoff)
    fn calculate_backoff(&self, attempt: u32) -> Duration {
        let backoff_ms = self
            .initial_backoff_ms
            .saturating_mul(2_u64.saturating_pow(attempt))
            .min(self.max_backoff_ms);

        Duration::from_millis(backoff_ms)
    }

    fn should_retry(&self, error: &ConfigClientError, attempt: u32) -> bool {
        if attempt >= self.max_retries {
            return false;
        }
        error.is_transient()
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&RetryConfig::default())
    }
}
