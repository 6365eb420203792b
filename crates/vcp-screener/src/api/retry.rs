//! Retry logic with exponential backoff

use crate::config::ScreenerConfig;
use crate::error::Result;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

/// Retry policy configuration
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum number of attempts, including the first
    pub max_attempts: u32,

    /// Backoff before the first retry
    pub initial_backoff: Duration,

    /// Maximum backoff duration
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_secs(1),
            max_backoff: Duration::from_secs(30),
        }
    }
}

impl RetryPolicy {
    /// Build from the screener's retry settings
    pub fn from_config(config: &ScreenerConfig) -> Self {
        Self {
            max_attempts: config.max_retries,
            initial_backoff: config.retry_backoff_base,
            ..Default::default()
        }
    }

    /// Backoff before retry number `attempt` (1-based), capped at `max_backoff`
    fn backoff_duration(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return Duration::ZERO;
        }

        let factor = 2_u32.saturating_pow(attempt - 1);
        self.initial_backoff
            .checked_mul(factor)
            .map_or(self.max_backoff, |d| d.min(self.max_backoff))
    }

    /// Execute an async operation, retrying transient failures
    pub async fn execute<F, Fut, T>(&self, operation_name: &str, mut operation: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<T>>,
    {
        let attempts = self.max_attempts.max(1);
        let mut attempt = 0;

        loop {
            attempt += 1;
            debug!("Attempt {}/{} for operation: {}", attempt, attempts, operation_name);

            match operation().await {
                Ok(value) => {
                    if attempt > 1 {
                        debug!("Operation '{}' succeeded after {} retries", operation_name, attempt - 1);
                    }
                    return Ok(value);
                }
                Err(e) if !e.is_transient() => {
                    debug!("Operation '{}' failed with non-retryable error", operation_name);
                    return Err(e);
                }
                Err(e) if attempt >= attempts => {
                    warn!(
                        "Operation '{}' failed after {} attempts: {}",
                        operation_name, attempts, e
                    );
                    return Err(e);
                }
                Err(e) => {
                    let backoff = self.backoff_duration(attempt);
                    warn!(
                        "Operation '{}' failed (attempt {}/{}): {}. Retrying in {:?}",
                        operation_name, attempt, attempts, e, backoff
                    );
                    sleep(backoff).await;
                }
            }
        }
    }
}
