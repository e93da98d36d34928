// src/retry.rs
use std::{future::Future, time::Duration};
use tokio::time::sleep;
use tracing::warn;

use crate::error::Result;

/// Fixed-delay retry that only repeats transient failures
/// (see [`crate::error::DashboardError::is_retryable`]). 4xx and decode errors fail on the first attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_millis(1000),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }

    pub fn no_retry() -> Self {
        Self::new(1, Duration::ZERO)
    }

    pub async fn run<F, Fut, T>(&self, label: &str, mut op: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let attempts = self.max_attempts.max(1);
        let mut attempt = 0;

        loop {
            attempt += 1;
            match op().await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_retryable() && attempt < attempts => {
                    warn!(
                        "{} failed (attempt {}/{}): {}. Retrying in {:?}...",
                        label, attempt, attempts, e, self.delay
                    );
                    sleep(self.delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
