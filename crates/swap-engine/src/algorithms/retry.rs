//! # Bounded Retry
//!
//! Exponential backoff for transient chain failures. Only
//! [`ErrorClass::Transient`](crate::domain::ErrorClass) errors are retried.

use crate::domain::SwapError;
use crate::metrics;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// Retry budget with exponential backoff.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Attempts including the first.
    pub max_attempts: u32,
    /// Delay after the first failure.
    pub initial_backoff_ms: u64,
    /// Upper bound on any single delay.
    pub max_backoff_ms: u64,
    /// Growth factor per attempt.
    pub multiplier: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            initial_backoff_ms: 500,
            max_backoff_ms: 30_000,
            multiplier: 2,
        }
    }
}

impl RetryPolicy {
    /// Delay after failed attempt number `attempt` (1-based).
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = u64::from(self.multiplier).saturating_pow(attempt.saturating_sub(1));
        let millis = self
            .initial_backoff_ms
            .saturating_mul(factor)
            .min(self.max_backoff_ms);
        Duration::from_millis(millis)
    }
}

/// Run `op` until it succeeds, fails permanently, or the budget runs out.
///
/// Exhaustion surfaces as `ChainUnavailable` carrying the attempt count.
pub async fn retry_transient<T, F, Fut>(
    policy: &RetryPolicy,
    chain: &str,
    mut op: F,
) -> Result<T, SwapError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, SwapError>>,
{
    let mut attempt = 0u32;
    loop {
        attempt += 1;
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) if err.is_retryable() && attempt < policy.max_attempts => {
                let delay = policy.backoff(attempt);
                warn!(chain, attempt, ?delay, error = %err, "[swap] transient chain failure, backing off");
                metrics::record_chain_retry(chain);
                tokio::time::sleep(delay).await;
            }
            Err(SwapError::ChainUnavailable { reason, .. }) => {
                return Err(SwapError::ChainUnavailable {
                    chain: chain.to_string(),
                    attempts: attempt,
                    reason,
                })
            }
            Err(err) => return Err(err),
        }
    }
}
