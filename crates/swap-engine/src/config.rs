//! # Swap Configuration
//!
//! Safety skew, polling cadence, confirmation depths and retry budgets.

use crate::algorithms::RetryPolicy;
use crate::domain::{ChainFamily, SwapError, DEFAULT_SAFETY_SKEW_SECS};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Engine configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SwapConfig {
    /// Gap between the two expiries.
    pub safety_skew_secs: u64,

    /// Orchestrator poll interval.
    pub poll_interval_ms: u64,

    /// Confirmations on UTXO chains.
    pub utxo_confirmations: u64,

    /// Confirmations on account chains.
    pub account_confirmations: u64,

    /// Confirmations for token transfers on account chains.
    pub token_confirmations: u64,

    /// Backoff for chain reads and submissions.
    pub read_retry: RetryPolicy,

    /// Backoff while waiting for confirmations.
    pub confirmation_retry: RetryPolicy,

    /// Complain about a late counterparty after this long.
    pub delay_complaint_after_secs: u64,
}

impl Default for SwapConfig {
    fn default() -> Self {
        Self {
            safety_skew_secs: DEFAULT_SAFETY_SKEW_SECS,
            poll_interval_ms: 15_000,
            utxo_confirmations: ChainFamily::Utxo.default_confirmations(),
            account_confirmations: ChainFamily::Account.default_confirmations(),
            token_confirmations: ChainFamily::AccountToken.default_confirmations(),
            read_retry: RetryPolicy::default(),
            confirmation_retry: RetryPolicy {
                max_attempts: 90,
                initial_backoff_ms: 10_000,
                max_backoff_ms: 60_000,
                multiplier: 2,
            },
            delay_complaint_after_secs: 3_600,
        }
    }
}

impl SwapConfig {
    /// Create a config for testing (single confirmations, millisecond waits).
    pub fn for_testing() -> Self {
        Self {
            safety_skew_secs: DEFAULT_SAFETY_SKEW_SECS,
            poll_interval_ms: 5,
            utxo_confirmations: 1,
            account_confirmations: 1,
            token_confirmations: 1,
            read_retry: RetryPolicy {
                max_attempts: 3,
                initial_backoff_ms: 1,
                max_backoff_ms: 4,
                multiplier: 2,
            },
            confirmation_retry: RetryPolicy {
                max_attempts: 5,
                initial_backoff_ms: 1,
                max_backoff_ms: 4,
                multiplier: 2,
            },
            delay_complaint_after_secs: 600,
        }
    }

    /// Confirmation depth for `family`.
    pub fn confirmations_for(&self, family: ChainFamily) -> u64 {
        match family {
            ChainFamily::Utxo => self.utxo_confirmations,
            ChainFamily::Account => self.account_confirmations,
            ChainFamily::AccountToken => self.token_confirmations,
        }
    }

    /// Poll interval as a duration.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Reject configurations the protocol cannot run with.
    pub fn validate(&self) -> Result<(), SwapError> {
        if self.safety_skew_secs == 0 {
            return Err(SwapError::InvalidConfig(
                "safety_skew_secs must be positive".to_string(),
            ));
        }
        if self.poll_interval_ms == 0 {
            return Err(SwapError::InvalidConfig(
                "poll_interval_ms must be positive".to_string(),
            ));
        }
        for (name, policy) in [
            ("read_retry", &self.read_retry),
            ("confirmation_retry", &self.confirmation_retry),
        ] {
            if policy.max_attempts == 0 || policy.multiplier == 0 {
                return Err(SwapError::InvalidConfig(format!(
                    "{name} needs at least one attempt and a non-zero multiplier"
                )));
            }
        }
        for family in [ChainFamily::Utxo, ChainFamily::Account, ChainFamily::AccountToken] {
            if self.confirmations_for(family) == 0 {
                return Err(SwapError::InvalidConfig(format!(
                    "{family} confirmations must be positive"
                )));
            }
        }
        Ok(())
    }
}
