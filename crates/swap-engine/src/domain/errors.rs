//! # Domain Errors
//!
//! Error taxonomy for swap orchestration. Every error belongs to exactly one
//! [`ErrorClass`], and the class alone decides how an orchestrator reacts.

use super::value_objects::{ChainFamily, LegRole, LegState, SwapPhase};
use std::fmt;
use thiserror::Error;

/// Hash type (32-byte SHA-256).
pub type Hash = [u8; 32];

/// Swap identifier shared by both legs.
pub type SwapId = [u8; 32];

/// How an orchestrator treats an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorClass {
    /// Bad request or local setup. Fatal, never retried.
    Configuration,
    /// Chain I/O failed after the retry budget. Pause and retry next poll.
    Transient,
    /// Counterparty or chain broke the protocol. Halt for manual intervention.
    ProtocolSafety,
    /// The leg is already settled. Success-equivalent once reconciled.
    AlreadyResolved,
    /// Time-lock not in the window required by the operation.
    Lifecycle,
    /// Swap state store failure.
    Storage,
    /// Run stopped by the shutdown signal.
    Cancelled,
}

impl ErrorClass {
    /// Stable label for logs and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Configuration => "configuration",
            Self::Transient => "transient",
            Self::ProtocolSafety => "protocol_safety",
            Self::AlreadyResolved => "already_resolved",
            Self::Lifecycle => "lifecycle",
            Self::Storage => "storage",
            Self::Cancelled => "cancelled",
        }
    }
}

/// Swap orchestration errors.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SwapError {
    /// Token symbol unknown, or no binder registered for its chain family.
    #[error("Unsupported token: {0}")]
    UnsupportedToken(String),

    /// Token pair cannot be swapped.
    #[error("Unsupported pairing: {send} -> {receive}")]
    UnsupportedPairing {
        /// Send token symbol
        send: String,
        /// Receive token symbol
        receive: String,
    },

    /// Amount is not a non-negative decimal integer.
    #[error("Malformed amount: {0}")]
    MalformedAmount(String),

    /// Secret hash is not 32 bytes of hex.
    #[error("Malformed secret hash: {0}")]
    MalformedHash(String),

    /// Local account could not be unlocked.
    #[error("Failed to unlock {family} account: {reason}")]
    AccountUnlockFailed {
        /// Chain family of the account
        family: ChainFamily,
        /// Underlying reason
        reason: String,
    },

    /// Configuration rejected by validation.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Time-lock too close to zero to fit the safety skew below it.
    #[error("Time-lock {timelock} is shorter than the safety skew {skew}")]
    TimelockTooShort {
        /// Requested time-lock
        timelock: u64,
        /// Configured safety skew
        skew: u64,
    },

    /// Funding account cannot cover the lock.
    #[error("Insufficient funds: {0}")]
    InsufficientFunds(String),

    /// Chain unreachable or transaction still pending after the retry budget.
    #[error("Chain {chain} unavailable after {attempts} attempts: {reason}")]
    ChainUnavailable {
        /// Token symbol of the leg
        chain: String,
        /// Attempts made
        attempts: u32,
        /// Last failure
        reason: String,
    },

    /// Counterparty contract does not match what was agreed.
    #[error("Audit mismatch on {field}: expected {expected}, got {actual}")]
    AuditMismatch {
        /// Mismatching field
        field: &'static str,
        /// Expected value
        expected: String,
        /// Observed value
        actual: String,
    },

    /// Secret does not hash to the agreed secret hash.
    #[error("Secret does not match secret hash")]
    SecretMismatch,

    /// Contract already redeemed.
    #[error("HTLC already redeemed")]
    AlreadyRedeemed,

    /// Contract already refunded.
    #[error("HTLC already refunded")]
    AlreadyRefunded,

    /// Refund found the contract already settled by either path.
    #[error("HTLC already claimed")]
    AlreadyClaimed,

    /// Redeem attempted after expiry.
    #[error("HTLC expired")]
    Expired,

    /// Refund attempted before expiry.
    #[error("HTLC not yet expired")]
    NotYetExpired,

    /// Swap state store failure.
    #[error("Store error: {0}")]
    Store(String),

    /// Run cancelled by shutdown.
    #[error("Cancelled")]
    Cancelled,
}

impl SwapError {
    /// Classify the error.
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::UnsupportedToken(_)
            | Self::UnsupportedPairing { .. }
            | Self::MalformedAmount(_)
            | Self::MalformedHash(_)
            | Self::AccountUnlockFailed { .. }
            | Self::InvalidConfig(_)
            | Self::TimelockTooShort { .. }
            | Self::InsufficientFunds(_) => ErrorClass::Configuration,
            Self::ChainUnavailable { .. } => ErrorClass::Transient,
            Self::AuditMismatch { .. } | Self::SecretMismatch => ErrorClass::ProtocolSafety,
            Self::AlreadyRedeemed | Self::AlreadyRefunded | Self::AlreadyClaimed => {
                ErrorClass::AlreadyResolved
            }
            Self::Expired | Self::NotYetExpired => ErrorClass::Lifecycle,
            Self::Store(_) => ErrorClass::Storage,
            Self::Cancelled => ErrorClass::Cancelled,
        }
    }

    /// Retry on the next poll.
    pub fn is_retryable(&self) -> bool {
        self.class() == ErrorClass::Transient
    }

    /// Halts the swap for manual intervention.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self.class(),
            ErrorClass::Configuration | ErrorClass::ProtocolSafety | ErrorClass::Storage
        )
    }
}

/// Fatal result of an orchestrator run.
///
/// Carries enough context to resume or to hand the swap to an operator.
#[derive(Clone, Debug)]
pub struct SwapFailure {
    /// Swap identifier.
    pub swap_id: SwapId,
    /// Leg the error was raised on.
    pub leg: LegRole,
    /// Last persisted phase.
    pub phase: SwapPhase,
    /// Last audited state of the failing leg, if any.
    pub last_audited: Option<LegState>,
    /// The error.
    pub error: SwapError,
}

impl fmt::Display for SwapFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "swap {} halted in {} on {} leg: {}",
            hex::encode(self.swap_id),
            self.phase,
            self.leg,
            self.error
        )
    }
}

impl std::error::Error for SwapFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}
