//! # Domain Invariants
//!
//! Safety rules every swap must satisfy.

use super::errors::{Hash, SwapError};
use sha2::{Digest, Sha256};

/// Default safety skew between the two expiries (24 hours).
pub const DEFAULT_SAFETY_SKEW_SECS: u64 = 24 * 3600;

/// Invariant: SHA-256(secret) equals the secret hash.
pub fn invariant_secret_matches(secret: &[u8; 32], secret_hash: &Hash) -> bool {
    let digest: [u8; 32] = Sha256::digest(secret).into();
    digest == *secret_hash
}

/// Invariant: both legs are guarded by the same secret hash.
pub fn invariant_hashlock_match(native: &Hash, foreign: &Hash) -> bool {
    native == foreign
}

/// Invariant: first mover's window.
///
/// The counterparty's leg must expire at least `skew` before ours, leaving
/// the counterparty time to redeem after we reveal the secret.
pub fn invariant_first_mover_window(
    native_expiry: u64,
    foreign_expiry: u64,
    skew: u64,
) -> Result<(), SwapError> {
    match foreign_expiry.checked_add(skew) {
        Some(latest) if latest <= native_expiry => Ok(()),
        _ => Err(SwapError::AuditMismatch {
            field: "expiry",
            expected: format!("<= {}", native_expiry.saturating_sub(skew)),
            actual: foreign_expiry.to_string(),
        }),
    }
}

/// Invariant: second mover's window.
///
/// The counterparty's leg must outlive ours by at least `skew`, so the
/// secret revealed on our leg can still be used on theirs.
pub fn invariant_second_mover_window(
    native_expiry: u64,
    foreign_expiry: u64,
    skew: u64,
) -> Result<(), SwapError> {
    if foreign_expiry < native_expiry.saturating_add(skew) {
        return Err(SwapError::AuditMismatch {
            field: "expiry",
            expected: format!(">= {}", native_expiry.saturating_add(skew)),
            actual: foreign_expiry.to_string(),
        });
    }
    Ok(())
}
