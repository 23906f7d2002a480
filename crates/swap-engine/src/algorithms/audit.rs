//! # Counterparty Audit
//!
//! Checks a counterparty lock against the leg we expect before we commit or
//! reveal anything.

use crate::domain::{
    invariant_first_mover_window, invariant_hashlock_match, invariant_second_mover_window,
    LegDescriptor, LockInfo, SwapError,
};

/// Audit the foreign lock.
///
/// The lock must carry our secret hash, pay at least the agreed value to our
/// address, and leave the role's skew window against `native_expiry`.
pub fn audit_counterparty_lock(
    lock: &LockInfo,
    expected: &LegDescriptor,
    native_expiry: u64,
    skew: u64,
    initiates_first: bool,
) -> Result<(), SwapError> {
    if !invariant_hashlock_match(&lock.secret_hash, &expected.secret_hash) {
        return Err(SwapError::AuditMismatch {
            field: "secret_hash",
            expected: hex::encode(expected.secret_hash),
            actual: hex::encode(lock.secret_hash),
        });
    }
    if lock.value < expected.value {
        return Err(SwapError::AuditMismatch {
            field: "value",
            expected: format!(">= {}", expected.value),
            actual: lock.value.to_string(),
        });
    }
    if lock.spender != expected.spending_address {
        return Err(SwapError::AuditMismatch {
            field: "spender",
            expected: expected.spending_address.clone(),
            actual: lock.spender.clone(),
        });
    }
    if initiates_first {
        invariant_first_mover_window(native_expiry, lock.expiry, skew)
    } else {
        invariant_second_mover_window(native_expiry, lock.expiry, skew)
    }
}
