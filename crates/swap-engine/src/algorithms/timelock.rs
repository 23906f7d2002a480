//! # Time-Lock Skew
//!
//! The first mover's leg expires later, by exactly the safety skew, so the
//! second mover always has time to redeem after the secret is revealed.

/// Expiries for the native and foreign legs.
///
/// Returns `(native_expiry, foreign_expiry)`, or `None` when `timelock` is
/// smaller than `skew` and the earlier expiry cannot be represented.
pub fn calculate_timelocks(timelock: u64, skew: u64, initiates_first: bool) -> Option<(u64, u64)> {
    let earlier = timelock.checked_sub(skew)?;
    if initiates_first {
        Some((timelock, earlier))
    } else {
        Some((earlier, timelock))
    }
}
