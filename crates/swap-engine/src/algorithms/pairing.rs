//! # Token Pairing
//!
//! Which token pairs can be swapped. Checked before any chain I/O.

use crate::domain::{SwapError, TokenInfo};

/// Reject pairs no binder combination can serve.
///
/// Two different ledgers always pair. Both legs on one ledger only work on
/// account chains, where one address holds both assets.
pub fn check_pairing(send: &TokenInfo, receive: &TokenInfo) -> Result<(), SwapError> {
    let unsupported = || SwapError::UnsupportedPairing {
        send: send.symbol.clone(),
        receive: receive.symbol.clone(),
    };

    if send.symbol == receive.symbol {
        return Err(unsupported());
    }
    if send.ledger != receive.ledger {
        return Ok(());
    }
    if send.family.is_account_based() && receive.family.is_account_based() {
        Ok(())
    } else {
        Err(unsupported())
    }
}

/// Both legs settle on one ledger.
pub fn is_same_chain(send: &TokenInfo, receive: &TokenInfo) -> bool {
    send.ledger == receive.ledger
}
