//! # Domain Entities
//!
//! The user-level swap request, the per-chain leg descriptors derived from
//! it, and the persisted swap record.

use super::errors::{Hash, SwapId};
use super::secure_secret::{Passphrase, SecureSecret};
use super::value_objects::{SwapPhase, TokenInfo, TxRef};
use primitive_types::U256;
use serde::{Deserialize, Serialize};

/// User-level swap request. Immutable once submitted.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SwapRequest {
    /// Swap identifier shared with the counterparty.
    pub id: SwapId,
    /// Token we send.
    pub send_token: String,
    /// Amount we send, decimal string in the token's smallest unit.
    pub send_amount: String,
    /// Token we receive.
    pub receive_token: String,
    /// Amount we receive, decimal string in the token's smallest unit.
    pub receive_amount: String,
    /// Hex-encoded SHA-256 of the secret.
    pub secret_hash: String,
    /// Overall time-lock (UNIX seconds).
    pub timelock: u64,
    /// Counterparty address on the send chain.
    pub send_to: String,
    /// Counterparty address on the receive chain.
    pub receive_from: String,
    /// We lock first and hold the secret.
    pub initiates_first: bool,
    /// Unlocks the local keystore.
    #[serde(skip)]
    pub passphrase: Passphrase,
    /// Preimage of `secret_hash`. First mover only.
    #[serde(skip)]
    pub secret: Option<SecureSecret>,
}

/// One chain-specific leg of a swap.
///
/// Both legs of a swap share `swap_id` and `secret_hash`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LegDescriptor {
    /// Swap identifier.
    pub swap_id: SwapId,
    /// Token locked on this leg.
    pub token: TokenInfo,
    /// Locked value in the smallest unit.
    pub value: U256,
    /// Secret hash guarding the lock.
    pub secret_hash: Hash,
    /// Expiry (UNIX seconds).
    pub expiry: u64,
    /// Address that funds the lock and receives a refund.
    pub funding_address: String,
    /// Address that may redeem with the secret.
    pub spending_address: String,
}

/// Persisted progress of one swap, keyed by swap id.
///
/// Records are never deleted by the protocol. Terminal records stay.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SwapRecord {
    /// Swap identifier.
    pub id: SwapId,
    /// Current phase.
    pub phase: SwapPhase,
    /// Local party moves first.
    pub initiates_first: bool,
    /// Known preimage. Held from the start by a first mover, recovered from
    /// chain by a second mover.
    pub secret: Option<SecureSecret>,
    /// Native lock transaction.
    pub native_tx: Option<TxRef>,
    /// Foreign lock transaction as audited.
    pub foreign_tx: Option<TxRef>,
    /// Foreign redeem transaction.
    pub redeem_tx: Option<TxRef>,
    /// Native refund transaction.
    pub refund_tx: Option<TxRef>,
    /// Reason the swap halted.
    pub failure: Option<String>,
    /// Last write (UNIX seconds).
    pub updated_at: u64,
}

impl SwapRecord {
    /// Fresh record in `Start`.
    pub fn new(id: SwapId, initiates_first: bool, secret: Option<SecureSecret>, now: u64) -> Self {
        Self {
            id,
            phase: SwapPhase::Start,
            initiates_first,
            secret,
            native_tx: None,
            foreign_tx: None,
            redeem_tx: None,
            refund_tx: None,
            failure: None,
            updated_at: now,
        }
    }

    /// Move to `phase`.
    pub fn advance(&mut self, phase: SwapPhase, now: u64) {
        self.phase = phase;
        self.updated_at = now;
    }

    /// Halted for manual intervention.
    pub fn is_halted(&self) -> bool {
        self.failure.is_some()
    }
}
