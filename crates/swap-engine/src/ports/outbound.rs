//! # Outbound Ports
//!
//! Everything the engine needs from the outside world: chain access, ledger
//! binders, keystore, token registry, key-value store, delay notifier, clock.

use crate::domain::{
    ChainFamily, Hash, LegDescriptor, LegState, Passphrase, SecretAudit, SecureSecret, SwapError,
    SwapId, TokenInfo, TxRef, DelayKind,
};
use async_trait::async_trait;
use primitive_types::U256;
use std::fmt;
use thiserror::Error;

// =============================================================================
// Chain backend
// =============================================================================

/// Why a chain refused a transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RejectReason {
    /// Preimage does not hash to the lock.
    HashMismatch,
    /// Contract already redeemed.
    AlreadyRedeemed,
    /// Contract already refunded.
    AlreadyRefunded,
    /// Redeem after expiry.
    Expired,
    /// Refund before expiry.
    NotExpired,
    /// Sender may not perform this action.
    Unauthorized,
    /// Balance or allowance too low.
    InsufficientFunds,
    /// A contract already exists under this key.
    AlreadyExists,
    /// No contract under this key.
    UnknownContract,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Raw chain failure.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ChainError {
    /// Node unreachable or timed out.
    #[error("chain unavailable: {0}")]
    Unavailable(String),
    /// Transaction rejected.
    #[error("transaction rejected: {0}")]
    Rejected(RejectReason),
}

impl ChainError {
    /// Translate into the swap taxonomy for the leg trading `chain`.
    pub fn into_swap_error(self, chain: &str) -> SwapError {
        match self {
            ChainError::Unavailable(reason) => SwapError::ChainUnavailable {
                chain: chain.to_string(),
                attempts: 1,
                reason,
            },
            ChainError::Rejected(reason) => match reason {
                RejectReason::HashMismatch => SwapError::SecretMismatch,
                RejectReason::AlreadyRedeemed => SwapError::AlreadyRedeemed,
                RejectReason::AlreadyRefunded => SwapError::AlreadyRefunded,
                RejectReason::Expired => SwapError::Expired,
                RejectReason::NotExpired => SwapError::NotYetExpired,
                RejectReason::InsufficientFunds => {
                    SwapError::InsufficientFunds(format!("{chain} lock rejected"))
                }
                RejectReason::Unauthorized => SwapError::AuditMismatch {
                    field: "sender",
                    expected: "authorized party".to_string(),
                    actual: format!("rejected by {chain}"),
                },
                RejectReason::AlreadyExists | RejectReason::UnknownContract => {
                    SwapError::AuditMismatch {
                        field: "contract",
                        expected: "consistent contract state".to_string(),
                        actual: reason.to_string(),
                    }
                }
            },
        }
    }
}

/// Key under which a chain stores one HTLC.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ContractKey(pub String);

impl fmt::Display for ContractKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Transaction as submitted to, and later read back from, a chain.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LedgerTx {
    /// Create an HTLC.
    Lock {
        /// Contract key.
        key: ContractKey,
        /// Token symbol.
        token: String,
        /// Secret hash.
        secret_hash: Hash,
        /// Locked value.
        value: U256,
        /// Expiry (UNIX seconds).
        expiry: u64,
        /// Funding address.
        funder: String,
        /// Spending address.
        spender: String,
    },
    /// Redeem an HTLC. The secret is public once submitted.
    Redeem {
        /// Contract key.
        key: ContractKey,
        /// Preimage.
        secret: SecureSecret,
        /// Submitting address.
        by: String,
    },
    /// Refund an expired HTLC.
    Refund {
        /// Contract key.
        key: ContractKey,
        /// Submitting address.
        by: String,
    },
    /// Allow `spender` to pull `value` of `token` from `owner`.
    Approve {
        /// Token symbol.
        token: String,
        /// Token owner.
        owner: String,
        /// Approved spender (the swap contract).
        spender: String,
        /// Allowance.
        value: U256,
    },
}

impl LedgerTx {
    /// Transaction kind.
    pub fn kind(&self) -> TxKind {
        match self {
            LedgerTx::Lock { .. } => TxKind::Lock,
            LedgerTx::Redeem { .. } => TxKind::Redeem,
            LedgerTx::Refund { .. } => TxKind::Refund,
            LedgerTx::Approve { .. } => TxKind::Approve,
        }
    }
}

/// Transaction kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TxKind {
    /// HTLC lock.
    Lock,
    /// HTLC redeem.
    Redeem,
    /// HTLC refund.
    Refund,
    /// Token approval.
    Approve,
}

/// Settlement status of an on-chain HTLC.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ContractStatus {
    /// Funds locked.
    Locked,
    /// Redeemed by `tx`. Account chains expose the secret in storage; script
    /// chains only in the redeeming transaction's witness.
    Redeemed {
        /// Redeeming transaction.
        tx: TxRef,
        /// Secret, when readable from contract storage.
        secret: Option<SecureSecret>,
    },
    /// Refunded by `tx`.
    Refunded {
        /// Refunding transaction.
        tx: TxRef,
    },
}

/// On-chain HTLC as read from a chain.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContractView {
    /// Contract key.
    pub key: ContractKey,
    /// Token symbol.
    pub token: String,
    /// Secret hash.
    pub secret_hash: Hash,
    /// Locked value.
    pub value: U256,
    /// Expiry (UNIX seconds).
    pub expiry: u64,
    /// Funding address.
    pub funder: String,
    /// Spending address.
    pub spender: String,
    /// Lock transaction.
    pub lock_tx: TxRef,
    /// Settlement status.
    pub status: ContractStatus,
}

/// Raw access to one chain, used by ledger binders.
#[async_trait]
pub trait ChainBackend: Send + Sync {
    /// Submit a transaction. Accepted is not confirmed.
    async fn submit(&self, tx: LedgerTx) -> Result<TxRef, ChainError>;

    /// Read the HTLC under `key`.
    async fn contract(&self, key: &ContractKey) -> Result<Option<ContractView>, ChainError>;

    /// Read a submitted transaction.
    async fn transaction(&self, tx: &TxRef) -> Result<Option<LedgerTx>, ChainError>;

    /// Confirmations of `tx`. `None` if unknown to the chain.
    async fn confirmations(&self, tx: &TxRef) -> Result<Option<u64>, ChainError>;

    /// Token allowance granted by `owner` to `spender`.
    async fn allowance(&self, token: &str, owner: &str, spender: &str)
        -> Result<U256, ChainError>;

    /// Chain time (UNIX seconds) used for expiry checks.
    async fn now(&self) -> Result<u64, ChainError>;
}

// =============================================================================
// Ledger binders
// =============================================================================

/// HTLC operations on one leg, with chain-independent semantics.
///
/// Mutating calls return only after the family's confirmation depth. An
/// accepted but unconfirmed transaction surfaces as `ChainUnavailable`.
#[async_trait]
pub trait LedgerBinder: Send + Sync {
    /// The leg this binder drives.
    fn descriptor(&self) -> &LegDescriptor;

    /// Lock the leg. Idempotent: an existing matching contract returns its
    /// lock transaction without locking twice.
    async fn initiate(&self) -> Result<TxRef, SwapError>;

    /// Current state of the leg.
    async fn audit(&self) -> Result<LegState, SwapError>;

    /// Secret revealed by a redeem of this leg.
    async fn audit_secret(&self) -> Result<SecretAudit, SwapError>;

    /// Redeem with the secret.
    async fn redeem(&self, secret: &SecureSecret) -> Result<TxRef, SwapError>;

    /// Refund after expiry.
    async fn refund(&self) -> Result<TxRef, SwapError>;
}

/// Unlocked local account for one chain family.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SigningAccount {
    /// Key family.
    pub family: ChainFamily,
    /// Address on that family's chain.
    pub address: String,
}

/// Creates binders for one chain family.
pub trait BinderFactory: Send + Sync {
    /// Family served.
    fn family(&self) -> ChainFamily;

    /// Bind a leg to the unlocked account.
    fn bind(
        &self,
        leg: LegDescriptor,
        account: SigningAccount,
    ) -> Result<Box<dyn LedgerBinder>, SwapError>;
}

// =============================================================================
// Keystore
// =============================================================================

/// Keystore errors.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum AccountError {
    /// Passphrase rejected.
    #[error("invalid passphrase")]
    InvalidPassphrase,
    /// No key for this family.
    #[error("no account for {0}")]
    NoAccountForChain(ChainFamily),
}

/// Local keystore.
pub trait AccountProvider: Send + Sync {
    /// Unlock the account for `family`.
    fn unlock(
        &self,
        passphrase: &Passphrase,
        family: ChainFamily,
    ) -> Result<SigningAccount, AccountError>;
}

// =============================================================================
// Token registry
// =============================================================================

/// Symbol lookup.
pub trait TokenRegistry: Send + Sync {
    /// Token for `symbol`, or `UnsupportedToken`.
    fn token(&self, symbol: &str) -> Result<TokenInfo, SwapError>;

    /// Parse a hex secret hash, or `MalformedHash`.
    fn decode_secret_hash(&self, encoded: &str) -> Result<Hash, SwapError> {
        crate::algorithms::decode_secret_hash(encoded)
    }
}

// =============================================================================
// Swap state store
// =============================================================================

/// Key-value store errors.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    /// Backend failure.
    #[error("store backend error: {0}")]
    Backend(String),
    /// Value could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<StoreError> for SwapError {
    fn from(err: StoreError) -> Self {
        SwapError::Store(err.to_string())
    }
}

/// Byte-keyed persistent store with read-after-write per key.
pub trait SwapStateStore: Send + Sync {
    /// Read a value.
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError>;

    /// Write a value.
    fn put(&self, key: &[u8], value: &[u8]) -> Result<(), StoreError>;

    /// Remove a value.
    fn delete(&self, key: &[u8]) -> Result<(), StoreError>;
}

// =============================================================================
// Delay notifier
// =============================================================================

/// Notifier errors. Logged, never propagated.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum NotifierError {
    /// Complaint could not be delivered.
    #[error("notifier unreachable: {0}")]
    Unreachable(String),
}

/// Receives complaints about late counterparties.
#[async_trait]
pub trait DelayNotifier: Send + Sync {
    /// Report a late counterparty action.
    async fn complain(&self, swap_id: SwapId, kind: DelayKind) -> Result<(), NotifierError>;
}

// =============================================================================
// Clock
// =============================================================================

/// Orchestrator clock (UNIX seconds).
pub trait TimeSource: Send + Sync {
    /// Current time.
    fn now(&self) -> u64;
}
