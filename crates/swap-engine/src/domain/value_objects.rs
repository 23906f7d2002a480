//! # Domain Value Objects
//!
//! Immutable value types shared by the builder, binders and orchestrators.

use super::errors::Hash;
use super::secure_secret::SecureSecret;
use primitive_types::U256;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Chain family a binder is registered for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ChainFamily {
    /// UTXO-script chain (Bitcoin-like).
    Utxo,
    /// Native asset of an account chain (Ethereum-like).
    Account,
    /// Token contract on an account chain (ERC-20-like).
    AccountToken,
}

impl ChainFamily {
    /// Confirmations required before a transaction counts as final.
    pub fn default_confirmations(&self) -> u64 {
        match self {
            ChainFamily::Utxo => 6,
            ChainFamily::Account => 12,
            ChainFamily::AccountToken => 12,
        }
    }

    /// Family whose keys sign for this family.
    ///
    /// Tokens are held by the account chain's key.
    pub fn key_family(&self) -> ChainFamily {
        match self {
            ChainFamily::AccountToken => ChainFamily::Account,
            other => *other,
        }
    }

    /// Account-model chains can host both legs of a swap.
    pub fn is_account_based(&self) -> bool {
        matches!(self, ChainFamily::Account | ChainFamily::AccountToken)
    }

    /// Stable lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            ChainFamily::Utxo => "utxo",
            ChainFamily::Account => "account",
            ChainFamily::AccountToken => "account-token",
        }
    }
}

impl fmt::Display for ChainFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Registry entry for a swappable token.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenInfo {
    /// Ticker symbol, e.g. `BTC`.
    pub symbol: String,
    /// Chain family handling the token.
    pub family: ChainFamily,
    /// Ledger the token lives on. Two tokens with the same ledger share one chain.
    pub ledger: String,
    /// Decimal places of the smallest unit.
    pub decimals: u8,
    /// Swap contract address on account chains.
    pub contract: Option<String>,
}

impl TokenInfo {
    /// Create a token entry.
    pub fn new(symbol: &str, family: ChainFamily, ledger: &str, decimals: u8) -> Self {
        Self {
            symbol: symbol.to_string(),
            family,
            ledger: ledger.to_string(),
            decimals,
            contract: None,
        }
    }

    /// Attach the swap contract address.
    pub fn with_contract(mut self, contract: &str) -> Self {
        self.contract = Some(contract.to_string());
        self
    }
}

/// Chain-specific transaction reference.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TxRef(pub String);

impl fmt::Display for TxRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Which side of the swap a leg is, seen from the local party.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LegRole {
    /// Our outgoing leg. We fund it.
    Native,
    /// Our incoming leg. The counterparty funds it.
    Foreign,
}

impl fmt::Display for LegRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LegRole::Native => f.write_str("native"),
            LegRole::Foreign => f.write_str("foreign"),
        }
    }
}

/// Late counterparty action reported to a delay notifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DelayKind {
    /// Counterparty has not locked its leg.
    CounterpartyInitiation,
    /// Counterparty locked a leg that failed the audit.
    WrongCounterpartyInitiation,
    /// Counterparty has not redeemed our leg.
    CounterpartyRedemption,
}

impl DelayKind {
    /// Stable label.
    pub fn as_str(&self) -> &'static str {
        match self {
            DelayKind::CounterpartyInitiation => "counterparty_initiation",
            DelayKind::WrongCounterpartyInitiation => "wrong_counterparty_initiation",
            DelayKind::CounterpartyRedemption => "counterparty_redemption",
        }
    }
}

/// On-chain lock parameters as observed by an audit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LockInfo {
    /// Secret hash guarding the lock.
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
    pub tx: TxRef,
}

/// Audited state of one leg.
#[derive(Clone, Debug)]
pub enum LegState {
    /// No contract on chain.
    NotFound,
    /// Locked and redeemable.
    Initiated(LockInfo),
    /// Redeemed. Carries the revealed secret.
    Redeemed(SecureSecret),
    /// Refunded to the funder.
    Refunded,
    /// Locked but past expiry, refundable.
    Expired(LockInfo),
}

impl LegState {
    /// Short label for logs.
    pub fn label(&self) -> &'static str {
        match self {
            LegState::NotFound => "not_found",
            LegState::Initiated(_) => "initiated",
            LegState::Redeemed(_) => "redeemed",
            LegState::Refunded => "refunded",
            LegState::Expired(_) => "expired",
        }
    }
}

/// Result of looking for the revealed secret.
#[derive(Clone, Debug)]
pub enum SecretAudit {
    /// The leg was redeemed and the secret is public.
    Revealed(SecureSecret),
    /// Not redeemed yet.
    NotYetRevealed,
}

/// Persisted swap phase.
///
/// `Initiating`, `Redeeming` and `Refunding` are also the intent phases the
/// watcher writes before acting.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum SwapPhase {
    /// Nothing done yet.
    #[default]
    Start,
    /// Native lock about to be submitted.
    Initiating,
    /// Native lock confirmed.
    NativeInitiated,
    /// Counterparty leg audited and acceptable.
    ForeignAudited,
    /// Foreign redeem about to be submitted.
    Redeeming,
    /// Foreign leg redeemed.
    Done,
    /// Native refund about to be submitted.
    Refunding,
    /// Native leg refunded.
    Refunded,
    /// Counterparty never locked in time and nothing was committed.
    Abandoned,
}

impl SwapPhase {
    /// No further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Refunded | Self::Abandoned)
    }

    /// Written before the matching chain action.
    pub fn is_intent(&self) -> bool {
        matches!(self, Self::Initiating | Self::Redeeming | Self::Refunding)
    }
}

impl fmt::Display for SwapPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// How an orchestrator run ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SwapOutcome {
    /// Foreign leg redeemed.
    Done,
    /// Native leg refunded.
    Refunded,
    /// Counterparty never locked. Nothing committed.
    Abandoned,
    /// Shutdown requested. Phase persisted, run can resume.
    Suspended(SwapPhase),
}

impl SwapOutcome {
    /// Outcome for a terminal phase.
    pub fn from_terminal(phase: SwapPhase) -> Option<Self> {
        match phase {
            SwapPhase::Done => Some(Self::Done),
            SwapPhase::Refunded => Some(Self::Refunded),
            SwapPhase::Abandoned => Some(Self::Abandoned),
            _ => None,
        }
    }

    /// Stable label.
    pub fn as_str(&self) -> &'static str {
        match self {
            SwapOutcome::Done => "done",
            SwapOutcome::Refunded => "refunded",
            SwapOutcome::Abandoned => "abandoned",
            SwapOutcome::Suspended(_) => "suspended",
        }
    }
}
