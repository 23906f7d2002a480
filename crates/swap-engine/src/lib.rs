//! # Swap Engine
//!
//! Trustless atomic swaps between two independent ledgers using Hash
//! Time-Locked Contracts (HTLC).
//!
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Purpose
//!
//! Two counterparties each lock funds on their own chain behind one SHA-256
//! secret hash. Either both sides complete or both sides reclaim their funds:
//! - The first mover's lock expires later, by a configurable safety skew
//! - Every counterparty lock is audited before we commit or reveal anything
//! - Redeeming reveals the secret on chain, so the other side can redeem too
//!
//! ## Safety Rules
//!
//! | Rule | Enforced by |
//! |------|-------------|
//! | Same secret hash on both legs | [`ContractBuilder`], audit |
//! | First mover: `foreign.expiry + skew <= native.expiry` | [`audit_counterparty_lock`] |
//! | Second mover: `foreign.expiry >= native.expiry + skew` | [`audit_counterparty_lock`] |
//! | No double lock | idempotent [`LedgerBinder::initiate`] |
//! | Last phase always persisted | [`SwapStore`] |
//!
//! ## Module Structure
//!
//! ```text
//! swap-engine/
//! ├── domain/          # SwapRequest, LegDescriptor, SwapRecord, SwapPhase, errors
//! ├── algorithms/      # Time-lock skew, pairing, audit, hash locks, retry
//! ├── ports/           # LedgerBinder, ChainBackend, stores, keystore, notifier
//! ├── adapters/        # UTXO/account/token binders, simulated ledger, in-memory adapters
//! ├── application/     # ContractBuilder, SwapExecutor, SwapWatcher, reconcile
//! ├── config.rs        # SwapConfig
//! └── metrics.rs       # Prometheus metrics (feature "metrics")
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod algorithms;
pub mod application;
pub mod config;
pub mod domain;
pub mod metrics;
pub mod ports;

// Re-exports
pub use algorithms::{
    audit_counterparty_lock, calculate_timelocks, check_pairing, create_hash_lock,
    decode_secret_hash, parse_amount, verify_secret, RetryPolicy,
};
pub use application::{
    reconcile, shutdown_channel, Action, ContractBuilder, Observation, ShutdownHandle,
    ShutdownSignal, SwapContext, SwapExecutor, SwapStore, SwapWatcher,
};
pub use config::SwapConfig;
pub use domain::{
    ChainFamily, DelayKind, ErrorClass, Hash, LegDescriptor, LegRole, LegState, LockInfo,
    Passphrase, SecretAudit, SecureSecret, SwapError, SwapFailure, SwapId, SwapOutcome,
    SwapPhase, SwapRecord, SwapRequest, TokenInfo, TxRef, DEFAULT_SAFETY_SKEW_SECS,
};
pub use ports::{
    AccountProvider, BinderFactory, BoundSwap, ChainBackend, DelayNotifier, LedgerBinder,
    SigningAccount, SwapContractBuilder, SwapOrchestrator, SwapStateStore, TimeSource,
    TokenRegistry,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
