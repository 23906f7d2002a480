//! # Adapters Layer (Hexagonal Architecture)
//!
//! Implements the outbound ports: ledger binders per chain family, a
//! simulated ledger for tests and demos, clocks, keystore, token registry,
//! swap state storage and delay notifiers.

pub mod binders;
mod keystore;
mod memory_store;
mod notifier;
mod registry;
mod simulated_ledger;
mod time;

pub use binders::{
    AccountBinder, AccountBinderFactory, BinderRegistry, BinderSettings, TokenBinder,
    TokenBinderFactory, UtxoBinder, UtxoBinderFactory,
};
pub use keystore::InMemoryKeystore;
pub use memory_store::InMemorySwapStateStore;
pub use notifier::{LoggingNotifier, RecordingNotifier};
pub use registry::{StaticTokenRegistry, ETH_SWAP_CONTRACT, WBTC_SWAP_CONTRACT};
pub use simulated_ledger::{LedgerKind, SimulatedLedger};
pub use time::{SimulatedClock, SystemTimeSource};
