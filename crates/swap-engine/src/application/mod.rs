//! # Application Layer
//!
//! Swap orchestration services on top of the ports.
//!
//! - [`ContractBuilder`]: request to bound legs
//! - [`SwapExecutor`]: interactive protocol run
//! - [`SwapWatcher`]: durable, reconciling protocol run
//! - [`SwapStore`]: typed swap records over the key-value port

mod builder;
mod delay;
mod executor;
pub mod reconcile;
mod run;
mod shutdown;
mod store;
mod watcher;

#[cfg(test)]
pub(crate) mod testkit;

pub use builder::ContractBuilder;
pub use delay::DelayTracker;
pub use executor::SwapExecutor;
pub use reconcile::{reconcile, Action, Observation};
pub use run::SwapContext;
pub use shutdown::{shutdown_channel, ShutdownHandle, ShutdownSignal};
pub use store::{record_key, SwapStore};
pub use watcher::SwapWatcher;
