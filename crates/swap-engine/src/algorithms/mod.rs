//! # Algorithms Module
//!
//! Pure swap logic: time-lock skew, pairing rules, counterparty audit,
//! hash locks, amount parsing and bounded retry.

pub mod amount;
pub mod audit;
pub mod pairing;
pub mod retry;
pub mod secret;
pub mod timelock;

pub use amount::parse_amount;
pub use audit::audit_counterparty_lock;
pub use pairing::{check_pairing, is_same_chain};
pub use retry::{retry_transient, RetryPolicy};
pub use secret::{create_hash_lock, decode_secret_hash, verify_secret};
pub use timelock::calculate_timelocks;
