//! # Atomic Swap Test Suite
//!
//! Scenarios that need both parties: two orchestrators, each with its own
//! keystore and state store, driving one swap over shared simulated ledgers.
//!
//! ## Structure
//!
//! ```text
//! tests/
//! ├── benches/
//! │   └── swap_benchmarks.rs  # Contract building and reconciliation
//! └── src/integration/
//!     ├── fixtures.rs         # Two-party harness
//!     ├── e2e_swap.rs         # Happy paths (cross-chain and same-chain)
//!     ├── recovery.rs         # Crash and restart
//!     └── refund.rs           # Absent or dishonest counterparty
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p swap-tests
//! cargo test -p swap-tests integration::recovery::
//! cargo bench -p swap-tests
//! ```

pub mod integration;
