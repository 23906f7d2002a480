//! Cross-party integration scenarios.

pub mod fixtures;

mod e2e_swap;
mod recovery;
mod refund;
