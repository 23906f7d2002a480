//! # Inbound Ports
//!
//! What the engine offers: building a bound swap from a request, and running
//! an orchestrator over it.

use super::outbound::LedgerBinder;
use crate::domain::{SecureSecret, SwapError, SwapFailure, SwapId, SwapOutcome, SwapRequest};
use async_trait::async_trait;

/// Both legs of a swap, bound to their chains.
pub struct BoundSwap {
    /// Swap identifier.
    pub id: SwapId,
    /// Our outgoing leg.
    pub native: Box<dyn LedgerBinder>,
    /// Our incoming leg.
    pub foreign: Box<dyn LedgerBinder>,
    /// We lock first and hold the secret.
    pub initiates_first: bool,
    /// Preimage, known up front only to the first mover.
    pub secret: Option<SecureSecret>,
}

impl std::fmt::Debug for BoundSwap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoundSwap")
            .field("id", &hex::encode(self.id))
            .field("native", self.native.descriptor())
            .field("foreign", self.foreign.descriptor())
            .field("initiates_first", &self.initiates_first)
            .finish()
    }
}

/// Turns a user request into two complementary bound legs.
pub trait SwapContractBuilder: Send + Sync {
    /// Validate, resolve accounts, skew expiries and bind both legs.
    fn build(&self, request: SwapRequest) -> Result<BoundSwap, SwapError>;
}

/// Drives one swap to a terminal phase.
#[async_trait]
pub trait SwapOrchestrator: Send {
    /// Swap being driven.
    fn swap_id(&self) -> SwapId;

    /// Run until done, refunded, abandoned, halted or suspended.
    async fn run(&mut self) -> Result<SwapOutcome, SwapFailure>;
}
