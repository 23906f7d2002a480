//! # Ledger Binders
//!
//! One binder per chain family, resolved through a [`BinderRegistry`]
//! populated at startup.
//!
//! | Family | Binder | Contract key | Secret recovery |
//! |--------|--------|--------------|-----------------|
//! | UTXO | [`UtxoBinder`] | script hash | redeem witness |
//! | Account | [`AccountBinder`] | swap contract + id | contract storage |
//! | Token | [`TokenBinder`] | swap contract + id | contract storage |

mod account;
mod htlc;
mod token;
mod utxo;

pub use account::{contract_slot, AccountBinder, AccountBinderFactory};
pub use htlc::BinderSettings;
pub use token::{TokenBinder, TokenBinderFactory};
pub use utxo::{script_key, UtxoBinder, UtxoBinderFactory};

use crate::domain::{ChainFamily, LegDescriptor, SwapError};
use crate::ports::{BinderFactory, LedgerBinder, SigningAccount};
use std::collections::HashMap;
use std::sync::Arc;

/// Binder factories keyed by chain family.
#[derive(Clone, Default)]
pub struct BinderRegistry {
    factories: HashMap<ChainFamily, Arc<dyn BinderFactory>>,
}

impl BinderRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `factory` for its family, replacing any previous one.
    pub fn register(mut self, factory: Arc<dyn BinderFactory>) -> Self {
        self.factories.insert(factory.family(), factory);
        self
    }

    /// A binder exists for `family`.
    pub fn supports(&self, family: ChainFamily) -> bool {
        self.factories.contains_key(&family)
    }

    /// Bind `leg` with the factory for its token's family.
    pub fn bind(
        &self,
        leg: LegDescriptor,
        account: SigningAccount,
    ) -> Result<Box<dyn LedgerBinder>, SwapError> {
        let factory = self
            .factories
            .get(&leg.token.family)
            .ok_or_else(|| SwapError::UnsupportedToken(leg.token.symbol.clone()))?;
        factory.bind(leg, account)
    }
}
