//! Account chain binder for the chain's native asset.
//!
//! One swap contract holds every lock, keyed by swap id. The secret stays in
//! contract storage after a redeem.

use super::htlc::{BinderSettings, HtlcCore};
use crate::config::SwapConfig;
use crate::domain::{ChainFamily, LegDescriptor, LegState, SecretAudit, SecureSecret, SwapError, TxRef};
use crate::ports::{BinderFactory, ChainBackend, ContractKey, LedgerBinder, SigningAccount};
use async_trait::async_trait;
use std::sync::Arc;

/// Storage slot of a swap inside the token's swap contract.
pub fn contract_slot(leg: &LegDescriptor) -> Result<ContractKey, SwapError> {
    let contract = leg.token.contract.as_deref().ok_or_else(|| {
        SwapError::InvalidConfig(format!("no swap contract registered for {}", leg.token.symbol))
    })?;
    Ok(ContractKey(format!("{}:{}", contract, hex::encode(leg.swap_id))))
}

/// Binder for one native-asset leg on an account chain.
pub struct AccountBinder {
    core: HtlcCore,
}

#[async_trait]
impl LedgerBinder for AccountBinder {
    fn descriptor(&self) -> &LegDescriptor {
        &self.core.leg
    }

    async fn initiate(&self) -> Result<TxRef, SwapError> {
        self.core.initiate().await
    }

    async fn audit(&self) -> Result<LegState, SwapError> {
        self.core.audit().await
    }

    async fn audit_secret(&self) -> Result<SecretAudit, SwapError> {
        self.core.audit_secret().await
    }

    async fn redeem(&self, secret: &SecureSecret) -> Result<TxRef, SwapError> {
        self.core.redeem(secret).await
    }

    async fn refund(&self) -> Result<TxRef, SwapError> {
        self.core.refund().await
    }
}

/// Creates [`AccountBinder`]s against one chain backend.
pub struct AccountBinderFactory {
    backend: Arc<dyn ChainBackend>,
    settings: BinderSettings,
}

impl AccountBinderFactory {
    /// Factory using `config`'s account settings.
    pub fn new(backend: Arc<dyn ChainBackend>, config: &SwapConfig) -> Self {
        Self {
            backend,
            settings: BinderSettings::from_config(config, ChainFamily::Account),
        }
    }
}

impl BinderFactory for AccountBinderFactory {
    fn family(&self) -> ChainFamily {
        ChainFamily::Account
    }

    fn bind(
        &self,
        leg: LegDescriptor,
        account: SigningAccount,
    ) -> Result<Box<dyn LedgerBinder>, SwapError> {
        let key = contract_slot(&leg)?;
        Ok(Box::new(AccountBinder {
            core: HtlcCore::new(leg, account, key, self.backend.clone(), self.settings.clone()),
        }))
    }
}
