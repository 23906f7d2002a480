//! Token-on-account-chain binder.
//!
//! Like the native account binder, except the swap contract pulls the token
//! through an allowance that must be granted and confirmed before the lock.

use super::account::contract_slot;
use super::htlc::{BinderSettings, HtlcCore};
use crate::config::SwapConfig;
use crate::domain::{ChainFamily, LegDescriptor, LegState, SecretAudit, SecureSecret, SwapError, TxRef};
use crate::ports::{BinderFactory, ChainBackend, ChainError, LedgerBinder, LedgerTx, SigningAccount};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

/// Binder for one token leg on an account chain.
pub struct TokenBinder {
    core: HtlcCore,
    swap_contract: String,
}

impl TokenBinder {
    async fn ensure_allowance(&self) -> Result<(), SwapError> {
        let leg = &self.core.leg;
        let allowance = self.core.allowance(&self.swap_contract).await?;
        if allowance >= leg.value {
            return Ok(());
        }
        let approve = LedgerTx::Approve {
            token: leg.token.symbol.clone(),
            owner: self.core.account.address.clone(),
            spender: self.swap_contract.clone(),
            value: leg.value,
        };
        match self.core.submit(approve).await? {
            Ok(tx_ref) => {
                info!(token = %leg.token.symbol, tx = %tx_ref, "[swap] allowance submitted");
                self.core.wait_confirmed(&tx_ref).await
            }
            Err(reason) => Err(ChainError::Rejected(reason).into_swap_error(&leg.token.symbol)),
        }
    }
}

#[async_trait]
impl LedgerBinder for TokenBinder {
    fn descriptor(&self) -> &LegDescriptor {
        &self.core.leg
    }

    async fn initiate(&self) -> Result<TxRef, SwapError> {
        if self.core.read_contract().await?.is_none() {
            self.ensure_allowance().await?;
        }
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

/// Creates [`TokenBinder`]s against one chain backend.
pub struct TokenBinderFactory {
    backend: Arc<dyn ChainBackend>,
    settings: BinderSettings,
}

impl TokenBinderFactory {
    /// Factory using `config`'s token settings.
    pub fn new(backend: Arc<dyn ChainBackend>, config: &SwapConfig) -> Self {
        Self {
            backend,
            settings: BinderSettings::from_config(config, ChainFamily::AccountToken),
        }
    }
}

impl BinderFactory for TokenBinderFactory {
    fn family(&self) -> ChainFamily {
        ChainFamily::AccountToken
    }

    fn bind(
        &self,
        leg: LegDescriptor,
        account: SigningAccount,
    ) -> Result<Box<dyn LedgerBinder>, SwapError> {
        let key = contract_slot(&leg)?;
        let swap_contract = leg.token.contract.clone().unwrap_or_default();
        Ok(Box::new(TokenBinder {
            core: HtlcCore::new(leg, account, key, self.backend.clone(), self.settings.clone()),
            swap_contract,
        }))
    }
}
