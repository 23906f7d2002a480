//! UTXO-script chain binder.
//!
//! The HTLC lives at the address of a script committing to the secret hash,
//! both parties and the expiry, so the contract key is the script hash. The
//! secret only appears in the witness of the redeeming transaction.

use super::htlc::{BinderSettings, HtlcCore};
use crate::config::SwapConfig;
use crate::domain::{ChainFamily, LegDescriptor, LegState, SecretAudit, SecureSecret, SwapError, TxRef};
use crate::ports::{BinderFactory, ChainBackend, ContractKey, LedgerBinder, SigningAccount};
use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::sync::Arc;

/// Script hash identifying the HTLC output.
pub fn script_key(leg: &LegDescriptor) -> ContractKey {
    let mut hasher = Sha256::new();
    hasher.update(b"htlc-script");
    hasher.update(leg.secret_hash);
    hasher.update(leg.spending_address.as_bytes());
    hasher.update([0u8]);
    hasher.update(leg.funding_address.as_bytes());
    hasher.update([0u8]);
    hasher.update(leg.expiry.to_be_bytes());
    ContractKey(hex::encode(hasher.finalize()))
}

/// Binder for one leg on a UTXO chain.
pub struct UtxoBinder {
    core: HtlcCore,
}

#[async_trait]
impl LedgerBinder for UtxoBinder {
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

/// Creates [`UtxoBinder`]s against one chain backend.
pub struct UtxoBinderFactory {
    backend: Arc<dyn ChainBackend>,
    settings: BinderSettings,
}

impl UtxoBinderFactory {
    /// Factory using `config`'s UTXO settings.
    pub fn new(backend: Arc<dyn ChainBackend>, config: &SwapConfig) -> Self {
        Self {
            backend,
            settings: BinderSettings::from_config(config, ChainFamily::Utxo),
        }
    }
}

impl BinderFactory for UtxoBinderFactory {
    fn family(&self) -> ChainFamily {
        ChainFamily::Utxo
    }

    fn bind(
        &self,
        leg: LegDescriptor,
        account: SigningAccount,
    ) -> Result<Box<dyn LedgerBinder>, SwapError> {
        let key = script_key(&leg);
        Ok(Box::new(UtxoBinder {
            core: HtlcCore::new(leg, account, key, self.backend.clone(), self.settings.clone()),
        }))
    }
}
