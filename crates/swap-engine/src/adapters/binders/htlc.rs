//! Chain-independent HTLC mechanics shared by every binder: bounded
//! retries, confirmation waits, idempotent locking and leg auditing.

use crate::algorithms::{retry_transient, verify_secret, RetryPolicy};
use crate::config::SwapConfig;
use crate::domain::{
    ChainFamily, LegDescriptor, LegState, LockInfo, SecretAudit, SecureSecret, SwapError, TxRef,
};
use crate::ports::{
    ChainBackend, ChainError, ContractKey, ContractStatus, ContractView, LedgerTx, RejectReason,
    SigningAccount,
};
use primitive_types::U256;
use std::sync::Arc;
use tracing::{debug, info};

/// Per-family binder settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BinderSettings {
    /// Confirmation depth.
    pub confirmations: u64,
    /// Backoff for reads and submissions.
    pub read_retry: RetryPolicy,
    /// Backoff while waiting for confirmations.
    pub confirmation_retry: RetryPolicy,
}

impl BinderSettings {
    /// Settings for `family` taken from the engine config.
    pub fn from_config(config: &SwapConfig, family: ChainFamily) -> Self {
        Self {
            confirmations: config.confirmations_for(family),
            read_retry: config.read_retry.clone(),
            confirmation_retry: config.confirmation_retry.clone(),
        }
    }
}

pub(crate) struct HtlcCore {
    pub(crate) leg: LegDescriptor,
    pub(crate) account: SigningAccount,
    pub(crate) key: ContractKey,
    backend: Arc<dyn ChainBackend>,
    settings: BinderSettings,
}

impl HtlcCore {
    pub(crate) fn new(
        leg: LegDescriptor,
        account: SigningAccount,
        key: ContractKey,
        backend: Arc<dyn ChainBackend>,
        settings: BinderSettings,
    ) -> Self {
        Self {
            leg,
            account,
            key,
            backend,
            settings,
        }
    }

    fn chain(&self) -> &str {
        &self.leg.token.symbol
    }

    pub(crate) async fn read_contract(&self) -> Result<Option<ContractView>, SwapError> {
        let (backend, key, chain) = (self.backend.as_ref(), &self.key, self.chain());
        retry_transient(&self.settings.read_retry, chain, || async move {
            backend.contract(key).await.map_err(|e| e.into_swap_error(chain))
        })
        .await
    }

    async fn read_transaction(&self, tx: &TxRef) -> Result<Option<LedgerTx>, SwapError> {
        let (backend, chain) = (self.backend.as_ref(), self.chain());
        retry_transient(&self.settings.read_retry, chain, || async move {
            backend.transaction(tx).await.map_err(|e| e.into_swap_error(chain))
        })
        .await
    }

    async fn chain_now(&self) -> Result<u64, SwapError> {
        let (backend, chain) = (self.backend.as_ref(), self.chain());
        retry_transient(&self.settings.read_retry, chain, || async move {
            backend.now().await.map_err(|e| e.into_swap_error(chain))
        })
        .await
    }

    pub(crate) async fn allowance(&self, spender: &str) -> Result<U256, SwapError> {
        let (backend, chain) = (self.backend.as_ref(), self.chain());
        let owner = self.account.address.as_str();
        retry_transient(&self.settings.read_retry, chain, || async move {
            backend
                .allowance(chain, owner, spender)
                .await
                .map_err(|e| e.into_swap_error(chain))
        })
        .await
    }

    /// Submit with retries on unavailability. The inner result is the chain's
    /// verdict, left to the caller to interpret.
    pub(crate) async fn submit(
        &self,
        tx: LedgerTx,
    ) -> Result<Result<TxRef, RejectReason>, SwapError> {
        let (backend, chain) = (self.backend.as_ref(), self.chain());
        let tx = &tx;
        retry_transient(&self.settings.read_retry, chain, || async move {
            match backend.submit(tx.clone()).await {
                Ok(tx_ref) => Ok(Ok(tx_ref)),
                Err(ChainError::Rejected(reason)) => Ok(Err(reason)),
                Err(err) => Err(err.into_swap_error(chain)),
            }
        })
        .await
    }

    /// Wait until `tx` reaches the family's confirmation depth. Still pending
    /// after the budget is `ChainUnavailable`.
    pub(crate) async fn wait_confirmed(&self, tx: &TxRef) -> Result<(), SwapError> {
        let (backend, chain) = (self.backend.as_ref(), self.chain());
        let required = self.settings.confirmations;
        let policy = &self.settings.confirmation_retry;
        let mut seen = 0;

        for attempt in 1..=policy.max_attempts {
            let confirmations = retry_transient(&self.settings.read_retry, chain, || async move {
                backend
                    .confirmations(tx)
                    .await
                    .map_err(|e| e.into_swap_error(chain))
            })
            .await?;
            seen = confirmations.unwrap_or(0);
            if seen >= required {
                debug!(chain, %tx, confirmations = seen, "[swap] transaction confirmed");
                return Ok(());
            }
            if attempt < policy.max_attempts {
                tokio::time::sleep(policy.backoff(attempt)).await;
            }
        }

        Err(SwapError::ChainUnavailable {
            chain: chain.to_string(),
            attempts: policy.max_attempts,
            reason: format!("{tx} pending with {seen}/{required} confirmations"),
        })
    }

    fn lock_tx(&self) -> LedgerTx {
        LedgerTx::Lock {
            key: self.key.clone(),
            token: self.leg.token.symbol.clone(),
            secret_hash: self.leg.secret_hash,
            value: self.leg.value,
            expiry: self.leg.expiry,
            funder: self.leg.funding_address.clone(),
            spender: self.leg.spending_address.clone(),
        }
    }

    /// An existing contract under our key must be the one we would create.
    fn check_matches(&self, view: &ContractView) -> Result<(), SwapError> {
        let mismatch = |field, expected: String, actual: String| SwapError::AuditMismatch {
            field,
            expected,
            actual,
        };
        if view.secret_hash != self.leg.secret_hash {
            return Err(mismatch(
                "secret_hash",
                hex::encode(self.leg.secret_hash),
                hex::encode(view.secret_hash),
            ));
        }
        if view.value != self.leg.value {
            return Err(mismatch("value", self.leg.value.to_string(), view.value.to_string()));
        }
        if view.expiry != self.leg.expiry {
            return Err(mismatch(
                "expiry",
                self.leg.expiry.to_string(),
                view.expiry.to_string(),
            ));
        }
        if view.funder != self.leg.funding_address || view.spender != self.leg.spending_address {
            return Err(mismatch(
                "parties",
                format!("{} -> {}", self.leg.funding_address, self.leg.spending_address),
                format!("{} -> {}", view.funder, view.spender),
            ));
        }
        Ok(())
    }

    pub(crate) async fn initiate(&self) -> Result<TxRef, SwapError> {
        if let Some(view) = self.read_contract().await? {
            self.check_matches(&view)?;
            info!(chain = self.chain(), key = %self.key, "[swap] lock already on chain");
            self.wait_confirmed(&view.lock_tx).await?;
            return Ok(view.lock_tx);
        }

        let tx_ref = match self.submit(self.lock_tx()).await? {
            Ok(tx_ref) => tx_ref,
            Err(RejectReason::AlreadyExists) => {
                let view = self.read_contract().await?.ok_or_else(|| {
                    SwapError::ChainUnavailable {
                        chain: self.chain().to_string(),
                        attempts: 1,
                        reason: format!("contract {} reported but not readable", self.key),
                    }
                })?;
                self.check_matches(&view)?;
                view.lock_tx
            }
            Err(reason) => return Err(ChainError::Rejected(reason).into_swap_error(self.chain())),
        };

        info!(
            chain = self.chain(),
            key = %self.key,
            tx = %tx_ref,
            value = %self.leg.value,
            expiry = self.leg.expiry,
            "[swap] lock submitted"
        );
        self.wait_confirmed(&tx_ref).await?;
        Ok(tx_ref)
    }

    pub(crate) async fn audit(&self) -> Result<LegState, SwapError> {
        let Some(view) = self.read_contract().await? else {
            return Ok(LegState::NotFound);
        };
        match view.status {
            ContractStatus::Locked => {
                let now = self.chain_now().await?;
                let lock = LockInfo {
                    secret_hash: view.secret_hash,
                    value: view.value,
                    expiry: view.expiry,
                    funder: view.funder,
                    spender: view.spender,
                    tx: view.lock_tx,
                };
                if now > lock.expiry {
                    Ok(LegState::Expired(lock))
                } else {
                    Ok(LegState::Initiated(lock))
                }
            }
            ContractStatus::Redeemed { tx, secret } => {
                let secret = match secret {
                    Some(secret) => secret,
                    None => self.secret_from_witness(&tx).await?,
                };
                if !verify_secret(&secret, &self.leg.secret_hash) {
                    return Err(SwapError::SecretMismatch);
                }
                Ok(LegState::Redeemed(secret))
            }
            ContractStatus::Refunded { .. } => Ok(LegState::Refunded),
        }
    }

    /// Recover the preimage from the redeeming transaction's witness.
    async fn secret_from_witness(&self, tx: &TxRef) -> Result<SecureSecret, SwapError> {
        match self.read_transaction(tx).await? {
            Some(LedgerTx::Redeem { secret, .. }) => Ok(secret),
            _ => Err(SwapError::ChainUnavailable {
                chain: self.chain().to_string(),
                attempts: 1,
                reason: format!("redeem transaction {tx} not indexed"),
            }),
        }
    }

    pub(crate) async fn audit_secret(&self) -> Result<SecretAudit, SwapError> {
        match self.audit().await? {
            LegState::Redeemed(secret) => Ok(SecretAudit::Revealed(secret)),
            _ => Ok(SecretAudit::NotYetRevealed),
        }
    }

    pub(crate) async fn redeem(&self, secret: &SecureSecret) -> Result<TxRef, SwapError> {
        if !verify_secret(secret, &self.leg.secret_hash) {
            return Err(SwapError::SecretMismatch);
        }
        let tx = LedgerTx::Redeem {
            key: self.key.clone(),
            secret: secret.clone(),
            by: self.account.address.clone(),
        };
        match self.submit(tx).await? {
            Ok(tx_ref) => {
                info!(chain = self.chain(), key = %self.key, tx = %tx_ref, "[swap] redeem submitted");
                self.wait_confirmed(&tx_ref).await?;
                Ok(tx_ref)
            }
            Err(reason) => Err(ChainError::Rejected(reason).into_swap_error(self.chain())),
        }
    }

    pub(crate) async fn refund(&self) -> Result<TxRef, SwapError> {
        let tx = LedgerTx::Refund {
            key: self.key.clone(),
            by: self.account.address.clone(),
        };
        match self.submit(tx).await? {
            Ok(tx_ref) => {
                info!(chain = self.chain(), key = %self.key, tx = %tx_ref, "[swap] refund submitted");
                self.wait_confirmed(&tx_ref).await?;
                Ok(tx_ref)
            }
            Err(RejectReason::AlreadyRedeemed | RejectReason::AlreadyRefunded) => {
                Err(SwapError::AlreadyClaimed)
            }
            Err(reason) => Err(ChainError::Rejected(reason).into_swap_error(self.chain())),
        }
    }
}
