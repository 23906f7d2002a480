//! Simulated ledger.
//!
//! An in-memory chain implementing [`ChainBackend`] with HTLC rules, blocks,
//! confirmations, balances, token allowances and injectable read failures.
//! Both parties of a swap talk to the same instance, so coordination happens
//! through ledger state only.

use super::time::SimulatedClock;
use crate::domain::TxRef;
use crate::ports::{
    ChainBackend, ChainError, ContractKey, ContractStatus, ContractView, LedgerTx, RejectReason,
    TimeSource, TxKind,
};
use crate::algorithms::verify_secret;
use async_trait::async_trait;
use parking_lot::RwLock;
use primitive_types::U256;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use tracing::debug;

/// How the chain exposes a redeemed secret.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LedgerKind {
    /// Script chain. The secret is only in the redeeming transaction.
    Script,
    /// Account chain. The secret is kept in contract storage.
    Account,
}

#[derive(Default)]
struct LedgerState {
    height: u64,
    nonce: u64,
    contracts: HashMap<ContractKey, ContractView>,
    txs: HashMap<TxRef, (LedgerTx, u64)>,
    balances: HashMap<(String, String), U256>,
    allowances: HashMap<(String, String, String), U256>,
    /// Token symbol -> swap contract pulling it via allowance.
    token_contracts: HashMap<String, String>,
    submitted: HashMap<TxKind, usize>,
    failing_reads: u32,
    auto_mine: bool,
}

impl LedgerState {
    fn check_read(&mut self) -> Result<(), ChainError> {
        if self.failing_reads > 0 {
            self.failing_reads -= 1;
            return Err(ChainError::Unavailable("injected read failure".to_string()));
        }
        Ok(())
    }

    fn balance_mut(&mut self, token: &str, address: &str) -> &mut U256 {
        self.balances
            .entry((token.to_string(), address.to_string()))
            .or_insert_with(U256::zero)
    }
}

/// One simulated chain.
pub struct SimulatedLedger {
    name: String,
    kind: LedgerKind,
    clock: SimulatedClock,
    state: RwLock<LedgerState>,
}

impl SimulatedLedger {
    /// New chain at height zero. Mines a block on every confirmation query.
    pub fn new(name: &str, kind: LedgerKind, clock: SimulatedClock) -> Self {
        Self {
            name: name.to_string(),
            kind,
            clock,
            state: RwLock::new(LedgerState {
                auto_mine: true,
                ..LedgerState::default()
            }),
        }
    }

    /// Chain name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Shared clock.
    pub fn clock(&self) -> &SimulatedClock {
        &self.clock
    }

    /// Credit `amount` of `token` to `address`.
    pub fn fund(&self, token: &str, address: &str, amount: U256) {
        let mut state = self.state.write();
        let balance = state.balance_mut(token, address);
        *balance = balance.saturating_add(amount);
    }

    /// Balance of `token` held by `address`.
    pub fn balance(&self, token: &str, address: &str) -> U256 {
        self.state
            .read()
            .balances
            .get(&(token.to_string(), address.to_string()))
            .copied()
            .unwrap_or_default()
    }

    /// Require an allowance to `swap_contract` before `token` can be locked.
    pub fn register_token(&self, token: &str, swap_contract: &str) {
        self.state
            .write()
            .token_contracts
            .insert(token.to_string(), swap_contract.to_string());
    }

    /// Fail the next `count` reads with `Unavailable`.
    pub fn fail_next_reads(&self, count: u32) {
        self.state.write().failing_reads = count;
    }

    /// Toggle mining on confirmation queries.
    pub fn set_auto_mine(&self, enabled: bool) {
        self.state.write().auto_mine = enabled;
    }

    /// Mine `blocks` blocks.
    pub fn mine(&self, blocks: u64) {
        let mut state = self.state.write();
        state.height = state.height.saturating_add(blocks);
    }

    /// Current height.
    pub fn height(&self) -> u64 {
        self.state.read().height
    }

    /// Accepted transactions of `kind`.
    pub fn submitted(&self, kind: TxKind) -> usize {
        self.state.read().submitted.get(&kind).copied().unwrap_or(0)
    }

    /// Number of HTLCs ever created.
    pub fn contract_count(&self) -> usize {
        self.state.read().contracts.len()
    }

    fn tx_ref(&self, nonce: u64, kind: TxKind) -> TxRef {
        let mut hasher = Sha256::new();
        hasher.update(self.name.as_bytes());
        hasher.update(nonce.to_le_bytes());
        hasher.update(format!("{kind:?}").as_bytes());
        TxRef(format!("0x{}", hex::encode(hasher.finalize())))
    }

    fn apply(
        &self,
        state: &mut LedgerState,
        tx: &LedgerTx,
        tx_ref: &TxRef,
        now: u64,
    ) -> Result<(), RejectReason> {
        match tx {
            LedgerTx::Lock {
                key,
                token,
                secret_hash,
                value,
                expiry,
                funder,
                spender,
            } => {
                if state.contracts.contains_key(key) {
                    return Err(RejectReason::AlreadyExists);
                }
                if let Some(contract) = state.token_contracts.get(token).cloned() {
                    let allowance_key = (token.clone(), funder.clone(), contract);
                    let allowance = state.allowances.get(&allowance_key).copied().unwrap_or_default();
                    if allowance < *value {
                        return Err(RejectReason::InsufficientFunds);
                    }
                    state.allowances.insert(allowance_key, allowance - *value);
                }
                let balance = state.balance_mut(token, funder);
                if *balance < *value {
                    return Err(RejectReason::InsufficientFunds);
                }
                *balance -= *value;
                state.contracts.insert(
                    key.clone(),
                    ContractView {
                        key: key.clone(),
                        token: token.clone(),
                        secret_hash: *secret_hash,
                        value: *value,
                        expiry: *expiry,
                        funder: funder.clone(),
                        spender: spender.clone(),
                        lock_tx: tx_ref.clone(),
                        status: ContractStatus::Locked,
                    },
                );
            }
            LedgerTx::Redeem { key, secret, by } => {
                let contract = state
                    .contracts
                    .get_mut(key)
                    .ok_or(RejectReason::UnknownContract)?;
                match contract.status {
                    ContractStatus::Redeemed { .. } => return Err(RejectReason::AlreadyRedeemed),
                    ContractStatus::Refunded { .. } => return Err(RejectReason::AlreadyRefunded),
                    ContractStatus::Locked => {}
                }
                if *by != contract.spender {
                    return Err(RejectReason::Unauthorized);
                }
                if !verify_secret(secret, &contract.secret_hash) {
                    return Err(RejectReason::HashMismatch);
                }
                if now > contract.expiry {
                    return Err(RejectReason::Expired);
                }
                contract.status = ContractStatus::Redeemed {
                    tx: tx_ref.clone(),
                    secret: Some(secret.clone()),
                };
                let (token, spender, value) =
                    (contract.token.clone(), contract.spender.clone(), contract.value);
                let balance = state.balance_mut(&token, &spender);
                *balance = balance.saturating_add(value);
            }
            LedgerTx::Refund { key, by } => {
                let contract = state
                    .contracts
                    .get_mut(key)
                    .ok_or(RejectReason::UnknownContract)?;
                match contract.status {
                    ContractStatus::Redeemed { .. } => return Err(RejectReason::AlreadyRedeemed),
                    ContractStatus::Refunded { .. } => return Err(RejectReason::AlreadyRefunded),
                    ContractStatus::Locked => {}
                }
                if *by != contract.funder {
                    return Err(RejectReason::Unauthorized);
                }
                if now <= contract.expiry {
                    return Err(RejectReason::NotExpired);
                }
                contract.status = ContractStatus::Refunded { tx: tx_ref.clone() };
                let (token, funder, value) =
                    (contract.token.clone(), contract.funder.clone(), contract.value);
                let balance = state.balance_mut(&token, &funder);
                *balance = balance.saturating_add(value);
            }
            LedgerTx::Approve {
                token,
                owner,
                spender,
                value,
            } => {
                state
                    .allowances
                    .insert((token.clone(), owner.clone(), spender.clone()), *value);
            }
        }
        Ok(())
    }
}

#[async_trait]
impl ChainBackend for SimulatedLedger {
    async fn submit(&self, tx: LedgerTx) -> Result<TxRef, ChainError> {
        let now = self.clock.now();
        let mut state = self.state.write();
        state.nonce += 1;
        let tx_ref = self.tx_ref(state.nonce, tx.kind());

        self.apply(&mut state, &tx, &tx_ref, now)
            .map_err(ChainError::Rejected)?;

        debug!(chain = %self.name, tx = %tx_ref, kind = ?tx.kind(), "[sim] transaction accepted");
        let included_at = state.height + 1;
        *state.submitted.entry(tx.kind()).or_insert(0) += 1;
        state.txs.insert(tx_ref.clone(), (tx, included_at));
        Ok(tx_ref)
    }

    async fn contract(&self, key: &ContractKey) -> Result<Option<ContractView>, ChainError> {
        let mut state = self.state.write();
        state.check_read()?;
        let view = state.contracts.get(key).cloned().map(|mut view| {
            if self.kind == LedgerKind::Script {
                if let ContractStatus::Redeemed { secret, .. } = &mut view.status {
                    *secret = None;
                }
            }
            view
        });
        Ok(view)
    }

    async fn transaction(&self, tx: &TxRef) -> Result<Option<LedgerTx>, ChainError> {
        let mut state = self.state.write();
        state.check_read()?;
        Ok(state.txs.get(tx).map(|(tx, _)| tx.clone()))
    }

    async fn confirmations(&self, tx: &TxRef) -> Result<Option<u64>, ChainError> {
        let mut state = self.state.write();
        state.check_read()?;
        if state.auto_mine {
            state.height += 1;
        }
        let height = state.height;
        Ok(state
            .txs
            .get(tx)
            .map(|(_, included_at)| (height + 1).saturating_sub(*included_at)))
    }

    async fn allowance(&self, token: &str, owner: &str, spender: &str) -> Result<U256, ChainError> {
        let mut state = self.state.write();
        state.check_read()?;
        Ok(state
            .allowances
            .get(&(token.to_string(), owner.to_string(), spender.to_string()))
            .copied()
            .unwrap_or_default())
    }

    async fn now(&self) -> Result<u64, ChainError> {
        self.state.write().check_read()?;
        Ok(self.clock.now())
    }
}
