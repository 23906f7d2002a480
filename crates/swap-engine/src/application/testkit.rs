//! Two-party fixture for orchestrator tests: Alice sells BTC for Bob's ETH
//! and moves first.

use super::{ContractBuilder, SwapContext, SwapStore};
use crate::adapters::{
    AccountBinderFactory, BinderRegistry, InMemoryKeystore, InMemorySwapStateStore, LedgerKind,
    SimulatedClock, SimulatedLedger, StaticTokenRegistry, TokenBinderFactory, UtxoBinderFactory,
};
use crate::algorithms::create_hash_lock;
use crate::config::SwapConfig;
use crate::domain::{ChainFamily, Passphrase, SecureSecret, SwapRequest};
use crate::ports::{BoundSwap, ChainBackend, SwapContractBuilder};
use primitive_types::U256;
use std::sync::Arc;

pub(crate) const SKEW: u64 = 86_400;
pub(crate) const SWAP_ID: [u8; 32] = [0x5A; 32];

pub(crate) struct Parties {
    pub(crate) clock: SimulatedClock,
    pub(crate) btc: Arc<SimulatedLedger>,
    pub(crate) eth: Arc<SimulatedLedger>,
    pub(crate) secret: SecureSecret,
    pub(crate) timelock: u64,
    pub(crate) alice_store: SwapStore,
    pub(crate) bob_store: SwapStore,
    binders: BinderRegistry,
}

impl Parties {
    pub(crate) fn new() -> Self {
        let clock = SimulatedClock::default();
        let btc = Arc::new(SimulatedLedger::new("bitcoin", LedgerKind::Script, clock.clone()));
        let eth = Arc::new(SimulatedLedger::new("ethereum", LedgerKind::Account, clock.clone()));
        btc.fund("BTC", "alice-btc", U256::from(10_000_000u64));
        eth.fund("ETH", "bob-eth", U256::from(8_000_000u64));

        let config = SwapConfig::for_testing();
        let btc_backend: Arc<dyn ChainBackend> = btc.clone();
        let eth_backend: Arc<dyn ChainBackend> = eth.clone();
        let binders = BinderRegistry::new()
            .register(Arc::new(UtxoBinderFactory::new(btc_backend, &config)))
            .register(Arc::new(AccountBinderFactory::new(eth_backend.clone(), &config)))
            .register(Arc::new(TokenBinderFactory::new(eth_backend, &config)));

        Self {
            timelock: SimulatedClock::GENESIS + 2 * SKEW,
            clock,
            btc,
            eth,
            secret: SecureSecret::random(),
            alice_store: SwapStore::new(Arc::new(InMemorySwapStateStore::new())),
            bob_store: SwapStore::new(Arc::new(InMemorySwapStateStore::new())),
            binders,
        }
    }

    pub(crate) fn builder(&self, name: &str) -> ContractBuilder {
        let keystore = InMemoryKeystore::new(&Passphrase::new(name))
            .with_account(ChainFamily::Utxo, &format!("{name}-btc"))
            .with_account(ChainFamily::Account, &format!("{name}-eth"));
        ContractBuilder::new(
            Arc::new(StaticTokenRegistry::with_defaults()),
            Arc::new(keystore),
            self.binders.clone(),
            SwapConfig::for_testing(),
        )
    }

    pub(crate) fn alice_request(&self) -> SwapRequest {
        SwapRequest {
            id: SWAP_ID,
            send_token: "BTC".to_string(),
            send_amount: "10000000".to_string(),
            receive_token: "ETH".to_string(),
            receive_amount: "8000000".to_string(),
            secret_hash: hex::encode(create_hash_lock(&self.secret)),
            timelock: self.timelock,
            send_to: "bob-btc".to_string(),
            receive_from: "bob-eth".to_string(),
            initiates_first: true,
            passphrase: Passphrase::new("alice"),
            secret: Some(self.secret.clone()),
        }
    }

    pub(crate) fn bob_request(&self) -> SwapRequest {
        SwapRequest {
            id: SWAP_ID,
            send_token: "ETH".to_string(),
            send_amount: "8000000".to_string(),
            receive_token: "BTC".to_string(),
            receive_amount: "10000000".to_string(),
            secret_hash: hex::encode(create_hash_lock(&self.secret)),
            timelock: self.timelock,
            send_to: "alice-eth".to_string(),
            receive_from: "alice-btc".to_string(),
            initiates_first: false,
            passphrase: Passphrase::new("bob"),
            secret: None,
        }
    }

    pub(crate) fn build(&self, name: &str, request: SwapRequest) -> BoundSwap {
        self.builder(name).build(request).unwrap()
    }

    pub(crate) fn alice(&self) -> BoundSwap {
        self.build("alice", self.alice_request())
    }

    pub(crate) fn bob(&self) -> BoundSwap {
        self.build("bob", self.bob_request())
    }

    pub(crate) fn ctx(&self, store: &SwapStore) -> SwapContext {
        SwapContext::new(store.clone(), Arc::new(self.clock.clone()), SwapConfig::for_testing())
    }
}
