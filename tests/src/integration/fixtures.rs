//! # Two-Party Harness
//!
//! Alice and Bob each run their own engine: separate keystores, state stores
//! and notifiers. They share one clock, a UTXO chain carrying BTC and an
//! account chain carrying ETH and WBTC.
//!
//! | Party | bitcoin | ethereum |
//! |-------|---------|----------|
//! | Alice | `alice-btc`: 10 000 000 BTC | `alice-eth`: 5 000 000 ETH |
//! | Bob | `bob-btc`: none | `bob-eth`: 8 000 000 ETH, 3 000 000 WBTC |

use primitive_types::U256;
use std::sync::Arc;
use std::time::Duration;
use swap_engine::adapters::{
    AccountBinderFactory, BinderRegistry, InMemoryKeystore, InMemorySwapStateStore, LedgerKind,
    RecordingNotifier, SimulatedClock, SimulatedLedger, StaticTokenRegistry, TokenBinderFactory,
    UtxoBinderFactory, WBTC_SWAP_CONTRACT,
};
use swap_engine::{
    create_hash_lock, BoundSwap, ChainBackend, ChainFamily, ContractBuilder, Passphrase,
    SecureSecret, SwapConfig, SwapContext, SwapContractBuilder, SwapId, SwapPhase, SwapRequest,
    SwapStore,
};
use swap_telemetry::{init_logging, TelemetryConfig};

/// Swap id shared by both parties.
pub const SWAP_ID: SwapId = [0xA7; 32];

/// Safety skew used by both engines.
pub const SKEW: u64 = 86_400;

/// Install a debug subscriber once per test binary.
pub fn init_test_logging() {
    // Later calls fail with SubscriberInit, which is expected.
    let _ = init_logging(&TelemetryConfig::for_testing());
}

/// One side of the swap.
pub struct Party {
    /// Name, also the passphrase and address prefix.
    pub name: &'static str,
    /// Swap records, private to this party.
    pub store: SwapStore,
    /// Delay complaints raised by this party's engine.
    pub notifier: Arc<RecordingNotifier>,
}

impl Party {
    fn new(name: &'static str) -> Self {
        Self {
            name,
            store: SwapStore::new(Arc::new(InMemorySwapStateStore::new())),
            notifier: Arc::new(RecordingNotifier::new()),
        }
    }

    /// Address this party uses for `token`.
    pub fn address(&self, token: &str) -> String {
        match token {
            "BTC" => format!("{}-btc", self.name),
            _ => format!("{}-eth", self.name),
        }
    }

    /// Persisted phase, if a record exists.
    pub fn phase(&self) -> Option<SwapPhase> {
        self.store
            .load(&SWAP_ID)
            .ok()
            .flatten()
            .map(|record| record.phase)
    }
}

/// What one party sells and buys.
#[derive(Clone, Debug)]
pub struct Trade {
    /// Token sent on the native leg.
    pub send: (&'static str, u64),
    /// Token received on the foreign leg.
    pub receive: (&'static str, u64),
    /// Locks first and holds the secret.
    pub initiates_first: bool,
}

/// Shared chains plus both parties.
pub struct SwapHarness {
    /// Clock shared by chains and orchestrators.
    pub clock: SimulatedClock,
    /// UTXO chain.
    pub btc: Arc<SimulatedLedger>,
    /// Account chain with a WBTC token contract.
    pub eth: Arc<SimulatedLedger>,
    /// Alice's secret.
    pub secret: SecureSecret,
    /// Agreed timelock: the first mover's native expiry.
    pub timelock: u64,
    /// First mover in the default trades.
    pub alice: Party,
    /// Second mover in the default trades.
    pub bob: Party,
    binders: BinderRegistry,
}

impl Default for SwapHarness {
    fn default() -> Self {
        Self::new()
    }
}

impl SwapHarness {
    /// Funded chains at genesis, timelock two skews ahead.
    pub fn new() -> Self {
        let clock = SimulatedClock::default();
        let btc = Arc::new(SimulatedLedger::new("bitcoin", LedgerKind::Script, clock.clone()));
        let eth = Arc::new(SimulatedLedger::new("ethereum", LedgerKind::Account, clock.clone()));
        eth.register_token("WBTC", WBTC_SWAP_CONTRACT);

        btc.fund("BTC", "alice-btc", U256::from(10_000_000u64));
        eth.fund("ETH", "alice-eth", U256::from(5_000_000u64));
        eth.fund("ETH", "bob-eth", U256::from(8_000_000u64));
        eth.fund("WBTC", "bob-eth", U256::from(3_000_000u64));

        let config = Self::config();
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
            alice: Party::new("alice"),
            bob: Party::new("bob"),
            binders,
        }
    }

    /// Engine config for both parties.
    pub fn config() -> SwapConfig {
        SwapConfig {
            safety_skew_secs: SKEW,
            ..SwapConfig::for_testing()
        }
    }

    /// Alice sells BTC for Bob's ETH and moves first.
    pub fn btc_for_eth() -> (Trade, Trade) {
        (
            Trade {
                send: ("BTC", 10_000_000),
                receive: ("ETH", 8_000_000),
                initiates_first: true,
            },
            Trade {
                send: ("ETH", 8_000_000),
                receive: ("BTC", 10_000_000),
                initiates_first: false,
            },
        )
    }

    /// Alice sells ETH for Bob's WBTC on the same chain and moves first.
    pub fn eth_for_wbtc() -> (Trade, Trade) {
        (
            Trade {
                send: ("ETH", 5_000_000),
                receive: ("WBTC", 3_000_000),
                initiates_first: true,
            },
            Trade {
                send: ("WBTC", 3_000_000),
                receive: ("ETH", 5_000_000),
                initiates_first: false,
            },
        )
    }

    fn counterparty(&self, party: &Party) -> &Party {
        if party.name == self.alice.name {
            &self.bob
        } else {
            &self.alice
        }
    }

    /// Request `party` would submit for `trade`.
    pub fn request(&self, party: &Party, trade: &Trade) -> SwapRequest {
        let other = self.counterparty(party);
        SwapRequest {
            id: SWAP_ID,
            send_token: trade.send.0.to_string(),
            send_amount: trade.send.1.to_string(),
            receive_token: trade.receive.0.to_string(),
            receive_amount: trade.receive.1.to_string(),
            secret_hash: hex::encode(create_hash_lock(&self.secret)),
            timelock: self.timelock,
            send_to: other.address(trade.send.0),
            receive_from: other.address(trade.receive.0),
            initiates_first: trade.initiates_first,
            passphrase: Passphrase::new(party.name),
            secret: trade.initiates_first.then(|| self.secret.clone()),
        }
    }

    /// Contract builder backed by `party`'s keystore.
    pub fn builder(&self, party: &Party) -> ContractBuilder {
        let keystore = InMemoryKeystore::new(&Passphrase::new(party.name))
            .with_account(ChainFamily::Utxo, &party.address("BTC"))
            .with_account(ChainFamily::Account, &party.address("ETH"));
        ContractBuilder::new(
            Arc::new(StaticTokenRegistry::with_defaults()),
            Arc::new(keystore),
            self.binders.clone(),
            Self::config(),
        )
    }

    /// Build `request` for `party`. Panics on a rejected request.
    pub fn bind(&self, party: &Party, request: SwapRequest) -> BoundSwap {
        match self.builder(party).build(request) {
            Ok(bound) => bound,
            Err(err) => panic!("{} could not build the swap: {err}", party.name),
        }
    }

    /// Build `trade` for `party`.
    pub fn bind_trade(&self, party: &Party, trade: &Trade) -> BoundSwap {
        self.bind(party, self.request(party, trade))
    }

    /// Orchestrator context for `party`, reporting delays to its notifier.
    pub fn ctx(&self, party: &Party) -> SwapContext {
        SwapContext::new(party.store.clone(), Arc::new(self.clock.clone()), Self::config())
            .with_notifier(party.notifier.clone())
    }
}

/// Poll `party`'s store until it records `phase`.
pub async fn wait_for_phase(party: &Party, phase: SwapPhase) {
    for _ in 0..1_000 {
        if party.phase() == Some(phase) {
            return;
        }
        tokio::time::sleep(Duration::from_millis(2)).await;
    }
    panic!("{} never reached {phase}", party.name);
}
