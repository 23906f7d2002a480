//! # End-to-End Swaps
//!
//! Both parties run to `Done` over the shared chains:
//!
//! ```text
//! Alice (first mover)                     Bob (second mover)
//!   lock native (T) ──────────────────────→ audit foreign
//!                                           lock native (T - skew)
//!   audit foreign ←─────────────────────────┘
//!   redeem foreign (reveals secret) ──────→ recover secret
//!                                           redeem foreign
//! ```

#[cfg(test)]
mod tests {
    use crate::integration::fixtures::{init_test_logging, SwapHarness, SWAP_ID};
    use primitive_types::U256;
    use swap_engine::ports::TxKind;
    use swap_engine::{SwapExecutor, SwapOrchestrator, SwapOutcome, SwapPhase, SwapWatcher};

    fn assert_btc_eth_settled(harness: &SwapHarness) {
        assert_eq!(harness.eth.balance("ETH", "alice-eth"), U256::from(13_000_000u64));
        assert_eq!(harness.eth.balance("ETH", "bob-eth"), U256::zero());
        assert_eq!(harness.btc.balance("BTC", "bob-btc"), U256::from(10_000_000u64));
        assert_eq!(harness.btc.balance("BTC", "alice-btc"), U256::zero());
        assert_eq!(harness.btc.submitted(TxKind::Lock), 1);
        assert_eq!(harness.eth.submitted(TxKind::Lock), 1);
        assert_eq!(harness.btc.submitted(TxKind::Redeem), 1);
        assert_eq!(harness.eth.submitted(TxKind::Redeem), 1);
        assert_eq!(harness.btc.submitted(TxKind::Refund), 0);
    }

    #[tokio::test]
    async fn test_btc_eth_executors_complete() {
        init_test_logging();
        let harness = SwapHarness::new();
        let (alice_trade, bob_trade) = SwapHarness::btc_for_eth();
        let mut alice = SwapExecutor::new(
            harness.bind_trade(&harness.alice, &alice_trade),
            harness.ctx(&harness.alice),
        )
        .unwrap();
        let mut bob = SwapExecutor::new(
            harness.bind_trade(&harness.bob, &bob_trade),
            harness.ctx(&harness.bob),
        )
        .unwrap();

        let bob_task = tokio::spawn(async move { bob.run().await });
        assert_eq!(alice.run().await.unwrap(), SwapOutcome::Done);
        assert_eq!(bob_task.await.unwrap().unwrap(), SwapOutcome::Done);

        assert_btc_eth_settled(&harness);
        let bob_record = harness.bob.store.load(&SWAP_ID).unwrap().unwrap();
        assert_eq!(bob_record.phase, SwapPhase::Done);
        assert_eq!(bob_record.secret, Some(harness.secret.clone()));
        assert!(bob_record.redeem_tx.is_some());
        assert!(harness.alice.notifier.complaints().is_empty());
    }

    #[tokio::test]
    async fn test_btc_eth_watchers_complete() {
        init_test_logging();
        let harness = SwapHarness::new();
        let (alice_trade, bob_trade) = SwapHarness::btc_for_eth();
        let mut alice = SwapWatcher::new(
            harness.bind_trade(&harness.alice, &alice_trade),
            harness.ctx(&harness.alice),
        )
        .unwrap();
        let mut bob = SwapWatcher::new(
            harness.bind_trade(&harness.bob, &bob_trade),
            harness.ctx(&harness.bob),
        )
        .unwrap();

        let bob_task = tokio::spawn(async move { bob.run().await });
        assert_eq!(alice.run().await.unwrap(), SwapOutcome::Done);
        assert_eq!(bob_task.await.unwrap().unwrap(), SwapOutcome::Done);

        assert_btc_eth_settled(&harness);
        assert_eq!(harness.alice.phase(), Some(SwapPhase::Done));
        assert_eq!(harness.bob.phase(), Some(SwapPhase::Done));
    }

    #[tokio::test]
    async fn test_executor_against_watcher() {
        let harness = SwapHarness::new();
        let (alice_trade, bob_trade) = SwapHarness::btc_for_eth();
        let mut alice = SwapWatcher::new(
            harness.bind_trade(&harness.alice, &alice_trade),
            harness.ctx(&harness.alice),
        )
        .unwrap();
        let mut bob = SwapExecutor::new(
            harness.bind_trade(&harness.bob, &bob_trade),
            harness.ctx(&harness.bob),
        )
        .unwrap();

        let alice_task = tokio::spawn(async move { alice.run().await });
        assert_eq!(bob.run().await.unwrap(), SwapOutcome::Done);
        assert_eq!(alice_task.await.unwrap().unwrap(), SwapOutcome::Done);
        assert_btc_eth_settled(&harness);
    }

    #[tokio::test]
    async fn test_same_chain_eth_for_wbtc() {
        let harness = SwapHarness::new();
        let (alice_trade, bob_trade) = SwapHarness::eth_for_wbtc();
        let mut alice = SwapExecutor::new(
            harness.bind_trade(&harness.alice, &alice_trade),
            harness.ctx(&harness.alice),
        )
        .unwrap();
        let mut bob = SwapExecutor::new(
            harness.bind_trade(&harness.bob, &bob_trade),
            harness.ctx(&harness.bob),
        )
        .unwrap();

        let bob_task = tokio::spawn(async move { bob.run().await });
        assert_eq!(alice.run().await.unwrap(), SwapOutcome::Done);
        assert_eq!(bob_task.await.unwrap().unwrap(), SwapOutcome::Done);

        assert_eq!(harness.eth.balance("WBTC", "alice-eth"), U256::from(3_000_000u64));
        assert_eq!(harness.eth.balance("WBTC", "bob-eth"), U256::zero());
        assert_eq!(harness.eth.balance("ETH", "alice-eth"), U256::zero());
        assert_eq!(harness.eth.balance("ETH", "bob-eth"), U256::from(13_000_000u64));
        assert_eq!(harness.eth.submitted(TxKind::Approve), 1);
        assert_eq!(harness.eth.submitted(TxKind::Lock), 2);
        assert_eq!(harness.eth.contract_count(), 2);
        assert_eq!(harness.btc.submitted(TxKind::Lock), 0);
    }

    #[tokio::test]
    async fn test_rerun_after_done_is_a_no_op() {
        let harness = SwapHarness::new();
        let (alice_trade, bob_trade) = SwapHarness::btc_for_eth();
        let mut alice = SwapExecutor::new(
            harness.bind_trade(&harness.alice, &alice_trade),
            harness.ctx(&harness.alice),
        )
        .unwrap();
        let mut bob = SwapExecutor::new(
            harness.bind_trade(&harness.bob, &bob_trade),
            harness.ctx(&harness.bob),
        )
        .unwrap();
        let bob_task = tokio::spawn(async move { bob.run().await });
        alice.run().await.unwrap();
        bob_task.await.unwrap().unwrap();

        let mut again = SwapWatcher::new(
            harness.bind_trade(&harness.alice, &alice_trade),
            harness.ctx(&harness.alice),
        )
        .unwrap();
        assert_eq!(again.run().await.unwrap(), SwapOutcome::Done);
        assert_btc_eth_settled(&harness);
    }
}
