//! # Crash Recovery
//!
//! A restarted orchestrator rebuilds the bound swap from the same request,
//! loads its record and reconciles with what is already on chain. Nothing
//! is broadcast twice.

#[cfg(test)]
mod tests {
    use crate::integration::fixtures::{wait_for_phase, SwapHarness, SWAP_ID};
    use primitive_types::U256;
    use swap_engine::ports::TxKind;
    use swap_engine::{
        shutdown_channel, LedgerBinder, SwapExecutor, SwapOrchestrator, SwapOutcome, SwapPhase,
        SwapRecord, SwapWatcher,
    };

    /// Alice locks, Bob locks, Alice redeems. Nobody persists anything.
    async fn settle_on_chain_only(harness: &SwapHarness) {
        let (alice_trade, bob_trade) = SwapHarness::btc_for_eth();
        let alice = harness.bind_trade(&harness.alice, &alice_trade);
        let bob = harness.bind_trade(&harness.bob, &bob_trade);
        alice.native.initiate().await.unwrap();
        bob.native.initiate().await.unwrap();
        alice.foreign.redeem(&harness.secret).await.unwrap();
    }

    #[tokio::test]
    async fn test_first_mover_restarts_after_redeem_broadcast() {
        let harness = SwapHarness::new();
        settle_on_chain_only(&harness).await;

        // Crashed between the redeem broadcast and the Done write.
        let mut record = SwapRecord::new(SWAP_ID, true, Some(harness.secret.clone()), 0);
        record.advance(SwapPhase::Redeeming, 0);
        harness.alice.store.save(&record).unwrap();

        let (alice_trade, _) = SwapHarness::btc_for_eth();
        let mut alice = SwapWatcher::new(
            harness.bind_trade(&harness.alice, &alice_trade),
            harness.ctx(&harness.alice),
        )
        .unwrap();
        assert_eq!(alice.run().await.unwrap(), SwapOutcome::Done);
        assert_eq!(harness.eth.submitted(TxKind::Redeem), 1);
        assert_eq!(harness.btc.submitted(TxKind::Lock), 1);
        assert_eq!(harness.alice.phase(), Some(SwapPhase::Done));
    }

    #[tokio::test]
    async fn test_first_mover_executor_restarts_in_native_initiated() {
        let harness = SwapHarness::new();
        settle_on_chain_only(&harness).await;

        let mut record = SwapRecord::new(SWAP_ID, true, Some(harness.secret.clone()), 0);
        record.advance(SwapPhase::NativeInitiated, 0);
        harness.alice.store.save(&record).unwrap();

        let (alice_trade, _) = SwapHarness::btc_for_eth();
        let mut alice = SwapExecutor::new(
            harness.bind_trade(&harness.alice, &alice_trade),
            harness.ctx(&harness.alice),
        )
        .unwrap();
        assert_eq!(alice.run().await.unwrap(), SwapOutcome::Done);
        assert_eq!(harness.eth.submitted(TxKind::Redeem), 1);
    }

    #[tokio::test]
    async fn test_second_mover_recovers_secret_after_restart() {
        let harness = SwapHarness::new();
        settle_on_chain_only(&harness).await;

        // Bob went down right after his lock confirmed, before learning the
        // secret.
        let mut record = SwapRecord::new(SWAP_ID, false, None, 0);
        record.advance(SwapPhase::NativeInitiated, 0);
        harness.bob.store.save(&record).unwrap();

        let (_, bob_trade) = SwapHarness::btc_for_eth();
        let mut bob = SwapExecutor::new(
            harness.bind_trade(&harness.bob, &bob_trade),
            harness.ctx(&harness.bob),
        )
        .unwrap();
        assert_eq!(bob.run().await.unwrap(), SwapOutcome::Done);

        assert_eq!(harness.btc.balance("BTC", "bob-btc"), U256::from(10_000_000u64));
        assert_eq!(harness.eth.submitted(TxKind::Lock), 1);
        let record = harness.bob.store.load(&SWAP_ID).unwrap().unwrap();
        assert_eq!(record.secret, Some(harness.secret.clone()));
    }

    #[tokio::test]
    async fn test_suspended_swap_resumes_to_done() {
        let harness = SwapHarness::new();
        let (alice_trade, bob_trade) = SwapHarness::btc_for_eth();
        let (handle, signal) = shutdown_channel();
        let mut alice = SwapExecutor::new(
            harness.bind_trade(&harness.alice, &alice_trade),
            harness.ctx(&harness.alice).with_shutdown(signal),
        )
        .unwrap();
        let alice_task = tokio::spawn(async move { alice.run().await });

        wait_for_phase(&harness.alice, SwapPhase::NativeInitiated).await;
        handle.trigger();
        assert_eq!(
            alice_task.await.unwrap().unwrap(),
            SwapOutcome::Suspended(SwapPhase::NativeInitiated)
        );
        assert_eq!(harness.alice.phase(), Some(SwapPhase::NativeInitiated));

        let mut bob = SwapExecutor::new(
            harness.bind_trade(&harness.bob, &bob_trade),
            harness.ctx(&harness.bob),
        )
        .unwrap();
        let mut alice = SwapWatcher::new(
            harness.bind_trade(&harness.alice, &alice_trade),
            harness.ctx(&harness.alice),
        )
        .unwrap();
        let bob_task = tokio::spawn(async move { bob.run().await });
        assert_eq!(alice.run().await.unwrap(), SwapOutcome::Done);
        assert_eq!(bob_task.await.unwrap().unwrap(), SwapOutcome::Done);
        assert_eq!(harness.btc.submitted(TxKind::Lock), 1);
    }

    #[tokio::test]
    async fn test_chain_outage_is_ridden_out() {
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

        harness.btc.fail_next_reads(20);
        let bob_task = tokio::spawn(async move { bob.run().await });
        assert_eq!(alice.run().await.unwrap(), SwapOutcome::Done);
        assert_eq!(bob_task.await.unwrap().unwrap(), SwapOutcome::Done);
        assert!(harness.alice.store.load(&SWAP_ID).unwrap().unwrap().failure.is_none());
    }
}
