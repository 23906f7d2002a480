//! # Refund Paths
//!
//! An absent or dishonest counterparty never costs the honest party its
//! funds: the native leg is refunded once it expires.

#[cfg(test)]
mod tests {
    use crate::integration::fixtures::{wait_for_phase, SwapHarness, SKEW, SWAP_ID};
    use primitive_types::U256;
    use std::time::Duration;
    use swap_engine::ports::TxKind;
    use swap_engine::{
        DelayKind, LegRole, SwapError, SwapExecutor, SwapOrchestrator, SwapOutcome, SwapPhase,
        SwapWatcher,
    };

    #[tokio::test]
    async fn test_absent_counterparty_refunds_and_complains_once() {
        let harness = SwapHarness::new();
        let (alice_trade, _) = SwapHarness::btc_for_eth();
        let mut alice = SwapWatcher::new(
            harness.bind_trade(&harness.alice, &alice_trade),
            harness.ctx(&harness.alice),
        )
        .unwrap();
        let task = tokio::spawn(async move { alice.run().await });

        wait_for_phase(&harness.alice, SwapPhase::NativeInitiated).await;
        tokio::time::sleep(Duration::from_millis(20)).await;
        harness.clock.advance(SwapHarness::config().delay_complaint_after_secs);
        tokio::time::sleep(Duration::from_millis(30)).await;
        harness.clock.advance(60);
        tokio::time::sleep(Duration::from_millis(30)).await;
        harness.clock.set_time(harness.timelock + 1);

        assert_eq!(task.await.unwrap().unwrap(), SwapOutcome::Refunded);
        assert_eq!(harness.btc.balance("BTC", "alice-btc"), U256::from(10_000_000u64));
        assert_eq!(harness.btc.submitted(TxKind::Refund), 1);
        assert_eq!(
            harness.alice.notifier.complaints(),
            vec![(SWAP_ID, DelayKind::CounterpartyInitiation)]
        );
    }

    #[tokio::test]
    async fn test_second_mover_abandons_when_first_mover_never_locks() {
        let harness = SwapHarness::new();
        let (_, bob_trade) = SwapHarness::btc_for_eth();
        let mut bob = SwapExecutor::new(
            harness.bind_trade(&harness.bob, &bob_trade),
            harness.ctx(&harness.bob),
        )
        .unwrap();
        let task = tokio::spawn(async move { bob.run().await });

        tokio::time::sleep(Duration::from_millis(20)).await;
        harness.clock.set_time(harness.timelock - SKEW);

        assert_eq!(task.await.unwrap().unwrap(), SwapOutcome::Abandoned);
        assert_eq!(harness.eth.submitted(TxKind::Lock), 0);
        assert_eq!(harness.eth.balance("ETH", "bob-eth"), U256::from(8_000_000u64));
    }

    #[tokio::test]
    async fn test_underfunded_counterparty_both_sides_refund() {
        let harness = SwapHarness::new();
        let (alice_trade, bob_trade) = SwapHarness::btc_for_eth();
        let mut short = harness.request(&harness.bob, &bob_trade);
        short.send_amount = "7999999".to_string();

        let mut alice = SwapExecutor::new(
            harness.bind_trade(&harness.alice, &alice_trade),
            harness.ctx(&harness.alice),
        )
        .unwrap();
        let mut bob =
            SwapExecutor::new(harness.bind(&harness.bob, short), harness.ctx(&harness.bob))
                .unwrap();
        let bob_task = tokio::spawn(async move { bob.run().await });

        let failure = alice.run().await.unwrap_err();
        assert_eq!(failure.leg, LegRole::Foreign);
        assert_eq!(failure.phase, SwapPhase::NativeInitiated);
        assert!(matches!(failure.error, SwapError::AuditMismatch { field: "value", .. }));
        assert_eq!(harness.eth.submitted(TxKind::Redeem), 0);
        assert!(harness
            .alice
            .store
            .load(&SWAP_ID)
            .unwrap()
            .unwrap()
            .is_halted());

        // Bob never sees the secret and takes his ETH back at his expiry.
        harness.clock.set_time(harness.timelock - SKEW + 1);
        assert_eq!(bob_task.await.unwrap().unwrap(), SwapOutcome::Refunded);
        assert_eq!(harness.eth.balance("ETH", "bob-eth"), U256::from(8_000_000u64));

        // An operator restarts Alice's halted swap after her expiry.
        harness.clock.set_time(harness.timelock + 1);
        let mut alice = SwapWatcher::new(
            harness.bind_trade(&harness.alice, &alice_trade),
            harness.ctx(&harness.alice),
        )
        .unwrap();
        assert_eq!(alice.run().await.unwrap(), SwapOutcome::Refunded);
        assert_eq!(harness.btc.balance("BTC", "alice-btc"), U256::from(10_000_000u64));

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(harness
            .alice
            .notifier
            .complaints()
            .iter()
            .any(|(_, kind)| *kind == DelayKind::WrongCounterpartyInitiation));
    }
}
