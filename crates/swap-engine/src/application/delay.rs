//! Late-counterparty complaints.
//!
//! A wait that outlasts the configured threshold produces one complaint per
//! kind and run. Delivery is fire-and-forget; failures are only logged.

use crate::domain::{DelayKind, SwapId};
use crate::metrics;
use crate::ports::DelayNotifier;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::warn;

/// Tracks how long each kind of wait has lasted for one swap.
pub struct DelayTracker {
    swap_id: SwapId,
    notifier: Option<Arc<dyn DelayNotifier>>,
    threshold_secs: u64,
    waiting_since: HashMap<DelayKind, u64>,
    fired: HashSet<DelayKind>,
}

impl DelayTracker {
    /// Tracker for `swap_id`. Without a notifier every call is a no-op.
    pub fn new(
        swap_id: SwapId,
        notifier: Option<Arc<dyn DelayNotifier>>,
        threshold_secs: u64,
    ) -> Self {
        Self {
            swap_id,
            notifier,
            threshold_secs,
            waiting_since: HashMap::new(),
            fired: HashSet::new(),
        }
    }

    /// Record that we are still waiting on `kind` at `now`. Complains once the
    /// wait exceeds the threshold.
    pub fn waiting(&mut self, kind: DelayKind, now: u64) -> Option<JoinHandle<()>> {
        let since = *self.waiting_since.entry(kind).or_insert(now);
        if now.saturating_sub(since) < self.threshold_secs {
            return None;
        }
        self.complain(kind)
    }

    /// Complain about `kind` right away, once.
    pub fn complain(&mut self, kind: DelayKind) -> Option<JoinHandle<()>> {
        let notifier = self.notifier.clone()?;
        if !self.fired.insert(kind) {
            return None;
        }
        metrics::record_delay_complaint(kind.as_str());
        let swap_id = self.swap_id;
        Some(tokio::spawn(async move {
            if let Err(err) = notifier.complain(swap_id, kind).await {
                warn!(
                    swap_id = %hex::encode(swap_id),
                    kind = kind.as_str(),
                    error = %err,
                    "[swap] delay complaint not delivered"
                );
            }
        }))
    }

    /// Complaints already sent.
    pub fn fired(&self) -> usize {
        self.fired.len()
    }
}
