//! Delay notifier adapters.

use crate::domain::{DelayKind, SwapId};
use crate::ports::{DelayNotifier, NotifierError};
use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::warn;

/// Writes complaints to the log.
#[derive(Clone, Copy, Debug, Default)]
pub struct LoggingNotifier;

#[async_trait]
impl DelayNotifier for LoggingNotifier {
    async fn complain(&self, swap_id: SwapId, kind: DelayKind) -> Result<(), NotifierError> {
        warn!(
            swap_id = %hex::encode(swap_id),
            kind = kind.as_str(),
            "[swap] counterparty is late"
        );
        Ok(())
    }
}

/// Keeps every complaint for inspection.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    complaints: Mutex<Vec<(SwapId, DelayKind)>>,
}

impl RecordingNotifier {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Complaints received so far.
    pub fn complaints(&self) -> Vec<(SwapId, DelayKind)> {
        self.complaints.lock().clone()
    }
}

#[async_trait]
impl DelayNotifier for RecordingNotifier {
    async fn complain(&self, swap_id: SwapId, kind: DelayKind) -> Result<(), NotifierError> {
        self.complaints.lock().push((swap_id, kind));
        Ok(())
    }
}
