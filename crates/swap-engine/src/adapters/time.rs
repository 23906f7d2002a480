//! Clock adapters.

use crate::ports::TimeSource;
use parking_lot::RwLock;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

/// Wall clock.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0)
    }
}

/// Manually driven clock shared by simulated ledgers and orchestrators.
#[derive(Clone, Debug)]
pub struct SimulatedClock {
    current: Arc<RwLock<u64>>,
}

impl SimulatedClock {
    /// Genesis time of simulated chains.
    pub const GENESIS: u64 = 1_700_000_000;

    /// Clock at `start`.
    pub fn new(start: u64) -> Self {
        Self {
            current: Arc::new(RwLock::new(start)),
        }
    }

    /// Jump to `time`.
    pub fn set_time(&self, time: u64) {
        *self.current.write() = time;
    }

    /// Move forward by `secs`.
    pub fn advance(&self, secs: u64) {
        let mut current = self.current.write();
        *current = current.saturating_add(secs);
    }
}

impl Default for SimulatedClock {
    fn default() -> Self {
        Self::new(Self::GENESIS)
    }
}

impl TimeSource for SimulatedClock {
    fn now(&self) -> u64 {
        *self.current.read()
    }
}
