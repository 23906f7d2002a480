//! # Swap Record Store
//!
//! Typed access to [`SwapRecord`]s over a byte-keyed [`SwapStateStore`].
//! Records are bincode-encoded under `swap/<hex id>`.

use crate::domain::{SwapError, SwapId, SwapRecord};
use crate::ports::{StoreError, SwapStateStore};
use std::sync::Arc;
use tracing::debug;

const KEY_PREFIX: &[u8] = b"swap/";

/// Store key for a swap.
pub fn record_key(id: &SwapId) -> Vec<u8> {
    let mut key = KEY_PREFIX.to_vec();
    key.extend_from_slice(hex::encode(id).as_bytes());
    key
}

/// Swap records keyed by swap id. Last writer wins per key.
#[derive(Clone)]
pub struct SwapStore {
    backend: Arc<dyn SwapStateStore>,
}

impl SwapStore {
    /// Wrap a key-value backend.
    pub fn new(backend: Arc<dyn SwapStateStore>) -> Self {
        Self { backend }
    }

    /// Load the record for `id`.
    pub fn load(&self, id: &SwapId) -> Result<Option<SwapRecord>, SwapError> {
        let Some(bytes) = self.backend.get(&record_key(id))? else {
            return Ok(None);
        };
        let record = bincode::deserialize(&bytes)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        Ok(Some(record))
    }

    /// Persist `record`, replacing any previous version.
    pub fn save(&self, record: &SwapRecord) -> Result<(), SwapError> {
        let bytes =
            bincode::serialize(record).map_err(|e| StoreError::Serialization(e.to_string()))?;
        self.backend.put(&record_key(&record.id), &bytes)?;
        debug!(
            swap_id = %hex::encode(record.id),
            phase = %record.phase,
            "[swap] record saved"
        );
        Ok(())
    }

    /// Remove the record for `id`. Operator action only; orchestrators never
    /// delete records.
    pub fn delete(&self, id: &SwapId) -> Result<(), SwapError> {
        self.backend.delete(&record_key(id))?;
        Ok(())
    }
}
