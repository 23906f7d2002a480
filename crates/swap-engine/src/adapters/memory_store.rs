//! In-memory swap state store.

use crate::ports::{StoreError, SwapStateStore};
use parking_lot::RwLock;
use std::collections::HashMap;

/// Key-value store held in memory. Safe for concurrent use, last writer wins
/// per key.
#[derive(Default)]
pub struct InMemorySwapStateStore {
    data: RwLock<HashMap<Vec<u8>, Vec<u8>>>,
}

impl InMemorySwapStateStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    /// Store is empty.
    pub fn is_empty(&self) -> bool {
        self.data.read().is_empty()
    }
}

impl SwapStateStore for InMemorySwapStateStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.data.read().get(key).cloned())
    }

    fn put(&self, key: &[u8], value: &[u8]) -> Result<(), StoreError> {
        self.data.write().insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    fn delete(&self, key: &[u8]) -> Result<(), StoreError> {
        self.data.write().remove(key);
        Ok(())
    }
}
