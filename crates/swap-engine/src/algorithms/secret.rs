//! # Secret Hashing
//!
//! SHA-256 hash locks and secret-hash parsing.

use crate::domain::{Hash, SecureSecret, SwapError};
use sha2::{Digest, Sha256};

/// Hash lock for a preimage.
pub fn create_hash_lock(secret: &SecureSecret) -> Hash {
    Sha256::digest(secret.as_bytes()).into()
}

/// Check a preimage against a hash lock.
pub fn verify_secret(secret: &SecureSecret, hash_lock: &Hash) -> bool {
    create_hash_lock(secret) == *hash_lock
}

/// Parse a hex secret hash. Accepts an optional `0x` prefix.
pub fn decode_secret_hash(encoded: &str) -> Result<Hash, SwapError> {
    let trimmed = encoded.strip_prefix("0x").unwrap_or(encoded);
    let bytes = hex::decode(trimmed).map_err(|e| SwapError::MalformedHash(e.to_string()))?;
    bytes
        .as_slice()
        .try_into()
        .map_err(|_| SwapError::MalformedHash(format!("expected 32 bytes, got {}", bytes.len())))
}
