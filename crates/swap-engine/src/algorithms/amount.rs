//! # Amount Parsing

use crate::domain::SwapError;
use primitive_types::U256;

/// Parse a decimal amount in the token's smallest unit.
pub fn parse_amount(raw: &str) -> Result<U256, SwapError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(SwapError::MalformedAmount(raw.to_string()));
    }
    U256::from_dec_str(trimmed).map_err(|e| SwapError::MalformedAmount(format!("{raw}: {e:?}")))
}
