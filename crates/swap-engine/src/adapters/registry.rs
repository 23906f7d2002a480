//! Static token registry.

use crate::domain::{ChainFamily, SwapError, TokenInfo};
use crate::ports::TokenRegistry;
use std::collections::HashMap;

/// Swap contract holding native ETH locks.
pub const ETH_SWAP_CONTRACT: &str = "0xswap-eth";

/// Swap contract holding WBTC locks.
pub const WBTC_SWAP_CONTRACT: &str = "0xswap-wbtc";

/// Token table fixed at startup. Symbols are case-insensitive.
#[derive(Clone, Debug, Default)]
pub struct StaticTokenRegistry {
    tokens: HashMap<String, TokenInfo>,
}

impl StaticTokenRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// BTC on a UTXO chain, ETH and WBTC on one account chain.
    pub fn with_defaults() -> Self {
        Self::new()
            .register(TokenInfo::new("BTC", ChainFamily::Utxo, "bitcoin", 8))
            .register(
                TokenInfo::new("ETH", ChainFamily::Account, "ethereum", 18)
                    .with_contract(ETH_SWAP_CONTRACT),
            )
            .register(
                TokenInfo::new("WBTC", ChainFamily::AccountToken, "ethereum", 8)
                    .with_contract(WBTC_SWAP_CONTRACT),
            )
    }

    /// Add or replace a token.
    pub fn register(mut self, token: TokenInfo) -> Self {
        self.tokens.insert(token.symbol.to_ascii_uppercase(), token);
        self
    }
}

impl TokenRegistry for StaticTokenRegistry {
    fn token(&self, symbol: &str) -> Result<TokenInfo, SwapError> {
        self.tokens
            .get(&symbol.to_ascii_uppercase())
            .cloned()
            .ok_or_else(|| SwapError::UnsupportedToken(symbol.to_string()))
    }
}
