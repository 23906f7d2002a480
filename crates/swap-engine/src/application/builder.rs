//! # Contract Builder
//!
//! Turns one user-level [`SwapRequest`] into two complementary legs bound to
//! their chains. Everything here runs before any chain I/O.
//!
//! | Leg | Funding | Spending | Expiry (first mover) | Expiry (second mover) |
//! |-----|---------|----------|----------------------|-----------------------|
//! | native (send) | local | `send_to` | `T` | `T - skew` |
//! | foreign (receive) | `receive_from` | local | `T - skew` | `T` |

use crate::adapters::BinderRegistry;
use crate::algorithms::{
    calculate_timelocks, check_pairing, is_same_chain, parse_amount, verify_secret,
};
use crate::config::SwapConfig;
use crate::domain::{LegDescriptor, Passphrase, SwapError, SwapRequest, TokenInfo};
use crate::ports::{AccountProvider, BoundSwap, SigningAccount, SwapContractBuilder, TokenRegistry};
use std::sync::Arc;
use tracing::{debug, info};

/// Default [`SwapContractBuilder`].
pub struct ContractBuilder {
    registry: Arc<dyn TokenRegistry>,
    accounts: Arc<dyn AccountProvider>,
    binders: BinderRegistry,
    config: SwapConfig,
}

impl ContractBuilder {
    /// Create a builder over the given collaborators.
    pub fn new(
        registry: Arc<dyn TokenRegistry>,
        accounts: Arc<dyn AccountProvider>,
        binders: BinderRegistry,
        config: SwapConfig,
    ) -> Self {
        Self {
            registry,
            accounts,
            binders,
            config,
        }
    }

    fn resolve(&self, symbol: &str) -> Result<TokenInfo, SwapError> {
        let token = self.registry.token(symbol)?;
        if !self.binders.supports(token.family) {
            return Err(SwapError::UnsupportedToken(token.symbol));
        }
        Ok(token)
    }

    fn unlock(&self, passphrase: &Passphrase, token: &TokenInfo) -> Result<SigningAccount, SwapError> {
        self.accounts
            .unlock(passphrase, token.family)
            .map_err(|e| SwapError::AccountUnlockFailed {
                family: token.family.key_family(),
                reason: e.to_string(),
            })
    }
}

impl SwapContractBuilder for ContractBuilder {
    fn build(&self, request: SwapRequest) -> Result<BoundSwap, SwapError> {
        self.config.validate()?;
        let skew = self.config.safety_skew_secs;
        let (native_expiry, foreign_expiry) =
            calculate_timelocks(request.timelock, skew, request.initiates_first).ok_or(
                SwapError::TimelockTooShort {
                    timelock: request.timelock,
                    skew,
                },
            )?;

        let send = self.resolve(&request.send_token)?;
        let receive = self.resolve(&request.receive_token)?;
        check_pairing(&send, &receive)?;

        let send_value = parse_amount(&request.send_amount)?;
        let receive_value = parse_amount(&request.receive_amount)?;
        let secret_hash = self.registry.decode_secret_hash(&request.secret_hash)?;

        let secret = if request.initiates_first {
            let secret = request.secret.clone().ok_or_else(|| {
                SwapError::MalformedHash("first mover must hold the secret".to_string())
            })?;
            if !verify_secret(&secret, &secret_hash) {
                return Err(SwapError::SecretMismatch);
            }
            Some(secret)
        } else {
            None
        };

        let send_account = self.unlock(&request.passphrase, &send)?;
        let receive_account = self.unlock(&request.passphrase, &receive)?;

        let native = LegDescriptor {
            swap_id: request.id,
            token: send,
            value: send_value,
            secret_hash,
            expiry: native_expiry,
            funding_address: send_account.address.clone(),
            spending_address: request.send_to.clone(),
        };
        let foreign = LegDescriptor {
            swap_id: request.id,
            token: receive,
            value: receive_value,
            secret_hash,
            expiry: foreign_expiry,
            funding_address: request.receive_from.clone(),
            spending_address: receive_account.address.clone(),
        };
        debug!(
            ?native,
            ?foreign,
            same_chain = is_same_chain(&native.token, &foreign.token),
            "[swap] legs assembled"
        );

        let native = self.binders.bind(native, send_account)?;
        let foreign = self.binders.bind(foreign, receive_account)?;

        info!(
            swap_id = %hex::encode(request.id),
            send = %request.send_token,
            receive = %request.receive_token,
            initiates_first = request.initiates_first,
            native_expiry,
            foreign_expiry,
            "[swap] swap contracts built"
        );

        Ok(BoundSwap {
            id: request.id,
            native,
            foreign,
            initiates_first: request.initiates_first,
            secret,
        })
    }
}
