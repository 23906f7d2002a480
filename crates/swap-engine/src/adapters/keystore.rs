//! In-memory keystore.

use crate::domain::{ChainFamily, Passphrase};
use crate::ports::{AccountError, AccountProvider, SigningAccount};
use sha2::{Digest, Sha256};
use std::collections::HashMap;

/// Keystore with one address per key family, guarded by a passphrase digest.
pub struct InMemoryKeystore {
    passphrase_digest: [u8; 32],
    accounts: HashMap<ChainFamily, String>,
}

impl InMemoryKeystore {
    /// Empty keystore unlocked by `passphrase`.
    pub fn new(passphrase: &Passphrase) -> Self {
        Self {
            passphrase_digest: Sha256::digest(passphrase.expose().as_bytes()).into(),
            accounts: HashMap::new(),
        }
    }

    /// Add the address for a key family.
    pub fn with_account(mut self, family: ChainFamily, address: &str) -> Self {
        self.accounts.insert(family.key_family(), address.to_string());
        self
    }
}

impl AccountProvider for InMemoryKeystore {
    fn unlock(
        &self,
        passphrase: &Passphrase,
        family: ChainFamily,
    ) -> Result<SigningAccount, AccountError> {
        let digest: [u8; 32] = Sha256::digest(passphrase.expose().as_bytes()).into();
        if digest != self.passphrase_digest {
            return Err(AccountError::InvalidPassphrase);
        }
        let key_family = family.key_family();
        let address = self
            .accounts
            .get(&key_family)
            .ok_or(AccountError::NoAccountForChain(key_family))?;
        Ok(SigningAccount {
            family: key_family,
            address: address.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keystore() -> InMemoryKeystore {
        InMemoryKeystore::new(&Passphrase::new("pass"))
            .with_account(ChainFamily::Utxo, "alice-btc")
            .with_account(ChainFamily::Account, "alice-eth")
    }

    #[test]
    fn test_unlock() {
        let account = keystore()
            .unlock(&Passphrase::new("pass"), ChainFamily::Utxo)
            .unwrap();
        assert_eq!(account.address, "alice-btc");
    }

    #[test]
    fn test_token_uses_account_key() {
        let account = keystore()
            .unlock(&Passphrase::new("pass"), ChainFamily::AccountToken)
            .unwrap();
        assert_eq!(account.address, "alice-eth");
        assert_eq!(account.family, ChainFamily::Account);
    }

    #[test]
    fn test_wrong_passphrase() {
        let err = keystore()
            .unlock(&Passphrase::new("nope"), ChainFamily::Utxo)
            .unwrap_err();
        assert_eq!(err, AccountError::InvalidPassphrase);
    }

    #[test]
    fn test_missing_account() {
        let keystore = InMemoryKeystore::new(&Passphrase::new("pass"));
        let err = keystore
            .unlock(&Passphrase::new("pass"), ChainFamily::Account)
            .unwrap_err();
        assert_eq!(err, AccountError::NoAccountForChain(ChainFamily::Account));
    }
}
