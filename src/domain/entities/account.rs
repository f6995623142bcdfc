//! Account entity
//!
//! This module contains the Account entity representing one wallet
//! identity: a private/public key pair plus display metadata and a
//! display-order position.

use crate::shared::error::VaultError;
use zeroize::Zeroize;

/// Core account entity.
///
/// Holds the raw private-key bytes in memory; the key material is zeroized
/// when the account is dropped. `Debug` is implemented by hand so the key
/// never reaches logs.
#[derive(Clone, PartialEq, Eq)]
pub struct Account {
    /// Raw private-key bytes. Opaque to the vault; any length is accepted.
    pub private_key: Vec<u8>,
    /// Globally unique identifier within the vault, never empty.
    pub public_key: String,
    /// Optional display label, no uniqueness constraint.
    pub name: Option<String>,
    /// Display/iteration position; assigned and maintained by the vault.
    pub order: u32,
}

impl Account {
    /// Create a new account from caller-supplied key material.
    ///
    /// The order position is assigned by the vault when the account is
    /// added, so it starts at zero here.
    pub fn new(
        private_key: Vec<u8>,
        public_key: impl Into<String>,
        name: Option<String>,
    ) -> Result<Self, VaultError> {
        let public_key = public_key.into();
        if public_key.is_empty() {
            return Err(VaultError::validation("Account public key cannot be empty"));
        }

        Ok(Self {
            private_key,
            public_key,
            name,
            order: 0,
        })
    }

    pub fn validate(&self) -> Result<(), VaultError> {
        if self.public_key.is_empty() {
            return Err(VaultError::validation("Account public key cannot be empty"));
        }

        Ok(())
    }
}

impl std::fmt::Debug for Account {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Account")
            .field("private_key", &"<redacted>")
            .field("public_key", &self.public_key)
            .field("name", &self.name)
            .field("order", &self.order)
            .finish()
    }
}

impl Zeroize for Account {
    fn zeroize(&mut self) {
        self.private_key.zeroize();
    }
}

impl Drop for Account {
    fn drop(&mut self) {
        self.private_key.zeroize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_creation() {
        let account = Account::new(vec![1, 2, 3], "pubkey1", Some("Main".to_string()))
            .expect("Failed to create test account");

        assert_eq!(account.public_key, "pubkey1");
        assert_eq!(account.name.as_deref(), Some("Main"));
        assert_eq!(account.order, 0);
    }

    #[test]
    fn test_empty_public_key_rejected() {
        let result = Account::new(vec![1, 2, 3], "", None);
        assert!(matches!(result, Err(VaultError::Validation(_))));
    }

    #[test]
    fn test_debug_redacts_private_key() {
        let account = Account::new(vec![0xde, 0xad], "pubkey1", None)
            .expect("Failed to create test account");
        let debug = format!("{:?}", account);

        assert!(debug.contains("<redacted>"));
        assert!(!debug.contains("222")); // 0xde as decimal
    }

    #[test]
    fn test_zeroize_clears_key_material() {
        let mut account = Account::new(vec![7; 32], "pubkey1", None)
            .expect("Failed to create test account");
        account.zeroize();

        assert!(account.private_key.is_empty() || account.private_key.iter().all(|b| *b == 0));
    }
}
