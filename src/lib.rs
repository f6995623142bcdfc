//! Credits Wallet Vault Core
//!
//! Secure local account vault for the Credits wallet application.
//! Persists key-pair-bearing accounts under at-rest encryption, tracks the
//! active account, and migrates legacy Base58 private-key text to the
//! current Base64 encoding.
//!
//! ## Architecture
//!
//! This library follows a simplified architecture focused on core
//! functionality:
//!
//! - **Core**: account record codec and the account store
//! - **Domain**: the account entity
//! - **Infrastructure**: encrypted key-value store implementations
//! - **Shared**: common constants and error handling
//!
//! ## Security Features
//!
//! - AES-256-GCM authenticated encryption for all persisted state
//! - Argon2id master-key derivation
//! - Private-key bytes zeroized on drop and redacted from Debug output
//!
//! ## Usage
//!
//! ```
//! use wallet_vault_core::{Account, AccountVault, MemoryStore};
//!
//! # fn main() -> Result<(), wallet_vault_core::VaultError> {
//! let vault = AccountVault::new(Box::new(MemoryStore::new()));
//!
//! let account = Account::new(vec![1, 2, 3], "pubkey1", Some("Main".to_string()))?;
//! let stored = vault.add_account(account)?;
//! assert_eq!(stored.order, 0);
//!
//! let active = vault.get_active_account()?.expect("just added");
//! assert_eq!(active.public_key, "pubkey1");
//! # Ok(())
//! # }
//! ```
//!
//! For production use, open the vault over the encrypted file store instead:
//! `AccountVault::open_default()`.

pub mod core;
pub mod domain;
pub mod infrastructure;
pub mod shared;

// Re-export main types
pub use crate::core::codec::{AccountRecord, KeyEncoding};
pub use crate::core::store::AccountVault;
pub use crate::domain::Account;
pub use crate::infrastructure::platform::{EncryptedFileStore, MemoryStore, SecureStore};
pub use crate::shared::error::VaultError;

/// Initialize logging for binaries embedding the vault.
pub fn init() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::try_init()?;
    Ok(())
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
