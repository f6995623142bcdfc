//! Account vault
//!
//! This module contains the account store: it owns the persisted list of
//! accounts and the active-account pointer, and implements add, update,
//! remove, list, and the lazy key-encoding migration on top of the codec and
//! the encrypted backing store.
//!
//! Every operation is a full read-modify-write of the entire collection.
//! There are no partial updates; a single process-wide mutex inside the vault
//! serializes the cycles so multithreaded callers cannot interleave them.

use crate::core::codec::{self, AccountRecord, KeyEncoding};
use crate::domain::Account;
use crate::infrastructure::platform::{EncryptedFileStore, SecureStore};
use crate::shared::constants::{
    DEFAULT_STORE_NAME, KEY_ACCOUNTS, KEY_ACTIVE_ACCOUNT, KEY_APP_PIN,
    KEY_BIOMETRIC_AUTH_ENABLED, KEY_DATA_MIGRATED,
};
use crate::shared::error::VaultError;
use std::sync::{Mutex, MutexGuard};

/// Secure account vault.
///
/// Constructed once per process and passed by reference to all callers;
/// construction establishes the backing store, so there is no reachable
/// uninitialized state.
pub struct AccountVault {
    store: Box<dyn SecureStore>,
    op_lock: Mutex<()>,
}

impl AccountVault {
    /// Create a vault over an already-opened backing store.
    pub fn new(store: Box<dyn SecureStore>) -> Self {
        Self {
            store,
            op_lock: Mutex::new(()),
        }
    }

    /// Open the vault over an encrypted file store with the given name.
    pub fn open(store_name: &str) -> Result<Self, VaultError> {
        let store = EncryptedFileStore::open(store_name)?;
        Ok(Self::new(Box::new(store)))
    }

    /// Open the vault over the application's default store.
    pub fn open_default() -> Result<Self, VaultError> {
        Self::open(DEFAULT_STORE_NAME)
    }

    /// List all accounts, sorted ascending by order.
    ///
    /// Reading is non-destructive except for the migration side effect: the
    /// first successful read of a non-empty collection still stored in the
    /// legacy encoding re-persists it through the encoder, which writes the
    /// current encoding and sets the migration flag. Subsequent reads are
    /// pure.
    pub fn list_accounts(&self) -> Result<Vec<Account>, VaultError> {
        let _guard = self.lock()?;
        self.load_accounts_sorted()
    }

    /// Add a new account, assign it the trailing order position, and make it
    /// the active account.
    ///
    /// Returns the stored account with its assigned order. Fails with
    /// [`VaultError::AccountExists`] if an account with the same public key
    /// is already present.
    pub fn add_account(&self, account: Account) -> Result<Account, VaultError> {
        let _guard = self.lock()?;
        account.validate()?;

        let mut accounts = self.load_accounts_sorted()?;
        if accounts.iter().any(|a| a.public_key == account.public_key) {
            return Err(VaultError::account_exists(account.public_key.clone()));
        }

        // Stored orders are not an input constraint, so the maximum may sit
        // at the type limit; fail cleanly instead of wrapping.
        let next_order = match accounts.iter().map(|a| a.order).max() {
            Some(max) => max
                .checked_add(1)
                .ok_or_else(|| VaultError::validation("Account order space exhausted"))?,
            None => 0,
        };
        let mut stored = account;
        stored.order = next_order;

        accounts.push(stored.clone());
        self.persist_accounts(&accounts)?;
        self.store
            .put_string(KEY_ACTIVE_ACCOUNT, &stored.public_key)?;

        log::debug!("Added account {} at order {}", stored.public_key, stored.order);
        Ok(stored)
    }

    /// Replace the stored account matching the candidate's public key,
    /// preserving its order position.
    ///
    /// A missing public key is a silent no-op, not an error.
    pub fn update_account(&self, account: Account) -> Result<(), VaultError> {
        let _guard = self.lock()?;

        let mut accounts = self.load_accounts_sorted()?;
        if let Some(index) = accounts
            .iter()
            .position(|a| a.public_key == account.public_key)
        {
            let order = accounts[index].order;
            let mut replacement = account;
            replacement.order = order;
            accounts[index] = replacement;
            self.persist_accounts(&accounts)?;
        }
        Ok(())
    }

    /// Remove the account matching the target's public key.
    ///
    /// Removing the last remaining account is equivalent to [`clear`]. After
    /// a removal the survivors are densely renumbered in their surviving
    /// order; if the removed account was active, the survivor now occupying
    /// the removed index becomes active (or the last survivor when the tail
    /// was removed). An unknown public key in a multi-account collection is a
    /// silent no-op.
    ///
    /// [`clear`]: AccountVault::clear
    pub fn remove_account(&self, account: &Account) -> Result<(), VaultError> {
        let _guard = self.lock()?;

        let accounts = self.load_accounts_sorted()?;
        if accounts.len() <= 1 {
            return self.wipe();
        }

        let removed_index = match accounts
            .iter()
            .position(|a| a.public_key == account.public_key)
        {
            Some(index) => index,
            None => return Ok(()),
        };
        let was_active = self
            .store
            .get_string(KEY_ACTIVE_ACCOUNT)?
            .is_some_and(|active| active == account.public_key);

        let mut survivors = accounts;
        survivors.remove(removed_index);
        for (index, survivor) in survivors.iter_mut().enumerate() {
            survivor.order = index as u32;
        }
        self.persist_accounts(&survivors)?;

        if was_active {
            let new_active_index = if removed_index >= survivors.len() {
                survivors.len() - 1
            } else {
                removed_index
            };
            self.store
                .put_string(KEY_ACTIVE_ACCOUNT, &survivors[new_active_index].public_key)?;
        }

        log::debug!("Removed account {}", account.public_key);
        Ok(())
    }

    /// Set the active-account reference to the target's public key.
    ///
    /// No existence check is performed against the stored collection; callers
    /// are expected to point at an account they just persisted. A dangling
    /// reference degrades to `None` on lookup.
    pub fn set_active_account(&self, account: &Account) -> Result<(), VaultError> {
        let _guard = self.lock()?;
        self.store
            .put_string(KEY_ACTIVE_ACCOUNT, &account.public_key)
    }

    /// Resolve the stored active public key against the current collection.
    ///
    /// Returns `None` when no reference is stored or when the reference does
    /// not match any current account; a stale reference is not repaired here.
    pub fn get_active_account(&self) -> Result<Option<Account>, VaultError> {
        let _guard = self.lock()?;

        let public_key = match self.store.get_string(KEY_ACTIVE_ACCOUNT)? {
            Some(key) => key,
            None => return Ok(None),
        };
        let accounts = self.load_accounts_sorted()?;
        Ok(accounts.into_iter().find(|a| a.public_key == public_key))
    }

    /// Wipe all persisted state: accounts, active reference, migration flag,
    /// and the ancillary flags.
    pub fn clear(&self) -> Result<(), VaultError> {
        let _guard = self.lock()?;
        self.wipe()
    }

    // --- Pass-through settings (no collection logic) ---
    //
    // These share the backing document with the collection keys, so they
    // take the same operation lock as the core operations.

    pub fn set_biometric_auth_enabled(&self, enabled: bool) -> Result<(), VaultError> {
        let _guard = self.lock()?;
        self.store.put_bool(KEY_BIOMETRIC_AUTH_ENABLED, enabled)
    }

    pub fn is_biometric_auth_enabled(&self) -> Result<bool, VaultError> {
        let _guard = self.lock()?;
        Ok(self
            .store
            .get_bool(KEY_BIOMETRIC_AUTH_ENABLED)?
            .unwrap_or(false))
    }

    pub fn save_app_pin(&self, pin: &str) -> Result<(), VaultError> {
        let _guard = self.lock()?;
        self.store.put_string(KEY_APP_PIN, pin)
    }

    pub fn get_app_pin(&self) -> Result<Option<String>, VaultError> {
        let _guard = self.lock()?;
        self.store.get_string(KEY_APP_PIN)
    }

    pub fn has_app_pin(&self) -> Result<bool, VaultError> {
        let _guard = self.lock()?;
        self.store.contains(KEY_APP_PIN)
    }

    // --- Internal read-modify-write plumbing (caller holds the lock) ---

    fn lock(&self) -> Result<MutexGuard<'_, ()>, VaultError> {
        self.op_lock
            .lock()
            .map_err(|_| VaultError::internal("Vault operation lock poisoned"))
    }

    fn wipe(&self) -> Result<(), VaultError> {
        log::info!("Clearing vault state");
        self.store.clear_all()
    }

    /// Read and decode the full collection, migrating it if this is the
    /// first non-empty read in the legacy state.
    fn load_accounts(&self) -> Result<Vec<Account>, VaultError> {
        let json = match self.store.get_string(KEY_ACCOUNTS)? {
            Some(json) => json,
            None => return Ok(Vec::new()),
        };
        let migrated = self.store.get_bool(KEY_DATA_MIGRATED)?.unwrap_or(false);
        let encoding = KeyEncoding::from_migrated_flag(migrated);

        let records: Vec<AccountRecord> = serde_json::from_str(&json)?;
        let accounts = codec::decode_records(records, encoding)?;

        if encoding == KeyEncoding::Legacy && !accounts.is_empty() {
            log::info!(
                "Migrating {} account(s) to the current key encoding",
                accounts.len()
            );
            self.persist_accounts(&accounts)?;
        }

        Ok(accounts)
    }

    fn load_accounts_sorted(&self) -> Result<Vec<Account>, VaultError> {
        let mut accounts = self.load_accounts()?;
        accounts.sort_by_key(|a| a.order);
        Ok(accounts)
    }

    /// Persist the full collection. Always writes the current encoding and
    /// sets the migration flag, so any write path keeps the state machine at
    /// CURRENT.
    fn persist_accounts(&self, accounts: &[Account]) -> Result<(), VaultError> {
        let records = codec::encode_accounts(accounts);
        let json = serde_json::to_string(&records)?;
        self.store.put_string(KEY_ACCOUNTS, &json)?;
        self.store.put_bool(KEY_DATA_MIGRATED, true)
    }
}
