//! Platform storage implementations
//!
//! This module contains the encrypted key-value store backing the account
//! vault.
//!
//! SECURITY: the production store is hardened with:
//! - AES-256-GCM authenticated encryption for the whole document
//! - Argon2id master-key derivation with hardened parameters
//! - Memory zeroization for derived key material
//! - Restrictive (0o600) file permissions and hashed file names

use crate::shared::constants::{
    ARGON2_MEMORY_COST, ARGON2_PARALLELISM, ARGON2_TIME_COST, MASTER_KEY_SIZE, NONCE_SIZE,
    SALT_SIZE,
};
use crate::shared::error::VaultError;
use aes_gcm::aead::generic_array::GenericArray;
use aes_gcm::aead::Aead;
use aes_gcm::{Aes256Gcm, KeyInit};
use argon2::{Argon2, PasswordHasher};
use rand_core::{OsRng, RngCore};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs::{self, File};
use std::io::{Read, Write};
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use zeroize::Zeroizing;

/// One value in the backing store. The store is string-keyed and holds either
/// text or boolean values, matching the preference-style contract the vault
/// depends on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StoreValue {
    Bool(bool),
    Text(String),
}

/// Encrypted key-value store contract.
///
/// All operations are synchronous and must be confidentiality- and
/// integrity-protected at rest by the implementation. One store instance is
/// scoped to one named store.
pub trait SecureStore: Send + Sync {
    /// Retrieve a text value, or `None` if the key is absent.
    fn get_string(&self, key: &str) -> Result<Option<String>, VaultError>;

    /// Store a text value.
    fn put_string(&self, key: &str, value: &str) -> Result<(), VaultError>;

    /// Retrieve a boolean value, or `None` if the key is absent.
    fn get_bool(&self, key: &str) -> Result<Option<bool>, VaultError>;

    /// Store a boolean value.
    fn put_bool(&self, key: &str, value: bool) -> Result<(), VaultError>;

    /// Check whether a key is present.
    fn contains(&self, key: &str) -> Result<bool, VaultError>;

    /// Wipe every key in this store.
    fn clear_all(&self) -> Result<(), VaultError>;
}

/// Production store: one AES-256-GCM encrypted JSON document per named store.
///
/// The master key is derived with Argon2id from a provisioning secret (the
/// `WALLET_VAULT_PASSPHRASE` environment variable when set, otherwise a
/// random secret generated once and persisted with 0o600 permissions). The
/// derivation first attempts hardened parameters and falls back to the
/// library defaults if parameter construction fails.
pub struct EncryptedFileStore {
    dir: PathBuf,
    file_stem: String,
    master_key: Zeroizing<[u8; MASTER_KEY_SIZE]>,
}

impl EncryptedFileStore {
    /// Open (or create) the named store in the platform data directory.
    pub fn open(store_name: &str) -> Result<Self, VaultError> {
        let base_dir = dirs::data_dir().unwrap_or_else(|| PathBuf::from("./secure_storage"));
        Self::open_in(&base_dir.join("credits_wallet"), store_name)
    }

    /// Open (or create) the named store under an explicit directory.
    pub fn open_in(dir: &Path, store_name: &str) -> Result<Self, VaultError> {
        if store_name.is_empty() {
            return Err(VaultError::config("Store name cannot be empty"));
        }
        fs::create_dir_all(dir)?;

        // Hash the store name for on-disk file names to prevent enumeration.
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(store_name.as_bytes());
        let hash = hasher.finalize();
        let file_stem = hex::encode(&hash[..16]);

        let secret = Self::provision_secret(dir, &file_stem)?;
        let salt = Self::get_salt(dir, &file_stem)?;
        let master_key = Self::derive_key(&secret, &salt)?;

        log::info!("Opened encrypted store '{}'", store_name);
        Ok(Self {
            dir: dir.to_path_buf(),
            file_stem,
            master_key,
        })
    }

    fn data_path(&self) -> PathBuf {
        self.dir.join(format!("{}.dat", self.file_stem))
    }

    // Provisioning secret: env override first, otherwise a random secret
    // generated once per store and kept beside the data file.
    fn provision_secret(dir: &Path, file_stem: &str) -> Result<Zeroizing<Vec<u8>>, VaultError> {
        if let Ok(passphrase) = env::var("WALLET_VAULT_PASSPHRASE") {
            return Ok(Zeroizing::new(passphrase.into_bytes()));
        }

        let key_path = dir.join(format!("{}.key", file_stem));
        if key_path.exists() {
            let mut secret = Zeroizing::new(vec![]);
            File::open(&key_path)?.read_to_end(&mut secret)?;
            return Ok(secret);
        }

        let mut secret = Zeroizing::new(vec![0u8; MASTER_KEY_SIZE]);
        let mut rng = OsRng;
        rng.fill_bytes(secret.as_mut_slice());
        let mut file = File::create(&key_path)?;
        file.set_permissions(fs::Permissions::from_mode(0o600))?;
        file.write_all(&secret)?;
        Ok(secret)
    }

    fn get_salt(dir: &Path, file_stem: &str) -> Result<Zeroizing<Vec<u8>>, VaultError> {
        let salt_path = dir.join(format!("{}.salt", file_stem));
        if salt_path.exists() {
            let mut salt = Zeroizing::new(vec![]);
            File::open(&salt_path)?.read_to_end(&mut salt)?;
            return Ok(salt);
        }

        let mut salt = Zeroizing::new(vec![0u8; SALT_SIZE]);
        let mut rng = OsRng;
        rng.fill_bytes(salt.as_mut_slice());
        let mut file = File::create(&salt_path)?;
        file.set_permissions(fs::Permissions::from_mode(0o600))?;
        file.write_all(&salt)?;
        Ok(salt)
    }

    // Derive the AES key from the provisioning secret. Hardened Argon2id
    // parameters are attempted first; if parameter construction fails the
    // library defaults are used instead.
    fn derive_key(
        secret: &[u8],
        salt: &[u8],
    ) -> Result<Zeroizing<[u8; MASTER_KEY_SIZE]>, VaultError> {
        let salt_str = argon2::password_hash::SaltString::encode_b64(salt)?;
        let argon2 = match argon2::Params::new(
            ARGON2_MEMORY_COST,
            ARGON2_TIME_COST,
            ARGON2_PARALLELISM,
            Some(MASTER_KEY_SIZE),
        ) {
            Ok(params) => Argon2::new(argon2::Algorithm::Argon2id, argon2::Version::V0x13, params),
            Err(e) => {
                log::warn!("Hardened Argon2 parameters unavailable, using defaults: {}", e);
                Argon2::default()
            }
        };

        let password_hash = argon2
            .hash_password(secret, &salt_str)
            .map_err(|e| VaultError::crypto(format!("Master key derivation failed: {}", e)))?;
        let hash = password_hash
            .hash
            .ok_or_else(|| VaultError::crypto("Master key hash is empty".to_string()))?;
        let hash_bytes = hash.as_bytes();
        if hash_bytes.len() < MASTER_KEY_SIZE {
            return Err(VaultError::crypto("Master key hash too short".to_string()));
        }

        let mut key = Zeroizing::new([0u8; MASTER_KEY_SIZE]);
        key.copy_from_slice(&hash_bytes[..MASTER_KEY_SIZE]);
        Ok(key)
    }

    fn load_document(&self) -> Result<HashMap<String, StoreValue>, VaultError> {
        let path = self.data_path();
        if !path.exists() {
            return Ok(HashMap::new());
        }

        let cipher = Aes256Gcm::new(GenericArray::from_slice(&*self.master_key));
        let mut file = File::open(&path)?;
        let mut nonce = [0u8; NONCE_SIZE];
        file.read_exact(&mut nonce)?;
        let mut ciphertext = vec![];
        file.read_to_end(&mut ciphertext)?;

        let plaintext = cipher
            .decrypt(GenericArray::from_slice(&nonce), ciphertext.as_slice())
            .map_err(|e| VaultError::crypto(format!("Store decryption failed: {}", e)))?;
        let document = serde_json::from_slice(&plaintext)?;
        Ok(document)
    }

    fn persist_document(&self, document: &HashMap<String, StoreValue>) -> Result<(), VaultError> {
        let plaintext = serde_json::to_vec(document)?;
        let cipher = Aes256Gcm::new(GenericArray::from_slice(&*self.master_key));
        let mut nonce = [0u8; NONCE_SIZE];
        let mut rng = OsRng;
        rng.fill_bytes(&mut nonce);

        let ciphertext = cipher
            .encrypt(GenericArray::from_slice(&nonce), plaintext.as_slice())
            .map_err(|e| VaultError::crypto(format!("Store encryption failed: {}", e)))?;

        // Write to a temp file and rename into place so a reader never sees
        // a truncated document.
        let tmp_path = self.dir.join(format!("{}.dat.tmp", self.file_stem));
        let mut file = File::create(&tmp_path)?;
        file.set_permissions(fs::Permissions::from_mode(0o600))?;
        file.write_all(&nonce)?;
        file.write_all(&ciphertext)?;
        file.sync_all()?;
        fs::rename(&tmp_path, self.data_path())?;
        Ok(())
    }

    fn put(&self, key: &str, value: StoreValue) -> Result<(), VaultError> {
        let mut document = self.load_document()?;
        document.insert(key.to_string(), value);
        self.persist_document(&document)
    }
}

impl SecureStore for EncryptedFileStore {
    fn get_string(&self, key: &str) -> Result<Option<String>, VaultError> {
        match self.load_document()?.remove(key) {
            Some(StoreValue::Text(value)) => Ok(Some(value)),
            Some(StoreValue::Bool(_)) | None => Ok(None),
        }
    }

    fn put_string(&self, key: &str, value: &str) -> Result<(), VaultError> {
        self.put(key, StoreValue::Text(value.to_string()))
    }

    fn get_bool(&self, key: &str) -> Result<Option<bool>, VaultError> {
        match self.load_document()?.remove(key) {
            Some(StoreValue::Bool(value)) => Ok(Some(value)),
            Some(StoreValue::Text(_)) | None => Ok(None),
        }
    }

    fn put_bool(&self, key: &str, value: bool) -> Result<(), VaultError> {
        self.put(key, StoreValue::Bool(value))
    }

    fn contains(&self, key: &str) -> Result<bool, VaultError> {
        Ok(self.load_document()?.contains_key(key))
    }

    fn clear_all(&self) -> Result<(), VaultError> {
        let path = self.data_path();
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }
}

/// Plain in-memory store. Not encrypted; intended for tests and examples.
pub struct MemoryStore {
    data: Mutex<HashMap<String, StoreValue>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            data: Mutex::new(HashMap::new()),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, StoreValue>>, VaultError> {
        self.data
            .lock()
            .map_err(|_| VaultError::internal("Memory store lock poisoned"))
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SecureStore for MemoryStore {
    fn get_string(&self, key: &str) -> Result<Option<String>, VaultError> {
        match self.lock()?.get(key) {
            Some(StoreValue::Text(value)) => Ok(Some(value.clone())),
            Some(StoreValue::Bool(_)) | None => Ok(None),
        }
    }

    fn put_string(&self, key: &str, value: &str) -> Result<(), VaultError> {
        self.lock()?
            .insert(key.to_string(), StoreValue::Text(value.to_string()));
        Ok(())
    }

    fn get_bool(&self, key: &str) -> Result<Option<bool>, VaultError> {
        match self.lock()?.get(key) {
            Some(StoreValue::Bool(value)) => Ok(Some(*value)),
            Some(StoreValue::Text(_)) | None => Ok(None),
        }
    }

    fn put_bool(&self, key: &str, value: bool) -> Result<(), VaultError> {
        self.lock()?
            .insert(key.to_string(), StoreValue::Bool(value));
        Ok(())
    }

    fn contains(&self, key: &str) -> Result<bool, VaultError> {
        Ok(self.lock()?.contains_key(key))
    }

    fn clear_all(&self) -> Result<(), VaultError> {
        self.lock()?.clear();
        Ok(())
    }
}
