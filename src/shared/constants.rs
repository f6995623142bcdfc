//! Constants for the account vault
//!
//! This module contains all constants used throughout the vault.

// Backing store identity
pub const DEFAULT_STORE_NAME: &str = "credits_wallet_prefs";

// Backing store keys
pub const KEY_ACCOUNTS: &str = "accounts";
pub const KEY_ACTIVE_ACCOUNT: &str = "active_account_public_key";
pub const KEY_BIOMETRIC_AUTH_ENABLED: &str = "biometric_auth_enabled";
pub const KEY_DATA_MIGRATED: &str = "data_migrated_flag";
pub const KEY_APP_PIN: &str = "app_pin";

// At-rest encryption parameters
pub const MASTER_KEY_SIZE: usize = 32;
pub const NONCE_SIZE: usize = 12;
pub const SALT_SIZE: usize = 32;

// Hardened Argon2id parameters for master-key derivation
pub const ARGON2_MEMORY_COST: u32 = 65536; // 64MB
pub const ARGON2_TIME_COST: u32 = 3;
pub const ARGON2_PARALLELISM: u32 = 1;

// Build information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_keys_are_distinct() {
        let keys = [
            KEY_ACCOUNTS,
            KEY_ACTIVE_ACCOUNT,
            KEY_BIOMETRIC_AUTH_ENABLED,
            KEY_DATA_MIGRATED,
            KEY_APP_PIN,
        ];
        for (i, a) in keys.iter().enumerate() {
            for b in keys.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_crypto_parameters() {
        assert_eq!(MASTER_KEY_SIZE, 32);
        assert_eq!(NONCE_SIZE, 12);
        assert_eq!(SALT_SIZE, 32);
    }
}
