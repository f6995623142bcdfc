//! Error handling for the account vault
//!
//! This module defines the error types used throughout the vault.

use thiserror::Error;

/// Vault error type
#[derive(Error, Debug, Clone)]
pub enum VaultError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Cryptographic error: {0}")]
    Crypto(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Account already exists: {0}")]
    AccountExists(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl VaultError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a cryptographic error
    pub fn crypto(message: impl Into<String>) -> Self {
        Self::Crypto(message.into())
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }

    /// Create a serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization(message.into())
    }

    /// Create an account-already-exists error
    pub fn account_exists(public_key: impl Into<String>) -> Self {
        Self::AccountExists(public_key.into())
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }
}

// Standard library error conversions
impl From<std::io::Error> for VaultError {
    fn from(err: std::io::Error) -> Self {
        Self::storage(format!("IO error: {}", err))
    }
}

impl From<serde_json::Error> for VaultError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(format!("JSON error: {}", err))
    }
}

// Encoding error conversions
impl From<base64::DecodeError> for VaultError {
    fn from(err: base64::DecodeError) -> Self {
        Self::validation(format!("Base64 decoding error: {}", err))
    }
}

// Cryptographic error conversions
impl From<argon2::password_hash::Error> for VaultError {
    fn from(err: argon2::password_hash::Error) -> Self {
        Self::crypto(format!("Password hash error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vault_error_creation() {
        let config_error = VaultError::config("Invalid configuration");
        let crypto_error = VaultError::crypto("Encryption failed");
        let storage_error = VaultError::storage("Write failed");

        assert!(matches!(config_error, VaultError::Config(_)));
        assert!(matches!(crypto_error, VaultError::Crypto(_)));
        assert!(matches!(storage_error, VaultError::Storage(_)));
    }

    #[test]
    fn test_error_conversions() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let vault_error: VaultError = io_error.into();

        assert!(matches!(vault_error, VaultError::Storage(_)));
    }

    #[test]
    fn test_error_display() {
        let error = VaultError::account_exists("pubkey123");
        let display = format!("{}", error);

        assert!(display.contains("Account already exists"));
        assert!(display.contains("pubkey123"));
    }
}
