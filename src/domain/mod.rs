//! Domain layer
//!
//! This module contains entities and business rules for the vault.

pub mod entities;

pub use entities::Account;
