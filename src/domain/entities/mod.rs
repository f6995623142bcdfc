//! Domain entities
//!
//! This module contains the core business entities of the vault.

pub mod account;

pub use account::Account;
