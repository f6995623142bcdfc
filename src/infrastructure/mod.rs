//! Infrastructure layer
//!
//! This module contains the platform storage implementations the vault
//! core builds on.

pub mod platform;
