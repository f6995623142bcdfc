//! Shared types, constants, and error handling
//!
//! This module contains common definitions used throughout the vault.

pub mod constants;
pub mod error;
