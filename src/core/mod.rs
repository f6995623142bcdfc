//! Core vault functionality
//!
//! This module contains the account record codec and the account store.

pub mod codec;
pub mod store;
