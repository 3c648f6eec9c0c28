//! Common types and utilities shared across catalogd.
//!
//! This module contains fundamental primitives used throughout the codebase:
//! - Default constants
//! - Error types
//! - Identifiers (ItemId)

pub mod config;
pub mod error;
mod item_id;

pub use error::{Error, Result};
pub use item_id::ItemId;
