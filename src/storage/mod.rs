//! Storage layer - the item file and its record format.
//!
//! This module handles persistent storage:
//! - [`ItemStore`] - File I/O for the JSON item array
//! - [`Item`] / [`NewItem`] - Record types
//! - [`ItemSource`] - Read-side trait the stats cache depends on

mod item;
mod item_store;
mod source;

pub use item::{Item, NewItem};
pub use item_store::{ItemStore, StoreVersion};
pub use source::ItemSource;
