//! catalogd - a catalog service over a flat JSON item store.
//!
//! # Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                            catalogd                             │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  ┌─────────────────────────────────────────────────────────┐   │
//! │  │              HTTP Boundary (server/)                     │   │
//! │  │    /items  /items/{id}  POST /items  /stats  /health     │   │
//! │  └─────────────────────────────────────────────────────────┘   │
//! │                              ↓                                  │
//! │  ┌─────────────────────────────────────────────────────────┐   │
//! │  │              Catalog (catalog.rs)                        │   │
//! │  │        explicit context: store + stats cache             │   │
//! │  └─────────────────────────────────────────────────────────┘   │
//! │               ↓                              ↓                  │
//! │  ┌──────────────────────────┐  ┌──────────────────────────┐   │
//! │  │   Query Layer (query/)   │  │  Stats Cache (stats/)    │   │
//! │  │  filter + clamped paging │  │ mtime-keyed single-flight│   │
//! │  └──────────────────────────┘  └──────────────────────────┘   │
//! │                              ↓                                  │
//! │  ┌─────────────────────────────────────────────────────────┐   │
//! │  │           Storage Layer (storage/)                       │   │
//! │  │       ItemStore: one pretty-printed JSON array           │   │
//! │  └─────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//! - [`common`] - Shared primitives (ItemId, Error, defaults)
//! - [`storage`] - The item file and record types
//! - [`query`] - Search and pagination
//! - [`stats`] - Memoized aggregates with single-flight recomputation
//! - [`catalog`] - The context object handlers receive
//! - [`server`] - HTTP routes
//! - [`config`] / [`logging`] / [`signal`] - Process plumbing
//!
//! # Quick Start
//! ```no_run
//! use catalogd::{Catalog, ItemStore, NewItem};
//!
//! let store = ItemStore::open_or_create("data/items.json").unwrap();
//! let catalog = Catalog::new(store);
//!
//! catalog.append(NewItem::new("Desk Lamp", "Lighting", 25.0)).unwrap();
//! let stats = catalog.stats().unwrap();
//! ```

pub mod catalog;
pub mod common;
pub mod config;
pub mod logging;
pub mod query;
pub mod server;
pub mod signal;
pub mod stats;
pub mod storage;

// Re-export commonly used items at crate root for convenience
pub use catalog::Catalog;
pub use common::{Error, ItemId, Result};
pub use query::{ListQuery, PageResult, PaginationInfo};
pub use stats::{CacheState, StatsCache, StatsSnapshot};
pub use storage::{Item, ItemSource, ItemStore, NewItem, StoreVersion};
