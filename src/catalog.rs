//! Catalog - the explicit context handed to request handlers.
//!
//! Bundles the item store and the stats cache that reads it, so nothing in
//! the crate reaches for global state.

use std::path::Path;
use std::sync::Arc;

use crate::common::{ItemId, Result};
use crate::query::{self, ListQuery, PageResult};
use crate::stats::{CacheMetricsSnapshot, StatsCache, StatsSnapshot};
use crate::storage::{Item, ItemStore, NewItem};

/// Everything a request needs: the store and the stats memo over it.
///
/// # Usage
/// ```no_run
/// use catalogd::{Catalog, ListQuery, NewItem};
///
/// let catalog = Catalog::open("data/items.json")?;
///
/// let created = catalog.append(NewItem::new("Desk", "Furniture", 120.0))?;
/// let page = catalog.list(&ListQuery::new("desk", 10, 1))?;
/// assert!(page.items.iter().any(|i| i.id == created.id));
/// # Ok::<(), catalogd::Error>(())
/// ```
pub struct Catalog {
    store: Arc<ItemStore>,
    stats: StatsCache<Arc<ItemStore>>,
}

impl Catalog {
    /// Wrap an already-opened store.
    pub fn new(store: ItemStore) -> Self {
        let store = Arc::new(store);
        Self {
            stats: StatsCache::new(Arc::clone(&store)),
            store,
        }
    }

    /// Open the store at `path`.
    ///
    /// # Errors
    /// Returns `Error::StoreUnavailable` if the file does not exist.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        ItemStore::open(path).map(Self::new)
    }

    /// The underlying store.
    pub fn store(&self) -> &ItemStore {
        &self.store
    }

    /// Search and paginate over a fresh read of the store.
    pub fn list(&self, query: &ListQuery) -> Result<PageResult> {
        let items = self.store.read_all()?;
        Ok(query::search(items, query))
    }

    /// Fetch one item by id.
    ///
    /// # Errors
    /// `Error::ItemNotFound` if no item has this id, or a store error.
    pub fn get(&self, id: ItemId) -> Result<Item> {
        query::find_item(self.store.read_all()?, id)
    }

    /// Insert an item; the store assigns its id.
    pub fn append(&self, item: NewItem) -> Result<Item> {
        self.store.append(item)
    }

    /// Aggregate stats, served from cache while the store is unchanged.
    pub fn stats(&self) -> Result<StatsSnapshot> {
        self.stats.get()
    }

    /// Counters of the stats cache.
    pub fn cache_metrics(&self) -> CacheMetricsSnapshot {
        self.stats.metrics()
    }
}
