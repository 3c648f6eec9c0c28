//! The read-side seam the stats cache is built against.

use std::sync::Arc;

use crate::common::Result;
use crate::storage::{Item, StoreVersion};

/// Something that can report when its content last changed and hand back
/// all of its items.
///
/// [`ItemStore`](crate::storage::ItemStore) is the production source. Tests
/// plug in sources that count reads or hold a computation open.
pub trait ItemSource: Send + Sync {
    /// Cheap change probe. Must not read the full content.
    fn version(&self) -> Result<StoreVersion>;

    /// Full read of every item, in store order.
    fn read_all(&self) -> Result<Vec<Item>>;
}

impl<S: ItemSource + ?Sized> ItemSource for Arc<S> {
    fn version(&self) -> Result<StoreVersion> {
        (**self).version()
    }

    fn read_all(&self) -> Result<Vec<Item>> {
        (**self).read_all()
    }
}
