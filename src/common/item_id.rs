//! Item identifier type.

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

/// Identifies an item in the store.
///
/// Ids are assigned by the store at insertion time and are derived from the
/// wall clock in milliseconds, so they are roughly increasing. They are
/// serialized as a bare JSON integer.
///
/// # Example
/// ```
/// use catalogd::ItemId;
///
/// let id = ItemId::new(42);
/// assert_eq!(id.0, 42);
/// assert_eq!(ItemId::parse("42abc"), Some(id));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub i64);

impl ItemId {
    /// Create a new ItemId.
    #[inline]
    pub fn new(id: i64) -> Self {
        ItemId(id)
    }

    /// Id derived from the current time in milliseconds since the Unix epoch.
    pub fn from_clock() -> Self {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or(0);
        ItemId(i64::try_from(millis).unwrap_or(i64::MAX))
    }

    /// Smallest id strictly greater than this one.
    #[inline]
    pub fn successor(&self) -> Self {
        ItemId(self.0.saturating_add(1))
    }

    /// Parse a path segment into an id.
    ///
    /// Accepts a leading integer and ignores anything after it, so `"17"`
    /// and `"17-lamp"` both name item 17.
    pub fn parse(s: &str) -> Option<Self> {
        crate::query::parse_leading_int(s).map(ItemId)
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Item({})", self.0)
    }
}
