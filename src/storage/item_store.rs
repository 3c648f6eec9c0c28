//! Item Store - the flat JSON file behind the catalog.
//!
//! The [`ItemStore`] handles all direct file operations:
//! - Reading every item
//! - Appending an item with a store-assigned id
//! - Probing the file's modification time

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::common::{Error, ItemId, Result};
use crate::storage::{Item, ItemSource, NewItem};

/// Modification timestamp of the store file.
///
/// Two probes compare equal exactly when the file's mtime did not change
/// between them. The stats cache uses this as its validity key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StoreVersion(SystemTime);

impl StoreVersion {
    /// Wrap a raw modification time.
    #[inline]
    pub fn new(modified: SystemTime) -> Self {
        StoreVersion(modified)
    }

    /// The underlying modification time.
    #[inline]
    pub fn modified(&self) -> SystemTime {
        self.0
    }
}

/// Manages the JSON file holding every item.
///
/// # File Layout
/// The store is one pretty-printed JSON array, rewritten wholesale on every
/// append:
/// ```text
/// [
///   {
///     "id": 1,
///     "name": "Laptop Pro",
///     "category": "Electronics",
///     "price": 2499
///   },
///   ...
/// ]
/// ```
///
/// # Thread Safety
/// `ItemStore` holds no file handle and takes no locks. Every call opens the
/// file afresh. Concurrent `append` calls race on the read-modify-write and
/// the last writer wins, so one of the appended items can be lost. Callers
/// that need more must serialize writes themselves.
///
/// # Durability
/// Writes go straight to the target path with no temp file and no fsync. A
/// crash mid-write can leave a truncated file, which later reads report as
/// [`Error::StoreMalformed`].
#[derive(Debug, Clone)]
pub struct ItemStore {
    path: PathBuf,
}

impl ItemStore {
    /// Create a new, empty store file.
    ///
    /// Missing parent directories are created.
    ///
    /// # Errors
    /// Returns an error if the file already exists or cannot be created.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| Error::unavailable(&path, e))?;
        }

        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .map_err(|e| Error::unavailable(&path, e))?;
        file.write_all(b"[]\n")
            .map_err(|e| Error::unavailable(&path, e))?;

        tracing::info!(path = %path.display(), "Created empty item store");
        Ok(Self { path })
    }

    /// Open an existing store file.
    ///
    /// Only checks that the file is there; content is validated on read.
    ///
    /// # Errors
    /// Returns `Error::StoreUnavailable` if the file doesn't exist.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let store = Self {
            path: path.as_ref().to_path_buf(),
        };
        store.version()?;
        Ok(store)
    }

    /// Open an existing store file, or create if it doesn't exist.
    pub fn open_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::open(path)
        } else {
            Self::create(path)
        }
    }

    /// Location of the store file.
    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Probe the file's modification time without reading it.
    ///
    /// # Errors
    /// Returns `Error::StoreUnavailable` if the file is missing or the
    /// platform does not report modification times.
    pub fn version(&self) -> Result<StoreVersion> {
        let modified = fs::metadata(&self.path)
            .and_then(|m| m.modified())
            .map_err(|e| Error::unavailable(&self.path, e))?;
        Ok(StoreVersion(modified))
    }

    /// Read and deserialize every item.
    ///
    /// # Errors
    /// - `Error::StoreUnavailable` if the file cannot be read
    /// - `Error::StoreMalformed` if it is not a JSON array of items
    pub fn read_all(&self) -> Result<Vec<Item>> {
        let raw = fs::read(&self.path).map_err(|e| Error::unavailable(&self.path, e))?;
        let items: Vec<Item> =
            serde_json::from_slice(&raw).map_err(|e| Error::malformed(&self.path, e))?;

        tracing::debug!(
            path = %self.path.display(),
            bytes = raw.len(),
            items = items.len(),
            "Read item store"
        );
        Ok(items)
    }

    /// Append an item, assigning it a fresh id, and rewrite the file.
    ///
    /// The id is the current time in milliseconds, bumped past the largest
    /// id already stored so it never collides with an existing item.
    ///
    /// # Errors
    /// Any error from reading the current content, or
    /// `Error::StoreUnavailable` if the rewrite fails.
    pub fn append(&self, new_item: NewItem) -> Result<Item> {
        let mut items = self.read_all()?;

        let id = Self::next_id(&items);
        let item = new_item.into_item(id);
        items.push(item.clone());

        self.write_all(&items)?;

        tracing::info!(id = item.id.0, total = items.len(), "Appended item");
        Ok(item)
    }

    fn next_id(items: &[Item]) -> ItemId {
        let clock = ItemId::from_clock();
        match items.iter().map(|item| item.id).max() {
            Some(max) => clock.max(max.successor()),
            None => clock,
        }
    }

    fn write_all(&self, items: &[Item]) -> Result<()> {
        let mut body =
            serde_json::to_vec_pretty(items).map_err(|e| Error::malformed(&self.path, e))?;
        body.push(b'\n');

        fs::write(&self.path, body).map_err(|e| Error::unavailable(&self.path, e))
    }
}

impl ItemSource for ItemStore {
    fn version(&self) -> Result<StoreVersion> {
        ItemStore::version(self)
    }

    fn read_all(&self) -> Result<Vec<Item>> {
        ItemStore::read_all(self)
    }
}
