//! Error types for catalogd.

use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

use crate::common::ItemId;

/// Convenient Result type alias.
///
/// Instead of writing `Result<T, Error>` everywhere, we can write `Result<T>`.
/// This is a common Rust pattern (see `std::io::Result`).
pub type Result<T> = std::result::Result<T, Error>;

/// All possible errors in catalogd.
///
/// Underlying sources are held behind `Arc` so the whole enum is `Clone`.
/// The stats cache relies on this to hand one failed computation to every
/// caller that was waiting on it.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// The store file is missing or could not be read or written.
    #[error("Item store {} unavailable: {source}", path.display())]
    StoreUnavailable {
        path: PathBuf,
        #[source]
        source: Arc<std::io::Error>,
    },

    /// The store file exists but does not hold a JSON array of items.
    #[error("Item store {} is malformed: {source}", path.display())]
    StoreMalformed {
        path: PathBuf,
        #[source]
        source: Arc<serde_json::Error>,
    },

    /// Single-item lookup found nothing.
    #[error("Item not found")]
    ItemNotFound(ItemId),

    /// Request body could not be read as an item-shaped object.
    ///
    /// This is not field validation; any JSON object is accepted.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// A worker panicked or was torn down before producing a result.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    pub(crate) fn unavailable(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::StoreUnavailable {
            path: path.into(),
            source: Arc::new(source),
        }
    }

    pub(crate) fn malformed(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Error::StoreMalformed {
            path: path.into(),
            source: Arc::new(source),
        }
    }

    /// True for every failure that means the backing store cannot be used.
    pub fn is_store_failure(&self) -> bool {
        matches!(
            self,
            Error::StoreUnavailable { .. } | Error::StoreMalformed { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::ItemNotFound(ItemId::new(42));
        assert_eq!(format!("{}", err), "Item not found");

        let err = Error::InvalidRequest("expected an object".into());
        assert_eq!(format!("{}", err), "Invalid request: expected an object");
    }

    #[test]
    fn test_store_unavailable_keeps_source() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = Error::unavailable("data/items.json", io_err);

        assert!(err.is_store_failure());
        assert!(format!("{}", err).contains("data/items.json"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_clone_shares_source() {
        let parse_err = serde_json::from_str::<Vec<u32>>("{").unwrap_err();
        let err = Error::malformed("items.json", parse_err);
        let copy = err.clone();

        match (&err, &copy) {
            (
                Error::StoreMalformed { source: a, .. },
                Error::StoreMalformed { source: b, .. },
            ) => assert!(Arc::ptr_eq(a, b)),
            _ => panic!("Expected StoreMalformed"),
        }
    }

    #[test]
    fn test_not_found_is_not_store_failure() {
        assert!(!Error::ItemNotFound(ItemId::new(1)).is_store_failure());
        assert!(!Error::Internal("boom".into()).is_store_failure());
    }

    #[test]
    fn test_result_type_alias() {
        fn might_fail() -> Result<u32> {
            Ok(42)
        }

        assert_eq!(might_fail().unwrap(), 42);
    }
}
