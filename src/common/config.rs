//! Default constants for catalogd.

/// Page size used when the caller does not supply a usable `limit`.
pub const DEFAULT_LIMIT: usize = 10;

/// Page requested when the caller does not supply a usable `page`.
pub const DEFAULT_PAGE: usize = 1;

/// Location of the item store relative to the working directory.
pub const DEFAULT_DATA_PATH: &str = "data/items.json";

/// Address the HTTP server binds to.
///
/// Port 4001 is where the browser frontend expects the API.
pub const DEFAULT_ADDRESS: &str = "127.0.0.1:4001";

/// Prefix every catalog route is mounted under.
pub const DEFAULT_BASE_PATH: &str = "/api";
