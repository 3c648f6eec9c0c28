//! Query layer - search and pagination over a store snapshot.
//!
//! Every function here works on a `Vec<Item>` that was just read from the
//! store. Nothing is cached and nothing is written.

mod page;
mod params;

pub use page::{find_item, matches, search, PageResult, PaginationInfo};
pub use params::{parse_leading_int, ListQuery, NormalizedQuery};
