//! Filtering, clamped pagination and single-item lookup.

use serde::{Deserialize, Serialize};

use crate::common::{Error, ItemId, Result};
use crate::query::{ListQuery, NormalizedQuery};
use crate::storage::Item;

/// Where a page sits in the filtered result set.
///
/// `page` is always within `1..=total_pages`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationInfo {
    pub page: usize,
    pub limit: usize,
    pub total: usize,
    pub total_pages: usize,
}

impl PaginationInfo {
    /// Compute paging for `total` matches, clamping `requested` into range.
    pub fn clamped(requested: usize, limit: usize, total: usize) -> Self {
        let limit = limit.max(1);
        let total_pages = total.div_ceil(limit).max(1);
        Self {
            page: requested.clamp(1, total_pages),
            limit,
            total,
            total_pages,
        }
    }

    /// Index of the first item on this page.
    #[inline]
    pub fn offset(&self) -> usize {
        (self.page - 1) * self.limit
    }
}

/// One page of items plus its paging metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageResult {
    pub items: Vec<Item>,
    pub pagination: PaginationInfo,
}

/// True if `needle` (already lowercased) occurs in the item's name or
/// category, ignoring case. An empty needle matches every item.
pub fn matches(item: &Item, needle: &str) -> bool {
    needle.is_empty()
        || item.name.to_lowercase().contains(needle)
        || item.category.to_lowercase().contains(needle)
}

/// Filter then paginate a snapshot of the store.
pub fn search(items: Vec<Item>, query: &ListQuery) -> PageResult {
    let NormalizedQuery {
        needle,
        limit,
        page,
    } = query.normalize();

    let matched: Vec<Item> = if needle.is_empty() {
        items
    } else {
        items.into_iter().filter(|item| matches(item, &needle)).collect()
    };

    let pagination = PaginationInfo::clamped(page, limit, matched.len());
    let items = matched
        .into_iter()
        .skip(pagination.offset())
        .take(pagination.limit)
        .collect();

    PageResult { items, pagination }
}

/// Look up a single item by id.
///
/// # Errors
/// Returns `Error::ItemNotFound` if no item carries `id`.
pub fn find_item(items: Vec<Item>, id: ItemId) -> Result<Item> {
    items
        .into_iter()
        .find(|item| item.id == id)
        .ok_or(Error::ItemNotFound(id))
}
