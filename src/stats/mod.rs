//! Stats cache - memoized aggregates over the item store.
//!
//! # Components
//! - [`StatsCache`] - Single-slot cache with single-flight recomputation
//! - [`StatsSnapshot`] - The `{ total, averagePrice }` aggregate
//! - [`CacheMetrics`] - Hit/compute/coalesce counters
//! - [`CacheState`] - Observable EMPTY / COMPUTING / VALID lifecycle

mod cache;
mod flight;
mod metrics;
mod snapshot;

pub use cache::{CacheState, StatsCache};
pub use metrics::{CacheMetrics, CacheMetricsSnapshot};
pub use snapshot::StatsSnapshot;
