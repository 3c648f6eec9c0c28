//! Stats Cache - a single-slot memo with single-flight recomputation.
//!
//! The [`StatsCache`] provides:
//! - Cached `{ total, averagePrice }` keyed by the store's modification time
//! - Staleness detection by a cheap metadata probe on every request
//! - Coalescing of concurrent recomputations into one read of the store

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::common::{Error, Result};
use crate::stats::flight::Flight;
use crate::stats::{CacheMetrics, CacheMetricsSnapshot, StatsSnapshot};
use crate::storage::{ItemSource, StoreVersion};

/// Observable lifecycle of the cache entry.
///
/// ```text
/// EMPTY ──▶ COMPUTING ──▶ VALID ──(version changed)──▶ COMPUTING ──▶ VALID ...
///               │
///               └──(failure)──▶ EMPTY
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheState {
    /// No snapshot and nothing in flight.
    Empty,
    /// A computation is in flight. New misses attach to it.
    Computing,
    /// A snapshot is cached for the given store version.
    Valid(StoreVersion),
}

/// Memoizes [`StatsSnapshot`] over an [`ItemSource`].
///
/// # Architecture
/// ```text
/// ┌──────────────────────────────────────────────────────────┐
/// │                       StatsCache                         │
/// │  ┌────────────────────────────────────────────────────┐  │
/// │  │ entry: Mutex<CacheEntry>                           │  │
/// │  │   value:   Option<(StoreVersion, StatsSnapshot)>   │  │
/// │  │   pending: Option<Arc<Flight>> ──┐                 │  │
/// │  └──────────────────────────────────┼─────────────────┘  │
/// │                                     ▼                    │
/// │              ┌──────────────────────────────────┐        │
/// │              │ Flight: Mutex<Option<Result>> +  │◀─ waiters
/// │              │         Condvar                  │        │
/// │              └──────────────────────────────────┘        │
/// └──────────────────────────────────────────────────────────┘
/// ```
///
/// # Thread Safety
/// - `entry`: `Mutex`. The freshness check and the installation of a new
///   in-flight marker happen in one critical section, so two threads can
///   never both decide to compute. The lock is never held across I/O.
/// - `Flight`: its own `Mutex` + `Condvar`. Waiters block here, not on
///   `entry`.
/// - `metrics`: No lock, all atomic counters.
///
/// # Failure
/// A failed or panicking computation clears both the value and the marker,
/// and every waiter receives the same error. The next request starts over.
///
/// # Usage
/// ```no_run
/// use std::sync::Arc;
/// use catalogd::{ItemStore, StatsCache};
///
/// let store = Arc::new(ItemStore::open("data/items.json")?);
/// let cache = StatsCache::new(Arc::clone(&store));
///
/// let stats = cache.get()?;
/// println!("{} items, mean price {}", stats.total, stats.average_price);
/// # Ok::<(), catalogd::Error>(())
/// ```
pub struct StatsCache<S> {
    /// Where items and change probes come from.
    source: S,

    /// The single cache slot.
    entry: Mutex<CacheEntry>,

    /// Hit/compute/coalesce counters.
    metrics: CacheMetrics,
}

#[derive(Default)]
struct CacheEntry {
    /// Last good snapshot and the store version it was computed for.
    value: Option<(StoreVersion, StatsSnapshot)>,

    /// The computation in flight, if any.
    pending: Option<Arc<Flight>>,
}

impl CacheEntry {
    fn fresh(&self, version: StoreVersion) -> Option<StatsSnapshot> {
        match self.value {
            Some((valid_as_of, snapshot)) if valid_as_of == version => Some(snapshot),
            _ => None,
        }
    }
}

enum Role {
    Leader(Arc<Flight>),
    Waiter(Arc<Flight>),
}

impl<S: ItemSource> StatsCache<S> {
    /// Create an empty cache over `source`.
    pub fn new(source: S) -> Self {
        Self {
            source,
            entry: Mutex::new(CacheEntry::default()),
            metrics: CacheMetrics::new(),
        }
    }

    /// The source this cache reads from.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Current stats for the source.
    ///
    /// Returns the cached snapshot if the source has not changed since it
    /// was computed. Otherwise computes a new one, or waits for the
    /// computation another thread already started.
    ///
    /// # Errors
    /// - Any error from the version probe (the cache is left untouched)
    /// - Any error from reading the source, shared by every caller that
    ///   waited on that computation
    /// - `Error::Internal` for waiters whose computing thread panicked
    pub fn get(&self) -> Result<StatsSnapshot> {
        let version = self.source.version()?;

        let role = {
            let mut entry = self.entry.lock();

            if let Some(snapshot) = entry.fresh(version) {
                CacheMetrics::record(&self.metrics.hits);
                tracing::debug!(total = snapshot.total, "Stats cache hit");
                return Ok(snapshot);
            }

            match entry.pending.clone() {
                Some(flight) => Role::Waiter(flight),
                None => {
                    let flight = Arc::new(Flight::new());
                    entry.pending = Some(Arc::clone(&flight));
                    Role::Leader(flight)
                }
            }
        };

        match role {
            Role::Waiter(flight) => {
                CacheMetrics::record(&self.metrics.coalesced);
                tracing::debug!("Attaching to in-flight stats computation");
                flight.wait()
            }
            Role::Leader(flight) => self.compute(version, &flight),
        }
    }

    /// Lifecycle state as a new caller would currently find it.
    pub fn state(&self) -> CacheState {
        let entry = self.entry.lock();
        match (&entry.pending, &entry.value) {
            (Some(_), _) => CacheState::Computing,
            (None, Some((version, _))) => CacheState::Valid(*version),
            (None, None) => CacheState::Empty,
        }
    }

    /// Snapshot of the hit/compute/coalesce counters.
    pub fn metrics(&self) -> CacheMetricsSnapshot {
        self.metrics.snapshot()
    }

    fn compute(&self, version: StoreVersion, flight: &Flight) -> Result<StatsSnapshot> {
        CacheMetrics::record(&self.metrics.computations);
        tracing::debug!(?version, "Computing stats");

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            self.source
                .read_all()
                .map(|items| StatsSnapshot::from_items(&items))
        }));

        match outcome {
            Ok(result) => {
                self.settle(version, flight, &result);
                result
            }
            Err(payload) => {
                let abandoned = Err(Error::Internal("stats computation panicked".into()));
                self.settle(version, flight, &abandoned);
                panic::resume_unwind(payload)
            }
        }
    }

    /// Install (or clear) the value, release the marker, then wake waiters.
    fn settle(&self, version: StoreVersion, flight: &Flight, result: &Result<StatsSnapshot>) {
        {
            let mut entry = self.entry.lock();
            entry.value = result.as_ref().ok().map(|snapshot| (version, *snapshot));
            entry.pending = None;
        }

        if let Err(e) = result {
            CacheMetrics::record(&self.metrics.failures);
            tracing::warn!(error = %e, "Stats computation failed");
        }

        flight.complete(result.clone());
    }
}
