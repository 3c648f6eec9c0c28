//! Stats cache counters.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Counters tracked by the stats cache.
///
/// All fields are atomic for lock-free, thread-safe updates.
///
/// # Memory Ordering
/// `Ordering::Relaxed` throughout. The counters are independent of each
/// other and of the cache entry; readers only need each value to be
/// untorn.
#[derive(Debug)]
pub struct CacheMetrics {
    /// Requests answered from a valid cached snapshot.
    pub hits: AtomicU64,

    /// Requests that led a fresh computation.
    pub computations: AtomicU64,

    /// Requests that attached to a computation already in flight.
    pub coalesced: AtomicU64,

    /// Computations that ended in an error or a panic.
    pub failures: AtomicU64,
}

impl CacheMetrics {
    /// Create a new tracker with all counters at zero.
    pub fn new() -> Self {
        Self {
            hits: AtomicU64::new(0),
            computations: AtomicU64::new(0),
            coalesced: AtomicU64::new(0),
            failures: AtomicU64::new(0),
        }
    }

    /// Get a snapshot of current counters.
    pub fn snapshot(&self) -> CacheMetricsSnapshot {
        CacheMetricsSnapshot {
            hits: self.hits.load(Ordering::Relaxed),
            computations: self.computations.load(Ordering::Relaxed),
            coalesced: self.coalesced.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
        }
    }

    #[inline]
    pub(crate) fn record(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }
}

impl Default for CacheMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// A point-in-time copy of [`CacheMetrics`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheMetricsSnapshot {
    pub hits: u64,
    pub computations: u64,
    pub coalesced: u64,
    pub failures: u64,
}

impl CacheMetricsSnapshot {
    /// Total requests that got past the version probe.
    pub fn requests(&self) -> u64 {
        self.hits + self.computations + self.coalesced
    }

    /// Share of requests served without touching the store (0.0 to 1.0).
    pub fn hit_rate(&self) -> f64 {
        let requests = self.requests();
        if requests == 0 {
            0.0
        } else {
            self.hits as f64 / requests as f64
        }
    }
}

impl fmt::Display for CacheMetricsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CacheMetrics {{ hits: {}, computations: {}, coalesced: {}, failures: {}, hit_rate: {:.2}% }}",
            self.hits,
            self.computations,
            self.coalesced,
            self.failures,
            self.hit_rate() * 100.0
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_new() {
        let metrics = CacheMetrics::new();
        assert_eq!(metrics.snapshot(), CacheMetricsSnapshot::default());
        assert_eq!(metrics.snapshot().hit_rate(), 0.0);
    }

    #[test]
    fn test_metrics_record() {
        let metrics = CacheMetrics::new();
        for _ in 0..6 {
            CacheMetrics::record(&metrics.hits);
        }
        CacheMetrics::record(&metrics.computations);
        CacheMetrics::record(&metrics.coalesced);
        CacheMetrics::record(&metrics.failures);

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.requests(), 8);
        assert_eq!(snapshot.failures, 1);
        assert_eq!(snapshot.hit_rate(), 0.75);
    }

    #[test]
    fn test_metrics_display() {
        let snapshot = CacheMetricsSnapshot {
            hits: 3,
            computations: 1,
            coalesced: 0,
            failures: 0,
        };
        let display = format!("{}", snapshot);

        assert!(display.contains("hits: 3"));
        assert!(display.contains("75.00%"));
    }
}
