//! One-shot shared result for an in-flight stats computation.

use parking_lot::{Condvar, Mutex};

use crate::common::Result;
use crate::stats::StatsSnapshot;

/// A promise that the computing thread fulfils once and any number of
/// waiting threads read.
///
/// Shared as `Arc<Flight>`: the cache entry holds one clone while the
/// computation is pending, and every waiter holds its own, so the result
/// stays reachable after the entry lets go.
#[derive(Debug)]
pub(crate) struct Flight {
    outcome: Mutex<Option<Result<StatsSnapshot>>>,
    done: Condvar,
}

impl Flight {
    pub(crate) fn new() -> Self {
        Self {
            outcome: Mutex::new(None),
            done: Condvar::new(),
        }
    }

    /// Publish the outcome and wake every waiter.
    ///
    /// Only the first call has any effect.
    pub(crate) fn complete(&self, outcome: Result<StatsSnapshot>) {
        {
            let mut slot = self.outcome.lock();
            debug_assert!(slot.is_none(), "flight completed twice");
            if slot.is_none() {
                *slot = Some(outcome);
            }
        }
        self.done.notify_all();
    }

    /// Block until the outcome is published, then return a copy of it.
    pub(crate) fn wait(&self) -> Result<StatsSnapshot> {
        let mut slot = self.outcome.lock();
        loop {
            if let Some(outcome) = slot.as_ref() {
                return outcome.clone();
            }
            self.done.wait(&mut slot);
        }
    }

    #[cfg(test)]
    pub(crate) fn is_complete(&self) -> bool {
        self.outcome.lock().is_some()
    }
}
