//! Per-factory build counter.

use std::sync::atomic::{AtomicU64, Ordering};

/// Monotonic sequence counter owned by a single factory.
///
/// The counter is advanced synchronously when a build is requested, before
/// any resolver runs, so the order of `build` calls fixes the numbers handed
/// out regardless of how long each build takes to settle. It is never reset
/// and never wraps: once `u64::MAX` has been handed out, [`advance`] returns
/// `None`.
///
/// [`advance`]: Self::advance
#[derive(Debug)]
pub(crate) struct SequenceCounter {
    first: u64,
    issued: AtomicU64,
}

impl SequenceCounter {
    /// Create a counter whose first [`advance`](Self::advance) yields `first`.
    pub(crate) const fn starting_at(first: u64) -> Self {
        Self {
            first,
            issued: AtomicU64::new(0),
        }
    }

    /// Hand out the next sequence number, or `None` once the range is spent.
    pub(crate) fn advance(&self) -> Option<u64> {
        self.issued
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |issued| {
                self.first.checked_add(issued)?;
                issued.checked_add(1)
            })
            .ok()
            .and_then(|issued| self.first.checked_add(issued))
    }

    /// The most recently handed out number, if any build has started.
    pub(crate) fn last(&self) -> Option<u64> {
        let issued = self.issued.load(Ordering::SeqCst);
        issued
            .checked_sub(1)
            .and_then(|offset| self.first.checked_add(offset))
    }
}
