//! Shared call log for asserting the order in which callbacks ran.
//!
//! # Examples
//!
//! ```
//! use fixture_factory_test_helpers::Recorder;
//!
//! let log = Recorder::default();
//! let handle = log.clone();
//! handle.record("resolve name");
//! log.record("derive full_name");
//! assert_eq!(log.entries(), ["resolve name", "derive full_name"]);
//! ```

use std::sync::Arc;

use parking_lot::Mutex;

/// Cloneable, thread-safe list of recorded events.
///
/// Clones share the same log, so a clone can be moved into a resolver or
/// derivation closure while the test keeps the original.
#[derive(Clone, Debug, Default)]
pub struct Recorder {
    entries: Arc<Mutex<Vec<String>>>,
}

impl Recorder {
    /// Append `entry` to the log.
    pub fn record(&self, entry: impl Into<String>) {
        self.entries.lock().push(entry.into());
    }

    /// Snapshot of the log in recording order.
    #[must_use]
    pub fn entries(&self) -> Vec<String> {
        self.entries.lock().clone()
    }

    /// Number of recorded events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Returns `true` when nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}
