//! Progress tracking for a run.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Called with `(completed, total)` every time a task settles.
///
/// Invoked from worker tasks, so it must be cheap and thread-safe.
pub type ProgressCallback = Option<Arc<dyn Fn(usize, usize) + Send + Sync>>;

/// Shared completion counter for one run.
pub(crate) struct Progress {
    completed: AtomicUsize,
    total: usize,
    callback: ProgressCallback,
}

impl Progress {
    pub(crate) fn new(total: usize, callback: ProgressCallback) -> Self {
        Self {
            completed: AtomicUsize::new(0),
            total,
            callback,
        }
    }

    /// Marks one task as settled and notifies the callback.
    pub(crate) fn complete(&self) -> usize {
        let done = self.completed.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(callback) = &self.callback {
            callback(done, self.total);
        }
        done
    }

    pub(crate) fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }

    pub(crate) fn total(&self) -> usize {
        self.total
    }
}
