//! Outcome statistics tracking.
//!
//! This module provides thread-safe counters of task outcomes, split by task
//! kind (zone transfer vs. subdomain probe).

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use strum::IntoEnumIterator;

use crate::models::{OutcomeKind, TaskKind};

/// Thread-safe outcome statistics tracker.
///
/// Every (task kind, outcome kind) pair is initialized to zero on creation,
/// so recording never allocates and can be shared across tasks via `Arc`.
pub struct ProcessingStats {
    counters: HashMap<(TaskKind, OutcomeKind), AtomicUsize>,
}

impl ProcessingStats {
    pub fn new() -> Self {
        let mut counters = HashMap::new();
        for task in TaskKind::iter() {
            for outcome in OutcomeKind::iter() {
                counters.insert((task, outcome), AtomicUsize::new(0));
            }
        }
        ProcessingStats { counters }
    }

    /// Record one finished (or cancelled) task.
    pub fn record(&self, task: TaskKind, outcome: OutcomeKind) {
        if let Some(counter) = self.counters.get(&(task, outcome)) {
            counter.fetch_add(1, Ordering::Relaxed);
        } else {
            log::error!(
                "Attempted to record {:?}/{:?} which is not in the map. \
                 This indicates a bug in ProcessingStats initialization.",
                task,
                outcome
            );
        }
    }

    /// Get the count for one (task kind, outcome kind) pair.
    pub fn count(&self, task: TaskKind, outcome: OutcomeKind) -> usize {
        self.counters
            .get(&(task, outcome))
            .map(|c| c.load(Ordering::SeqCst))
            .unwrap_or(0)
    }

    /// Total tasks of a kind across all outcomes.
    pub fn total(&self, task: TaskKind) -> usize {
        OutcomeKind::iter().map(|o| self.count(task, o)).sum()
    }

    /// Tasks of a kind that ended in a transport error or timeout.
    pub fn total_failures(&self, task: TaskKind) -> usize {
        OutcomeKind::iter()
            .filter(|o| o.is_failure())
            .map(|o| self.count(task, o))
            .sum()
    }
}

impl std::fmt::Debug for ProcessingStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut map = f.debug_map();
        for task in TaskKind::iter() {
            for outcome in OutcomeKind::iter() {
                let count = self.count(task, outcome);
                if count > 0 {
                    map.entry(&(task, outcome), &count);
                }
            }
        }
        map.finish()
    }
}

impl Default for ProcessingStats {
    fn default() -> Self {
        Self::new()
    }
}
