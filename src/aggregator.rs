//! Thread-safe collection of discovered names.
//!
//! The aggregator is the only shared mutable state of a run. Tasks submit to
//! it; the orchestrator takes a sorted, deduplicated snapshot once every task
//! has settled.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::sync::Mutex;

use crate::models::{DiscoveredName, Source};

/// Deduplicating collector keyed by normalized fqdn. The first submission of
/// a key wins; later duplicates are dropped silently.
#[derive(Debug, Default)]
pub struct Aggregator {
    entries: Mutex<BTreeMap<String, DiscoveredName>>,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts every name whose key is not present yet.
    ///
    /// The whole batch is inserted under one lock, so concurrent submitters
    /// never observe or create a partially written entry.
    ///
    /// Returns the number of newly inserted names.
    pub fn submit(&self, names: impl IntoIterator<Item = DiscoveredName>) -> usize {
        let mut entries = self
            .entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let mut inserted = 0;
        for name in names {
            let key = name.key();
            if key.is_empty() {
                continue;
            }
            if let Entry::Vacant(slot) = entries.entry(key) {
                slot.insert(name);
                inserted += 1;
            }
        }
        inserted
    }

    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy of the current state, sorted by normalized fqdn.
    pub fn snapshot(&self) -> Snapshot {
        let entries = self
            .entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        Snapshot {
            entries: entries.values().cloned().collect(),
        }
    }
}

/// Frozen, deduplicated view of the aggregator, sorted by normalized fqdn.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    entries: Vec<DiscoveredName>,
}

impl Snapshot {
    /// Builds a snapshot from arbitrary names, applying the same
    /// first-wins deduplication and ordering as the aggregator.
    pub fn from_names(names: impl IntoIterator<Item = DiscoveredName>) -> Self {
        let aggregator = Aggregator::new();
        aggregator.submit(names);
        aggregator.snapshot()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DiscoveredName> {
        self.entries.iter()
    }

    /// Normalized fqdns in sorted order.
    pub fn fqdns(&self) -> Vec<String> {
        self.entries.iter().map(DiscoveredName::key).collect()
    }

    pub fn contains(&self, fqdn: &str) -> bool {
        let key = crate::models::normalize_fqdn(fqdn);
        self.entries
            .binary_search_by(|entry| entry.key().cmp(&key))
            .is_ok()
    }

    /// Entries discovered through `source`, in sorted order.
    pub fn by_source(&self, source: Source) -> impl Iterator<Item = &DiscoveredName> {
        self.entries.iter().filter(move |entry| entry.source == source)
    }
}

impl<'a> IntoIterator for &'a Snapshot {
    type Item = &'a DiscoveredName;
    type IntoIter = std::slice::Iter<'a, DiscoveredName>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
