//! # Handler registry - append-only, snapshot-read set of entries.
//!
//! The registry is the only shared mutable state of a bus. It is read on every
//! dispatch and written on every registration, from any thread.
//!
//! ## Architecture
//! ```text
//! register_*() ──► insert_batch(entries) ──► rcu: copy current Vec, append, swap
//!                                                 │
//! dispatch()   ──► matching(event) ──► load snapshot (lock-free) ──► filter accepts()
//! ```
//!
//! ## Rules
//! - Entries are never mutated or removed once inserted.
//! - A batch becomes visible atomically: a reader sees all of it or none of it.
//! - Readers work on an immutable snapshot; concurrent inserts never invalidate it.
//! - A dispatch does not see entries inserted after its snapshot was taken.

use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::events::Event;
use crate::handlers::HandlerEntry;

type Entries = Vec<Arc<HandlerEntry>>;

/// Thread-safe, append-only set of handler entries.
pub(crate) struct Registry {
    entries: ArcSwap<Entries>,
}

impl Registry {
    /// Creates an empty registry.
    pub(crate) fn new() -> Self {
        Self {
            entries: ArcSwap::from_pointee(Vec::new()),
        }
    }

    /// Atomically appends a batch. Returns the number of entries added.
    pub(crate) fn insert_batch(&self, batch: Vec<HandlerEntry>) -> usize {
        if batch.is_empty() {
            return 0;
        }
        let batch: Entries = batch.into_iter().map(Arc::new).collect();
        self.entries.rcu(|current| {
            let mut next = Vec::with_capacity(current.len() + batch.len());
            next.extend(current.iter().cloned());
            next.extend(batch.iter().cloned());
            next
        });
        batch.len()
    }

    /// Appends a single entry.
    pub(crate) fn insert(&self, entry: HandlerEntry) {
        self.insert_batch(vec![entry]);
    }

    /// Current snapshot of all entries.
    pub(crate) fn snapshot(&self) -> Arc<Entries> {
        self.entries.load_full()
    }

    /// Entries accepting `event`, taken from one snapshot.
    pub(crate) fn matching(&self, event: &dyn Event) -> Entries {
        self.entries
            .load()
            .iter()
            .filter(|entry| entry.accepts(event))
            .cloned()
            .collect()
    }

    /// Number of registered entries.
    pub(crate) fn len(&self) -> usize {
        self.entries.load().len()
    }
}
