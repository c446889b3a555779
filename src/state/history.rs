//! Bounded undo/redo history of form snapshots

use super::model::{now_millis, Form};
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Maximum number of snapshots kept; the oldest is evicted first
pub const MAX_HISTORY: usize = 30;

/// A point-in-time copy of a form.
///
/// The form is shared behind an `Arc`; edits produce new forms, so a
/// snapshot's form is never mutated after it is recorded.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub form: Arc<Form>,
    pub timestamp: DateTime<Utc>,
}

impl Snapshot {
    fn new(form: Arc<Form>) -> Self {
        Self {
            form,
            timestamp: now_millis(),
        }
    }
}

/// Indexed log of snapshots with branch truncation on new entries
#[derive(Debug, Clone, Default)]
pub struct History {
    entries: Vec<Snapshot>,
    /// `None` iff `entries` is empty
    index: Option<usize>,
}

impl History {
    /// Replace the whole log with a single snapshot of `form`
    pub fn reset(&mut self, form: Arc<Form>) {
        self.entries = vec![Snapshot::new(form)];
        self.index = Some(0);
    }

    /// Record `form` after the current entry.
    ///
    /// Skipped when the current entry has the same form id and `updated_at`.
    /// Returns whether a snapshot was added.
    pub fn record(&mut self, form: Arc<Form>) -> bool {
        if let Some(current) = self.current() {
            if current.form.id == form.id && current.form.updated_at == form.updated_at {
                return false;
            }
        }

        let keep = self.index.map_or(0, |i| i + 1);
        self.entries.truncate(keep);
        self.entries.push(Snapshot::new(form));

        if self.entries.len() > MAX_HISTORY {
            self.entries.remove(0);
        }
        self.index = Some(self.entries.len() - 1);
        true
    }

    /// Step back one entry and return its form
    pub fn undo(&mut self) -> Option<Arc<Form>> {
        let index = self.index.filter(|i| *i > 0)? - 1;
        self.index = Some(index);
        Some(Arc::clone(&self.entries[index].form))
    }

    /// Step forward one entry and return its form
    pub fn redo(&mut self) -> Option<Arc<Form>> {
        let index = self.index.filter(|i| i + 1 < self.entries.len())? + 1;
        self.index = Some(index);
        Some(Arc::clone(&self.entries[index].form))
    }

    pub fn can_undo(&self) -> bool {
        self.index.is_some_and(|i| i > 0)
    }

    pub fn can_redo(&self) -> bool {
        self.index.is_some_and(|i| i + 1 < self.entries.len())
    }

    /// Entry at the current position
    pub fn current(&self) -> Option<&Snapshot> {
        self.index.and_then(|i| self.entries.get(i))
    }

    pub fn index(&self) -> Option<usize> {
        self.index
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[cfg(test)]
    pub fn entries(&self) -> &[Snapshot] {
        &self.entries
    }
}
