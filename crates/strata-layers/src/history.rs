//! Bounded undo/redo of flattened snapshots.
//!
//! A linear list of snapshots with a cursor. Pushing drops everything after
//! the cursor, appends, and evicts the oldest entry past the capacity.
//! Snapshots are shared `Arc`s, so undo and redo hand out cheap clones.

use std::collections::VecDeque;
use std::sync::Arc;

use strata_core::RgbaImage;
#[allow(unused_imports)]
use tracing::{debug, trace};

/// Default number of retained snapshots.
pub const MAX_HISTORY: usize = 20;

/// Snapshot history with a cursor.
#[derive(Debug, Clone, PartialEq)]
pub struct History {
    entries: VecDeque<Arc<RgbaImage>>,
    index: Option<usize>,
    capacity: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::with_capacity(MAX_HISTORY)
    }
}

impl History {
    /// Empty history holding up to [`MAX_HISTORY`] snapshots.
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty history holding up to `capacity` snapshots (at least one).
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            index: None,
            capacity,
        }
    }

    /// Records a snapshot after the cursor, discarding any redo entries.
    pub fn push(&mut self, snapshot: impl Into<Arc<RgbaImage>>) {
        let keep = self.index.map_or(0, |i| i + 1);
        self.entries.truncate(keep);
        self.entries.push_back(snapshot.into());
        if self.entries.len() > self.capacity {
            self.entries.pop_front();
            debug!(capacity = self.capacity, "history: evicted oldest snapshot");
        }
        self.index = Some(self.entries.len() - 1);
        trace!(len = self.entries.len(), "history::push");
    }

    /// Steps back and returns the snapshot now current.
    pub fn undo(&mut self) -> Option<Arc<RgbaImage>> {
        let i = self.index.filter(|&i| i > 0)? - 1;
        self.index = Some(i);
        self.entries.get(i).cloned()
    }

    /// Steps forward and returns the snapshot now current.
    pub fn redo(&mut self) -> Option<Arc<RgbaImage>> {
        let i = self.index? + 1;
        let entry = self.entries.get(i).cloned()?;
        self.index = Some(i);
        Some(entry)
    }

    /// Returns `true` if [`undo`](Self::undo) would succeed.
    pub fn can_undo(&self) -> bool {
        self.index.is_some_and(|i| i > 0)
    }

    /// Returns `true` if [`redo`](Self::redo) would succeed.
    pub fn can_redo(&self) -> bool {
        self.index.is_some_and(|i| i + 1 < self.entries.len())
    }

    /// Snapshot at the cursor.
    pub fn current(&self) -> Option<&Arc<RgbaImage>> {
        self.entries.get(self.index?)
    }

    /// Cursor position, `None` when empty.
    pub fn index(&self) -> Option<usize> {
        self.index
    }

    /// Number of stored snapshots.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing has been pushed.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of snapshots.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drops every snapshot.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.index = None;
    }
}
