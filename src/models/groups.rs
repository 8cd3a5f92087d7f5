//! Per-measure group counts
//!
//! Side output of the tidy-up engine: for each measure, in order, how many
//! events (real or synthetic) landed in it.

use serde::{Deserialize, Serialize};

/// Ordered per-measure event counts.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupTable {
    counts: Vec<usize>,
}

impl GroupTable {
    pub fn new() -> GroupTable {
        GroupTable::default()
    }

    /// Close a measure with `count` events.
    pub fn push(&mut self, count: usize) {
        self.counts.push(count);
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn counts(&self) -> &[usize] {
        &self.counts
    }
}

impl From<Vec<usize>> for GroupTable {
    fn from(counts: Vec<usize>) -> GroupTable {
        GroupTable { counts }
    }
}
