//! Bounded log of prior generations used for stepping backwards.

use std::collections::VecDeque;

use chronolife_core::Grid;

/// Chronological snapshot log with FIFO eviction at the head and stack
/// discipline at the tail.
#[derive(Clone, Debug)]
pub struct History {
    snapshots: VecDeque<Grid>,
    limit: usize,
}

impl History {
    /// Creates an empty history retaining at most `limit` snapshots.
    #[must_use]
    pub fn new(limit: usize) -> Self {
        Self {
            snapshots: VecDeque::new(),
            limit,
        }
    }

    /// Appends a deep copy of `grid`, evicting the oldest entries past the limit.
    pub fn record(&mut self, grid: &Grid) {
        self.snapshots.push_back(grid.clone());
        while self.snapshots.len() > self.limit {
            let _ = self.snapshots.pop_front();
        }
    }

    /// Removes and returns the most recent snapshot.
    pub fn undo(&mut self) -> Option<Grid> {
        self.snapshots.pop_back()
    }

    /// Reports whether no snapshot is available.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Number of retained snapshots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Maximum number of retained snapshots.
    #[must_use]
    pub const fn limit(&self) -> usize {
        self.limit
    }

    /// Iterator over the retained snapshots, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Grid> {
        self.snapshots.iter()
    }
}
