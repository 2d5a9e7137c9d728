//! `SnapshotWindow` — keeps the most recent snapshots for live aggregation.

use std::collections::VecDeque;

use cf_sim::{SimObserver, SimSnapshot};

/// A [`SimObserver`] that retains the last `capacity` snapshots, oldest
/// first.
///
/// ```rust,ignore
/// let mut window = SnapshotWindow::new(30);
/// sched.run_ticks(600, &mut window);
/// let overlay = live_overlay(window.iter());
/// ```
#[derive(Debug, Clone)]
pub struct SnapshotWindow {
    snapshots: VecDeque<SimSnapshot>,
    capacity:  usize,
}

impl SnapshotWindow {
    /// A window of at least one snapshot.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self { snapshots: VecDeque::with_capacity(capacity), capacity }
    }

    pub fn push(&mut self, snapshot: SimSnapshot) {
        if self.snapshots.len() == self.capacity {
            self.snapshots.pop_front();
        }
        self.snapshots.push_back(snapshot);
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn latest(&self) -> Option<&SimSnapshot> {
        self.snapshots.back()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SimSnapshot> + '_ {
        self.snapshots.iter()
    }

    pub fn clear(&mut self) {
        self.snapshots.clear();
    }
}

impl SimObserver for SnapshotWindow {
    fn on_snapshot(&mut self, snapshot: &SimSnapshot) {
        self.push(snapshot.clone());
    }
}
