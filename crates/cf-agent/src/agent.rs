//! Per-agent state.

use std::collections::VecDeque;

use cf_core::{AgentId, AgentRng, Point, Tick, ZoneIdx};

use crate::LifecycleState;

// ── PathHistory ───────────────────────────────────────────────────────────────

/// The most recent zones an agent has been in, oldest first.
///
/// Holds at most `capacity` entries; pushing onto a full history drops the
/// oldest.  Consecutive duplicates are never recorded, so a self-loop leaves
/// the history unchanged.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PathHistory {
    zones:    VecDeque<ZoneIdx>,
    capacity: usize,
}

impl PathHistory {
    pub fn new(capacity: usize) -> Self {
        Self { zones: VecDeque::with_capacity(capacity.min(64)), capacity }
    }

    /// Record `zone` unless it is the current last entry.  Returns whether
    /// anything was appended.
    pub fn record(&mut self, zone: ZoneIdx) -> bool {
        if self.capacity == 0 || self.zones.back() == Some(&zone) {
            return false;
        }
        if self.zones.len() == self.capacity {
            self.zones.pop_front();
        }
        self.zones.push_back(zone);
        true
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn iter(&self) -> impl Iterator<Item = ZoneIdx> + '_ {
        self.zones.iter().copied()
    }

    pub fn to_vec(&self) -> Vec<ZoneIdx> {
        self.iter().collect()
    }
}

// ── CustomerAgent ─────────────────────────────────────────────────────────────

/// One simulated shopper.
///
/// Created and mutated only by the scheduler.  The scheduler keeps `position`
/// inside `zone` and `ticks_remaining >= 1` between ticks.
#[derive(Clone, Debug)]
pub struct CustomerAgent {
    pub id:              AgentId,
    pub zone:            ZoneIdx,
    pub state:           LifecycleState,
    pub position:        Point,
    pub ticks_remaining: u64,
    pub entry_tick:      Tick,
    pub path:            PathHistory,
    /// Private random stream; seeded from the population seed and `id`.
    pub rng:             AgentRng,
}

impl CustomerAgent {
    /// A fresh agent in `Entering`, with `zone` already in its path.
    pub fn new(
        id:              AgentId,
        zone:            ZoneIdx,
        position:        Point,
        ticks_remaining: u64,
        entry_tick:      Tick,
        path_capacity:   usize,
        rng:             AgentRng,
    ) -> Self {
        let mut path = PathHistory::new(path_capacity);
        path.record(zone);
        Self {
            id,
            zone,
            state: LifecycleState::Entering,
            position,
            ticks_remaining,
            entry_tick,
            path,
            rng,
        }
    }

    /// Ticks since the agent entered the store.
    #[inline]
    pub fn age(&self, now: Tick) -> u64 {
        now.since(self.entry_tick)
    }

    pub fn snapshot(&self) -> AgentSnapshot {
        AgentSnapshot { id: self.id, zone: self.zone, state: self.state, position: self.position }
    }
}

// ── AgentSnapshot ─────────────────────────────────────────────────────────────

/// The externally visible part of an agent at one instant.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AgentSnapshot {
    pub id:       AgentId,
    pub zone:     ZoneIdx,
    pub state:    LifecycleState,
    pub position: Point,
}
