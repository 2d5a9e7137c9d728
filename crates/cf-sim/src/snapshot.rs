//! Values handed out of the scheduler.

use cf_agent::AgentSnapshot;
use cf_core::Tick;

/// Copy of the live population at one tick.  Agents are in ascending id
/// order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SimSnapshot {
    pub tick:   Tick,
    pub agents: Vec<AgentSnapshot>,
}

impl SimSnapshot {
    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }
}

/// What happened during one call to `tick`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Clock value after the tick.
    pub tick:       Tick,
    /// Agents whose dwell expired this tick.
    pub advanced:   usize,
    /// Of those, agents that changed zone.
    pub moved:      usize,
    /// Agents removed for reaching `Exiting`.
    pub exited:     usize,
    /// Agents removed for exceeding `max_lifetime_ticks`.
    pub expired:    usize,
    /// Live population after removal.
    pub population: usize,
}
