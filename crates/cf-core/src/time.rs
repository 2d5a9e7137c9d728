//! Simulation time model and run configuration.
//!
//! # Design
//!
//! Time is a monotonically increasing `Tick` counter.  Dwell times, lifetimes
//! and snapshot intervals are all whole ticks, so comparisons are exact.  The
//! mapping to wall-clock seconds lives in `SimClock`:
//!
//!   elapsed_secs = tick * tick_duration_secs
//!
//! The default tick is one simulated second.  Historical timestamps are
//! converted to ticks by the transition builder (`secs_per_tick`), so the
//! two settings should agree for a given scenario.

use std::fmt;

use crate::{CoreError, CoreResult};

// ── Tick ─────────────────────────────────────────────────────────────────────

/// An absolute simulation tick counter.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);

    /// Return the tick `n` steps after `self`.
    #[inline]
    pub fn offset(self, n: u64) -> Tick {
        Tick(self.0.saturating_add(n))
    }

    /// Ticks elapsed from `earlier` to `self`, or 0 if `earlier` is later.
    #[inline]
    pub fn since(self, earlier: Tick) -> u64 {
        self.0.saturating_sub(earlier.0)
    }
}

impl std::ops::Add<u64> for Tick {
    type Output = Tick;
    #[inline]
    fn add(self, rhs: u64) -> Tick {
        self.offset(rhs)
    }
}

impl std::ops::Sub for Tick {
    type Output = u64;
    #[inline]
    fn sub(self, rhs: Tick) -> u64 {
        self.since(rhs)
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// Tracks the current tick and converts it to simulated seconds.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimClock {
    /// How many simulated seconds one tick represents.
    pub tick_duration_secs: u32,
    /// The current tick, advanced by [`SimClock::advance_by`].
    pub current_tick: Tick,
}

impl SimClock {
    pub fn new(tick_duration_secs: u32) -> Self {
        Self { tick_duration_secs, current_tick: Tick::ZERO }
    }

    /// Advance the clock by `delta` ticks.
    #[inline]
    pub fn advance_by(&mut self, delta: u64) {
        self.current_tick = self.current_tick.offset(delta);
    }

    /// Rewind to tick 0.
    pub fn reset(&mut self) {
        self.current_tick = Tick::ZERO;
    }

    /// Elapsed simulated seconds since tick 0.
    #[inline]
    pub fn elapsed_secs(&self) -> u64 {
        self.current_tick.0 * self.tick_duration_secs as u64
    }

    /// Break elapsed time into (hour, minute, second) from the start of the
    /// simulated trading day.  Used for log lines.
    pub fn elapsed_hms(&self) -> (u64, u32, u32) {
        let total = self.elapsed_secs();
        let hours = total / 3_600;
        let minutes = ((total % 3_600) / 60) as u32;
        let seconds = (total % 60) as u32;
        (hours, minutes, seconds)
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (h, m, s) = self.elapsed_hms();
        write!(f, "{} ({:02}:{:02}:{:02})", self.current_tick, h, m, s)
    }
}

// ── SimConfig ─────────────────────────────────────────────────────────────────

/// Top-level simulation configuration.
///
/// Loaded from the scenario file by the application (every field has a
/// default, so a scenario only lists what it changes) and handed to the
/// scheduler builder, which calls [`SimConfig::validate`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimConfig {
    /// Master RNG seed.  The same seed always produces identical runs.
    pub seed: u64,

    /// Simulated seconds per tick.  Default: 1.
    pub tick_duration_secs: u32,

    /// Hard cap on the live population.  `spawn` requests beyond this are
    /// dropped.
    pub max_population: usize,

    /// Agents older than this many ticks are retired even if they never
    /// reach `Exiting`.
    pub max_lifetime_ticks: u64,

    /// Zones remembered per agent.  Older entries are discarded first.
    pub path_history_len: usize,

    /// Agents spawned at the start of every tick by `run_ticks`.
    pub arrivals_per_tick: u32,

    /// Emit a snapshot to the observer every N ticks.  0 disables snapshots.
    pub snapshot_interval_ticks: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed:                    42,
            tick_duration_secs:      1,
            max_population:          500,
            max_lifetime_ticks:      4 * 3_600,
            path_history_len:        32,
            arrivals_per_tick:       0,
            snapshot_interval_ticks: 1,
        }
    }
}

impl SimConfig {
    /// Reject configurations the scheduler cannot run with.
    pub fn validate(&self) -> CoreResult<()> {
        if self.tick_duration_secs == 0 {
            return Err(CoreError::Config("tick_duration_secs must be > 0".into()));
        }
        if self.max_population == 0 {
            return Err(CoreError::Config("max_population must be > 0".into()));
        }
        if self.max_lifetime_ticks == 0 {
            return Err(CoreError::Config("max_lifetime_ticks must be > 0".into()));
        }
        Ok(())
    }

    /// Construct a `SimClock` pre-configured for this run.
    pub fn make_clock(&self) -> SimClock {
        SimClock::new(self.tick_duration_secs)
    }
}
