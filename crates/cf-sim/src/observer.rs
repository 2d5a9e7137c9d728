//! Simulation observer trait for progress reporting and data collection.

use cf_core::Tick;

use crate::{SimSnapshot, TickReport};

/// Callbacks invoked by [`Scheduler::run_ticks`][crate::Scheduler::run_ticks].
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
///
/// # Example — progress printer
///
/// ```rust,ignore
/// struct Progress { every: u64 }
///
/// impl SimObserver for Progress {
///     fn on_tick_end(&mut self, report: &TickReport) {
///         if report.tick.0 % self.every == 0 {
///             println!("{}: {} shoppers", report.tick, report.population);
///         }
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called before arrivals are spawned for the tick.  `tick` is the clock
    /// value going into the tick.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// Called after removal, with the tick's counters.
    fn on_tick_end(&mut self, _report: &TickReport) {}

    /// Called every `snapshot_interval_ticks` ticks with a copy of the
    /// population.
    fn on_snapshot(&mut self, _snapshot: &SimSnapshot) {}

    /// Called once when `run_ticks` returns.
    fn on_sim_end(&mut self, _final_tick: Tick) {}
}

/// A [`SimObserver`] that does nothing.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
