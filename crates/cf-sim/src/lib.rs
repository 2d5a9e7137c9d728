//! `cf-sim` — the tick loop that drives the customer population.
//!
//! # One tick
//!
//! ```text
//! tick(delta):
//!   ① clock += delta
//!   ② for each agent, ascending AgentId:
//!        ticks_remaining -= delta (saturating)
//!        if it hit zero:
//!          next zone   ← weighted_choice(matrix.row(zone), agent rng)
//!          next state  ← LifecyclePolicy::advance(state, agent rng)
//!          position    ← uniform point in the next zone (also on a self-loop)
//!          dwell       ← DwellStats::sample_ticks(next zone)
//!   ③ remove agents that are Exiting or older than max_lifetime_ticks
//! ```
//!
//! Removal happens only after every agent has been advanced, so a snapshot
//! taken between ticks always sees a consistent population.  Each agent draws
//! from its own RNG, so the visiting order cannot affect any trajectory.
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use cf_sim::{NoopObserver, SchedulerBuilder};
//!
//! let mut sched = SchedulerBuilder::new(config, zones, matrix)
//!     .lifecycle(LifecycleConfig::default())
//!     .build()?;
//! sched.spawn(20);
//! sched.run_ticks(3_600, &mut NoopObserver);
//! ```

pub mod builder;
pub mod error;
pub mod observer;
pub mod reload;
pub mod scheduler;
pub mod snapshot;

#[cfg(test)]
mod tests;

pub use builder::SchedulerBuilder;
pub use error::{SimError, SimResult};
pub use observer::{NoopObserver, SimObserver};
pub use reload::{CancelToken, FallbackPolicy, LoadOutcome, LoadTask, StagedModel};
pub use scheduler::Scheduler;
pub use snapshot::{SimSnapshot, TickReport};
