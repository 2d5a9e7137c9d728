//! `cf-core` — foundational types for the customer-flow simulation engine.
//!
//! This crate is a dependency of every other `cf-*` crate.  It has no `cf-*`
//! dependencies and only `rand` and `thiserror` externally, plus optional
//! `serde`.
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `AgentId`, `ZoneIdx`                                  |
//! | [`geo`]         | `Point` (store-local floor-plan coordinates)          |
//! | [`time`]        | `Tick`, `SimClock`, `SimConfig`                       |
//! | [`rng`]         | `AgentRng` (per-agent), `SimRng` (scheduler-level)    |
//! | [`error`]       | `CoreError`, `CoreResult`                             |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |
//!           | Required to read `SimConfig` from a scenario file.         |

pub mod error;
pub mod geo;
pub mod ids;
pub mod rng;
pub mod time;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{CoreError, CoreResult};
pub use geo::Point;
pub use ids::{AgentId, ZoneIdx};
pub use rng::{AgentRng, SimRng};
pub use time::{SimClock, SimConfig, Tick};
