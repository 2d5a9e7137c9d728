//! `cf-transition` — from historical visit logs to a zone transition model.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                     |
//! |-------------|--------------------------------------------------------------|
//! | [`record`]  | `VisitRecord` — one `(subject, zone, timestamp)` observation |
//! | [`loader`]  | `load_visits_csv`, `load_visits_reader`                      |
//! | [`trips`]   | `Visit`, `Trip`, `TripSet`, `group_trips`                    |
//! | [`choice`]  | `weighted_choice` — the pure next-zone selection rule        |
//! | [`matrix`]  | `TransitionMatrix`, `DwellStats`, `BuildStats`               |
//! | [`builder`] | `BuilderConfig`, `TransitionMatrixBuilder`                   |
//! | [`error`]   | `TransitionError`, `TransitionResult<T>`                     |
//!
//! # Build pipeline (summary)
//!
//! ```text
//! records ──group by subject──▶ trips (ordered by timestamp)
//!         ──consecutive pairs──▶ transition counts ──normalize──▶ rows
//!         ──time to next obs──▶ dwell samples      ──mean/var──▶ DwellStats
//!         ──first zone───────▶ entry counts        ──normalize──▶ entry distribution
//! ```
//!
//! Every accumulator is a dense array indexed by `ZoneIdx` and trips are
//! visited in subject-id order, so the floating-point summation order is fixed
//! and identical input always yields a bit-identical matrix.

pub mod builder;
pub mod choice;
pub mod error;
pub mod loader;
pub mod matrix;
pub mod record;
pub mod trips;


pub use builder::{BuilderConfig, TransitionMatrixBuilder};
pub use choice::weighted_choice;
pub use error::{TransitionError, TransitionResult};
pub use loader::{load_visits_csv, load_visits_reader};
pub use matrix::{BuildStats, DwellStats, TransitionMatrix};
pub use record::VisitRecord;
pub use trips::{Trip, TripSet, Visit, group_trips};
