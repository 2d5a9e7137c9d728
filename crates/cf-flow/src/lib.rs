//! `cf-flow` — turns trips and agent snapshots into overlay data.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                   |
//! |---------------|------------------------------------------------------------|
//! | [`types`]     | `FlowPath`, `HeatSample`, `HeatCell`, `FlowOverlay`        |
//! | [`aggregate`] | `historical_overlay`, `live_overlay`, `normalize`          |
//! | [`grid`]      | `GridSpec`, `heat_grid` — position heat on a regular grid  |
//! | [`window`]    | `SnapshotWindow` — a `SimObserver` keeping recent snapshots |
//! | [`writer`]    | `OverlayWriter` trait                                      |
//! | [`csv`]       | `CsvWriter`                                                |
//! | `sqlite`      | `SqliteWriter` (feature `sqlite`)                          |
//!
//! Every batch is recomputed from scratch and normalized against its own
//! maximum, so the largest count in a non-empty batch always has weight 1.0.
//!
//! # Usage
//!
//! ```rust,ignore
//! use cf_flow::{CsvWriter, OverlayWriter, SnapshotWindow, live_overlay};
//!
//! let mut window = SnapshotWindow::new(60);
//! sched.run_ticks(3_600, &mut window);
//! let overlay = live_overlay(window.iter());
//! let mut out = CsvWriter::new(Path::new("./overlay"))?;
//! out.write_overlay(&overlay, sched.zones())?;
//! out.finish()?;
//! ```

pub mod aggregate;
pub mod csv;
pub mod error;
pub mod grid;
pub mod types;
pub mod window;
pub mod writer;

#[cfg(feature = "sqlite")]
pub mod sqlite;


pub use aggregate::{historical_overlay, live_overlay, normalize};
pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use grid::{GridSpec, heat_grid};
pub use types::{FlowOverlay, FlowPath, HeatCell, HeatSample};
pub use window::SnapshotWindow;
pub use writer::OverlayWriter;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteWriter;
