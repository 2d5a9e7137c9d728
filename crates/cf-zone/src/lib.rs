//! `cf-zone` — store zones: geometry, registry, and loading.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                    |
//! |--------------|-------------------------------------------------------------|
//! | [`geometry`] | `Bounds` (rect / polygon), `Shape` (validated, triangulated) |
//! | [`model`]    | `ZoneDefinition`, `Zone`, `ZoneModel`, `load_zones`         |
//! | [`loader`]   | `load_zones_json`, `load_zones_reader`                      |
//! | [`error`]    | `ZoneError`, `ZoneResult<T>`                                |
//!
//! A `ZoneModel` is immutable once loaded.  When the store layout changes the
//! whole model is rebuilt and swapped in; nothing edits zones in place.
//!
//! # Sampling
//!
//! `random_point_in` is uniform over the zone's area for both rectangles and
//! (possibly concave) polygons.  Polygons are ear-clipped into triangles at
//! load time; sampling picks a triangle weighted by area and then a uniform
//! point inside it.  The random source is always passed in by the caller.

pub mod error;
pub mod geometry;
pub mod loader;
pub mod model;


pub use error::{ZoneError, ZoneResult};
pub use geometry::{Bounds, Shape};
pub use loader::{load_zones_json, load_zones_reader};
pub use model::{Zone, ZoneDefinition, ZoneModel, load_zones};
