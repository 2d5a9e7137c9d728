//! JSON zone-file loader.
//!
//! # Format
//!
//! A JSON array of zone records, in the order that defines `ZoneIdx`:
//!
//! ```json
//! [
//!   {"id": "entrance", "label": "Entrance",
//!    "bounds": {"rect": {"min": {"x": 0, "y": 0}, "max": {"x": 6, "y": 4}}},
//!    "color": "#f5c542", "neighbors": ["denim"]},
//!   {"id": "denim",
//!    "bounds": {"polygon": [{"x": 6, "y": 0}, {"x": 12, "y": 0}, {"x": 12, "y": 6}, {"x": 6, "y": 4}]}}
//! ]
//! ```
//!
//! `label`, `color`, and `neighbors` are optional.

use std::io::Read;
use std::path::Path;

use crate::{ZoneDefinition, ZoneError, ZoneModel, ZoneResult, load_zones};

/// Load and validate a [`ZoneModel`] from a JSON file.
pub fn load_zones_json(path: &Path) -> ZoneResult<ZoneModel> {
    let file = std::fs::File::open(path).map_err(ZoneError::Io)?;
    load_zones_reader(std::io::BufReader::new(file))
}

/// Like [`load_zones_json`] but accepts any `Read` source.
pub fn load_zones_reader<R: Read>(reader: R) -> ZoneResult<ZoneModel> {
    let definitions: Vec<ZoneDefinition> =
        serde_json::from_reader(reader).map_err(|e| ZoneError::Parse(e.to_string()))?;
    load_zones(definitions)
}
