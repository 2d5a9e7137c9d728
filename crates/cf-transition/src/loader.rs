//! CSV visit-log loader.
//!
//! # CSV format
//!
//! One row per observation, any order:
//!
//! ```csv
//! subject_id,zone_id,timestamp
//! trip-0001,entrance,1700000000
//! trip-0001,denim,1700000042
//! trip-0002,entrance,1700000100
//! ```
//!
//! Rows are returned in file order; grouping and ordering happen in
//! [`group_trips`][crate::group_trips].

use std::io::Read;
use std::path::Path;

use crate::{TransitionError, TransitionResult, VisitRecord};

/// Load every visit record from a CSV file.
pub fn load_visits_csv(path: &Path) -> TransitionResult<Vec<VisitRecord>> {
    let file = std::fs::File::open(path).map_err(TransitionError::Io)?;
    load_visits_reader(file)
}

/// Like [`load_visits_csv`] but accepts any `Read` source.
pub fn load_visits_reader<R: Read>(reader: R) -> TransitionResult<Vec<VisitRecord>> {
    let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    csv_reader
        .deserialize::<VisitRecord>()
        .map(|row| row.map_err(|e| TransitionError::Parse(e.to_string())))
        .collect()
}
