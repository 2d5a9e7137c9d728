//! Zone-subsystem error type.

use thiserror::Error;

/// Errors produced by `cf-zone`.
#[derive(Debug, Error)]
pub enum ZoneError {
    #[error("zone {zone:?} has invalid geometry: {reason}")]
    InvalidGeometry { zone: String, reason: String },

    #[error("duplicate zone id {0:?}")]
    DuplicateZoneId(String),

    #[error("zone {0:?} not found")]
    UnknownZone(String),

    #[error("{0} zones exceeds the supported maximum")]
    TooManyZones(usize),

    #[error("zone file parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ZoneResult<T> = Result<T, ZoneError>;
