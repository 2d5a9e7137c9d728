//! Shared error type for `cf-core`.
//!
//! Sub-crates define their own error enums and wrap this one where a
//! configuration problem has to surface through their API.

use thiserror::Error;

/// Errors raised by the primitives in this crate.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand result type for `cf-core`.
pub type CoreResult<T> = Result<T, CoreError>;
