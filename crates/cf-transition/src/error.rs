use thiserror::Error;

use cf_core::ZoneIdx;

#[derive(Debug, Error)]
pub enum TransitionError {
    /// No usable trip survived grouping.  Callers may substitute
    /// [`TransitionMatrix::uniform`][crate::TransitionMatrix::uniform].
    #[error("no historical trips to build a transition model from")]
    EmptyHistory,

    #[error("transition row for {zone} sums to {sum}, expected 1")]
    RowNotStochastic { zone: ZoneIdx, sum: f64 },

    #[error("transition builder configuration error: {0}")]
    Config(String),

    #[error("visit log parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type TransitionResult<T> = Result<T, TransitionError>;
