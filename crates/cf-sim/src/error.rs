use thiserror::Error;

use cf_agent::AgentError;
use cf_core::CoreError;
use cf_transition::TransitionError;
use cf_zone::ZoneError;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error("transition matrix covers {matrix} zones but the zone model has {zones}")]
    ZoneCountMismatch { zones: usize, matrix: usize },

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Zone(#[from] ZoneError),

    #[error(transparent)]
    Transition(#[from] TransitionError),

    #[error(transparent)]
    Agent(#[from] AgentError),

    #[error("model load cancelled")]
    Cancelled,

    #[error("model load failed: {0}")]
    LoadFailed(String),
}

pub type SimResult<T> = Result<T, SimError>;
