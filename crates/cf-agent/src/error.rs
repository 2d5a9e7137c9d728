use thiserror::Error;

use crate::LifecycleState;

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("illegal lifecycle transition {from} -> {to}")]
    IllegalStateTransition { from: LifecycleState, to: LifecycleState },

    #[error("lifecycle configuration error: {0}")]
    Config(String),
}

pub type AgentResult<T> = Result<T, AgentError>;
