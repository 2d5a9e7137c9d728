//! `cf-agent` — simulated shoppers and their lifecycle.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                   |
//! |---------------|------------------------------------------------------------|
//! | [`lifecycle`] | `LifecycleState` and its legal transitions                 |
//! | [`policy`]    | `LifecycleConfig`, `LifecyclePolicy` (advance vs. loop)    |
//! | [`agent`]     | `CustomerAgent`, `AgentSnapshot`, `PathHistory`            |
//! | [`arena`]     | `AgentArena` — the id-ordered live population              |
//! | [`error`]     | `AgentError`, `AgentResult<T>`                             |
//!
//! The state machine never chooses zones.  Zone selection belongs to the
//! transition matrix; this crate only answers "does the shopper move on to the
//! next stage of the visit?" when a dwell expires.

pub mod agent;
pub mod arena;
pub mod error;
pub mod lifecycle;
pub mod policy;

#[cfg(test)]
mod tests;

pub use agent::{AgentSnapshot, CustomerAgent, PathHistory};
pub use arena::AgentArena;
pub use error::{AgentError, AgentResult};
pub use lifecycle::LifecycleState;
pub use policy::{LifecycleConfig, LifecyclePolicy};
