//! Lifecycle states of a simulated shopper.
//!
//! ```text
//! Entering ─▶ Browsing ─▶ Fitting ─▶ Deciding ─▶ Purchasing ─▶ Exiting
//!                                        │                        ▲
//!                                        └────────────────────────┘
//! ```
//!
//! Every non-terminal state may also stay where it is.  `Exiting` is
//! terminal: an agent in it is removed at the end of the tick.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{AgentError, AgentResult};

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleState {
    #[default]
    Entering,
    Browsing,
    Fitting,
    Deciding,
    Purchasing,
    Exiting,
}

impl LifecycleState {
    pub const ALL: [LifecycleState; 6] = [
        LifecycleState::Entering,
        LifecycleState::Browsing,
        LifecycleState::Fitting,
        LifecycleState::Deciding,
        LifecycleState::Purchasing,
        LifecycleState::Exiting,
    ];

    #[inline]
    pub fn is_terminal(self) -> bool {
        self == LifecycleState::Exiting
    }

    /// The default forward step.  `Deciding` goes to `Purchasing` here; the
    /// browse-and-leave branch is chosen by the policy.
    pub fn successor(self) -> Option<LifecycleState> {
        use LifecycleState::*;
        match self {
            Entering   => Some(Browsing),
            Browsing   => Some(Fitting),
            Fitting    => Some(Deciding),
            Deciding   => Some(Purchasing),
            Purchasing => Some(Exiting),
            Exiting    => None,
        }
    }

    pub fn can_transition_to(self, to: LifecycleState) -> bool {
        use LifecycleState::*;
        if self == to {
            return !self.is_terminal();
        }
        matches!(
            (self, to),
            (Entering, Browsing)
                | (Browsing, Fitting)
                | (Fitting, Deciding)
                | (Deciding, Purchasing)
                | (Deciding, Exiting)
                | (Purchasing, Exiting)
        )
    }

    /// Move to `to`, or fail with [`AgentError::IllegalStateTransition`]
    /// leaving `self` untouched.
    pub fn transition(&mut self, to: LifecycleState) -> AgentResult<()> {
        if !self.can_transition_to(to) {
            return Err(AgentError::IllegalStateTransition { from: *self, to });
        }
        *self = to;
        Ok(())
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LifecycleState::Entering   => "entering",
            LifecycleState::Browsing   => "browsing",
            LifecycleState::Fitting    => "fitting",
            LifecycleState::Deciding   => "deciding",
            LifecycleState::Purchasing => "purchasing",
            LifecycleState::Exiting    => "exiting",
        }
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
