//! When a dwell expires: advance the lifecycle, or loop?

use serde::{Deserialize, Serialize};

use cf_core::AgentRng;

use crate::{AgentError, AgentResult, LifecycleState};

// ── LifecycleConfig ───────────────────────────────────────────────────────────

/// Per-state probabilities of advancing when a dwell expires.
///
/// A state that does not advance loops: the agent stays in its lifecycle
/// state (it still moves between zones).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LifecycleConfig {
    pub entering:   f64,
    pub browsing:   f64,
    pub fitting:    f64,
    pub deciding:   f64,
    pub purchasing: f64,
    /// Once `Deciding` advances, the chance it goes to `Purchasing` rather
    /// than straight to `Exiting`.
    pub purchase_probability: f64,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            entering:             1.0,
            browsing:             0.5,
            fitting:              0.5,
            deciding:             1.0,
            purchasing:           1.0,
            purchase_probability: 0.3,
        }
    }
}

impl LifecycleConfig {
    /// Every state always advances.
    pub fn always_advance() -> Self {
        Self {
            entering: 1.0, browsing: 1.0, fitting: 1.0, deciding: 1.0, purchasing: 1.0,
            purchase_probability: 1.0,
        }
    }

    /// No state ever advances; agents roam until their lifetime runs out.
    pub fn never_advance() -> Self {
        Self {
            entering: 0.0, browsing: 0.0, fitting: 0.0, deciding: 0.0, purchasing: 0.0,
            purchase_probability: 0.0,
        }
    }

    /// Advance probability for `state`.  `Exiting` never advances.
    pub fn advance_probability(&self, state: LifecycleState) -> f64 {
        match state {
            LifecycleState::Entering   => self.entering,
            LifecycleState::Browsing   => self.browsing,
            LifecycleState::Fitting    => self.fitting,
            LifecycleState::Deciding   => self.deciding,
            LifecycleState::Purchasing => self.purchasing,
            LifecycleState::Exiting    => 0.0,
        }
    }

    fn fields_mut(&mut self) -> [(&'static str, &mut f64); 6] {
        [
            ("entering", &mut self.entering),
            ("browsing", &mut self.browsing),
            ("fitting", &mut self.fitting),
            ("deciding", &mut self.deciding),
            ("purchasing", &mut self.purchasing),
            ("purchase_probability", &mut self.purchase_probability),
        ]
    }
}

// ── LifecyclePolicy ───────────────────────────────────────────────────────────

/// A validated [`LifecycleConfig`].
#[derive(Clone, Debug, PartialEq)]
pub struct LifecyclePolicy {
    config: LifecycleConfig,
}

impl LifecyclePolicy {
    /// Validate `config`.  Non-finite values are rejected; finite values
    /// outside `[0, 1]` are clamped.
    pub fn new(mut config: LifecycleConfig) -> AgentResult<Self> {
        for (name, p) in config.fields_mut() {
            if !p.is_finite() {
                return Err(AgentError::Config(format!("{name} must be a finite probability, got {p}")));
            }
            *p = p.clamp(0.0, 1.0);
        }
        Ok(Self { config })
    }

    pub fn config(&self) -> &LifecycleConfig {
        &self.config
    }

    /// The state after a dwell expires, given two uniform draws in `[0, 1)`.
    ///
    /// `advance_draw < p(state)` advances; `Deciding` then goes to
    /// `Purchasing` when `purchase_draw < purchase_probability` and to
    /// `Exiting` otherwise.  Terminal states stay put.
    pub fn next_state(&self, state: LifecycleState, advance_draw: f64, purchase_draw: f64) -> LifecycleState {
        if advance_draw >= self.config.advance_probability(state) {
            return state;
        }
        match state {
            LifecycleState::Deciding if purchase_draw >= self.config.purchase_probability => {
                LifecycleState::Exiting
            }
            _ => state.successor().unwrap_or(state),
        }
    }

    /// [`next_state`][Self::next_state] with both draws taken from `rng`.
    ///
    /// Always consumes exactly two values so an agent's later draws do not
    /// depend on which branch was taken.
    pub fn advance(&self, state: LifecycleState, rng: &mut AgentRng) -> LifecycleState {
        let advance_draw: f64 = rng.random();
        let purchase_draw: f64 = rng.random();
        self.next_state(state, advance_draw, purchase_draw)
    }
}

impl Default for LifecyclePolicy {
    fn default() -> Self {
        Self { config: LifecycleConfig::default() }
    }
}
