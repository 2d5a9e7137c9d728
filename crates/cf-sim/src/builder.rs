//! Fluent builder for constructing a [`Scheduler`].

use std::sync::Arc;

use tracing::info;

use cf_agent::{AgentArena, LifecycleConfig, LifecyclePolicy};
use cf_core::{SimConfig, SimRng};
use cf_transition::TransitionMatrix;
use cf_zone::ZoneModel;

use crate::{Scheduler, SimError, SimResult};

/// Fluent builder for [`Scheduler`].
///
/// # Required inputs
///
/// - [`SimConfig`] — seed, population cap, lifetime, …
/// - [`ZoneModel`] — the store layout agents move through
/// - [`TransitionMatrix`] — built for that layout (same zone count)
///
/// # Optional inputs (have defaults)
///
/// | Method          | Default                      |
/// |-----------------|------------------------------|
/// | `.lifecycle(c)` | `LifecycleConfig::default()` |
///
/// # Example
///
/// ```rust,ignore
/// let mut sched = SchedulerBuilder::new(config, zones, matrix)
///     .lifecycle(LifecycleConfig::always_advance())
///     .build()?;
/// ```
pub struct SchedulerBuilder {
    config:    SimConfig,
    zones:     Arc<ZoneModel>,
    matrix:    Arc<TransitionMatrix>,
    lifecycle: LifecycleConfig,
}

impl SchedulerBuilder {
    /// Create a builder with all required inputs.  `zones` and `matrix` may
    /// be passed owned or already behind an `Arc`.
    pub fn new(
        config: SimConfig,
        zones:  impl Into<Arc<ZoneModel>>,
        matrix: impl Into<Arc<TransitionMatrix>>,
    ) -> Self {
        Self {
            config,
            zones:     zones.into(),
            matrix:    matrix.into(),
            lifecycle: LifecycleConfig::default(),
        }
    }

    /// Override the lifecycle advance probabilities.
    pub fn lifecycle(mut self, lifecycle: LifecycleConfig) -> Self {
        self.lifecycle = lifecycle;
        self
    }

    /// Validate inputs and return an empty, running [`Scheduler`] at tick 0.
    pub fn build(self) -> SimResult<Scheduler> {
        self.config.validate()?;
        if self.zones.is_empty() {
            return Err(SimError::Config("zone model has no zones".into()));
        }
        if self.matrix.zone_count() != self.zones.len() {
            return Err(SimError::ZoneCountMismatch {
                zones:  self.zones.len(),
                matrix: self.matrix.zone_count(),
            });
        }
        let policy = LifecyclePolicy::new(self.lifecycle)?;

        let mut rng = SimRng::new(self.config.seed);
        let population_seed = rng.population_seed();

        info!(
            seed = self.config.seed,
            zones = self.zones.len(),
            max_population = self.config.max_population,
            "scheduler ready"
        );

        Ok(Scheduler {
            clock:  self.config.make_clock(),
            agents: AgentArena::with_capacity(self.config.max_population.min(4_096)),
            config: self.config,
            zones:  self.zones,
            matrix: self.matrix,
            policy,
            rng,
            population_seed,
            paused:         false,
            total_spawned:  0,
            total_rejected: 0,
        })
    }
}
