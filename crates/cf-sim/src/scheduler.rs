//! The `Scheduler` struct and its tick loop.

use std::sync::Arc;

use tracing::{debug, info, warn};

use cf_agent::{AgentArena, CustomerAgent, LifecyclePolicy};
use cf_core::{AgentRng, SimClock, SimConfig, SimRng, Tick};
use cf_transition::TransitionMatrix;
use cf_zone::ZoneModel;

use crate::{SimObserver, SimSnapshot, StagedModel, TickReport};

/// Owns the live population and advances it tick by tick.
///
/// Create via [`SchedulerBuilder`][crate::SchedulerBuilder].  The zone model
/// and matrix are shared read-only and only ever replaced whole, through
/// [`install`][Self::install].
pub struct Scheduler {
    pub(crate) config: SimConfig,
    pub(crate) clock:  SimClock,
    pub(crate) zones:  Arc<ZoneModel>,
    pub(crate) matrix: Arc<TransitionMatrix>,
    pub(crate) policy: LifecyclePolicy,
    pub(crate) agents: AgentArena,

    /// Source of population seeds.  Never used for per-agent draws.
    pub(crate) rng:             SimRng,
    pub(crate) population_seed: u64,

    pub(crate) paused:         bool,
    pub(crate) total_spawned:  u64,
    pub(crate) total_rejected: u64,
}

impl Scheduler {
    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn clock(&self) -> &SimClock {
        &self.clock
    }

    pub fn now(&self) -> Tick {
        self.clock.current_tick
    }

    pub fn zones(&self) -> &Arc<ZoneModel> {
        &self.zones
    }

    pub fn matrix(&self) -> &Arc<TransitionMatrix> {
        &self.matrix
    }

    pub fn agents(&self) -> &AgentArena {
        &self.agents
    }

    pub fn population(&self) -> usize {
        self.agents.len()
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Agents created since the scheduler was built.
    pub fn total_spawned(&self) -> u64 {
        self.total_spawned
    }

    /// Spawn requests dropped at the population cap.
    pub fn total_rejected(&self) -> u64 {
        self.total_rejected
    }

    // ── Population ────────────────────────────────────────────────────────

    /// Create up to `count` agents at the current tick.
    ///
    /// Each agent starts in `Entering`, in a zone drawn from the entry
    /// distribution, at a uniform point of that zone, with a dwell sampled
    /// for it.  Requests beyond `max_population` are dropped.  Returns the
    /// number of agents actually created.
    pub fn spawn(&mut self, count: usize) -> usize {
        let room = self.config.max_population.saturating_sub(self.agents.len());
        let allowed = count.min(room);
        if allowed < count {
            let dropped = count - allowed;
            self.total_rejected += dropped as u64;
            warn!(
                requested = count,
                dropped,
                max_population = self.config.max_population,
                "population at capacity, spawn request trimmed"
            );
        }

        let now = self.clock.current_tick;
        let mut spawned = 0;
        for _ in 0..allowed {
            let id = self.agents.allocate_id();
            let mut rng = AgentRng::new(self.population_seed, id);
            let Some(zone) = self.matrix.entry_zone(rng.random()) else {
                warn!("entry distribution is empty, nothing to spawn");
                break;
            };
            let position = self.zones.zone(zone).random_point(&mut rng);
            let dwell = self.matrix.dwell(zone).sample_ticks(&mut rng);
            self.agents.push(CustomerAgent::new(
                id,
                zone,
                position,
                dwell,
                now,
                self.config.path_history_len,
                rng,
            ));
            spawned += 1;
        }
        self.total_spawned += spawned as u64;
        spawned
    }

    // ── Tick ──────────────────────────────────────────────────────────────

    /// Advance the simulation by `delta` ticks.
    ///
    /// An agent whose dwell runs out moves at most once per call, however
    /// large `delta` is.  A paused scheduler, or `delta == 0`, changes
    /// nothing and reports the current state.
    pub fn tick(&mut self, delta: u64) -> TickReport {
        if self.paused || delta == 0 {
            return TickReport {
                tick: self.clock.current_tick,
                population: self.agents.len(),
                ..TickReport::default()
            };
        }

        self.clock.advance_by(delta);
        let now = self.clock.current_tick;
        let mut report = TickReport { tick: now, ..TickReport::default() };

        // Explicit field borrows so the borrow checker sees disjoint access.
        let zones  = &*self.zones;
        let matrix = &*self.matrix;
        let policy = &self.policy;

        // ── Phase 1: advance every agent ──────────────────────────────────
        for agent in self.agents.iter_mut() {
            agent.ticks_remaining = agent.ticks_remaining.saturating_sub(delta);
            if agent.ticks_remaining > 0 {
                continue;
            }
            report.advanced += 1;

            let next_zone = matrix.next_zone(agent.zone, agent.rng.random());
            let next_state = policy.advance(agent.state, &mut agent.rng);
            if let Err(e) = agent.state.transition(next_state) {
                warn!(agent = %agent.id, error = %e, "ignoring lifecycle transition");
            }

            if next_zone != agent.zone {
                report.moved += 1;
                agent.path.record(next_zone);
                agent.zone = next_zone;
            }
            agent.position = zones.zone(next_zone).random_point(&mut agent.rng);
            agent.ticks_remaining = matrix.dwell(next_zone).sample_ticks(&mut agent.rng);
        }

        // ── Phase 2: removal ──────────────────────────────────────────────
        let max_lifetime = self.config.max_lifetime_ticks;
        let (mut exited, mut expired) = (0, 0);
        self.agents.retain(|a| {
            if a.state.is_terminal() {
                exited += 1;
                false
            } else if a.age(now) > max_lifetime {
                expired += 1;
                false
            } else {
                true
            }
        });
        report.exited = exited;
        report.expired = expired;
        report.population = self.agents.len();

        debug!(
            tick = now.0,
            advanced = report.advanced,
            moved = report.moved,
            exited,
            expired,
            population = report.population,
            "tick"
        );
        report
    }

    /// Run `n` ticks of length 1, spawning `arrivals_per_tick` agents at the
    /// start of each and calling `observer` along the way.
    ///
    /// Returns the number of ticks run: 0 when paused.
    pub fn run_ticks<O: SimObserver>(&mut self, n: u64, observer: &mut O) -> u64 {
        if self.paused {
            return 0;
        }
        let arrivals = self.config.arrivals_per_tick as usize;
        let interval = self.config.snapshot_interval_ticks;

        for _ in 0..n {
            observer.on_tick_start(self.clock.current_tick);
            if arrivals > 0 {
                self.spawn(arrivals);
            }
            let report = self.tick(1);
            observer.on_tick_end(&report);
            if interval > 0 && report.tick.0.is_multiple_of(interval) {
                observer.on_snapshot(&self.snapshot());
            }
        }
        observer.on_sim_end(self.clock.current_tick);
        n
    }

    // ── Snapshots ─────────────────────────────────────────────────────────

    /// Immutable copy of the current population.
    pub fn snapshot(&self) -> SimSnapshot {
        SimSnapshot {
            tick:   self.clock.current_tick,
            agents: self.agents.iter().map(CustomerAgent::snapshot).collect(),
        }
    }

    // ── Control ───────────────────────────────────────────────────────────

    /// Drop the whole population and rewind the clock to tick 0.
    ///
    /// Later agents draw from a fresh population seed, so a reset run does
    /// not replay the previous one.  Agent ids keep counting up.
    pub fn reset(&mut self) {
        let removed = self.agents.len();
        self.agents.clear();
        self.clock.reset();
        self.population_seed = self.rng.population_seed();
        info!(removed, "population reset");
    }

    /// Stop `tick` and `run_ticks` from doing anything until
    /// [`resume`][Self::resume].
    pub fn pause(&mut self) {
        if !self.paused {
            self.paused = true;
            info!(tick = self.clock.current_tick.0, "simulation paused");
        }
    }

    pub fn resume(&mut self) {
        if self.paused {
            self.paused = false;
            info!(tick = self.clock.current_tick.0, "simulation resumed");
        }
    }

    /// Swap in a freshly loaded zone model and matrix, then
    /// [`reset`][Self::reset].  The paused flag is left as it is.
    pub fn install(&mut self, staged: StagedModel) {
        let (zones, matrix) = staged.into_parts();
        info!(zones = zones.len(), "installing new zone model");
        self.zones = zones;
        self.matrix = matrix;
        self.reset();
    }
}

impl std::fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scheduler")
            .field("tick", &self.clock.current_tick)
            .field("zones", &self.zones.len())
            .field("population", &self.agents.len())
            .field("paused", &self.paused)
            .finish()
    }
}
