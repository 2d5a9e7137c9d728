//! `TransitionMatrixBuilder` — counts, normalizes, and summarizes trips.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use cf_core::ZoneIdx;
use cf_zone::ZoneModel;

use crate::{
    BuildStats, DwellStats, TransitionError, TransitionMatrix, TransitionResult, TripSet,
    VisitRecord, group_trips,
};

// ── BuilderConfig ─────────────────────────────────────────────────────────────

/// Tuning for [`TransitionMatrixBuilder`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuilderConfig {
    /// Dwell (ticks) for a trip's last observation and for zones with no
    /// samples at all.
    pub default_dwell_ticks: f64,

    /// Timestamp units per simulation tick.  With Unix-second timestamps and
    /// a one-second tick this is 1.0.
    pub secs_per_tick: f64,

    /// Collapse consecutive observations of the same zone into one visit.
    pub merge_repeat_visits: bool,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self { default_dwell_ticks: 30.0, secs_per_tick: 1.0, merge_repeat_visits: true }
    }
}

// ── Dwell accumulator ─────────────────────────────────────────────────────────

/// Welford running mean/variance.  Numerically stable and order-fixed.
#[derive(Clone, Copy, Default)]
struct DwellAcc {
    n:    u32,
    mean: f64,
    m2:   f64,
}

impl DwellAcc {
    fn push(&mut self, x: f64) {
        self.n += 1;
        let delta = x - self.mean;
        self.mean += delta / self.n as f64;
        self.m2 += delta * (x - self.mean);
    }

    fn finish(self, default_ticks: f64) -> DwellStats {
        if self.n == 0 {
            return DwellStats::fixed(default_ticks);
        }
        DwellStats { mean: self.mean, variance: self.m2 / self.n as f64, samples: self.n }
    }
}

// ── TransitionMatrixBuilder ───────────────────────────────────────────────────

/// Builds a [`TransitionMatrix`] from historical visit records.
///
/// # Example
///
/// ```rust,ignore
/// let builder = TransitionMatrixBuilder::new(BuilderConfig::default())?;
/// let matrix = match builder.build(&records, &zones) {
///     Ok(m) => m,
///     Err(TransitionError::EmptyHistory) => TransitionMatrix::uniform(zones.len(), 30.0),
///     Err(e) => return Err(e.into()),
/// };
/// ```
#[derive(Clone, Debug)]
pub struct TransitionMatrixBuilder {
    config: BuilderConfig,
}

impl TransitionMatrixBuilder {
    pub fn new(config: BuilderConfig) -> TransitionResult<Self> {
        if !(config.default_dwell_ticks.is_finite() && config.default_dwell_ticks > 0.0) {
            return Err(TransitionError::Config(format!(
                "default_dwell_ticks must be a positive number, got {}",
                config.default_dwell_ticks
            )));
        }
        if !(config.secs_per_tick.is_finite() && config.secs_per_tick > 0.0) {
            return Err(TransitionError::Config(format!(
                "secs_per_tick must be a positive number, got {}",
                config.secs_per_tick
            )));
        }
        Ok(Self { config })
    }

    pub fn config(&self) -> &BuilderConfig {
        &self.config
    }

    /// Group `records` into trips and build the matrix.
    ///
    /// # Errors
    ///
    /// [`TransitionError::EmptyHistory`] if no trip references a known zone.
    pub fn build(&self, records: &[VisitRecord], zones: &ZoneModel) -> TransitionResult<TransitionMatrix> {
        let trips = group_trips(records, zones, self.config.merge_repeat_visits);
        self.build_from_trips(&trips, zones)
    }

    /// Build from already-grouped trips (e.g. shared with the historical
    /// flow aggregator).
    pub fn build_from_trips(&self, set: &TripSet, zones: &ZoneModel) -> TransitionResult<TransitionMatrix> {
        if set.is_empty() {
            return Err(TransitionError::EmptyHistory);
        }

        let n = zones.len();
        let mut counts = vec![0u64; n * n];
        let mut entry_counts = vec![0u64; n];
        let mut dwell = vec![DwellAcc::default(); n];
        let mut stats = BuildStats {
            records:         set.records,
            skipped_records: set.skipped_records,
            trips:           set.trips.len(),
            ..BuildStats::default()
        };

        // ── Accumulate ────────────────────────────────────────────────────
        for trip in &set.trips {
            let Some(first) = trip.visits.first() else { continue };
            entry_counts[first.zone.index()] += 1;

            for (i, visit) in trip.visits.iter().enumerate() {
                let sample = match trip.dwell_of(i) {
                    Some(delta) => delta as f64 / self.config.secs_per_tick,
                    None => self.config.default_dwell_ticks,
                };
                dwell[visit.zone.index()].push(sample);
            }

            for (from, to) in trip.transitions() {
                counts[from.index() * n + to.index()] += 1;
                stats.transitions += 1;
                if from != to && zones.are_adjacent(from, to) == Some(false) {
                    stats.non_adjacent_transitions += 1;
                }
            }
        }

        // ── Normalize rows ────────────────────────────────────────────────
        let mut probs = vec![0.0f64; n * n];
        let mut terminal = vec![false; n];
        for i in 0..n {
            let row = &counts[i * n..(i + 1) * n];
            let total: u64 = row.iter().sum();
            if total == 0 {
                terminal[i] = true;
                probs[i * n + i] = 1.0;
                continue;
            }
            for (j, &c) in row.iter().enumerate() {
                probs[i * n + j] = c as f64 / total as f64;
            }
        }

        // ── Entry distribution and dwell ──────────────────────────────────
        let trip_total: u64 = entry_counts.iter().sum();
        let entry: Vec<f64> = entry_counts
            .iter()
            .map(|&c| if trip_total == 0 { 0.0 } else { c as f64 / trip_total as f64 })
            .collect();
        let dwell: Vec<DwellStats> = dwell
            .into_iter()
            .map(|acc| acc.finish(self.config.default_dwell_ticks))
            .collect();

        let terminal_zones = terminal.iter().filter(|&&t| t).count();
        if stats.non_adjacent_transitions > 0 {
            warn!(
                count = stats.non_adjacent_transitions,
                "observed transitions between zones not declared as neighbors"
            );
        }
        for (i, d) in dwell.iter().enumerate() {
            debug!(zone = zones.id_of(ZoneIdx(i as u16)), mean = d.mean, var = d.variance, samples = d.samples, "dwell stats");
        }
        info!(
            trips = stats.trips,
            transitions = stats.transitions,
            terminal_zones,
            skipped_records = stats.skipped_records,
            "transition matrix built"
        );

        Ok(TransitionMatrix::from_parts(probs, terminal, dwell, entry, stats))
    }
}
