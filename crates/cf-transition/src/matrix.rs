//! The built transition model.
//!
//! # Data layout
//!
//! Probabilities are a dense row-major `n × n` `Vec<f64>`:
//!
//! ```text
//! probs[from * n + to] = P(next zone = to | current zone = from)
//! ```
//!
//! Rows are contiguous, so `row(from)` is a plain slice that can be handed
//! straight to [`weighted_choice`].  A matrix is immutable once built; the
//! scheduler shares it behind an `Arc` and replaces it wholesale.

use rand::Rng;

use cf_core::ZoneIdx;

use crate::{TransitionError, TransitionResult, weighted_choice};

/// Row sums must be within this of 1.0.
pub const ROW_TOLERANCE: f64 = 1e-6;

// ── DwellStats ────────────────────────────────────────────────────────────────

/// Dwell-time statistics for one zone, in ticks.
#[derive(Clone, Debug, PartialEq)]
pub struct DwellStats {
    pub mean:     f64,
    /// Population variance of the samples.
    pub variance: f64,
    /// Number of samples behind `mean`/`variance`; 0 means the configured
    /// default was used.
    pub samples:  u32,
}

impl DwellStats {
    /// A fixed dwell with no spread.
    pub fn fixed(ticks: f64) -> Self {
        Self { mean: ticks, variance: 0.0, samples: 0 }
    }

    pub fn std_dev(&self) -> f64 {
        self.variance.sqrt()
    }

    /// Draw a dwell time in whole ticks (at least 1).
    ///
    /// Uses a uniform distribution with the recorded mean and variance, i.e.
    /// half-width `sqrt(3 · variance)`.  A zero-variance zone consumes no
    /// randomness.
    pub fn sample_ticks<R: Rng + ?Sized>(&self, rng: &mut R) -> u64 {
        let half = (3.0 * self.variance).sqrt();
        let value = if half > 0.0 {
            rng.gen_range(self.mean - half..=self.mean + half)
        } else {
            self.mean
        };
        value.round().max(1.0) as u64
    }
}

// ── BuildStats ────────────────────────────────────────────────────────────────

/// What went into a build.  Purely informational.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BuildStats {
    pub records:                  usize,
    pub skipped_records:          usize,
    pub trips:                    usize,
    pub transitions:              u64,
    /// Observed transitions between two zones that both declare neighbors
    /// but do not list each other.
    pub non_adjacent_transitions: u64,
}

// ── TransitionMatrix ──────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct TransitionMatrix {
    n:        usize,
    probs:    Vec<f64>,
    terminal: Vec<bool>,
    dwell:    Vec<DwellStats>,
    entry:    Vec<f64>,
    stats:    BuildStats,
}

impl TransitionMatrix {
    pub(crate) fn from_parts(
        probs:    Vec<f64>,
        terminal: Vec<bool>,
        dwell:    Vec<DwellStats>,
        entry:    Vec<f64>,
        stats:    BuildStats,
    ) -> Self {
        let n = terminal.len();
        debug_assert_eq!(probs.len(), n * n);
        debug_assert_eq!(dwell.len(), n);
        debug_assert_eq!(entry.len(), n);
        Self { n, probs, terminal, dwell, entry, stats }
    }

    /// Uniform fallback for when there is no usable history.
    ///
    /// Every row and the entry distribution are uniform over all zones; every
    /// zone dwells `default_dwell_ticks`.
    pub fn uniform(zone_count: usize, default_dwell_ticks: f64) -> Self {
        let p = if zone_count == 0 { 0.0 } else { 1.0 / zone_count as f64 };
        Self::from_parts(
            vec![p; zone_count * zone_count],
            vec![false; zone_count],
            vec![DwellStats::fixed(default_dwell_ticks); zone_count],
            vec![p; zone_count],
            BuildStats::default(),
        )
    }

    // ── Dimensions ────────────────────────────────────────────────────────

    pub fn zone_count(&self) -> usize {
        self.n
    }

    pub fn stats(&self) -> &BuildStats {
        &self.stats
    }

    // ── Lookups ───────────────────────────────────────────────────────────

    /// Outgoing probabilities of `from`, indexed by destination `ZoneIdx`.
    #[inline]
    pub fn row(&self, from: ZoneIdx) -> &[f64] {
        let start = from.index() * self.n;
        &self.probs[start..start + self.n]
    }

    #[inline]
    pub fn probability(&self, from: ZoneIdx, to: ZoneIdx) -> f64 {
        self.probs[from.index() * self.n + to.index()]
    }

    /// `true` if `zone` had no observed outgoing transitions and therefore
    /// loops onto itself with probability 1.
    #[inline]
    pub fn is_terminal(&self, zone: ZoneIdx) -> bool {
        self.terminal[zone.index()]
    }

    #[inline]
    pub fn dwell(&self, zone: ZoneIdx) -> &DwellStats {
        &self.dwell[zone.index()]
    }

    /// Probability that a new agent starts in each zone.
    pub fn entry_distribution(&self) -> &[f64] {
        &self.entry
    }

    // ── Sampling ──────────────────────────────────────────────────────────

    /// Next zone for an agent leaving `from`, given a uniform draw in `[0, 1)`.
    ///
    /// Falls back to `from` itself for an all-zero row, which a built or
    /// uniform matrix never contains.
    #[inline]
    pub fn next_zone(&self, from: ZoneIdx, draw: f64) -> ZoneIdx {
        weighted_choice(self.row(from), draw)
            .map(|i| ZoneIdx(i as u16))
            .unwrap_or(from)
    }

    /// Entry zone for a new agent, or `None` if the matrix has no zones.
    pub fn entry_zone(&self, draw: f64) -> Option<ZoneIdx> {
        weighted_choice(&self.entry, draw).map(|i| ZoneIdx(i as u16))
    }

    // ── Validation ────────────────────────────────────────────────────────

    /// Check that every row is row-stochastic within [`ROW_TOLERANCE`] and
    /// every terminal row is an exact self-loop.
    pub fn check_rows(&self) -> TransitionResult<()> {
        for i in 0..self.n {
            let zone = ZoneIdx(i as u16);
            let row = self.row(zone);
            if self.terminal[i] {
                let exact = row.iter().enumerate().all(|(j, &p)| p == if j == i { 1.0 } else { 0.0 });
                if !exact {
                    return Err(TransitionError::RowNotStochastic { zone, sum: row.iter().sum() });
                }
                continue;
            }
            let sum: f64 = row.iter().sum();
            if (sum - 1.0).abs() > ROW_TOLERANCE || row.iter().any(|p| !(0.0..=1.0).contains(p)) {
                return Err(TransitionError::RowNotStochastic { zone, sum });
            }
        }
        Ok(())
    }
}
