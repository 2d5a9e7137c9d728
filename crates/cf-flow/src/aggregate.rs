//! Historical and live aggregation into flow paths and zone heat.

use std::collections::BTreeMap;

use tracing::debug;

use cf_core::ZoneIdx;
use cf_sim::SimSnapshot;
use cf_transition::{BuilderConfig, VisitRecord, group_trips};
use cf_zone::ZoneModel;

use crate::{FlowOverlay, FlowPath, HeatSample};

/// Scale `counts` by their maximum into `[0, 1]`.
///
/// The maximum maps to exactly 1.0 (every tied maximum does).  An all-zero
/// or empty input maps to all zeros.
pub fn normalize(counts: &[u64]) -> Vec<f64> {
    let max = counts.iter().copied().max().unwrap_or(0);
    if max == 0 {
        return vec![0.0; counts.len()];
    }
    counts
        .iter()
        .map(|&c| (c as f64 / max as f64).clamp(0.0, 1.0))
        .collect()
}

/// Overlay from historical visit records.
///
/// Trips are reconstructed the same way the transition builder does it
/// (`config.merge_repeat_visits` included), so the overlay and the matrix
/// always describe the same data.  Paths come from consecutive visits of
/// each trip; heat counts visits per zone.
pub fn historical_overlay(records: &[VisitRecord], zones: &ZoneModel, config: &BuilderConfig) -> FlowOverlay {
    let trips = group_trips(records, zones, config.merge_repeat_visits);

    let mut pairs: BTreeMap<(ZoneIdx, ZoneIdx), u64> = BTreeMap::new();
    let mut visits: BTreeMap<ZoneIdx, u64> = BTreeMap::new();
    for trip in &trips.trips {
        for visit in &trip.visits {
            *visits.entry(visit.zone).or_default() += 1;
        }
        for pair in trip.transitions() {
            *pairs.entry(pair).or_default() += 1;
        }
    }

    debug!(trips = trips.trips.len(), paths = pairs.len(), "historical overlay");
    FlowOverlay { paths: to_paths(pairs), heat: to_heat(visits) }
}

/// Overlay from a run of snapshots, oldest first.
///
/// A path is counted each time an agent present in two consecutive
/// snapshots is in a different zone in the second.  Heat is agent presence
/// per zone summed over every snapshot.
pub fn live_overlay<'a, I>(snapshots: I) -> FlowOverlay
where
    I: IntoIterator<Item = &'a SimSnapshot>,
{
    let mut pairs: BTreeMap<(ZoneIdx, ZoneIdx), u64> = BTreeMap::new();
    let mut presence: BTreeMap<ZoneIdx, u64> = BTreeMap::new();
    let mut prev: Option<&SimSnapshot> = None;
    let mut frames = 0usize;

    for snap in snapshots {
        frames += 1;
        for agent in &snap.agents {
            *presence.entry(agent.zone).or_default() += 1;
        }
        if let Some(before) = prev {
            count_moves(before, snap, &mut pairs);
        }
        prev = Some(snap);
    }

    debug!(frames, paths = pairs.len(), "live overlay");
    FlowOverlay { paths: to_paths(pairs), heat: to_heat(presence) }
}

/// Merge-join two id-ordered populations and count zone changes.
fn count_moves(before: &SimSnapshot, after: &SimSnapshot, pairs: &mut BTreeMap<(ZoneIdx, ZoneIdx), u64>) {
    let (mut i, mut j) = (0, 0);
    while i < before.agents.len() && j < after.agents.len() {
        let (a, b) = (&before.agents[i], &after.agents[j]);
        match a.id.cmp(&b.id) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                if a.zone != b.zone {
                    *pairs.entry((a.zone, b.zone)).or_default() += 1;
                }
                i += 1;
                j += 1;
            }
        }
    }
}

fn to_paths(pairs: BTreeMap<(ZoneIdx, ZoneIdx), u64>) -> Vec<FlowPath> {
    let counts: Vec<u64> = pairs.values().copied().collect();
    pairs
        .into_iter()
        .zip(normalize(&counts))
        .map(|(((source, target), count), weight)| FlowPath { source, target, count, weight })
        .collect()
}

fn to_heat(counts: BTreeMap<ZoneIdx, u64>) -> Vec<HeatSample> {
    let values: Vec<u64> = counts.values().copied().collect();
    counts
        .into_iter()
        .zip(normalize(&values))
        .map(|((zone, count), intensity)| HeatSample { zone, count, intensity })
        .collect()
}
