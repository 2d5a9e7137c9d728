//! Trip reconstruction: raw observations → ordered zone visits per subject.
//!
//! Tracking logs are sampled irregularly, so one stay in a zone usually shows
//! up as several observations.  With `merge_repeat_visits` those collapse into
//! a single [`Visit`] that lasts until the subject is first seen somewhere
//! else.  Without it, every observation is its own visit and repeats count as
//! self-transitions.

use std::collections::BTreeMap;

use tracing::warn;

use cf_core::ZoneIdx;
use cf_zone::ZoneModel;

use crate::VisitRecord;

/// One stay in one zone.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Visit {
    pub zone:  ZoneIdx,
    /// Timestamp of the first observation of this stay.
    pub start: i64,
}

/// All visits of one subject, in time order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Trip {
    pub subject_id: String,
    pub visits:     Vec<Visit>,
}

impl Trip {
    /// Time from this visit's start to the next visit's start, or `None`
    /// for the last visit of the trip.
    pub fn dwell_of(&self, i: usize) -> Option<i64> {
        let next = self.visits.get(i + 1)?;
        Some(next.start.saturating_sub(self.visits[i].start))
    }

    /// Consecutive `(from, to)` zone pairs.
    pub fn transitions(&self) -> impl Iterator<Item = (ZoneIdx, ZoneIdx)> + '_ {
        self.visits.windows(2).map(|w| (w[0].zone, w[1].zone))
    }
}

/// Output of [`group_trips`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TripSet {
    /// Trips ordered by subject id.
    pub trips:           Vec<Trip>,
    /// Records read, including skipped ones.
    pub records:         usize,
    /// Records naming a zone the model does not know.
    pub skipped_records: usize,
}

impl TripSet {
    pub fn is_empty(&self) -> bool {
        self.trips.is_empty()
    }
}

/// Group `records` into per-subject trips.
///
/// Subjects are ordered by id (`BTreeMap`), observations by timestamp with
/// ties kept in input order.  Records whose zone is unknown to `zones` are
/// skipped and counted; a subject left with no records produces no trip.
pub fn group_trips(records: &[VisitRecord], zones: &ZoneModel, merge_repeat_visits: bool) -> TripSet {
    let mut by_subject: BTreeMap<&str, Vec<(i64, ZoneIdx)>> = BTreeMap::new();
    let mut skipped = 0usize;
    let mut first_unknown: Option<&str> = None;

    for record in records {
        match zones.index_of(&record.zone_id) {
            Some(zone) => by_subject
                .entry(record.subject_id.as_str())
                .or_default()
                .push((record.timestamp, zone)),
            None => {
                skipped += 1;
                first_unknown.get_or_insert(record.zone_id.as_str());
            }
        }
    }

    if let Some(zone_id) = first_unknown {
        warn!(skipped, first = zone_id, "visit records reference unknown zones");
    }

    let trips = by_subject
        .into_iter()
        .map(|(subject, mut observations)| {
            // Stable: equal timestamps keep input order.
            observations.sort_by_key(|&(ts, _)| ts);

            let mut visits: Vec<Visit> = Vec::with_capacity(observations.len());
            for (ts, zone) in observations {
                if merge_repeat_visits && visits.last().is_some_and(|v| v.zone == zone) {
                    continue;
                }
                visits.push(Visit { zone, start: ts });
            }
            Trip { subject_id: subject.to_string(), visits }
        })
        .collect();

    TripSet { trips, records: records.len(), skipped_records: skipped }
}
