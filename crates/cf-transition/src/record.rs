//! The raw historical observation.

use serde::{Deserialize, Serialize};

/// One tracking observation: `subject_id` was seen in `zone_id` at
/// `timestamp`.
///
/// `timestamp` is either Unix seconds or a per-subject sequence index; the
/// builder only ever looks at differences between timestamps of the same
/// subject.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisitRecord {
    pub subject_id: String,
    pub zone_id:    String,
    pub timestamp:  i64,
}

impl VisitRecord {
    pub fn new(subject_id: impl Into<String>, zone_id: impl Into<String>, timestamp: i64) -> Self {
        Self { subject_id: subject_id.into(), zone_id: zone_id.into(), timestamp }
    }
}
