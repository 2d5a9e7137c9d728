//! Overlay records handed to the renderer.

use cf_core::ZoneIdx;

/// Aggregated movement from `source` to `target`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlowPath {
    pub source: ZoneIdx,
    pub target: ZoneIdx,
    pub count:  u64,
    /// `count` relative to the largest count in the batch, in `[0, 1]`.
    pub weight: f64,
}

/// How busy one zone was.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeatSample {
    pub zone:      ZoneIdx,
    pub count:     u64,
    /// `count` relative to the busiest zone in the batch, in `[0, 1]`.
    pub intensity: f64,
}

/// How busy one grid cell was.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeatCell {
    pub col:       u32,
    pub row:       u32,
    pub count:     u64,
    pub intensity: f64,
}

/// Paths ordered by `(source, target)`; heat ordered by zone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlowOverlay {
    pub paths: Vec<FlowPath>,
    pub heat:  Vec<HeatSample>,
}

impl FlowOverlay {
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty() && self.heat.is_empty()
    }
}
