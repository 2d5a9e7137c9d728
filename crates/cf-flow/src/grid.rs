//! Position heat binned onto a regular grid.

use std::collections::BTreeMap;

use cf_core::Point;
use cf_sim::SimSnapshot;
use cf_zone::ZoneModel;

use crate::{HeatCell, OutputError, OutputResult, normalize};

/// A regular grid of square cells anchored at `origin` (the min corner).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridSpec {
    origin:    Point,
    cell_size: f64,
    cols:      u32,
    rows:      u32,
}

impl GridSpec {
    pub fn new(origin: Point, cell_size: f64, cols: u32, rows: u32) -> OutputResult<Self> {
        if !origin.is_finite() {
            return Err(OutputError::Grid(format!("origin {origin} is not finite")));
        }
        if !(cell_size.is_finite() && cell_size > 0.0) {
            return Err(OutputError::Grid(format!("cell size must be positive, got {cell_size}")));
        }
        if cols == 0 || rows == 0 {
            return Err(OutputError::Grid(format!("grid must have at least one cell, got {cols}x{rows}")));
        }
        Ok(Self { origin, cell_size, cols, rows })
    }

    /// The smallest grid of `cell_size` cells covering every zone, far edges
    /// included.
    pub fn covering(zones: &ZoneModel, cell_size: f64) -> OutputResult<Self> {
        let mut boxes = zones.zones().iter().map(|z| z.shape().bbox());
        let Some((mut lo, mut hi)) = boxes.next() else {
            return Err(OutputError::Grid("zone model has no zones".into()));
        };
        for (l, h) in boxes {
            lo = Point::new(lo.x.min(l.x), lo.y.min(l.y));
            hi = Point::new(hi.x.max(h.x), hi.y.max(h.y));
        }
        if !(cell_size.is_finite() && cell_size > 0.0) {
            return Err(OutputError::Grid(format!("cell size must be positive, got {cell_size}")));
        }
        let cols = cell_count(hi.x - lo.x, cell_size)?;
        let rows = cell_count(hi.y - lo.y, cell_size)?;
        Self::new(lo, cell_size, cols, rows)
    }

    pub fn origin(&self) -> Point {
        self.origin
    }

    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    pub fn cols(&self) -> u32 {
        self.cols
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    /// `(col, row)` of the cell containing `p`, or `None` outside the grid.
    pub fn cell_of(&self, p: Point) -> Option<(u32, u32)> {
        let col = ((p.x - self.origin.x) / self.cell_size).floor();
        let row = ((p.y - self.origin.y) / self.cell_size).floor();
        // NaN fails both comparisons.
        if !(col >= 0.0 && row >= 0.0) {
            return None;
        }
        let (col, row) = (col as u64, row as u64);
        if col >= self.cols as u64 || row >= self.rows as u64 {
            return None;
        }
        Some((col as u32, row as u32))
    }
}

/// Cells needed to cover `extent` with the far edge included.
fn cell_count(extent: f64, cell_size: f64) -> OutputResult<u32> {
    let count = (extent / cell_size).floor() + 1.0;
    if !(count.is_finite() && count <= u32::MAX as f64) {
        return Err(OutputError::Grid(format!(
            "cell size {cell_size} is too small for an extent of {extent}"
        )));
    }
    Ok(count as u32)
}

/// Bin every agent position of every snapshot into `grid`.
///
/// Cells are ordered by `(row, col)`; empty cells are omitted and positions
/// outside the grid are ignored.
pub fn heat_grid<'a, I>(snapshots: I, grid: &GridSpec) -> Vec<HeatCell>
where
    I: IntoIterator<Item = &'a SimSnapshot>,
{
    let mut cells: BTreeMap<(u32, u32), u64> = BTreeMap::new();
    for snap in snapshots {
        for agent in &snap.agents {
            if let Some((col, row)) = grid.cell_of(agent.position) {
                *cells.entry((row, col)).or_default() += 1;
            }
        }
    }
    let counts: Vec<u64> = cells.values().copied().collect();
    cells
        .into_iter()
        .zip(normalize(&counts))
        .map(|(((row, col), count), intensity)| HeatCell { col, row, count, intensity })
        .collect()
}
