//! The `OverlayWriter` trait implemented by all backend writers.

use cf_zone::ZoneModel;

use crate::{FlowOverlay, FlowPath, HeatCell, HeatSample, OutputResult};

/// Trait implemented by the CSV and SQLite writers.
///
/// Zone indices are written as their external ids, resolved through the
/// `ZoneModel` the overlay was computed against.
pub trait OverlayWriter {
    fn write_paths(&mut self, paths: &[FlowPath], zones: &ZoneModel) -> OutputResult<()>;

    fn write_heat(&mut self, heat: &[HeatSample], zones: &ZoneModel) -> OutputResult<()>;

    fn write_cells(&mut self, cells: &[HeatCell]) -> OutputResult<()>;

    /// Flush and close all underlying handles.
    ///
    /// Safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;

    /// Write both halves of an overlay.
    fn write_overlay(&mut self, overlay: &FlowOverlay, zones: &ZoneModel) -> OutputResult<()> {
        self.write_paths(&overlay.paths, zones)?;
        self.write_heat(&overlay.heat, zones)
    }
}
