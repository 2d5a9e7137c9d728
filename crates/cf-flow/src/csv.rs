//! CSV output backend.
//!
//! Creates three files in the configured output directory:
//! - `flow_paths.csv`
//! - `heat_samples.csv`
//! - `heat_cells.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use cf_zone::ZoneModel;

use crate::writer::OverlayWriter;
use crate::{FlowPath, HeatCell, HeatSample, OutputResult};

/// Writes overlay batches to CSV files.  Successive batches append rows.
pub struct CsvWriter {
    paths:    Writer<File>,
    heat:     Writer<File>,
    cells:    Writer<File>,
    finished: bool,
}

impl CsvWriter {
    /// Create the CSV files in `dir` and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut paths = Writer::from_path(dir.join("flow_paths.csv"))?;
        paths.write_record(["source", "target", "count", "weight"])?;

        let mut heat = Writer::from_path(dir.join("heat_samples.csv"))?;
        heat.write_record(["zone", "count", "intensity"])?;

        let mut cells = Writer::from_path(dir.join("heat_cells.csv"))?;
        cells.write_record(["col", "row", "count", "intensity"])?;

        Ok(Self { paths, heat, cells, finished: false })
    }
}

impl OverlayWriter for CsvWriter {
    fn write_paths(&mut self, paths: &[FlowPath], zones: &ZoneModel) -> OutputResult<()> {
        for p in paths {
            self.paths.write_record(&[
                zones.id_of(p.source).to_string(),
                zones.id_of(p.target).to_string(),
                p.count.to_string(),
                p.weight.to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_heat(&mut self, heat: &[HeatSample], zones: &ZoneModel) -> OutputResult<()> {
        for h in heat {
            self.heat.write_record(&[
                zones.id_of(h.zone).to_string(),
                h.count.to_string(),
                h.intensity.to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_cells(&mut self, cells: &[HeatCell]) -> OutputResult<()> {
        for c in cells {
            self.cells.write_record(&[
                c.col.to_string(),
                c.row.to_string(),
                c.count.to_string(),
                c.intensity.to_string(),
            ])?;
        }
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.paths.flush()?;
        self.heat.flush()?;
        self.cells.flush()?;
        Ok(())
    }
}
