//! SQLite output backend (feature `sqlite`).
//!
//! Creates a single `overlay.db` file in the configured output directory with
//! three tables: `flow_paths`, `heat_samples` and `heat_cells`.  Every
//! `write_paths` call starts a new batch number; heat and cell rows written
//! after it carry the same number.

use std::path::Path;

use rusqlite::Connection;

use cf_zone::ZoneModel;

use crate::writer::OverlayWriter;
use crate::{FlowPath, HeatCell, HeatSample, OutputResult};

/// Writes overlay batches to an SQLite database.
pub struct SqliteWriter {
    conn:     Connection,
    batch:    i64,
    finished: bool,
}

impl SqliteWriter {
    /// Open (or create) `overlay.db` in `dir` and initialise the schema.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let conn = Connection::open(dir.join("overlay.db"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous  = NORMAL;
             CREATE TABLE IF NOT EXISTS flow_paths (
                 batch  INTEGER NOT NULL,
                 source TEXT    NOT NULL,
                 target TEXT    NOT NULL,
                 count  INTEGER NOT NULL,
                 weight REAL    NOT NULL
             );
             CREATE TABLE IF NOT EXISTS heat_samples (
                 batch     INTEGER NOT NULL,
                 zone      TEXT    NOT NULL,
                 count     INTEGER NOT NULL,
                 intensity REAL    NOT NULL
             );
             CREATE TABLE IF NOT EXISTS heat_cells (
                 batch     INTEGER NOT NULL,
                 col       INTEGER NOT NULL,
                 row       INTEGER NOT NULL,
                 count     INTEGER NOT NULL,
                 intensity REAL    NOT NULL
             );",
        )?;

        Ok(Self { conn, batch: 0, finished: false })
    }

    /// Number of batches written so far.
    pub fn batches(&self) -> i64 {
        self.batch
    }
}

impl OverlayWriter for SqliteWriter {
    fn write_paths(&mut self, paths: &[FlowPath], zones: &ZoneModel) -> OutputResult<()> {
        self.batch += 1;
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO flow_paths (batch, source, target, count, weight) \
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;
            for p in paths {
                stmt.execute(rusqlite::params![
                    self.batch,
                    zones.id_of(p.source),
                    zones.id_of(p.target),
                    p.count as i64,
                    p.weight,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn write_heat(&mut self, heat: &[HeatSample], zones: &ZoneModel) -> OutputResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO heat_samples (batch, zone, count, intensity) VALUES (?1, ?2, ?3, ?4)",
            )?;
            for h in heat {
                stmt.execute(rusqlite::params![self.batch, zones.id_of(h.zone), h.count as i64, h.intensity])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn write_cells(&mut self, cells: &[HeatCell]) -> OutputResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO heat_cells (batch, col, row, count, intensity) \
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;
            for c in cells {
                stmt.execute(rusqlite::params![self.batch, c.col, c.row, c.count as i64, c.intensity])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
        Ok(())
    }
}
