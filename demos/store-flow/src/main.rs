//! store-flow — end-to-end run of the customer-flow engine on a small store.
//!
//! Builds the transition matrix from an embedded visit log on a background
//! loader, simulates shoppers, and writes two overlays as CSV:
//!
//! - `<output_dir>/historical/`: flow paths and zone heat from the visit log
//! - `<output_dir>/live/`: flow paths, zone heat and grid heat from
//!   the last `window` snapshots of the run
//!
//! Usage: `store-flow [scenario.json]`.  Every scenario field is optional:
//!
//! ```json
//! { "sim": { "seed": 7, "arrivals_per_tick": 2 },
//!   "lifecycle": { "purchase_probability": 0.5 },
//!   "ticks": 3600 }
//! ```
//!
//! Log verbosity follows `RUST_LOG` (default `info`).

mod store;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cf_agent::LifecycleConfig;
use cf_core::{SimConfig, Tick};
use cf_flow::{
    CsvWriter, GridSpec, OverlayWriter, SnapshotWindow, heat_grid, historical_overlay, live_overlay,
};
use cf_sim::{
    FallbackPolicy, LoadOutcome, LoadTask, SchedulerBuilder, SimObserver, SimSnapshot, StagedModel,
    TickReport,
};
use cf_transition::{BuilderConfig, TransitionMatrixBuilder};

// ── Scenario ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(default)]
struct Scenario {
    sim:                SimConfig,
    transitions:        BuilderConfig,
    lifecycle:          LifecycleConfig,
    /// Shoppers already in the store at tick 0.
    initial_population: usize,
    ticks:              u64,
    /// Snapshots kept for the live overlay.
    window:             usize,
    /// Grid cell edge, in floor-plan metres.
    cell_size:          f64,
    output_dir:         PathBuf,
}

impl Default for Scenario {
    fn default() -> Self {
        Self {
            sim:                SimConfig { arrivals_per_tick: 1, max_population: 120, ..SimConfig::default() },
            transitions:        BuilderConfig::default(),
            lifecycle:          LifecycleConfig::default(),
            initial_population: 20,
            ticks:              1_800,
            window:             120,
            cell_size:          1.0,
            output_dir:         PathBuf::from("output/store-flow"),
        }
    }
}

fn load_scenario(path: Option<&Path>) -> Result<Scenario> {
    let Some(path) = path else {
        return Ok(Scenario::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading scenario {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing scenario {}", path.display()))
}

// ── Observer ──────────────────────────────────────────────────────────────────

/// Feeds the snapshot window and tracks a few run totals.
struct RunStats {
    window:    SnapshotWindow,
    peak:      usize,
    moved:     u64,
    exited:    u64,
    expired:   u64,
    log_every: u64,
}

impl RunStats {
    fn new(window: usize, log_every: u64) -> Self {
        Self { window: SnapshotWindow::new(window), peak: 0, moved: 0, exited: 0, expired: 0, log_every }
    }
}

impl SimObserver for RunStats {
    fn on_tick_end(&mut self, report: &TickReport) {
        self.peak = self.peak.max(report.population);
        self.moved += report.moved as u64;
        self.exited += report.exited as u64;
        self.expired += report.expired as u64;
        if self.log_every > 0 && report.tick.0.is_multiple_of(self.log_every) {
            info!(tick = report.tick.0, population = report.population, moved = report.moved, "progress");
        }
    }

    fn on_snapshot(&mut self, snapshot: &SimSnapshot) {
        self.window.on_snapshot(snapshot);
    }

    fn on_sim_end(&mut self, final_tick: Tick) {
        info!(tick = final_tick.0, "run finished");
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let scenario_path = std::env::args_os().nth(1).map(PathBuf::from);
    let scenario = load_scenario(scenario_path.as_deref())?;

    println!("=== store-flow — customer-flow engine ===");
    println!(
        "Seed: {}  |  Ticks: {}  |  Arrivals/tick: {}",
        scenario.sim.seed, scenario.ticks, scenario.sim.arrivals_per_tick
    );
    println!();

    // 1. Load the floor plan and history, and build the model off-thread.
    let definitions = store::zone_definitions()?;
    let records = store::visit_records()?;
    println!("Loaded {} zones and {} visit records", definitions.len(), records.len());

    let builder = TransitionMatrixBuilder::new(scenario.transitions.clone())?;
    let job_records = records.clone();
    let task = LoadTask::spawn(move |cancel| {
        StagedModel::prepare(definitions, &job_records, &builder, FallbackPolicy::Uniform, cancel)
    })?;
    let staged = match task.wait() {
        LoadOutcome::Ready(staged) => staged,
        LoadOutcome::Cancelled => bail!("model load was cancelled"),
        LoadOutcome::Failed(e) => return Err(e).context("building zone model"),
    };
    if staged.used_fallback() {
        println!("No usable history: shoppers wander uniformly");
    }
    let stats = staged.matrix().stats();
    println!(
        "Transition matrix: {} trips, {} transitions, {} skipped records",
        stats.trips, stats.transitions, stats.skipped_records
    );

    // 2. Build the scheduler and seed the floor.
    let zones = Arc::clone(staged.zones());
    let mut sched = SchedulerBuilder::new(scenario.sim.clone(), Arc::clone(&zones), Arc::clone(staged.matrix()))
        .lifecycle(scenario.lifecycle.clone())
        .build()?;
    let placed = sched.spawn(scenario.initial_population);
    println!("Placed {placed} shoppers at tick 0");

    // 3. Run.
    let mut obs = RunStats::new(scenario.window, 300);
    let t0 = Instant::now();
    sched.run_ticks(scenario.ticks, &mut obs);
    let elapsed = t0.elapsed();

    println!("Simulation complete in {:.3} s", elapsed.as_secs_f64());
    println!(
        "  spawned {}  |  rejected {}  |  peak {}  |  moves {}  |  exits {}  |  retired {}",
        sched.total_spawned(),
        sched.total_rejected(),
        obs.peak,
        obs.moved,
        obs.exited,
        obs.expired,
    );
    println!();

    // 4. Aggregate and export.
    let historical = historical_overlay(&records, &zones, &scenario.transitions);
    let live = live_overlay(obs.window.iter());
    let grid = GridSpec::covering(&zones, scenario.cell_size)?;
    let cells = heat_grid(obs.window.iter(), &grid);

    let hist_dir = scenario.output_dir.join("historical");
    let live_dir = scenario.output_dir.join("live");
    std::fs::create_dir_all(&hist_dir)?;
    std::fs::create_dir_all(&live_dir)?;

    let mut out = CsvWriter::new(&hist_dir)?;
    out.write_overlay(&historical, &zones)?;
    out.finish()?;

    let mut out = CsvWriter::new(&live_dir)?;
    out.write_overlay(&live, &zones)?;
    out.write_cells(&cells)?;
    out.finish()?;

    println!("Historical: {} paths, {} zones  →  {}", historical.paths.len(), historical.heat.len(), hist_dir.display());
    println!(
        "Live:       {} paths, {} zones, {} cells over {} snapshots  →  {}",
        live.paths.len(),
        live.heat.len(),
        cells.len(),
        obs.window.len(),
        live_dir.display()
    );
    println!();

    // 5. Final occupancy table.
    let mut occupancy = vec![0usize; zones.len()];
    for agent in sched.agents() {
        occupancy[agent.zone.index()] += 1;
    }
    println!("{:<12} {:<18} {:>8}", "Zone", "Label", "Shoppers");
    println!("{}", "-".repeat(40));
    for (zone, count) in zones.zones().iter().zip(&occupancy) {
        println!("{:<12} {:<18} {:>8}", zone.id, zone.label, count);
    }

    Ok(())
}
