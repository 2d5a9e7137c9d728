//! Integration tests for cf-sim.

use std::sync::Arc;
use std::time::Duration;

use cf_agent::{LifecycleConfig, LifecycleState};
use cf_core::{AgentId, Point, SimConfig, Tick, ZoneIdx};
use cf_transition::{BuilderConfig, TransitionMatrix, TransitionMatrixBuilder, VisitRecord};
use cf_zone::{Bounds, ZoneDefinition, ZoneModel, load_zones};

use crate::{
    CancelToken, FallbackPolicy, LoadOutcome, LoadTask, NoopObserver, Scheduler, SchedulerBuilder,
    SimError, SimObserver, SimSnapshot, StagedModel, TickReport,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

const A: ZoneIdx = ZoneIdx(0);
const B: ZoneIdx = ZoneIdx(1);
const C: ZoneIdx = ZoneIdx(2);

/// A | B rectangles and an L-shaped (concave) C.
fn zone_defs() -> Vec<ZoneDefinition> {
    let l_shape = [(8.0, 0.0), (12.0, 0.0), (12.0, 2.0), (10.0, 2.0), (10.0, 4.0), (8.0, 4.0)]
        .into_iter()
        .map(|(x, y)| Point::new(x, y))
        .collect();
    vec![
        ZoneDefinition::rect("A", 0.0, 0.0, 4.0, 4.0).with_neighbors(&["B"]),
        ZoneDefinition::rect("B", 4.0, 0.0, 8.0, 4.0).with_neighbors(&["A", "C"]),
        ZoneDefinition {
            id:        "C".into(),
            label:     "Fitting rooms".into(),
            bounds:    Bounds::Polygon(l_shape),
            color:     None,
            neighbors: vec!["B".into()],
        },
    ]
}

fn zones() -> ZoneModel {
    load_zones(zone_defs()).unwrap()
}

/// `n` trips A@0 → B@10 → C@20.
fn abc_records(n: usize) -> Vec<VisitRecord> {
    (0..n)
        .flat_map(|t| {
            let s = format!("s{t:02}");
            [
                VisitRecord::new(s.as_str(), "A", 0),
                VisitRecord::new(s.as_str(), "B", 10),
                VisitRecord::new(s.as_str(), "C", 20),
            ]
        })
        .collect()
}

fn abc_matrix(zones: &ZoneModel) -> TransitionMatrix {
    TransitionMatrixBuilder::new(BuilderConfig::default())
        .unwrap()
        .build(&abc_records(10), zones)
        .unwrap()
}

fn config(max_population: usize) -> SimConfig {
    SimConfig { max_population, ..SimConfig::default() }
}

fn uniform_scheduler(seed: u64) -> Scheduler {
    let z = zones();
    let m = TransitionMatrix::uniform(z.len(), 3.0);
    SchedulerBuilder::new(SimConfig { seed, max_population: 50, ..SimConfig::default() }, z, m)
        .build()
        .unwrap()
}

fn assert_positions_inside(s: &Scheduler) {
    for a in s.agents() {
        assert!(
            s.zones().zone(a.zone).contains(a.position),
            "agent {} at {} outside zone {}",
            a.id,
            a.position,
            s.zones().id_of(a.zone)
        );
    }
}

// ── SchedulerBuilder ──────────────────────────────────────────────────────────

#[cfg(test)]
mod builder_tests {
    use super::*;

    #[test]
    fn builds_empty_at_tick_zero() {
        let z = zones();
        let m = abc_matrix(&z);
        let s = SchedulerBuilder::new(config(10), z, m).build().unwrap();
        assert_eq!(s.population(), 0);
        assert_eq!(s.now(), Tick::ZERO);
        assert!(!s.is_paused());
    }

    #[test]
    fn zone_count_mismatch_errors() {
        let err = SchedulerBuilder::new(config(10), zones(), TransitionMatrix::uniform(2, 5.0))
            .build()
            .unwrap_err();
        assert!(matches!(err, SimError::ZoneCountMismatch { zones: 3, matrix: 2 }));
    }

    #[test]
    fn invalid_config_errors() {
        let err = SchedulerBuilder::new(config(0), zones(), TransitionMatrix::uniform(3, 5.0))
            .build()
            .unwrap_err();
        assert!(matches!(err, SimError::Core(_)));
    }

    #[test]
    fn invalid_lifecycle_errors() {
        let bad = LifecycleConfig { browsing: f64::INFINITY, ..LifecycleConfig::default() };
        let err = SchedulerBuilder::new(config(10), zones(), TransitionMatrix::uniform(3, 5.0))
            .lifecycle(bad)
            .build()
            .unwrap_err();
        assert!(matches!(err, SimError::Agent(_)));
    }

    #[test]
    fn shared_arcs_accepted() {
        let z = Arc::new(zones());
        let m = Arc::new(TransitionMatrix::uniform(3, 5.0));
        let s = SchedulerBuilder::new(config(10), Arc::clone(&z), Arc::clone(&m)).build().unwrap();
        assert!(Arc::ptr_eq(s.zones(), &z));
        assert!(Arc::ptr_eq(s.matrix(), &m));
    }
}

// ── Spawning ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod spawn_tests {
    use super::*;

    #[test]
    fn spawn_respects_population_cap() {
        let z = zones();
        let m = abc_matrix(&z);
        let mut s = SchedulerBuilder::new(config(3), z, m).build().unwrap();
        assert_eq!(s.spawn(5), 3);
        assert_eq!(s.population(), 3);
        assert_eq!(s.spawn(1), 0);
        assert_eq!(s.total_spawned(), 3);
        assert_eq!(s.total_rejected(), 3);
    }

    #[test]
    fn spawned_agents_start_entering_in_entry_zone() {
        let z = zones();
        let m = abc_matrix(&z);
        let mut s = SchedulerBuilder::new(config(10), z, m).build().unwrap();
        s.spawn(4);
        let snap = s.snapshot();
        let ids: Vec<AgentId> = snap.agents.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![AgentId(0), AgentId(1), AgentId(2), AgentId(3)]);
        for a in s.agents() {
            assert_eq!(a.zone, A);
            assert_eq!(a.state, LifecycleState::Entering);
            assert_eq!(a.ticks_remaining, 10, "A dwell is exactly 10 ticks");
            assert_eq!(a.entry_tick, Tick::ZERO);
        }
        assert_positions_inside(&s);
    }
}

// ── Tick loop ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tick_tests {
    use super::*;

    #[test]
    fn linear_path_visits_a_b_c_then_exits() {
        let z = zones();
        let m = abc_matrix(&z);
        let mut s = SchedulerBuilder::new(config(5), z, m)
            .lifecycle(LifecycleConfig::always_advance())
            .build()
            .unwrap();
        assert_eq!(s.spawn(1), 1);

        let mut visited = vec![A];
        let mut last_path = Vec::new();
        let mut exited = 0;
        for _ in 0..1_000 {
            if let Some(a) = s.agents().get(AgentId(0)) {
                last_path = a.path.to_vec();
            }
            let report = s.tick(1);
            exited += report.exited;
            match s.agents().get(AgentId(0)) {
                Some(a) if visited.last() != Some(&a.zone) => visited.push(a.zone),
                Some(_) => {}
                None => break,
            }
        }
        assert_eq!(visited, vec![A, B, C]);
        assert_eq!(last_path, vec![A, B, C]);
        assert_eq!(exited, 1);
        assert_eq!(s.population(), 0);
    }

    #[test]
    fn terminal_zone_holds_agent_for_1000_ticks() {
        let z = zones();
        let records = vec![VisitRecord::new("solo", "C", 0)];
        let m = TransitionMatrixBuilder::new(BuilderConfig::default())
            .unwrap()
            .build(&records, &z)
            .unwrap();
        assert!(m.is_terminal(C));

        let cfg = SimConfig { max_lifetime_ticks: 1_000_000, ..config(5) };
        let mut s = SchedulerBuilder::new(cfg, z, m)
            .lifecycle(LifecycleConfig::never_advance())
            .build()
            .unwrap();
        s.spawn(1);
        for _ in 0..1_000 {
            s.tick(1);
            let a = s.agents().get(AgentId(0)).unwrap();
            assert_eq!(a.zone, C);
            assert_eq!(a.state, LifecycleState::Entering);
        }
        assert_eq!(s.now(), Tick(1_000));
    }

    #[test]
    fn positions_stay_inside_zones_every_tick() {
        let mut s = uniform_scheduler(17);
        s.spawn(30);
        for _ in 0..300 {
            s.tick(1);
            assert_positions_inside(&s);
            if s.population() < 10 {
                s.spawn(10);
            }
        }
    }

    #[test]
    fn same_seed_same_trajectories() {
        let run = |seed| {
            let mut s = uniform_scheduler(seed);
            let mut snaps: Vec<SimSnapshot> = Vec::new();
            s.spawn(20);
            for t in 0..100 {
                if t % 10 == 0 {
                    s.spawn(3);
                }
                s.tick(1);
                snaps.push(s.snapshot());
            }
            snaps
        };
        assert_eq!(run(5), run(5));
        assert_ne!(run(5), run(6));
    }

    #[test]
    fn lifetime_safeguard_removes_agents() {
        let z = zones();
        let cfg = SimConfig { max_lifetime_ticks: 5, ..config(5) };
        let mut s = SchedulerBuilder::new(cfg, z, TransitionMatrix::uniform(3, 2.0))
            .lifecycle(LifecycleConfig::never_advance())
            .build()
            .unwrap();
        s.spawn(2);
        for _ in 0..5 {
            assert_eq!(s.tick(1).expired, 0);
        }
        let report = s.tick(1);
        assert_eq!(report.expired, 2);
        assert_eq!(report.population, 0);
    }

    #[test]
    fn large_delta_moves_at_most_once() {
        let z = zones();
        let m = abc_matrix(&z);
        let mut s = SchedulerBuilder::new(config(5), z, m)
            .lifecycle(LifecycleConfig::never_advance())
            .build()
            .unwrap();
        s.spawn(1);
        let report = s.tick(500);
        assert_eq!(report.advanced, 1);
        assert_eq!(report.moved, 1);
        assert_eq!(s.agents().get(AgentId(0)).map(|a| a.zone), Some(B));
    }

    #[test]
    fn zero_delta_is_a_no_op() {
        let mut s = uniform_scheduler(1);
        s.spawn(3);
        let before = s.snapshot();
        let report = s.tick(0);
        assert_eq!(report.advanced, 0);
        assert_eq!(report.population, 3);
        assert_eq!(s.snapshot(), before);
    }
}

// ── Control ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod control_tests {
    use super::*;

    #[test]
    fn paused_scheduler_ignores_ticks() {
        let mut s = uniform_scheduler(2);
        s.spawn(5);
        s.tick(1);
        s.pause();
        let before = s.snapshot();
        s.tick(10);
        assert_eq!(s.run_ticks(10, &mut NoopObserver), 0);
        assert_eq!(s.snapshot(), before);

        s.resume();
        s.tick(1);
        assert_eq!(s.now(), Tick(2));
    }

    #[test]
    fn reset_clears_population_and_keeps_ids_unique() {
        let mut s = uniform_scheduler(3);
        s.spawn(4);
        s.tick(7);
        s.reset();
        assert_eq!(s.population(), 0);
        assert_eq!(s.now(), Tick::ZERO);
        s.spawn(1);
        assert_eq!(s.snapshot().agents[0].id, AgentId(4));
    }

    #[derive(Default)]
    struct Counter {
        starts:    u64,
        ends:      Vec<TickReport>,
        snapshots: Vec<Tick>,
        finished:  Option<Tick>,
    }

    impl SimObserver for Counter {
        fn on_tick_start(&mut self, _tick: Tick) {
            self.starts += 1;
        }
        fn on_tick_end(&mut self, report: &TickReport) {
            self.ends.push(*report);
        }
        fn on_snapshot(&mut self, snapshot: &SimSnapshot) {
            self.snapshots.push(snapshot.tick);
        }
        fn on_sim_end(&mut self, final_tick: Tick) {
            self.finished = Some(final_tick);
        }
    }

    #[test]
    fn run_ticks_spawns_arrivals_and_calls_hooks() {
        let z = zones();
        let cfg = SimConfig {
            arrivals_per_tick: 2,
            snapshot_interval_ticks: 5,
            max_population: 100,
            ..SimConfig::default()
        };
        let mut s = SchedulerBuilder::new(cfg, z, TransitionMatrix::uniform(3, 50.0))
            .lifecycle(LifecycleConfig::never_advance())
            .build()
            .unwrap();
        let mut obs = Counter::default();
        assert_eq!(s.run_ticks(20, &mut obs), 20);
        assert_eq!(obs.starts, 20);
        assert_eq!(obs.ends.len(), 20);
        assert_eq!(obs.snapshots, vec![Tick(5), Tick(10), Tick(15), Tick(20)]);
        assert_eq!(obs.finished, Some(Tick(20)));
        assert_eq!(s.population(), 40);
        assert_eq!(obs.ends.last().map(|r| r.population), Some(40));
    }
}

// ── Reload ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod reload_tests {
    use super::*;

    fn builder() -> TransitionMatrixBuilder {
        TransitionMatrixBuilder::new(BuilderConfig::default()).unwrap()
    }

    #[test]
    fn prepare_builds_matching_model() {
        let staged = StagedModel::prepare(
            zone_defs(),
            &abc_records(3),
            &builder(),
            FallbackPolicy::Abort,
            &CancelToken::new(),
        )
        .unwrap();
        assert_eq!(staged.zones().len(), 3);
        assert_eq!(staged.matrix().zone_count(), 3);
        assert!(!staged.used_fallback());
    }

    #[test]
    fn empty_history_respects_fallback_policy() {
        let cancel = CancelToken::new();
        let err = StagedModel::prepare(zone_defs(), &[], &builder(), FallbackPolicy::Abort, &cancel)
            .unwrap_err();
        assert!(matches!(err, SimError::Transition(_)));

        let staged = StagedModel::prepare(zone_defs(), &[], &builder(), FallbackPolicy::Uniform, &cancel)
            .unwrap();
        assert!(staged.used_fallback());
        staged.matrix().check_rows().unwrap();
    }

    #[test]
    fn prepare_stops_when_cancelled() {
        let cancel = CancelToken::new();
        cancel.cancel();
        let err = StagedModel::prepare(zone_defs(), &abc_records(1), &builder(), FallbackPolicy::Abort, &cancel)
            .unwrap_err();
        assert!(matches!(err, SimError::Cancelled));
    }

    #[test]
    fn cancelled_load_leaves_scheduler_untouched() {
        let mut s = uniform_scheduler(9);
        s.spawn(5);
        s.tick(3);
        s.pause();
        let before = s.snapshot();

        let task = LoadTask::spawn(|cancel| {
            loop {
                cancel.check()?;
                std::thread::sleep(Duration::from_millis(1));
            }
        })
        .unwrap();
        task.cancel();
        assert!(matches!(task.wait(), LoadOutcome::Cancelled));

        s.resume();
        assert_eq!(s.snapshot(), before);
        assert_eq!(s.zones().len(), 3);
    }

    #[test]
    fn finished_load_installs_between_ticks() {
        let mut s = uniform_scheduler(4);
        s.spawn(5);
        s.tick(2);

        let defs = vec![
            ZoneDefinition::rect("front", 0.0, 0.0, 5.0, 5.0),
            ZoneDefinition::rect("back", 5.0, 0.0, 10.0, 5.0),
        ];
        let records = vec![VisitRecord::new("x", "front", 0), VisitRecord::new("x", "back", 4)];
        let b = builder();
        let mut task = LoadTask::spawn(move |cancel| {
            StagedModel::prepare(defs, &records, &b, FallbackPolicy::Abort, cancel)
        })
        .unwrap();

        let outcome = loop {
            if let Some(outcome) = task.try_finish() {
                break outcome;
            }
            std::thread::sleep(Duration::from_millis(1));
        };
        let staged = match outcome {
            LoadOutcome::Ready(staged) => staged,
            other => panic!("load did not finish: {other:?}"),
        };
        s.install(staged);
        assert_eq!(s.zones().len(), 2);
        assert_eq!(s.population(), 0);
        assert_eq!(s.now(), Tick::ZERO);
        s.spawn(3);
        s.run_ticks(50, &mut NoopObserver);
        assert_positions_inside(&s);
        assert!(task.try_finish().is_none(), "outcome is taken once");
    }

    #[test]
    fn failed_load_reports_error() {
        let task = LoadTask::spawn(|_| {
            let defs = vec![ZoneDefinition::rect("flat", 0.0, 0.0, 3.0, 0.0)];
            StagedModel::prepare(defs, &[], &builder(), FallbackPolicy::Uniform, &CancelToken::new())
        })
        .unwrap();
        assert!(matches!(task.wait(), LoadOutcome::Failed(SimError::Zone(_))));
    }
}
