//! Unit tests for cf-agent.

use cf_core::{AgentId, AgentRng, Point, Tick, ZoneIdx};

use crate::{
    AgentArena, AgentError, CustomerAgent, LifecycleConfig, LifecyclePolicy, LifecycleState,
    PathHistory,
};

fn agent(id: u32) -> CustomerAgent {
    CustomerAgent::new(
        AgentId(id),
        ZoneIdx(0),
        Point::new(1.0, 1.0),
        5,
        Tick(10),
        4,
        AgentRng::new(7, AgentId(id)),
    )
}

// ── LifecycleState ────────────────────────────────────────────────────────────

#[cfg(test)]
mod lifecycle {
    use super::*;
    use crate::LifecycleState::*;

    #[test]
    fn forward_chain_is_legal() {
        let mut s = Entering;
        for next in [Browsing, Fitting, Deciding, Purchasing, Exiting] {
            s.transition(next).unwrap();
            assert_eq!(s, next);
        }
    }

    #[test]
    fn browse_and_leave_is_legal() {
        let mut s = Deciding;
        s.transition(Exiting).unwrap();
        assert!(s.is_terminal());
    }

    #[test]
    fn staying_is_legal_except_when_terminal() {
        for s in LifecycleState::ALL {
            assert_eq!(s.can_transition_to(s), !s.is_terminal(), "{s}");
        }
    }

    #[test]
    fn illegal_request_leaves_state_unchanged() {
        let mut s = Browsing;
        let err = s.transition(Purchasing).unwrap_err();
        assert!(matches!(err, AgentError::IllegalStateTransition { from: Browsing, to: Purchasing }));
        assert_eq!(s, Browsing);

        let mut done = Exiting;
        assert!(done.transition(Entering).is_err());
        assert!(!Fitting.can_transition_to(Entering), "no going back");
    }

    #[test]
    fn display_is_snake_case() {
        assert_eq!(Purchasing.to_string(), "purchasing");
        assert_eq!(Entering.successor(), Some(Browsing));
        assert_eq!(Exiting.successor(), None);
    }
}

// ── LifecyclePolicy ───────────────────────────────────────────────────────────

#[cfg(test)]
mod policy {
    use super::*;
    use crate::LifecycleState::*;

    #[test]
    fn draw_below_probability_advances() {
        let p = LifecyclePolicy::default();
        // browsing = 0.5
        assert_eq!(p.next_state(Browsing, 0.49, 0.0), Fitting);
        assert_eq!(p.next_state(Browsing, 0.5, 0.0), Browsing);
        assert_eq!(p.next_state(Entering, 0.999, 0.0), Browsing);
    }

    #[test]
    fn deciding_branches_on_purchase_draw() {
        let p = LifecyclePolicy::default();
        // purchase_probability = 0.3
        assert_eq!(p.next_state(Deciding, 0.0, 0.1), Purchasing);
        assert_eq!(p.next_state(Deciding, 0.0, 0.3), Exiting);
    }

    #[test]
    fn exiting_never_moves() {
        let p = LifecyclePolicy::new(LifecycleConfig::always_advance()).unwrap();
        assert_eq!(p.next_state(Exiting, 0.0, 0.0), Exiting);
    }

    #[test]
    fn never_advance_loops_forever() {
        let p = LifecyclePolicy::new(LifecycleConfig::never_advance()).unwrap();
        let mut rng = AgentRng::new(1, AgentId(0));
        for s in LifecycleState::ALL {
            for _ in 0..100 {
                assert_eq!(p.advance(s, &mut rng), s);
            }
        }
    }

    #[test]
    fn every_advance_is_a_legal_transition() {
        let p = LifecyclePolicy::default();
        let mut rng = AgentRng::new(99, AgentId(3));
        for s in LifecycleState::ALL {
            for _ in 0..200 {
                let next = p.advance(s, &mut rng);
                assert!(next == s || s.can_transition_to(next), "{s} -> {next}");
            }
        }
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        let cfg = LifecycleConfig { browsing: 1.7, fitting: -0.2, ..LifecycleConfig::default() };
        let p = LifecyclePolicy::new(cfg).unwrap();
        assert_eq!(p.config().browsing, 1.0);
        assert_eq!(p.config().fitting, 0.0);
    }

    #[test]
    fn non_finite_values_are_rejected() {
        let cfg = LifecycleConfig { deciding: f64::NAN, ..LifecycleConfig::default() };
        assert!(matches!(LifecyclePolicy::new(cfg), Err(AgentError::Config(_))));
    }

    #[test]
    fn config_deserializes_with_defaults() {
        let cfg: LifecycleConfig = serde_json::from_str(r#"{"fitting": 0.9}"#).unwrap();
        assert_eq!(cfg.fitting, 0.9);
        assert_eq!(cfg.browsing, LifecycleConfig::default().browsing);
    }
}

// ── PathHistory ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod path {
    use super::*;

    #[test]
    fn bounded_and_oldest_dropped_first() {
        let mut h = PathHistory::new(3);
        for z in [0u16, 1, 2, 3] {
            h.record(ZoneIdx(z));
        }
        assert_eq!(h.to_vec(), vec![ZoneIdx(1), ZoneIdx(2), ZoneIdx(3)]);
    }

    #[test]
    fn repeated_zone_not_recorded() {
        let mut h = PathHistory::new(8);
        assert!(h.record(ZoneIdx(4)));
        assert!(!h.record(ZoneIdx(4)));
        assert!(h.record(ZoneIdx(5)));
        assert!(h.record(ZoneIdx(4)));
        assert_eq!(h.len(), 3);
    }

    #[test]
    fn zero_capacity_records_nothing() {
        let mut h = PathHistory::new(0);
        assert!(!h.record(ZoneIdx(1)));
        assert!(h.is_empty());
    }

    #[test]
    fn new_agent_starts_with_entry_zone() {
        let a = agent(0);
        assert_eq!(a.path.to_vec(), vec![ZoneIdx(0)]);
        assert_eq!(a.state, LifecycleState::Entering);
        assert_eq!(a.age(Tick(25)), 15);
    }
}

// ── AgentArena ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod arena {
    use super::*;

    fn filled(n: u32) -> AgentArena {
        let mut arena = AgentArena::new();
        for _ in 0..n {
            let id = arena.allocate_id();
            arena.push(agent(id.0));
        }
        arena
    }

    #[test]
    fn lookup_by_id() {
        let arena = filled(5);
        assert_eq!(arena.len(), 5);
        assert_eq!(arena.get(AgentId(3)).map(|a| a.id), Some(AgentId(3)));
        assert!(arena.get(AgentId(5)).is_none());
    }

    #[test]
    fn retain_preserves_id_order() {
        let mut arena = filled(6);
        let removed = arena.retain(|a| a.id.0 % 2 == 0);
        assert_eq!(removed, 3);
        let ids: Vec<u32> = arena.iter().map(|a| a.id.0).collect();
        assert_eq!(ids, vec![0, 2, 4]);
        assert!(arena.get(AgentId(4)).is_some());
        assert!(arena.get(AgentId(3)).is_none());
    }

    #[test]
    fn ids_never_reused_after_clear() {
        let mut arena = filled(3);
        arena.clear();
        assert!(arena.is_empty());
        assert_eq!(arena.allocate_id(), AgentId(3));
    }

    #[test]
    fn get_mut_edits_in_place() {
        let mut arena = filled(2);
        if let Some(a) = arena.get_mut(AgentId(1)) {
            a.ticks_remaining = 99;
        }
        assert_eq!(arena.get(AgentId(1)).map(|a| a.ticks_remaining), Some(99));
    }
}
