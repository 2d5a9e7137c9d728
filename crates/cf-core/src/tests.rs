//! Unit tests for cf-core primitives.

#[cfg(test)]
mod ids {
    use crate::{AgentId, ZoneIdx};

    #[test]
    fn index_roundtrip() {
        let id = AgentId(42);
        assert_eq!(id.index(), 42);
        assert_eq!(AgentId::try_from(42usize).unwrap(), id);
    }

    #[test]
    fn zone_idx_rejects_overflow() {
        assert!(ZoneIdx::try_from(70_000usize).is_err());
        assert_eq!(ZoneIdx::try_from(3usize).unwrap(), ZoneIdx(3));
    }

    #[test]
    fn invalid_sentinels_are_max() {
        assert_eq!(AgentId::INVALID.0, u32::MAX);
        assert_eq!(ZoneIdx::INVALID.0, u16::MAX);
        assert_eq!(ZoneIdx::default(), ZoneIdx::INVALID);
    }

    #[test]
    fn display() {
        assert_eq!(AgentId(7).to_string(), "agent#7");
        assert_eq!(ZoneIdx(2).to_string(), "zone#2");
    }
}

#[cfg(test)]
mod geo {
    use crate::Point;

    #[test]
    fn distance_is_euclidean() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(3.0, 4.0);
        assert!((a.distance(b) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn finiteness() {
        assert!(Point::new(1.0, 2.0).is_finite());
        assert!(!Point::new(f64::NAN, 2.0).is_finite());
        assert!(!Point::new(0.0, f64::INFINITY).is_finite());
    }
}

#[cfg(test)]
mod time {
    use crate::{SimClock, SimConfig, Tick};

    #[test]
    fn tick_arithmetic() {
        assert_eq!(Tick(5) + 3, Tick(8));
        assert_eq!(Tick(8) - Tick(5), 3);
        assert_eq!(Tick(2).since(Tick(9)), 0);
    }

    #[test]
    fn clock_advances_and_resets() {
        let mut clock = SimClock::new(60);
        clock.advance_by(61);
        assert_eq!(clock.current_tick, Tick(61));
        assert_eq!(clock.elapsed_secs(), 3_660);
        assert_eq!(clock.elapsed_hms(), (1, 1, 0));
        clock.reset();
        assert_eq!(clock.current_tick, Tick::ZERO);
    }

    #[test]
    fn default_config_is_valid() {
        assert!(SimConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_population_cap_rejected() {
        let config = SimConfig { max_population: 0, ..SimConfig::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_tick_duration_rejected() {
        let config = SimConfig { tick_duration_secs: 0, ..SimConfig::default() };
        assert!(config.validate().is_err());
    }
}

#[cfg(test)]
mod rng {
    use rand::Rng;

    use crate::{AgentId, AgentRng, SimRng};

    #[test]
    fn same_seed_same_sequence() {
        let mut a = AgentRng::new(42, AgentId(3));
        let mut b = AgentRng::new(42, AgentId(3));
        for _ in 0..100 {
            assert_eq!(a.random::<u64>(), b.random::<u64>());
        }
    }

    #[test]
    fn different_agents_diverge() {
        let mut a = AgentRng::new(42, AgentId(0));
        let mut b = AgentRng::new(42, AgentId(1));
        let xs: Vec<u64> = (0..8).map(|_| a.random()).collect();
        let ys: Vec<u64> = (0..8).map(|_| b.random()).collect();
        assert_ne!(xs, ys);
    }

    #[test]
    fn unit_draws_in_range() {
        let mut rng = AgentRng::new(7, AgentId(0));
        for _ in 0..1_000 {
            let d: f64 = rng.random();
            assert!((0.0..1.0).contains(&d));
        }
    }

    #[test]
    fn sim_rng_usable_through_rng_trait() {
        fn draw<R: Rng + ?Sized>(rng: &mut R) -> f64 {
            rng.gen_range(0.0..10.0)
        }
        let mut a = SimRng::new(1);
        let mut b = SimRng::new(1);
        assert_eq!(draw(&mut a), draw(&mut b));
    }

    #[test]
    fn population_seeds_differ_between_calls() {
        let mut rng = SimRng::new(99);
        assert_ne!(rng.population_seed(), rng.population_seed());
    }

    #[test]
    fn child_is_deterministic() {
        let mut a = SimRng::new(5);
        let mut b = SimRng::new(5);
        assert_eq!(a.child(1).random::<u64>(), b.child(1).random::<u64>());
    }
}
