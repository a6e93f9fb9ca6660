//! Unit tests for epi-core primitives.

#[cfg(test)]
mod ids {
    use crate::{AgentId, DiseaseId, PlaceId};

    #[test]
    fn index_roundtrip() {
        let id = AgentId(42);
        assert_eq!(id.index(), 42);
        assert_eq!(AgentId::try_from(42usize).unwrap(), id);
    }

    #[test]
    fn invalid_sentinels_are_max() {
        assert_eq!(AgentId::INVALID.0, u32::MAX);
        assert_eq!(PlaceId::INVALID.0, u32::MAX);
        assert_eq!(DiseaseId::INVALID.0, u16::MAX);
    }

    #[test]
    fn disease_id_rejects_overflow() {
        assert!(DiseaseId::try_from(70_000usize).is_err());
    }

    #[test]
    fn display() {
        assert_eq!(AgentId(7).to_string(), "AgentId(7)");
        assert_eq!(DiseaseId(1).to_string(), "DiseaseId(1)");
    }
}

#[cfg(test)]
mod time {
    use crate::{Day, SimClock, SimConfig};

    #[test]
    fn day_arithmetic() {
        let d = Day(10);
        assert_eq!(d + 5, Day(15));
        assert_eq!(d - 3, Day(7));
        assert_eq!(d.next(), Day(11));
        assert_eq!(Day(15) - Day(10), 5);
        assert_eq!(Day(2).since(Day(5)), -3);
    }

    #[test]
    fn negative_days_have_no_index() {
        assert_eq!(Day(-2).index(), None);
        assert_eq!(Day(0).index(), Some(0));
        assert_eq!(Day(9).index(), Some(9));
    }

    #[test]
    fn clock_advances_and_wraps_weekday() {
        let mut clock = SimClock::new();
        for _ in 0..9 {
            clock.advance();
        }
        assert_eq!(clock.current_day, Day(9));
        assert_eq!(clock.weekday(), 2);
    }

    #[test]
    fn config_end_day() {
        let cfg = SimConfig { total_days: 30, seed: 1 };
        assert_eq!(cfg.end_day(), Day(30));
        assert_eq!(cfg.make_clock().current_day, Day::ZERO);
    }
}

#[cfg(test)]
mod geo {
    use crate::GeoPoint;

    #[test]
    fn zero_distance() {
        let p = GeoPoint::new(40.44, -79.99);
        assert!(p.distance_km(p) < 1e-4);
    }

    #[test]
    fn one_degree_latitude_is_about_111_km() {
        let a = GeoPoint::new(40.0, -80.0);
        let b = GeoPoint::new(41.0, -80.0);
        let d = a.distance_km(b);
        assert!((d - 111.2).abs() < 0.5, "got {d}");
    }

    #[test]
    fn bbox_contains_radius() {
        let c = GeoPoint::new(40.0, -80.0);
        let (d_lat, d_lon) = c.bbox_half_degrees(10.0);
        assert!((d_lat - 0.0899).abs() < 1e-3, "got {d_lat}");
        // A point just inside the radius due north lies within the box.
        let north = GeoPoint::new(40.0 + 0.08, -80.0);
        assert!(c.distance_km(north) < 10.0);
        assert!((north.lat - c.lat).abs() <= d_lat);
        assert!(d_lon > d_lat, "longitude degrees shrink away from the equator");
    }
}

#[cfg(test)]
mod rng {
    use crate::{EpiRng, ScriptedRng, SimRng};

    #[test]
    fn sim_rng_is_deterministic() {
        let mut a = SimRng::new(7);
        let mut b = SimRng::new(7);
        for _ in 0..10 {
            assert_eq!(a.uniform(), b.uniform());
            assert_eq!(a.below(13), b.below(13));
        }
    }

    #[test]
    fn children_differ_by_offset() {
        let mut root = SimRng::new(7);
        let mut c0 = root.child(0);
        let mut root2 = SimRng::new(7);
        let mut c1 = root2.child(1);
        assert_ne!(c0.uniform(), c1.uniform());
    }

    #[test]
    fn below_stays_in_range() {
        let mut rng = SimRng::new(3);
        for _ in 0..1_000 {
            assert!(rng.below(5) < 5);
        }
    }

    #[test]
    fn scripted_replays_and_cycles() {
        let mut rng = ScriptedRng::new(vec![0.1, 0.9]);
        assert_eq!(rng.uniform(), 0.1);
        assert_eq!(rng.uniform(), 0.9);
        assert_eq!(rng.uniform(), 0.1);
        assert_eq!(rng.uniform_draws(), 3);
    }

    #[test]
    fn scripted_below_maps_to_floor() {
        let mut rng = ScriptedRng::new(vec![0.0, 0.5, 0.999]);
        assert_eq!(rng.below(4), 0);
        assert_eq!(rng.below(4), 2);
        assert_eq!(rng.below(4), 3);
    }

    #[test]
    fn gen_bool_extremes_consume_nothing() {
        let mut rng = ScriptedRng::new(vec![0.5]);
        assert!(rng.gen_bool(1.0));
        assert!(!rng.gen_bool(0.0));
        assert_eq!(rng.uniform_draws(), 0);
    }

    #[test]
    fn lognormal_with_zero_normal_is_median() {
        let mut rng = ScriptedRng::default().with_normals(vec![0.0]);
        let median: f64 = 4.0;
        let x = rng.lognormal(median.ln(), 0.3);
        assert!((x - 4.0).abs() < 1e-9);
    }
}

#[cfg(test)]
mod world {
    use crate::MixingGroupKind;

    #[test]
    fn spread_order_is_fixed() {
        let names: Vec<_> = MixingGroupKind::ALL.iter().map(|k| k.as_str()).collect();
        assert_eq!(
            names,
            ["household", "neighborhood", "school", "classroom", "workplace", "office", "hospital"]
        );
        assert_eq!(MixingGroupKind::School.index(), 2);
    }

    #[test]
    fn parse_kind() {
        assert_eq!("workplace".parse::<MixingGroupKind>().unwrap(), MixingGroupKind::Workplace);
        assert!("mall".parse::<MixingGroupKind>().is_err());
    }

    #[test]
    fn vector_hosts() {
        assert!(MixingGroupKind::Household.hosts_vectors());
        assert!(!MixingGroupKind::Neighborhood.hosts_vectors());
    }
}
