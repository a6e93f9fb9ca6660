//! Unit tests for epi-world.

use std::io::Cursor;

use epi_core::{
    AgentId, Day, DiseaseId, GeoPoint, GroupInfectionCounts, MixingGroupKind, PartnerNetwork,
    PlaceId, Places, Population,
};

use crate::{
    Closure, ContactNetwork, WorldBuilder, WorldError, load_partnerships_reader,
    load_world_readers,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

const D0: DiseaseId = DiseaseId(0);

/// Two households 1 km apart around (40.0, -80.0), one far away, a school.
fn small_world() -> WorldBuilder {
    let mut b = WorldBuilder::new();
    b.add_place("h0", MixingGroupKind::Household, Some(GeoPoint::new(40.0, -80.0)));
    b.add_place("h1", MixingGroupKind::Household, Some(GeoPoint::new(40.009, -80.0)));
    b.add_place("h2", MixingGroupKind::Household, Some(GeoPoint::new(41.0, -80.0)));
    b.add_place("s0", MixingGroupKind::School, None);
    b
}

// ── PopulationStore ───────────────────────────────────────────────────────────

#[cfg(test)]
mod population {
    use super::*;

    #[test]
    fn deaths_are_deferred_until_applied() {
        let mut b = small_world();
        let a = b.add_agent(70.0, &[PlaceId(0)]).unwrap();
        let other = b.add_agent(30.0, &[PlaceId(0)]).unwrap();
        let (mut people, _) = b.build();

        people.prepare_to_die(Day(3), a);
        people.prepare_to_die(Day(3), a);
        assert!(people.is_alive(a));
        assert_eq!(people.pending_deaths(), &[a]);

        assert_eq!(people.apply_deaths(Day(3)), vec![a]);
        assert!(!people.is_alive(a));
        assert_eq!(people.live_agents(), vec![other]);
        assert_eq!(people.population_size(), 1);
        assert_eq!(people.agent_count(), 2);
        assert!(people.apply_deaths(Day(4)).is_empty());
    }

    #[test]
    fn memberships_and_ages() {
        let mut b = small_world();
        let kid = b.add_agent(8.5, &[PlaceId(1), PlaceId(3)]).unwrap();
        let (people, _) = b.build();
        assert_eq!(people.age(kid), 8.5);
        assert_eq!(people.mixing_group(kid, MixingGroupKind::Household), Some(PlaceId(1)));
        assert_eq!(people.mixing_group(kid, MixingGroupKind::School), Some(PlaceId(3)));
        assert_eq!(people.mixing_group(kid, MixingGroupKind::Workplace), None);
        assert!(!people.is_alive(AgentId(99)));
    }
}

// ── WorldBuilder ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod builder {
    use super::*;

    #[test]
    fn unknown_place_is_rejected() {
        let mut b = small_world();
        assert!(matches!(b.add_agent(1.0, &[PlaceId(42)]), Err(WorldError::PlaceNotFound(_))));
        assert_eq!(b.agent_count(), 0);
    }

    #[test]
    fn same_kind_replaces_membership() {
        let mut b = small_world();
        let a = b.add_agent(30.0, &[PlaceId(0), PlaceId(1)]).unwrap();
        let (people, places) = b.build();
        assert_eq!(people.mixing_group(a, MixingGroupKind::Household), Some(PlaceId(1)));
        assert!(places.members(PlaceId(0)).is_empty());
        assert_eq!(places.members(PlaceId(1)), &[a]);
    }

    #[test]
    fn repeated_label_returns_existing_place() {
        let mut b = small_world();
        assert_eq!(b.add_place("h0", MixingGroupKind::School, None), PlaceId(0));
    }
}

// ── PlaceRegistry ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod places {
    use super::*;

    #[test]
    fn places_of_kind_in_id_order() {
        let (_, places) = small_world().build();
        assert_eq!(
            places.places_of_kind(MixingGroupKind::Household),
            &[PlaceId(0), PlaceId(1), PlaceId(2)]
        );
        assert_eq!(places.places_of_kind(MixingGroupKind::School), &[PlaceId(3)]);
        assert_eq!(places.label(PlaceId(3)), "s0");
    }

    #[test]
    fn radius_query_filters_by_distance() {
        let (_, places) = small_world().build();
        let center = GeoPoint::new(40.0, -80.0);
        assert_eq!(places.households_within(center, Some(0.5)), vec![PlaceId(0)]);
        assert_eq!(places.households_within(center, Some(2.0)), vec![PlaceId(0), PlaceId(1)]);
        assert_eq!(places.households_within(center, None).len(), 3);
    }

    #[test]
    fn presence_respects_closures_and_weekends() {
        let mut b = small_world();
        let kid = b.add_agent(8.0, &[PlaceId(0), PlaceId(3)]).unwrap();
        let (_, mut places) = b.build();

        assert!(places.is_present(Day(0), kid, PlaceId(3)));
        assert!(!places.is_present(Day(0), kid, PlaceId(1)));

        places.set_weekend_closures(true);
        assert!(!places.is_present(Day(5), kid, PlaceId(3)));
        assert!(places.is_present(Day(5), kid, PlaceId(0)));

        places.close(Closure { kind: MixingGroupKind::School, start: Day(7), end: Day(8) });
        assert!(!places.is_present(Day(8), kid, PlaceId(3)));
        assert!(places.is_present(Day(9), kid, PlaceId(3)));
    }

    #[test]
    fn presence_follows_enrollment_in_large_groups() {
        let mut b = small_world();
        let pupils: Vec<AgentId> = (0..500)
            .map(|i| b.add_agent(6.0 + (i % 12) as f64, &[PlaceId(i % 3), PlaceId(3)]).unwrap())
            .collect();
        let adult = b.add_agent(40.0, &[PlaceId(1)]).unwrap();
        let (_, places) = b.build();

        assert_eq!(places.members(PlaceId(3)).len(), 500);
        assert!(pupils.iter().all(|&p| places.is_present(Day(0), p, PlaceId(3))));
        assert!(!places.is_present(Day(0), adult, PlaceId(3)));
        assert!(places.is_present(Day(0), adult, PlaceId(1)));
        assert!(places.is_present(Day(0), pupils[1], PlaceId(1)));
        assert!(!places.is_present(Day(0), pupils[1], PlaceId(0)));
    }

    #[test]
    fn infectious_marker_is_per_disease() {
        let (_, mut places) = small_world().build();
        places.add_infectious_person(PlaceId(0), D0, AgentId(1));
        places.add_infectious_person(PlaceId(0), D0, AgentId(1));
        places.add_infectious_person(PlaceId(0), DiseaseId(1), AgentId(2));
        assert_eq!(places.infectious_people(PlaceId(0), D0), &[AgentId(1)]);

        places.clear_infectious_people(PlaceId(0), D0);
        assert!(places.infectious_people(PlaceId(0), D0).is_empty());
        assert_eq!(places.infectious_people(PlaceId(0), DiseaseId(1)), &[AgentId(2)]);
    }

    #[test]
    fn vectors_default_to_zero() {
        let (_, mut places) = small_world().build();
        assert_eq!(places.infectious_vectors(PlaceId(0), D0), 0);
        places.set_infectious_vectors(PlaceId(0), D0, 4);
        assert_eq!(places.infectious_vectors(PlaceId(0), D0), 4);
    }

    #[test]
    fn group_counters_reset_daily() {
        let (_, mut places) = small_world().build();
        let counts = GroupInfectionCounts { newly_infected: true, symptomatic: true, newly_symptomatic: false };
        places.record_infection_counts(Day(1), PlaceId(0), D0, counts);
        places.record_infection_counts(Day(1), PlaceId(0), D0, counts);
        places.record_case_fatality(Day(1), PlaceId(0), D0);

        let stats = places.group_stats(PlaceId(0), D0).unwrap();
        assert_eq!((stats.new_infections, stats.symptomatic, stats.case_fatalities), (2, 2, 1));

        places.record_infection_counts(Day(2), PlaceId(0), D0, GroupInfectionCounts::default());
        let stats = places.group_stats(PlaceId(0), D0).unwrap();
        assert_eq!(stats.new_infections, 0);
        assert_eq!(stats.total_infections, 2);
        assert_eq!(stats.total_case_fatalities, 1);
    }
}

// ── ContactNetwork ────────────────────────────────────────────────────────────

#[cfg(test)]
mod network {
    use super::*;

    #[test]
    fn partnerships_are_undirected_and_deduplicated() {
        let mut net = ContactNetwork::new(3);
        net.add_partnership(AgentId(0), AgentId(1));
        net.add_partnership(AgentId(1), AgentId(0));
        net.add_partnership(AgentId(2), AgentId(2));
        assert_eq!(net.partners(AgentId(1)), &[AgentId(0)]);
        assert_eq!(net.link_count(), 1);
        assert_eq!(net.degree(AgentId(2)), 0);
    }

    #[test]
    fn infectious_marker() {
        let mut net = ContactNetwork::new(2);
        net.add_infectious_person(D0, AgentId(1));
        assert_eq!(net.infectious_people(D0), &[AgentId(1)]);
        net.clear_infectious_people(D0);
        assert!(net.infectious_people(D0).is_empty());
    }
}

// ── Loader ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod loader {
    use super::*;

    const PLACES: &str = "label,kind,lat,lon\nh1,household,40.44,-79.99\nh2,household,40.45,-79.99\ns1,school,,\n";
    const PEOPLE_HEADER: &str = "age,household,neighborhood,school,classroom,workplace,office,hospital\n";

    #[test]
    fn loads_places_and_people() {
        let people = format!("{PEOPLE_HEADER}8,h1,,s1,,,,\n40,h2,,,,,,\n");
        let (people, places) = load_world_readers(Cursor::new(PLACES), Cursor::new(people)).unwrap();
        assert_eq!(people.len(), 2);
        assert_eq!(places.place_count(), 3);
        assert_eq!(people.mixing_group(AgentId(0), MixingGroupKind::School), Some(PlaceId(2)));
        assert_eq!(places.location(PlaceId(2)), None);
        assert_eq!(places.members(PlaceId(1)), &[AgentId(1)]);
    }

    #[test]
    fn unknown_label_fails() {
        let people = format!("{PEOPLE_HEADER}8,h9,,,,,,\n");
        let err = load_world_readers(Cursor::new(PLACES), Cursor::new(people)).unwrap_err();
        assert!(matches!(err, WorldError::UnknownPlaceLabel(l) if l == "h9"));
    }

    #[test]
    fn unknown_kind_fails() {
        let places = "label,kind,lat,lon\nx,castle,,\n";
        let result = load_world_readers(Cursor::new(places), Cursor::new(PEOPLE_HEADER));
        assert!(matches!(result, Err(WorldError::Parse(_))));
    }

    #[test]
    fn duplicate_label_fails() {
        let places = "label,kind,lat,lon\nh1,household,,\nh1,household,,\n";
        let result = load_world_readers(Cursor::new(places), Cursor::new(PEOPLE_HEADER));
        assert!(matches!(result, Err(WorldError::DuplicatePlaceLabel(_))));
    }

    #[test]
    fn partnerships() {
        let csv = "agent_a,agent_b\n0,1\n1,2\n";
        let net = load_partnerships_reader(Cursor::new(csv), 3).unwrap();
        assert_eq!(net.partners(AgentId(1)), &[AgentId(0), AgentId(2)]);
        assert!(load_partnerships_reader(Cursor::new("agent_a,agent_b\n0,5\n"), 3).is_err());
    }
}
