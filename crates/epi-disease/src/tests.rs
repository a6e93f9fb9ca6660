//! Unit tests for epi-disease.

use epi_core::{
    AgentId, Day, DiseaseId, GeoPoint, MixingGroupKind, PartnerNetwork, PlaceId, Places,
    Population, ScriptedRng,
};
use epi_health::{FixedNaturalHistory, HealthTable, InfectionRecord, Trajectory};

use crate::{
    ContactTransmission, Disease, Exposure, MarkovChain, MarkovState, NoTransmission,
    SpreadContext, SpreadSite, Transmission, TransmissionMode,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

const D0: DiseaseId = DiseaseId(0);
const P0: PlaceId = PlaceId(0);

/// One place holding every agent, everyone present, plus a partner list.
struct FakeWorld {
    kind:       MixingGroupKind,
    members:    Vec<AgentId>,
    places:     Vec<PlaceId>,
    infectious: Vec<AgentId>,
    vectors:    u32,
    partners:   Vec<Vec<AgentId>>,
}

impl FakeWorld {
    fn new(kind: MixingGroupKind, n: u32) -> Self {
        Self {
            kind,
            members:    (0..n).map(AgentId).collect(),
            places:     vec![P0],
            infectious: Vec::new(),
            vectors:    0,
            partners:   vec![Vec::new(); n as usize],
        }
    }
}

impl Population for FakeWorld {
    fn agent_count(&self) -> usize {
        self.members.len()
    }
    fn is_alive(&self, _agent: AgentId) -> bool {
        true
    }
    fn age(&self, _agent: AgentId) -> f64 {
        30.0
    }
    fn mixing_group(&self, _agent: AgentId, kind: MixingGroupKind) -> Option<PlaceId> {
        (kind == self.kind).then_some(P0)
    }
    fn prepare_to_die(&mut self, _day: Day, _agent: AgentId) {}
    fn apply_deaths(&mut self, _day: Day) -> Vec<AgentId> {
        vec![]
    }
}

impl Places for FakeWorld {
    fn place_count(&self) -> usize {
        1
    }
    fn kind(&self, _place: PlaceId) -> MixingGroupKind {
        self.kind
    }
    fn members(&self, _place: PlaceId) -> &[AgentId] {
        &self.members
    }
    fn location(&self, _place: PlaceId) -> Option<GeoPoint> {
        None
    }
    fn places_of_kind(&self, kind: MixingGroupKind) -> &[PlaceId] {
        if kind == self.kind { &self.places } else { &[] }
    }
    fn households_within(&self, _center: GeoPoint, _radius_km: Option<f64>) -> Vec<PlaceId> {
        self.places.clone()
    }
    fn is_present(&self, _day: Day, _agent: AgentId, _place: PlaceId) -> bool {
        true
    }
    fn add_infectious_person(&mut self, _place: PlaceId, _disease: DiseaseId, agent: AgentId) {
        self.infectious.push(agent);
    }
    fn clear_infectious_people(&mut self, _place: PlaceId, _disease: DiseaseId) {
        self.infectious.clear();
    }
    fn infectious_people(&self, _place: PlaceId, _disease: DiseaseId) -> &[AgentId] {
        &self.infectious
    }
    fn infectious_vectors(&self, _place: PlaceId, _disease: DiseaseId) -> u32 {
        self.vectors
    }
}

impl PartnerNetwork for FakeWorld {
    fn add_infectious_person(&mut self, _disease: DiseaseId, agent: AgentId) {
        self.infectious.push(agent);
    }
    fn clear_infectious_people(&mut self, _disease: DiseaseId) {
        self.infectious.clear();
    }
    fn infectious_people(&self, _disease: DiseaseId) -> &[AgentId] {
        &self.infectious
    }
    fn partners(&self, agent: AgentId) -> &[AgentId] {
        &self.partners[agent.index()]
    }
}

/// Exposed day 0, infectious days 0..10.
fn infectious_record() -> InfectionRecord {
    let t = Trajectory {
        infectious_start: Some(Day(0)),
        infectious_end: Some(Day(10)),
        ..Trajectory::open_ended(Day(0))
    };
    InfectionRecord::new(t, None, None)
}

/// Health table with `infector` exposed and infectious.
fn table_with_infector(n: usize, infector: AgentId) -> HealthTable {
    let mut table = HealthTable::new(n, 1);
    table.become_exposed(infector, D0, Day(0), infectious_record()).unwrap();
    table.become_infectious(infector, D0, Day(0)).unwrap();
    table
}

fn disease(beta: f64) -> Disease {
    Disease::new(D0, "test", FixedNaturalHistory::new(0, 10)).with_transmissibility(beta)
}

fn infectees(exposures: &[Exposure]) -> Vec<AgentId> {
    exposures.iter().map(|e| e.infectee).collect()
}

// ── Disease ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod disease {
    use super::*;

    #[test]
    fn defaults() {
        let d = disease(0.0);
        assert_eq!(d.mode(), TransmissionMode::Respiratory);
        assert!(!d.is_communicable());
        assert_eq!(d.name(), "test");
    }

    #[test]
    fn mode_parses() {
        assert_eq!("Vector".parse::<TransmissionMode>().unwrap(), TransmissionMode::Vector);
        assert_eq!(" sexual ".parse::<TransmissionMode>().unwrap(), TransmissionMode::Sexual);
        assert!("airborne".parse::<TransmissionMode>().is_err());
    }

    #[test]
    fn default_transmission_never_spreads() {
        let mut world = FakeWorld::new(MixingGroupKind::Household, 3);
        Places::add_infectious_person(&mut world, P0, D0, AgentId(0));
        let table = table_with_infector(3, AgentId(0));
        let ctx = SpreadContext::new(&table, &world, &world, None);
        let d = disease(1.0);
        let out = NoTransmission.spread_infection(Day(1), &d, SpreadSite::Place(P0), &ctx, &mut ScriptedRng::default());
        assert!(out.is_empty());
        assert!(d.transmission().spread_infection(Day(1), &d, SpreadSite::Place(P0), &ctx, &mut ScriptedRng::default()).is_empty());
    }
}

// ── ContactTransmission ───────────────────────────────────────────────────────

#[cfg(test)]
mod contact {
    use super::*;

    #[test]
    fn household_tries_every_member() {
        let mut world = FakeWorld::new(MixingGroupKind::Household, 4);
        Places::add_infectious_person(&mut world, P0, D0, AgentId(1));
        let table = table_with_infector(4, AgentId(1));
        let ctx = SpreadContext::new(&table, &world, &world, None);

        let out = ContactTransmission::new(5.0).spread_infection(
            Day(1),
            &disease(1.0),
            SpreadSite::Place(P0),
            &ctx,
            &mut ScriptedRng::default(),
        );
        assert_eq!(infectees(&out), vec![AgentId(0), AgentId(2), AgentId(3)]);
        assert!(out.iter().all(|e| e.infector == Some(AgentId(1)) && e.site == SpreadSite::Place(P0)));
    }

    #[test]
    fn zero_transmissibility_spreads_nothing() {
        let mut world = FakeWorld::new(MixingGroupKind::Household, 4);
        Places::add_infectious_person(&mut world, P0, D0, AgentId(1));
        let table = table_with_infector(4, AgentId(1));
        let ctx = SpreadContext::new(&table, &world, &world, None);
        let out = ContactTransmission::new(5.0).spread_infection(
            Day(1),
            &disease(0.0),
            SpreadSite::Place(P0),
            &ctx,
            &mut ScriptedRng::default(),
        );
        assert!(out.is_empty());
    }

    #[test]
    fn listed_but_not_infectious_agent_spreads_nothing() {
        let mut world = FakeWorld::new(MixingGroupKind::Household, 3);
        Places::add_infectious_person(&mut world, P0, D0, AgentId(0));
        let table = HealthTable::new(3, 1);
        let ctx = SpreadContext::new(&table, &world, &world, None);
        let out = ContactTransmission::new(1.0).spread_infection(
            Day(1),
            &disease(1.0),
            SpreadSite::Place(P0),
            &ctx,
            &mut ScriptedRng::default(),
        );
        assert!(out.is_empty());
    }

    #[test]
    fn contact_count_follows_rate() {
        let mut world = FakeWorld::new(MixingGroupKind::Workplace, 4);
        Places::add_infectious_person(&mut world, P0, D0, AgentId(0));
        let table = table_with_infector(4, AgentId(0));
        let ctx = SpreadContext::new(&table, &world, &world, None);

        // Two contacts; targets floor(0.3 * 4) = 1 and floor(0.6 * 4) = 2.
        let mut rng = ScriptedRng::new(vec![0.3, 0.6]);
        let out = ContactTransmission::new(2.0).spread_infection(
            Day(1),
            &disease(1.0),
            SpreadSite::Place(P0),
            &ctx,
            &mut rng,
        );
        assert_eq!(infectees(&out), vec![AgentId(1), AgentId(2)]);
    }

    #[test]
    fn repeated_target_is_proposed_once() {
        let mut world = FakeWorld::new(MixingGroupKind::School, 4);
        Places::add_infectious_person(&mut world, P0, D0, AgentId(0));
        let table = table_with_infector(4, AgentId(0));
        let ctx = SpreadContext::new(&table, &world, &world, None);
        let out = ContactTransmission::new(3.0).spread_infection(
            Day(1),
            &disease(1.0),
            SpreadSite::Place(P0),
            &ctx,
            &mut ScriptedRng::constant(0.3),
        );
        assert_eq!(infectees(&out), vec![AgentId(1)]);
    }

    #[test]
    fn vectors_bite_present_susceptibles() {
        let mut world = FakeWorld::new(MixingGroupKind::Household, 4);
        world.vectors = 2;
        let table = HealthTable::new(4, 1);
        let ctx = SpreadContext::new(&table, &world, &world, None);
        let d = disease(0.5).with_mode(TransmissionMode::Vector);

        // p = 1 - 0.5^2 = 0.75
        let mut rng = ScriptedRng::new(vec![0.7, 0.8]);
        let out = ContactTransmission::new(1.0).spread_infection(Day(1), &d, SpreadSite::Place(P0), &ctx, &mut rng);
        assert_eq!(infectees(&out), vec![AgentId(0), AgentId(2)]);
        assert!(out.iter().all(|e| e.infector.is_none()));
    }

    #[test]
    fn network_tries_each_susceptible_partner() {
        let mut world = FakeWorld::new(MixingGroupKind::Household, 3);
        world.partners[0] = vec![AgentId(1), AgentId(2)];
        PartnerNetwork::add_infectious_person(&mut world, D0, AgentId(0));
        let mut table = table_with_infector(3, AgentId(0));
        table.become_exposed(AgentId(2), D0, Day(0), infectious_record()).unwrap();
        let ctx = SpreadContext::new(&table, &world, &world, Some(&world));

        let out = ContactTransmission::new(1.0).spread_infection(
            Day(1),
            &disease(1.0),
            SpreadSite::Network,
            &ctx,
            &mut ScriptedRng::default(),
        );
        assert_eq!(
            out,
            vec![Exposure { infectee: AgentId(1), infector: Some(AgentId(0)), site: SpreadSite::Network }]
        );
    }

    #[test]
    fn network_spread_without_network_is_empty() {
        let world = FakeWorld::new(MixingGroupKind::Household, 2);
        let table = table_with_infector(2, AgentId(0));
        let ctx = SpreadContext::new(&table, &world, &world, None);
        let out = ContactTransmission::new(1.0).spread_infection(
            Day(1),
            &disease(1.0),
            SpreadSite::Network,
            &ctx,
            &mut ScriptedRng::default(),
        );
        assert!(out.is_empty());
    }
}

// ── MarkovChain ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod markov {
    use super::*;

    fn sir() -> MarkovChain {
        MarkovChain::new(vec![
            MarkovState::new("healthy"),
            MarkovState::new("sick").infectious(1.0).symptomatic(1.0),
            MarkovState::new("dead").fatal(),
        ])
        .with_rate(1, 0, 1.0)
        .with_rate(1, 2, 1.0)
        .with_initial_percent(1, 10.0)
        .with_initial_percent(2, 20.0)
    }

    #[test]
    fn initial_state_by_percent() {
        let chain = sir();
        assert_eq!(chain.initial_state(&mut ScriptedRng::constant(0.1)), 0);
        assert_eq!(chain.initial_state(&mut ScriptedRng::constant(0.75)), 1);
        assert_eq!(chain.initial_state(&mut ScriptedRng::constant(0.95)), 2);
    }

    #[test]
    fn earliest_competing_transition_wins() {
        let chain = sir();
        // Exp(1) at u = 0.5 is ln 2 ≈ 0.69 → 1 day; at u = 0.9 it is ≈ 2.3 → 2 days.
        let mut rng = ScriptedRng::new(vec![0.5, 0.9]);
        assert_eq!(chain.next_transition(Day(10), 1, &mut rng), Some((0, Day(12))));
    }

    #[test]
    fn absorbing_state_has_no_transition() {
        let chain = sir();
        assert_eq!(chain.next_transition(Day(0), 2, &mut ScriptedRng::default()), None);
        assert_eq!(chain.next_transition(Day(0), 0, &mut ScriptedRng::default()), None);
    }

    #[test]
    fn state_levels() {
        let chain = sir();
        assert_eq!(chain.state_count(), 3);
        assert_eq!(chain.state_name(1), "sick");
        assert_eq!(chain.infectivity(1), 1.0);
        assert_eq!(chain.symptoms(0), 0.0);
        assert!(chain.is_fatal_state(2));
        assert!(!chain.is_fatal_state(7));
    }

    #[test]
    fn validation() {
        assert!(sir().validate().is_ok());
        assert!(MarkovChain::new(vec![]).validate().is_err());
        let over = sir().with_initial_percent(1, 90.0);
        assert!(over.validate().is_err());
        let negative = sir().with_rate(0, 1, -1.0);
        assert!(negative.validate().is_err());
    }
}
