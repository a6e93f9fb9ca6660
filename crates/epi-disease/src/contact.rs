//! Contact-based transmission.
//!
//! # Models
//!
//! | Site                       | Model                                                      |
//! |----------------------------|------------------------------------------------------------|
//! | household                  | pairwise: every present susceptible member is tried once   |
//! | other places               | contact count drawn from the rate, targets with replacement|
//! | any place, vector mode     | each present susceptible is bitten with `1 - (1 - β)^v`    |
//! | partner network            | every partner link is tried once                           |
//!
//! `β` is the disease transmissibility, `v` the number of infectious
//! vectors at the place.  Infector infectivity comes from its open record,
//! so ramps and multipliers apply.

use log::trace;
use rustc_hash::FxHashSet;

use epi_core::{AgentId, Day, DiseaseId, EpiRng, MixingGroupKind, PlaceId};

use crate::{Disease, Exposure, SpreadContext, SpreadSite, Transmission, TransmissionMode};

/// Transmission by contact rates per mixing-group kind.
#[derive(Clone, Debug, PartialEq)]
pub struct ContactTransmission {
    /// Household entry is a per-pair contact probability; the others are
    /// contacts per infector per day.
    contact_rates:    [f64; MixingGroupKind::ALL.len()],
    partner_contacts: f64,
}

impl ContactTransmission {
    /// `contacts_per_day` at every non-household place, household pairs
    /// always in contact, one contact per partner link per day.
    pub fn new(contacts_per_day: f64) -> Self {
        let mut contact_rates = [contacts_per_day; MixingGroupKind::ALL.len()];
        contact_rates[MixingGroupKind::Household.index()] = 1.0;
        Self { contact_rates, partner_contacts: 1.0 }
    }

    pub fn with_contact_rate(mut self, kind: MixingGroupKind, rate: f64) -> Self {
        self.contact_rates[kind.index()] = rate;
        self
    }

    pub fn with_partner_contacts(mut self, contacts_per_link: f64) -> Self {
        self.partner_contacts = contacts_per_link;
        self
    }

    pub fn contact_rate(&self, kind: MixingGroupKind) -> f64 {
        self.contact_rates[kind.index()]
    }

    fn place_spread(
        &self,
        day: Day,
        disease: &Disease,
        place: PlaceId,
        ctx: &SpreadContext<'_>,
        rng: &mut dyn EpiRng,
    ) -> Vec<Exposure> {
        let d = disease.id();
        let members = ctx.places.members(place);
        let site = SpreadSite::Place(place);
        let eligible = |agent: AgentId| can_be_infected(ctx, d, agent, day, place);
        let mut proposals = Proposals::default();

        if disease.mode() == TransmissionMode::Vector {
            let vectors = ctx.places.infectious_vectors(place, d);
            if vectors > 0 {
                let beta = disease.transmissibility().clamp(0.0, 1.0);
                let p = 1.0 - (1.0 - beta).powi(vectors as i32);
                for &member in members.iter().filter(|&&m| eligible(m)) {
                    proposals.attempt(member, None, site, p, rng);
                }
            }
            return proposals.out;
        }

        let kind = ctx.places.kind(place);
        let rate = self.contact_rate(kind);
        for &infector in ctx.places.infectious_people(place, d) {
            let infectivity = infectivity_of(ctx, d, infector, day);
            if infectivity <= 0.0 {
                continue;
            }

            if kind == MixingGroupKind::Household {
                let p = rate * disease.transmissibility() * infectivity;
                for &member in members.iter().filter(|&&m| m != infector && eligible(m)) {
                    proposals.attempt(member, Some(infector), site, p, rng);
                }
                continue;
            }

            if members.len() < 2 {
                continue;
            }
            let expected = rate * disease.transmissibility() * infectivity;
            let mut contacts = expected.floor() as usize;
            if rng.gen_bool(expected.fract()) {
                contacts += 1;
            }
            for _ in 0..contacts {
                let target = members[rng.below(members.len())];
                if target != infector && eligible(target) {
                    proposals.attempt(target, Some(infector), site, 1.0, rng);
                }
            }
        }
        proposals.out
    }

    fn network_spread(
        &self,
        day: Day,
        disease: &Disease,
        ctx: &SpreadContext<'_>,
        rng: &mut dyn EpiRng,
    ) -> Vec<Exposure> {
        let Some(network) = ctx.network else { return vec![] };
        let d = disease.id();
        let mut proposals = Proposals::default();

        for &infector in network.infectious_people(d) {
            let p = self.partner_contacts * disease.transmissibility() * infectivity_of(ctx, d, infector, day);
            for &partner in network.partners(infector) {
                if ctx.health.is_susceptible(partner, d) && ctx.population.is_alive(partner) {
                    proposals.attempt(partner, Some(infector), SpreadSite::Network, p, rng);
                }
            }
        }
        proposals.out
    }
}

impl Transmission for ContactTransmission {
    fn spread_infection(
        &self,
        day:     Day,
        disease: &Disease,
        site:    SpreadSite,
        ctx:     &SpreadContext<'_>,
        rng:     &mut dyn EpiRng,
    ) -> Vec<Exposure> {
        if !disease.is_communicable() {
            return vec![];
        }
        let exposures = match site {
            SpreadSite::Place(place) => self.place_spread(day, disease, place, ctx, rng),
            SpreadSite::Network => self.network_spread(day, disease, ctx, rng),
        };
        if !exposures.is_empty() {
            trace!("{} on {day}: {} exposures at {site:?}", disease.name(), exposures.len());
        }
        exposures
    }
}

/// Exposures proposed by one spread call; each infectee at most once.
#[derive(Default)]
struct Proposals {
    seen: FxHashSet<AgentId>,
    out:  Vec<Exposure>,
}

impl Proposals {
    fn attempt(
        &mut self,
        infectee: AgentId,
        infector: Option<AgentId>,
        site: SpreadSite,
        p: f64,
        rng: &mut dyn EpiRng,
    ) {
        if self.seen.contains(&infectee) {
            return;
        }
        if rng.gen_bool(p) {
            self.seen.insert(infectee);
            self.out.push(Exposure { infectee, infector, site });
        }
    }
}

fn infectivity_of(ctx: &SpreadContext<'_>, disease: DiseaseId, agent: AgentId, day: Day) -> f64 {
    if !ctx.health.is_infectious(agent, disease) {
        return 0.0;
    }
    ctx.health
        .infection(agent, disease)
        .map_or(0.0, |record| record.infectivity(day))
}

fn can_be_infected(ctx: &SpreadContext<'_>, disease: DiseaseId, agent: AgentId, day: Day, place: PlaceId) -> bool {
    ctx.health.is_susceptible(agent, disease)
        && ctx.population.is_alive(agent)
        && ctx.places.is_present(day, agent, place)
}
