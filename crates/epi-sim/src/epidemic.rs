//! The per-disease daily driver.
//!
//! # Daily pipeline
//!
//! ```text
//! update(day):
//!   ①  import exogenous cases                      (standard model)
//!   ①b drain the chain-state queues                (Markov model)
//!   ②  infectious start  → schedule end, E → potentially infectious
//!   ③  infectious end    → recover if symptoms are over too
//!   ④  symptoms start    → schedule end, count symptomatic
//!   ⑤  symptoms end      → recover if infectiousness is over too
//!   ⑥  immunity start    → susceptible → immune
//!   ⑦  immunity end      → immune/recovered → susceptible
//!   ⑧  advance every open infection one day (case fatality)
//!   ⑨  recompute the actually-infectious subset
//!   ⑩  sexual mode: spread once over the partner network
//!   ⑪  otherwise: spread once per active mixing group, by kind
//! ```
//!
//! # Time warp
//!
//! Every event date computed while processing day `d` is forced to at least
//! `d + 1`, and the effective date is written back into the infection
//! record.  Queues are therefore never asked to schedule into a day they
//! have already drained.
//!
//! # Compartments
//!
//! Every agent of the tracked population sits in exactly one of
//! susceptible, exposed, potentially infectious (infectious today or
//! convalescent), removed, or immune.  `exposed` and `removed` are tallied
//! incrementally; susceptible agents are counted from the health table at
//! report time.

use std::collections::BTreeSet;

use log::{debug, info, trace};
use rustc_hash::{FxHashMap, FxHashSet};

use epi_core::{
    AgentId, Day, DiseaseId, EpiResult, EpiRng, GroupInfectionCounts, MixingGroupKind,
    PartnerNetwork, PlaceId, Places, Population,
};
use epi_disease::{Disease, Exposure, SpreadContext, SpreadSite, TransmissionMode};
use epi_health::{HealthTable, HostAttributes, InfectionRecord, NaturalHistory, Trajectory};
use epi_schedule::{EventKind, EventQueues, ImportSchedule};

use crate::cohort::CohortTracker;
use crate::counters::{DailyCounts, Tallies};
use crate::model::{EpidemicModel, MarkovRun};
use crate::{EpidemicConfig, InfectionEvent, SimObserver};

// ── WorldMut ──────────────────────────────────────────────────────────────────

/// Mutable borrows of everything one disease update touches.
///
/// The `Sim` builds one per disease per day; tests build them directly.
pub struct WorldMut<'a> {
    pub health:     &'a mut HealthTable,
    pub population: &'a mut dyn Population,
    pub places:     &'a mut dyn Places,
    pub network:    Option<&'a mut dyn PartnerNetwork>,
}

/// Scheduled vaccination-style immunity of one agent.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct ImmunityWindow {
    start: Day,
    end:   Option<Day>,
}

// ── Epidemic ──────────────────────────────────────────────────────────────────

/// One disease's epidemic: its queues, working sets, and counters.
///
/// Create with [`Epidemic::new`], call [`prepare`](Self::prepare) once, then
/// [`update`](Self::update) once per day in increasing day order.
pub struct Epidemic {
    disease:                Disease,
    config:                 EpidemicConfig,
    imports:                ImportSchedule,
    pub(crate) markov:      Option<MarkovRun>,
    queues:                 EventQueues,
    cohorts:                CohortTracker,
    pub(crate) tallies:     Tallies,
    /// Agents with an open infection.
    infected:               BTreeSet<AgentId>,
    /// Past infectious onset and not yet removed.
    potentially_infectious: BTreeSet<AgentId>,
    actually_infectious:    Vec<AgentId>,
    pending_immunity:       FxHashMap<AgentId, ImmunityWindow>,
    /// Agents already moved to removed by a death or termination.
    terminated:             FxHashSet<AgentId>,
    population:             usize,
}

impl Epidemic {
    pub fn new(disease: Disease, config: EpidemicConfig) -> Self {
        Self {
            disease,
            config,
            imports:                ImportSchedule::default(),
            markov:                 None,
            queues:                 EventQueues::new(),
            cohorts:                CohortTracker::new(),
            tallies:                Tallies::default(),
            infected:               BTreeSet::new(),
            potentially_infectious: BTreeSet::new(),
            actually_infectious:    Vec::new(),
            pending_immunity:       FxHashMap::default(),
            terminated:             FxHashSet::default(),
            population:             0,
        }
    }

    pub fn with_model(mut self, model: EpidemicModel) -> Self {
        self.markov = match model {
            EpidemicModel::Standard => None,
            EpidemicModel::Markov(chain) => Some(MarkovRun::new(chain)),
        };
        self
    }

    /// Keep the windows of `imports` that concern this disease.
    pub fn with_imports(mut self, imports: &ImportSchedule) -> Self {
        self.imports = imports.for_disease(self.disease.id());
        self
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    #[inline]
    pub fn id(&self) -> DiseaseId {
        self.disease.id()
    }

    pub fn disease(&self) -> &Disease {
        &self.disease
    }

    pub fn config(&self) -> &EpidemicConfig {
        &self.config
    }

    pub fn imports(&self) -> &ImportSchedule {
        &self.imports
    }

    pub fn queues(&self) -> &EventQueues {
        &self.queues
    }

    pub fn cohorts(&self) -> &CohortTracker {
        &self.cohorts
    }

    pub fn is_markov(&self) -> bool {
        self.markov.is_some()
    }

    /// Chain state of `agent` (Markov model only).
    pub fn markov_state(&self, agent: AgentId) -> Option<usize> {
        self.markov.as_ref().and_then(|m| m.state_of(agent))
    }

    /// Agents currently in chain `state` (Markov model only).
    pub fn markov_count(&self, state: usize) -> usize {
        self.markov.as_ref().map_or(0, |m| m.count(state))
    }

    /// Agents with an open infection, ascending.
    pub fn infected(&self) -> impl Iterator<Item = AgentId> + '_ {
        self.infected.iter().copied()
    }

    /// Infectious agents as of the last recompute (step ⑨).
    pub fn actually_infectious(&self) -> &[AgentId] {
        &self.actually_infectious
    }

    pub fn is_potentially_infectious(&self, agent: AgentId) -> bool {
        self.potentially_infectious.contains(&agent)
    }

    // ── Lifecycle ─────────────────────────────────────────────────────────

    /// Capture the tracked population and, for Markov epidemics, draw every
    /// live agent's initial state.  Call once before the first update.
    pub fn prepare(
        &mut self,
        start: Day,
        world: &mut WorldMut<'_>,
        rng: &mut dyn EpiRng,
        observer: &mut dyn SimObserver,
    ) -> EpiResult<()> {
        let d = self.id();
        self.population = world.population.population_size();
        self.tallies.immune = world.health.count_immune(d);

        if let Some(markov) = &self.markov {
            markov.chain.validate()?;
        }
        for agent in world.population.live_agents() {
            let Some(state) = self.markov.as_ref().map(|m| m.chain.initial_state(rng)) else { break };
            self.transition_person(agent, start, state, world, rng, observer)?;
        }

        info!(
            "{}: prepared {} model for {} agents ({} immune)",
            self.disease.name(),
            if self.is_markov() { "markov" } else { "standard" },
            self.population,
            self.tallies.immune
        );
        Ok(())
    }

    /// Run the daily pipeline for `day` and return that day's counts.
    pub fn update(
        &mut self,
        day: Day,
        world: &mut WorldMut<'_>,
        rng: &mut dyn EpiRng,
        observer: &mut dyn SimObserver,
    ) -> EpiResult<DailyCounts> {
        let d = self.id();

        // ── ① Import / chain transitions ───────────────────────────────────
        self.import_infections(day, world, rng, observer)?;
        self.markov_updates(day, world, rng, observer)?;

        // ── ② Infectious start ─────────────────────────────────────────────
        for agent in self.queues.drain(EventKind::InfectiousStart, day)? {
            world.health.become_infectious(agent, d, day)?;
            if let Some(record) = world.health.infection_mut(agent, d) {
                if let Some(end) = record.infectious_end() {
                    let end = time_warp(day, end, agent, EventKind::InfectiousEnd);
                    record.set_infectious_end(end);
                    self.queues.add(EventKind::InfectiousEnd, end, agent)?;
                }
            }
            self.enter_potentially_infectious(agent);
            trace!("{agent} infectious on {day}");
        }

        // ── ③ Infectious end ───────────────────────────────────────────────
        for agent in self.queues.drain(EventKind::InfectiousEnd, day)? {
            world.health.become_noninfectious(agent, d, day)?;
            if world.health.infection(agent, d).is_some_and(InfectionRecord::is_complete) {
                self.recover(agent, day, world)?;
            }
        }

        // ── ④ Symptoms start ───────────────────────────────────────────────
        for agent in self.queues.drain(EventKind::SymptomsStart, day)? {
            world.health.become_symptomatic(agent, d, day)?;
            self.tallies.symptomatic += 1;
            self.tallies.new_symptomatic += 1;
            self.tallies.total_symptomatic += 1;
            if let Some(record) = world.health.infection_mut(agent, d) {
                if let Some(end) = record.symptoms_end() {
                    let end = time_warp(day, end, agent, EventKind::SymptomsEnd);
                    record.set_symptoms_end(end);
                    self.queues.add(EventKind::SymptomsEnd, end, agent)?;
                }
            }
        }

        // ── ⑤ Symptoms end ─────────────────────────────────────────────────
        for agent in self.queues.drain(EventKind::SymptomsEnd, day)? {
            world.health.resolve_symptoms(agent, d, day)?;
            self.tallies.symptomatic = self.tallies.symptomatic.saturating_sub(1);
            if world.health.infection(agent, d).is_some_and(InfectionRecord::is_complete) {
                self.recover(agent, day, world)?;
            }
        }

        // ── ⑥ Immunity start ───────────────────────────────────────────────
        for agent in self.queues.drain(EventKind::ImmunityStart, day)? {
            let window = self.pending_immunity.remove(&agent);
            if !world.health.become_immune(agent, d) {
                continue;
            }
            self.tallies.immune += 1;
            if let Some(end) = window.and_then(|w| w.end) {
                let end = time_warp(day, end, agent, EventKind::ImmunityEnd);
                world.health.set_immunity_end(agent, d, Some(end));
                self.queues.add(EventKind::ImmunityEnd, end, agent)?;
            }
        }

        // ── ⑦ Immunity end ─────────────────────────────────────────────────
        for agent in self.queues.drain(EventKind::ImmunityEnd, day)? {
            if world.health.has_infection(agent, d) || world.health.is_case_fatality(agent, d) {
                continue;
            }
            if world.health.is_immune(agent, d) {
                self.tallies.immune = self.tallies.immune.saturating_sub(1);
            } else if world.health.is_recovered(agent, d) {
                self.tallies.removed = self.tallies.removed.saturating_sub(1);
            } else {
                continue;
            }
            world.health.become_susceptible(agent, d);
            trace!("{agent} susceptible again on {day}");
        }

        // ── ⑧ Advance open infections ─────────────────────────────────────
        self.advance_infections(day, world, rng)?;

        // ── ⑨ Actually infectious ─────────────────────────────────────────
        self.actually_infectious = self
            .potentially_infectious
            .iter()
            .copied()
            .filter(|&a| world.health.is_infectious(a, d))
            .collect();

        // ── ⑩/⑪ Spread ─────────────────────────────────────────────────────
        if self.disease.mode() == TransmissionMode::Sexual {
            self.spread_on_network(day, world, rng, observer)?;
        } else {
            self.spread_in_groups(day, world, rng, observer)?;
        }

        Ok(self.report(day, world))
    }

    // ── Public interventions ──────────────────────────────────────────────

    /// Make `agent` immune from `start` until `end` (`None` = for good).  A
    /// start the immunity queue has already passed moves to the next
    /// undrained day.  Only agents still susceptible at `start` are
    /// affected.  Returns the effective start.
    pub fn schedule_immunity(&mut self, agent: AgentId, start: Day, end: Option<Day>) -> EpiResult<Day> {
        let start = match self.queues.queue(EventKind::ImmunityStart).drained_through() {
            Some(drained) if start <= drained => drained.next(),
            _ => start,
        };
        if let Some(previous) = self.pending_immunity.insert(agent, ImmunityWindow { start, end }) {
            self.queues.cancel(EventKind::ImmunityStart, previous.start, agent);
        }
        self.queues.add(EventKind::ImmunityStart, start, agent)?;
        Ok(start)
    }

    /// Scale the infectious period of `agent`'s open infection on `day`
    /// and move its pending end event.
    pub fn modify_infectious_period(
        &mut self,
        agent: AgentId,
        day: Day,
        multp: f64,
        world: &mut WorldMut<'_>,
    ) -> EpiResult<()> {
        if let Some(change) = world.health.modify_infectious_period(agent, self.id(), day, multp)? {
            if self.queues.cancel(EventKind::InfectiousEnd, change.old_end, agent) {
                self.queues.add(EventKind::InfectiousEnd, change.new_end, agent)?;
            }
            debug!("{agent} infectious period now ends {} (was {})", change.new_end, change.old_end);
        }
        Ok(())
    }

    /// Scale the symptomatic period of `agent`'s open infection on `day`
    /// and move its pending end event.
    pub fn modify_symptomatic_period(
        &mut self,
        agent: AgentId,
        day: Day,
        multp: f64,
        world: &mut WorldMut<'_>,
    ) -> EpiResult<()> {
        if let Some(change) = world.health.modify_symptomatic_period(agent, self.id(), day, multp)? {
            if self.queues.cancel(EventKind::SymptomsEnd, change.old_end, agent) {
                self.queues.add(EventKind::SymptomsEnd, change.new_end, agent)?;
            }
            debug!("{agent} symptoms now end {} (was {})", change.new_end, change.old_end);
        }
        Ok(())
    }

    /// `agent` leaves the population on `day` for any reason: cancel its
    /// pending events, drop it from every working set, and count it
    /// removed.  Idempotent.
    pub fn terminate_person(&mut self, agent: AgentId, day: Day, world: &mut WorldMut<'_>) -> EpiResult<()> {
        let d = self.id();
        if !self.terminated.insert(agent) {
            return Ok(());
        }
        if let Some(markov) = self.markov.as_mut() {
            markov.remove(agent);
        }
        if let Some(window) = self.pending_immunity.remove(&agent) {
            self.queues.cancel(EventKind::ImmunityStart, window.start, agent);
        }

        if let Some(trajectory) = world.health.infection(agent, d).map(InfectionRecord::trajectory) {
            self.cancel_pending(agent, &trajectory);
            self.leave_infection(agent, world);
            world.health.terminate(agent, d);
            self.tallies.removed += 1;
            trace!("{agent} terminated with an open infection on {day}");
            return Ok(());
        }

        let state = world.health.state(agent, d);
        let flags = state.flags;
        if let Some(end) = state.immunity_end {
            self.queues.cancel(EventKind::ImmunityEnd, end, agent);
        }
        if flags.immune {
            self.tallies.immune = self.tallies.immune.saturating_sub(1);
            self.tallies.removed += 1;
        } else if flags.susceptible {
            self.tallies.removed += 1;
        }
        world.health.terminate(agent, d);
        trace!("{agent} terminated on {day}");
        Ok(())
    }

    // ── Infection lifecycle ───────────────────────────────────────────────

    /// Open `record` for `agent` on `day` and schedule its start events.
    pub(crate) fn open_infection(
        &mut self,
        day: Day,
        agent: AgentId,
        mut record: InfectionRecord,
        world: &mut WorldMut<'_>,
        observer: &mut dyn SimObserver,
    ) -> EpiResult<()> {
        let d = self.id();
        if !self.disease.is_communicable() {
            record.skip_infectious_phase();
        }

        let infectious_start = record
            .infectious_start()
            .filter(|_| self.disease.is_communicable())
            .map(|s| time_warp(day, s, agent, EventKind::InfectiousStart));
        if let Some(s) = infectious_start {
            record.set_infectious_start(s);
        }
        let symptoms_start = record
            .symptoms_start()
            .map(|s| time_warp(day, s, agent, EventKind::SymptomsStart));
        if let Some(s) = symptoms_start {
            record.set_symptoms_start(s);
        }

        let event = InfectionEvent {
            day,
            disease:  d,
            infectee: agent,
            infector: record.infector(),
            place:    record.mixing_group(),
        };
        let complete = record.is_complete();
        world.health.become_exposed(agent, d, day, record)?;
        if let Some(s) = infectious_start {
            self.queues.add(EventKind::InfectiousStart, s, agent)?;
        }
        if let Some(s) = symptoms_start {
            self.queues.add(EventKind::SymptomsStart, s, agent)?;
        }

        self.infected.insert(agent);
        self.tallies.exposed += 1;
        self.tallies.new_exposed += 1;
        self.tallies.total_exposed += 1;
        self.cohorts.record_exposure(day);
        observer.on_exposure(&event);

        // Nothing will ever close a standard infection with no phases.
        if complete && self.markov.is_none() {
            self.recover(agent, day, world)?;
        }
        Ok(())
    }

    /// Apply one proposed exposure.  Returns `false` when the infectee is
    /// no longer susceptible.
    pub(crate) fn apply_exposure(
        &mut self,
        day: Day,
        exposure: Exposure,
        world: &mut WorldMut<'_>,
        rng: &mut dyn EpiRng,
        observer: &mut dyn SimObserver,
    ) -> EpiResult<bool> {
        let d = self.id();
        let Exposure { infectee, infector, site } = exposure;
        if !world.health.is_susceptible(infectee, d) || !world.population.is_alive(infectee) {
            return Ok(false);
        }

        let record = if self.markov.is_some() {
            InfectionRecord::new(Trajectory::open_ended(day), infector, site.place())
        } else {
            let history = self.disease.natural_history();
            let host = HostAttributes::new(world.population.age(infectee));
            InfectionRecord::new(history.sample(&host, day, rng), infector, site.place())
                .with_profiles(history)
        };
        self.open_infection(day, infectee, record, world, observer)?;

        if let Some(source) = infector {
            world.health.increment_infectee_count(source, d);
            if let Some(cohort_day) = world.health.exposure_day(source, d) {
                self.cohorts.record_secondary(cohort_day);
            }
        }

        let first_stage = self.markov.as_ref().filter(|m| m.chain.state_count() > 1).map(|_| 1);
        if let Some(stage) = first_stage {
            self.transition_person(infectee, day, stage, world, rng, observer)?;
        }
        Ok(true)
    }

    /// Close the open infection of `agent` and count it removed.  A finite
    /// immunity end is scheduled.
    pub(crate) fn recover(&mut self, agent: AgentId, day: Day, world: &mut WorldMut<'_>) -> EpiResult<()> {
        let d = self.id();
        self.leave_infection(agent, world);
        let record = world.health.recover(agent, d, day)?;
        self.tallies.removed += 1;
        if let Some(end) = record.immunity_end() {
            let end = time_warp(day, end, agent, EventKind::ImmunityEnd);
            world.health.set_immunity_end(agent, d, Some(end));
            self.queues.add(EventKind::ImmunityEnd, end, agent)?;
        }
        trace!("{agent} removed on {day}");
        Ok(())
    }

    /// The open infection of `agent` has turned fatal.
    pub(crate) fn case_fatality(&mut self, agent: AgentId, day: Day, world: &mut WorldMut<'_>) -> EpiResult<()> {
        let d = self.id();
        if let Some(trajectory) = world.health.infection(agent, d).map(InfectionRecord::trajectory) {
            self.cancel_pending(agent, &trajectory);
        }
        self.leave_infection(agent, world);
        world.health.become_case_fatality(agent, d, day)?;
        self.terminated.insert(agent);

        self.tallies.case_fatalities += 1;
        self.tallies.total_case_fatalities += 1;
        self.tallies.removed += 1;

        for kind in MixingGroupKind::ALL {
            if let Some(group) = world.population.mixing_group(agent, kind) {
                world.places.record_case_fatality(day, group, d);
            }
        }
        world.population.prepare_to_die(day, agent);
        debug!("{}: case fatality {agent} on {day}", self.disease.name());
        Ok(())
    }

    /// `agent` has reached infectious onset and leaves `E` for good.
    pub(crate) fn enter_potentially_infectious(&mut self, agent: AgentId) {
        if self.potentially_infectious.insert(agent) {
            self.tallies.exposed = self.tallies.exposed.saturating_sub(1);
        }
    }

    /// Drop `agent` from the infected working sets ahead of closing its
    /// record.
    fn leave_infection(&mut self, agent: AgentId, world: &WorldMut<'_>) {
        self.infected.remove(&agent);
        if !self.potentially_infectious.remove(&agent) {
            self.tallies.exposed = self.tallies.exposed.saturating_sub(1);
        }
        if world.health.is_symptomatic(agent, self.id()) {
            self.tallies.symptomatic = self.tallies.symptomatic.saturating_sub(1);
        }
    }

    fn cancel_pending(&mut self, agent: AgentId, t: &Trajectory) {
        let pending = [
            (EventKind::InfectiousStart, t.infectious_start),
            (EventKind::InfectiousEnd, t.infectious_end),
            (EventKind::SymptomsStart, t.symptoms_start),
            (EventKind::SymptomsEnd, t.symptoms_end),
        ];
        for (kind, date) in pending {
            if let Some(date) = date {
                self.queues.cancel(kind, date, agent);
            }
        }
    }

    // ── Steps ⑧, ⑩, ⑪ ────────────────────────────────────────────────────

    fn advance_infections(&mut self, day: Day, world: &mut WorldMut<'_>, rng: &mut dyn EpiRng) -> EpiResult<()> {
        let d = self.id();
        let agents: Vec<AgentId> = self.infected.iter().copied().collect();
        for agent in agents {
            let host = HostAttributes::new(world.population.age(agent));
            let history = match &self.markov {
                Some(m) => &m.chain as &dyn NaturalHistory,
                None => self.disease.natural_history(),
            };
            let fatal = world.health.update_infection(agent, d, day, history, &host, rng)?;
            if fatal {
                self.case_fatality(agent, day, world)?;
                continue;
            }

            let Some(record) = world.health.infection(agent, d) else { continue };
            let counts = GroupInfectionCounts {
                newly_infected:    world.health.exposure_day(agent, d) == Some(day),
                symptomatic:       world.health.is_symptomatic(agent, d),
                newly_symptomatic: record.symptoms_start() == Some(day),
            };
            for kind in MixingGroupKind::ALL {
                if let Some(group) = world.population.mixing_group(agent, kind) {
                    world.places.record_infection_counts(day, group, d, counts);
                }
            }
        }
        Ok(())
    }

    fn spread_on_network(
        &mut self,
        day: Day,
        world: &mut WorldMut<'_>,
        rng: &mut dyn EpiRng,
        observer: &mut dyn SimObserver,
    ) -> EpiResult<()> {
        let d = self.id();
        let Some(network) = world.network.as_deref_mut() else {
            debug!("{}: no partner network, skipping spread", self.disease.name());
            return Ok(());
        };
        for &agent in &self.actually_infectious {
            network.add_infectious_person(d, agent);
        }
        if !self.actually_infectious.is_empty() {
            self.spread(day, SpreadSite::Network, world, rng, observer)?;
        }
        if let Some(network) = world.network.as_deref_mut() {
            network.clear_infectious_people(d);
        }
        Ok(())
    }

    fn spread_in_groups(
        &mut self,
        day: Day,
        world: &mut WorldMut<'_>,
        rng: &mut dyn EpiRng,
        observer: &mut dyn SimObserver,
    ) -> EpiResult<()> {
        let d = self.id();
        let vector_mode = self.disease.mode() == TransmissionMode::Vector;
        for kind in MixingGroupKind::ALL {
            let mut active: BTreeSet<PlaceId> = BTreeSet::new();
            for &agent in &self.actually_infectious {
                if let Some(group) = world.population.mixing_group(agent, kind) {
                    if world.places.is_present(day, agent, group) {
                        world.places.add_infectious_person(group, d, agent);
                        active.insert(group);
                    }
                }
            }
            if vector_mode && kind.hosts_vectors() {
                let places = &*world.places;
                active.extend(
                    places
                        .places_of_kind(kind)
                        .iter()
                        .copied()
                        .filter(|&g| places.infectious_vectors(g, d) > 0),
                );
            }

            for group in active {
                self.spread(day, SpreadSite::Place(group), world, rng, observer)?;
                world.places.clear_infectious_people(group, d);
            }
        }
        Ok(())
    }

    /// One spread call at `site`, then apply its exposures in order.
    fn spread(
        &mut self,
        day: Day,
        site: SpreadSite,
        world: &mut WorldMut<'_>,
        rng: &mut dyn EpiRng,
        observer: &mut dyn SimObserver,
    ) -> EpiResult<()> {
        let exposures = {
            let ctx = SpreadContext::new(
                &*world.health,
                &*world.population,
                &*world.places,
                world.network.as_deref(),
            );
            self.disease
                .transmission()
                .spread_infection(day, &self.disease, site, &ctx, rng)
        };
        for exposure in exposures {
            self.apply_exposure(day, exposure, world, rng, observer)?;
        }
        Ok(())
    }

    // ── Report ────────────────────────────────────────────────────────────

    fn report(&mut self, day: Day, world: &WorldMut<'_>) -> DailyCounts {
        let t = &self.tallies;
        let infectious = self.actually_infectious.len();
        let counts = DailyCounts {
            day,
            susceptible:           world.health.count_susceptible(self.id()),
            exposed:               t.exposed,
            infectious,
            convalescent:          self.potentially_infectious.len().saturating_sub(infectious),
            symptomatic:           t.symptomatic,
            removed:               t.removed,
            immune:                t.immune,
            new_exposed:           t.new_exposed,
            new_symptomatic:       t.new_symptomatic,
            case_fatalities:       t.case_fatalities,
            total_case_fatalities: t.total_case_fatalities,
            total_exposed:         t.total_exposed,
            total_symptomatic:     t.total_symptomatic,
            population:            self.population,
            reproduction:          self.cohorts.reproduction_number(day, self.config.rr_lag),
        };
        self.tallies.reset_daily();
        debug!(
            "{} {day}: S={} E={} I={} R={} M={} C={}",
            self.disease.name(),
            counts.susceptible,
            counts.exposed,
            counts.infectious,
            counts.removed,
            counts.immune,
            counts.new_exposed
        );
        counts
    }
}

/// A date on or before `day` moves to `day + 1`.
fn time_warp(day: Day, date: Day, agent: AgentId, kind: EventKind) -> Day {
    if date > day {
        return date;
    }
    debug!("time warp: {kind} of {agent} moved from {date} to {}", day.next());
    day.next()
}
