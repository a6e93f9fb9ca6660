//! Flat agent × disease health table.
//!
//! # Layout
//!
//! One [`HealthState`] per (agent, disease), stored row-major by agent:
//! `states[agent * disease_count + disease]`.  An agent's diseases sit next
//! to each other, which is the access pattern of the day-boundary death
//! pass (terminate every open infection of one agent).
//!
//! # Mutation
//!
//! Every transition goes through a `HealthTable` method so the flag
//! invariants hold after each call.  Transitions on a closed (agent,
//! disease) pair return [`EpiError::NoOpenInfection`]; exposing an agent
//! that already has an open record returns [`EpiError::DoubleExposure`].

use log::trace;

use epi_core::{AgentId, Day, DiseaseId, EpiError, EpiResult, EpiRng};

use crate::flags::HealthFlags;
use crate::infection::{InfectionRecord, PeriodChange};
use crate::natural_history::NaturalHistory;
use crate::trajectory::HostAttributes;

// ── HealthState ───────────────────────────────────────────────────────────────

/// Health of one agent with respect to one disease.
#[derive(Clone, Debug, PartialEq)]
pub struct HealthState {
    pub flags:            HealthFlags,
    /// Longest symptomatic span observed for the current infection.
    pub days_symptomatic: i32,
    pub infectee_count:   u32,
    /// Simulation day of the most recent exposure.
    pub exposure_day:     Option<Day>,
    pub infector:         Option<AgentId>,
    /// Effective immunity end; `None` means never.
    pub immunity_end:     Option<Day>,
    infection:            Option<InfectionRecord>,
}

impl HealthState {
    fn new(flags: HealthFlags) -> Self {
        Self {
            flags,
            days_symptomatic: 0,
            infectee_count:   0,
            exposure_day:     None,
            infector:         None,
            immunity_end:     None,
            infection:        None,
        }
    }

    pub fn infection(&self) -> Option<&InfectionRecord> {
        self.infection.as_ref()
    }
}

// ── HealthTable ───────────────────────────────────────────────────────────────

pub struct HealthTable {
    disease_count: usize,
    agent_count:   usize,
    states:        Vec<HealthState>,
}

impl HealthTable {
    /// Every agent susceptible to every disease.
    pub fn new(agent_count: usize, disease_count: usize) -> Self {
        Self {
            disease_count,
            agent_count,
            states: vec![HealthState::new(HealthFlags::SUSCEPTIBLE); agent_count * disease_count],
        }
    }

    pub fn agent_count(&self) -> usize {
        self.agent_count
    }

    pub fn disease_count(&self) -> usize {
        self.disease_count
    }

    /// Append a newborn, susceptible to every disease.
    pub fn push_agent(&mut self) -> AgentId {
        let id = AgentId(self.agent_count as u32);
        self.states.extend(
            std::iter::repeat_n(HealthState::new(HealthFlags::SUSCEPTIBLE), self.disease_count),
        );
        self.agent_count += 1;
        id
    }

    #[inline]
    fn slot(&self, agent: AgentId, disease: DiseaseId) -> usize {
        agent.index() * self.disease_count + disease.index()
    }

    #[inline]
    pub fn state(&self, agent: AgentId, disease: DiseaseId) -> &HealthState {
        &self.states[self.slot(agent, disease)]
    }

    #[inline]
    fn state_mut(&mut self, agent: AgentId, disease: DiseaseId) -> &mut HealthState {
        let slot = self.slot(agent, disease);
        &mut self.states[slot]
    }

    // ── Queries ───────────────────────────────────────────────────────────

    pub fn flags(&self, agent: AgentId, disease: DiseaseId) -> HealthFlags {
        self.state(agent, disease).flags
    }

    pub fn is_susceptible(&self, agent: AgentId, disease: DiseaseId) -> bool {
        self.state(agent, disease).flags.susceptible
    }

    pub fn is_infectious(&self, agent: AgentId, disease: DiseaseId) -> bool {
        self.state(agent, disease).flags.infectious
    }

    pub fn is_symptomatic(&self, agent: AgentId, disease: DiseaseId) -> bool {
        self.state(agent, disease).flags.symptomatic
    }

    pub fn is_recovered(&self, agent: AgentId, disease: DiseaseId) -> bool {
        self.state(agent, disease).flags.recovered
    }

    pub fn is_immune(&self, agent: AgentId, disease: DiseaseId) -> bool {
        self.state(agent, disease).flags.immune
    }

    pub fn is_case_fatality(&self, agent: AgentId, disease: DiseaseId) -> bool {
        self.state(agent, disease).flags.case_fatality
    }

    pub fn has_infection(&self, agent: AgentId, disease: DiseaseId) -> bool {
        self.state(agent, disease).infection.is_some()
    }

    pub fn infection(&self, agent: AgentId, disease: DiseaseId) -> Option<&InfectionRecord> {
        self.state(agent, disease).infection.as_ref()
    }

    pub fn infection_mut(&mut self, agent: AgentId, disease: DiseaseId) -> Option<&mut InfectionRecord> {
        self.state_mut(agent, disease).infection.as_mut()
    }

    pub fn exposure_day(&self, agent: AgentId, disease: DiseaseId) -> Option<Day> {
        self.state(agent, disease).exposure_day
    }

    pub fn infectee_count(&self, agent: AgentId, disease: DiseaseId) -> u32 {
        self.state(agent, disease).infectee_count
    }

    pub fn days_symptomatic(&self, agent: AgentId, disease: DiseaseId) -> i32 {
        self.state(agent, disease).days_symptomatic
    }

    pub fn immunity_end(&self, agent: AgentId, disease: DiseaseId) -> Option<Day> {
        self.state(agent, disease).immunity_end
    }

    /// Agents with an open infection of `disease`, in id order.
    pub fn open_infections(&self, disease: DiseaseId) -> impl Iterator<Item = AgentId> + '_ {
        (0..self.agent_count)
            .map(|i| AgentId(i as u32))
            .filter(move |&a| self.has_infection(a, disease))
    }

    pub fn count_susceptible(&self, disease: DiseaseId) -> usize {
        self.count_where(disease, |s| s.flags.susceptible)
    }

    pub fn count_immune(&self, disease: DiseaseId) -> usize {
        self.count_where(disease, |s| s.flags.immune)
    }

    fn count_where(&self, disease: DiseaseId, pred: impl Fn(&HealthState) -> bool) -> usize {
        self.states
            .iter()
            .skip(disease.index())
            .step_by(self.disease_count.max(1))
            .filter(|s| pred(s))
            .count()
    }

    fn open_record_mut(
        &mut self,
        agent: AgentId,
        disease: DiseaseId,
        day: Day,
    ) -> EpiResult<&mut InfectionRecord> {
        self.state_mut(agent, disease)
            .infection
            .as_mut()
            .ok_or(EpiError::NoOpenInfection { agent, disease, day })
    }

    // ── Transitions ───────────────────────────────────────────────────────

    /// Open `record` for (agent, disease) on `day`.
    pub fn become_exposed(
        &mut self,
        agent: AgentId,
        disease: DiseaseId,
        day: Day,
        record: InfectionRecord,
    ) -> EpiResult<()> {
        let state = self.state_mut(agent, disease);
        if state.infection.is_some() {
            return Err(EpiError::DoubleExposure { agent, disease, day });
        }
        state.flags.susceptible = false;
        state.flags.close_infection();
        state.days_symptomatic = 0;
        state.exposure_day = Some(day);
        state.infector = record.infector();
        state.infection = Some(record);
        trace!("{agent} exposed to disease {} on {day}", disease.index());
        Ok(())
    }

    pub fn become_infectious(&mut self, agent: AgentId, disease: DiseaseId, day: Day) -> EpiResult<()> {
        self.open_record_mut(agent, disease, day)?.progress_mut().infectious_started = true;
        self.state_mut(agent, disease).flags.infectious = true;
        Ok(())
    }

    pub fn become_noninfectious(&mut self, agent: AgentId, disease: DiseaseId, day: Day) -> EpiResult<()> {
        self.open_record_mut(agent, disease, day)?.progress_mut().infectious_ended = true;
        self.state_mut(agent, disease).flags.infectious = false;
        Ok(())
    }

    pub fn become_symptomatic(&mut self, agent: AgentId, disease: DiseaseId, day: Day) -> EpiResult<()> {
        self.open_record_mut(agent, disease, day)?.progress_mut().symptoms_started = true;
        self.state_mut(agent, disease).flags.symptomatic = true;
        Ok(())
    }

    pub fn resolve_symptoms(&mut self, agent: AgentId, disease: DiseaseId, day: Day) -> EpiResult<()> {
        self.open_record_mut(agent, disease, day)?.progress_mut().symptoms_ended = true;
        self.state_mut(agent, disease).flags.symptomatic = false;
        Ok(())
    }

    /// Close the record and mark the agent recovered.  Returns the closed
    /// record.
    pub fn recover(&mut self, agent: AgentId, disease: DiseaseId, day: Day) -> EpiResult<InfectionRecord> {
        let state = self.state_mut(agent, disease);
        let record = state
            .infection
            .take()
            .ok_or(EpiError::NoOpenInfection { agent, disease, day })?;
        state.flags.close_infection();
        state.flags.recovered = true;
        state.immunity_end = record.immunity_end();
        trace!("{agent} recovered from disease {} on {day}", disease.index());
        Ok(record)
    }

    /// Close the record and mark the agent a case fatality.
    pub fn become_case_fatality(
        &mut self,
        agent: AgentId,
        disease: DiseaseId,
        day: Day,
    ) -> EpiResult<InfectionRecord> {
        let state = self.state_mut(agent, disease);
        let record = state
            .infection
            .take()
            .ok_or(EpiError::NoOpenInfection { agent, disease, day })?;
        state.flags.close_infection();
        state.flags.case_fatality = true;
        state.immunity_end = None;
        Ok(record)
    }

    /// Close the record, if any, of an agent leaving the population.
    pub fn terminate(&mut self, agent: AgentId, disease: DiseaseId) -> Option<InfectionRecord> {
        let state = self.state_mut(agent, disease);
        state.flags.close_infection();
        state.flags.susceptible = false;
        state.immunity_end = None;
        state.infection.take()
    }

    /// A susceptible agent without an open record becomes immune.
    /// Returns `false` and changes nothing otherwise.
    pub fn become_immune(&mut self, agent: AgentId, disease: DiseaseId) -> bool {
        let state = self.state_mut(agent, disease);
        if !state.flags.susceptible || state.infection.is_some() {
            return false;
        }
        state.flags.susceptible = false;
        state.flags.immune = true;
        true
    }

    /// Immunity has waned: clear `immune`/`recovered` and flip `susceptible`
    /// back on.  Returns `false` if a record is open or the agent died of
    /// the disease.
    pub fn become_susceptible(&mut self, agent: AgentId, disease: DiseaseId) -> bool {
        let state = self.state_mut(agent, disease);
        if state.infection.is_some() || state.flags.case_fatality {
            return false;
        }
        state.flags.susceptible = true;
        state.flags.immune = false;
        state.flags.recovered = false;
        state.immunity_end = None;
        true
    }

    pub fn set_immunity_end(&mut self, agent: AgentId, disease: DiseaseId, day: Option<Day>) {
        self.state_mut(agent, disease).immunity_end = day;
    }

    pub fn increment_infectee_count(&mut self, agent: AgentId, disease: DiseaseId) {
        self.state_mut(agent, disease).infectee_count += 1;
    }

    /// Advance the open infection one day.  Returns `true` if it has turned
    /// fatal.
    pub fn update_infection(
        &mut self,
        agent: AgentId,
        disease: DiseaseId,
        day: Day,
        history: &dyn NaturalHistory,
        host: &HostAttributes,
        rng: &mut dyn EpiRng,
    ) -> EpiResult<bool> {
        let slot = self.slot(agent, disease);
        let HealthState { infection, days_symptomatic, .. } = &mut self.states[slot];
        let record = infection
            .as_mut()
            .ok_or(EpiError::NoOpenInfection { agent, disease, day })?;

        if let Some(start) = record.symptoms_start().filter(|_| record.is_symptomatic(day)) {
            *days_symptomatic = (*days_symptomatic).max(day - start + 1);
        }
        Ok(record.update(day, history, host, *days_symptomatic, rng))
    }

    // ── Record modifiers ──────────────────────────────────────────────────

    pub fn modify_infectivity(
        &mut self,
        agent: AgentId,
        disease: DiseaseId,
        day: Day,
        multp: f64,
    ) -> EpiResult<()> {
        self.open_record_mut(agent, disease, day)?.modify_infectivity(multp);
        Ok(())
    }

    pub fn modify_susceptibility(
        &mut self,
        agent: AgentId,
        disease: DiseaseId,
        day: Day,
        multp: f64,
    ) -> EpiResult<()> {
        self.open_record_mut(agent, disease, day)?.modify_susceptibility(multp);
        Ok(())
    }

    pub fn modify_infectious_period(
        &mut self,
        agent: AgentId,
        disease: DiseaseId,
        day: Day,
        multp: f64,
    ) -> EpiResult<Option<PeriodChange>> {
        check_period_multiplier(multp)?;
        Ok(self.open_record_mut(agent, disease, day)?.modify_infectious_period(multp, day))
    }

    pub fn modify_symptomatic_period(
        &mut self,
        agent: AgentId,
        disease: DiseaseId,
        day: Day,
        multp: f64,
    ) -> EpiResult<Option<PeriodChange>> {
        check_period_multiplier(multp)?;
        Ok(self.open_record_mut(agent, disease, day)?.modify_symptomatic_period(multp, day))
    }
}

fn check_period_multiplier(multp: f64) -> EpiResult<()> {
    if multp.is_finite() && multp >= 0.0 {
        Ok(())
    } else {
        Err(EpiError::Config(format!("period multiplier must be finite and non-negative, got {multp}")))
    }
}
