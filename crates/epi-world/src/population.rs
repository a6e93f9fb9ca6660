//! Structure-of-Arrays agent store.
//!
//! # Deferred deaths
//!
//! The epidemic driver iterates agent sets while it decides who dies, so
//! [`Population::prepare_to_die`] only queues the agent.  The queue is
//! applied by [`Population::apply_deaths`] at the day boundary; a dead
//! agent keeps its slot (ids are never reused) and drops out of
//! `live_agents`.

use log::trace;

use epi_core::{AgentId, Day, MixingGroupKind, PlaceId, Population};

const KINDS: usize = MixingGroupKind::ALL.len();

/// All agents of a run, one array per attribute.
#[derive(Clone, Debug, Default)]
pub struct PopulationStore {
    pub ages:       Vec<f64>,
    pub alive:      Vec<bool>,
    /// `groups[agent][kind.index()]`.
    pub groups:     Vec<[Option<PlaceId>; KINDS]>,
    pending_deaths: Vec<AgentId>,
}

impl PopulationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(agents: usize) -> Self {
        Self {
            ages:           Vec::with_capacity(agents),
            alive:          Vec::with_capacity(agents),
            groups:         Vec::with_capacity(agents),
            pending_deaths: Vec::new(),
        }
    }

    /// Append a live agent with no memberships.
    pub fn push_agent(&mut self, age: f64) -> AgentId {
        let id = AgentId(self.ages.len() as u32);
        self.ages.push(age);
        self.alive.push(true);
        self.groups.push([None; KINDS]);
        id
    }

    pub fn set_mixing_group(&mut self, agent: AgentId, kind: MixingGroupKind, place: PlaceId) {
        if let Some(row) = self.groups.get_mut(agent.index()) {
            row[kind.index()] = Some(place);
        }
    }

    pub fn len(&self) -> usize {
        self.ages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ages.is_empty()
    }

    /// Agents queued by `prepare_to_die` and not yet removed.
    pub fn pending_deaths(&self) -> &[AgentId] {
        &self.pending_deaths
    }
}

impl Population for PopulationStore {
    #[inline]
    fn agent_count(&self) -> usize {
        self.ages.len()
    }

    #[inline]
    fn is_alive(&self, agent: AgentId) -> bool {
        self.alive.get(agent.index()).copied().unwrap_or(false)
    }

    #[inline]
    fn age(&self, agent: AgentId) -> f64 {
        self.ages.get(agent.index()).copied().unwrap_or(0.0)
    }

    #[inline]
    fn mixing_group(&self, agent: AgentId, kind: MixingGroupKind) -> Option<PlaceId> {
        self.groups.get(agent.index()).and_then(|row| row[kind.index()])
    }

    fn prepare_to_die(&mut self, day: Day, agent: AgentId) {
        if self.is_alive(agent) && !self.pending_deaths.contains(&agent) {
            trace!("{agent} queued to die on {day}");
            self.pending_deaths.push(agent);
        }
    }

    fn apply_deaths(&mut self, _day: Day) -> Vec<AgentId> {
        let dead = std::mem::take(&mut self.pending_deaths);
        for &agent in &dead {
            self.alive[agent.index()] = false;
        }
        dead
    }
}
