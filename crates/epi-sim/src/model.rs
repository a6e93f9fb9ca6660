//! Epidemic model variants and per-agent Markov bookkeeping.

use log::debug;

use epi_core::{AgentId, Day, EpiResult, EpiRng};
use epi_disease::MarkovChain;
use epi_schedule::EventQueue;

/// How a disease's infections progress.
#[derive(Clone, Debug, Default)]
pub enum EpidemicModel {
    /// Dates sampled from the natural history at exposure, transitions
    /// driven by the six event queues.
    #[default]
    Standard,
    /// Every agent sits in one chain state; transitions are scheduled on
    /// per-state queues.  No importation.
    Markov(MarkovChain),
}

/// Chain states of every agent plus one transition queue per target state.
#[derive(Clone, Debug)]
pub(crate) struct MarkovRun {
    pub chain:  MarkovChain,
    state:      Vec<Option<usize>>,
    next:       Vec<Option<(usize, Day)>>,
    pub queues: Vec<EventQueue>,
    counts:     Vec<usize>,
}

impl MarkovRun {
    pub fn new(chain: MarkovChain) -> Self {
        let n = chain.state_count();
        Self {
            chain,
            state:  Vec::new(),
            next:   Vec::new(),
            queues: vec![EventQueue::new(); n],
            counts: vec![0; n],
        }
    }

    fn fit(&mut self, agent: AgentId) {
        let needed = agent.index() + 1;
        if self.state.len() < needed {
            self.state.resize(needed, None);
            self.next.resize(needed, None);
        }
    }

    pub fn state_of(&self, agent: AgentId) -> Option<usize> {
        self.state.get(agent.index()).copied().flatten()
    }

    pub fn count(&self, state: usize) -> usize {
        self.counts.get(state).copied().unwrap_or(0)
    }

    /// Move `agent` into `state` on `day`: cancel its pending transition,
    /// update the state counts, and schedule the next transition.  Returns
    /// the previous state.
    pub fn move_to(
        &mut self,
        agent: AgentId,
        day: Day,
        state: usize,
        rng: &mut dyn EpiRng,
    ) -> EpiResult<Option<usize>> {
        self.fit(agent);
        let i = agent.index();
        if let Some((target, when)) = self.next[i].take() {
            if day < when {
                self.queues[target].cancel(when, agent);
            }
        }

        let old = self.state[i];
        if old != Some(state) {
            if let Some(o) = old {
                self.counts[o] = self.counts[o].saturating_sub(1);
            }
            self.counts[state] += 1;
            self.state[i] = Some(state);
        }

        if let Some((target, when)) = self.chain.next_transition(day, state, rng) {
            self.queues[target].add(when, agent)?;
            self.next[i] = Some((target, when));
        }
        debug!(
            "markov: {agent} {} -> {} on {day}",
            old.map_or("none", |s| self.chain.state_name(s)),
            self.chain.state_name(state)
        );
        Ok(old)
    }

    /// Drop `agent` from the chain: no state, no pending transition.
    pub fn remove(&mut self, agent: AgentId) {
        self.fit(agent);
        let i = agent.index();
        if let Some((target, when)) = self.next[i].take() {
            self.queues[target].cancel(when, agent);
        }
        if let Some(old) = self.state[i].take() {
            self.counts[old] = self.counts[old].saturating_sub(1);
        }
    }
}
