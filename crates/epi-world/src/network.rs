//! Undirected partner network.

use rustc_hash::FxHashMap;

use epi_core::{AgentId, DiseaseId, PartnerNetwork};

/// Partner lists indexed by `AgentId`, plus the per-disease infectious
/// marker used by the sexual spread step.
#[derive(Clone, Debug, Default)]
pub struct ContactNetwork {
    partners:   Vec<Vec<AgentId>>,
    infectious: FxHashMap<DiseaseId, Vec<AgentId>>,
}

impl ContactNetwork {
    pub fn new(agent_count: usize) -> Self {
        Self { partners: vec![Vec::new(); agent_count], infectious: FxHashMap::default() }
    }

    /// Link `a` and `b` both ways.  Self-links and repeats are ignored;
    /// the network grows to fit either id.
    pub fn add_partnership(&mut self, a: AgentId, b: AgentId) {
        if a == b {
            return;
        }
        let needed = a.index().max(b.index()) + 1;
        if self.partners.len() < needed {
            self.partners.resize(needed, Vec::new());
        }
        if !self.partners[a.index()].contains(&b) {
            self.partners[a.index()].push(b);
            self.partners[b.index()].push(a);
        }
    }

    pub fn degree(&self, agent: AgentId) -> usize {
        self.partners.get(agent.index()).map_or(0, Vec::len)
    }

    pub fn link_count(&self) -> usize {
        self.partners.iter().map(Vec::len).sum::<usize>() / 2
    }
}

impl PartnerNetwork for ContactNetwork {
    fn add_infectious_person(&mut self, disease: DiseaseId, agent: AgentId) {
        let list = self.infectious.entry(disease).or_default();
        if !list.contains(&agent) {
            list.push(agent);
        }
    }

    fn clear_infectious_people(&mut self, disease: DiseaseId) {
        self.infectious.remove(&disease);
    }

    fn infectious_people(&self, disease: DiseaseId) -> &[AgentId] {
        self.infectious.get(&disease).map_or(&[], Vec::as_slice)
    }

    fn partners(&self, agent: AgentId) -> &[AgentId] {
        self.partners.get(agent.index()).map_or(&[], Vec::as_slice)
    }
}
