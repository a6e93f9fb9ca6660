//! Fluent builder for [`HealthTable`].
//!
//! # Usage
//!
//! ```rust
//! use epi_core::{AgentId, DiseaseId};
//! use epi_health::HealthTableBuilder;
//!
//! let table = HealthTableBuilder::new(100, 1)
//!     .immune(DiseaseId(0), &[AgentId(3), AgentId(4)])
//!     .build();
//!
//! assert_eq!(table.count_susceptible(DiseaseId(0)), 98);
//! assert_eq!(table.count_immune(DiseaseId(0)), 2);
//! ```

use epi_core::{AgentId, DiseaseId};

use crate::HealthTable;

pub struct HealthTableBuilder {
    agent_count:   usize,
    disease_count: usize,
    immune:        Vec<(DiseaseId, AgentId)>,
}

impl HealthTableBuilder {
    pub fn new(agent_count: usize, disease_count: usize) -> Self {
        Self { agent_count, disease_count, immune: Vec::new() }
    }

    /// Start `agents` immune to `disease`.  Out-of-range ids are ignored.
    pub fn immune(mut self, disease: DiseaseId, agents: &[AgentId]) -> Self {
        self.immune.extend(agents.iter().map(|&a| (disease, a)));
        self
    }

    pub fn build(self) -> HealthTable {
        let mut table = HealthTable::new(self.agent_count, self.disease_count);
        for (disease, agent) in self.immune {
            if agent.index() < self.agent_count && disease.index() < self.disease_count {
                table.become_immune(agent, disease);
            }
        }
        table
    }
}
