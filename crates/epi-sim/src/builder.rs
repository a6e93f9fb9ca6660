//! Fluent builder for constructing a [`Sim`].

use rustc_hash::FxHashSet;

use epi_core::{PartnerNetwork, Places, Population, SimConfig, SimRng};
use epi_health::HealthTable;

use crate::epidemic::Epidemic;
use crate::{Sim, SimError, SimResult};

/// Fluent builder for [`Sim<P, L>`].
///
/// # Required inputs
///
/// - [`SimConfig`]: total days, seed
/// - `P: Population` and `L: Places`, e.g. from `epi_world::WorldBuilder`
///
/// # Optional inputs (have defaults)
///
/// | Method            | Default                                          |
/// |-------------------|--------------------------------------------------|
/// | `.epidemic(e)`    | No diseases                                      |
/// | `.health(t)`      | All agents susceptible to every disease          |
/// | `.network(n)`     | None (sexual-contact diseases never spread)      |
///
/// # Example
///
/// ```rust,ignore
/// let (population, places) = builder.build();
/// let mut sim = SimBuilder::new(config, population, places)
///     .epidemic(Epidemic::new(flu, EpidemicConfig::default()).with_imports(&imports))
///     .build()?;
/// sim.run(&mut NoopObserver)?;
/// ```
pub struct SimBuilder<P: Population, L: Places> {
    config:     SimConfig,
    population: P,
    places:     L,
    epidemics:  Vec<Epidemic>,
    health:     Option<HealthTable>,
    network:    Option<Box<dyn PartnerNetwork>>,
}

impl<P: Population, L: Places> SimBuilder<P, L> {
    /// Create a builder with all required inputs.
    pub fn new(config: SimConfig, population: P, places: L) -> Self {
        Self {
            config,
            population,
            places,
            epidemics: Vec::new(),
            health:    None,
            network:   None,
        }
    }

    /// Add one disease's epidemic.  Epidemics run in the order added.
    pub fn epidemic(mut self, epidemic: Epidemic) -> Self {
        self.epidemics.push(epidemic);
        self
    }

    /// Supply a pre-built health table, e.g. with initial immunity.
    ///
    /// Must cover every agent and every disease id added.
    pub fn health(mut self, health: HealthTable) -> Self {
        self.health = Some(health);
        self
    }

    /// Supply the partner network used by sexual-contact diseases.
    pub fn network(mut self, network: impl PartnerNetwork + 'static) -> Self {
        self.network = Some(Box::new(network));
        self
    }

    /// Validate inputs, derive one RNG stream per epidemic, and return a
    /// ready-to-run [`Sim`].
    pub fn build(self) -> SimResult<Sim<P, L>> {
        let agent_count = self.population.agent_count();

        // ── Validate disease ids ───────────────────────────────────────────
        let mut seen = FxHashSet::default();
        for epidemic in &self.epidemics {
            if !seen.insert(epidemic.id()) {
                return Err(SimError::Config(format!("disease {} added twice", epidemic.id())));
            }
        }
        let disease_slots = self
            .epidemics
            .iter()
            .map(|e| e.id().index() + 1)
            .max()
            .unwrap_or(0);

        // ── Resolve the health table ───────────────────────────────────────
        let health = match self.health {
            Some(h) => {
                if h.agent_count() != agent_count {
                    return Err(SimError::AgentCountMismatch {
                        expected: agent_count,
                        got:      h.agent_count(),
                        what:     "health table",
                    });
                }
                if h.disease_count() < disease_slots {
                    return Err(SimError::Config(format!(
                        "health table tracks {} diseases, need {disease_slots}",
                        h.disease_count()
                    )));
                }
                h
            }
            None => HealthTable::new(agent_count, disease_slots),
        };

        // ── One RNG stream per epidemic ────────────────────────────────────
        let mut master = SimRng::new(self.config.seed);
        let rngs = (0..self.epidemics.len())
            .map(|i| master.child(i as u64))
            .collect();

        Ok(Sim {
            clock:      self.config.make_clock(),
            config:     self.config,
            population: self.population,
            places:     self.places,
            network:    self.network,
            health,
            epidemics:  self.epidemics,
            rngs,
            prepared:   false,
        })
    }
}
