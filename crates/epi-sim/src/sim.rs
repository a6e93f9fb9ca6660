//! The `Sim` struct and its daily loop.

use log::info;

use epi_core::{AgentId, Day, DiseaseId, PartnerNetwork, Places, Population, SimClock, SimConfig, SimRng};
use epi_health::HealthTable;

use crate::epidemic::{Epidemic, WorldMut};
use crate::{SimObserver, SimResult};

// ── Sim ───────────────────────────────────────────────────────────────────────

/// The main simulation runner.
///
/// `Sim<P, L>` owns the world and one [`Epidemic`] per disease and drives
/// the daily loop:
///
/// 1. **Prepare** (first day only): every epidemic captures its tracked
///    population; Markov epidemics assign initial states.
/// 2. **Diseases**: each epidemic runs its update in disease order, then
///    observers receive its [`DailyCounts`][crate::DailyCounts].
/// 3. **Deaths**: agents marked to die during the day are removed from the
///    population, and every epidemic terminates them.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Sim<P: Population, L: Places> {
    /// Global configuration (total days, seed).
    pub config: SimConfig,

    /// Simulation clock; tracks the current day.
    pub clock: SimClock,

    pub population: P,

    pub places: L,

    /// Partner network for sexual-contact diseases.
    pub network: Option<Box<dyn PartnerNetwork>>,

    /// Per-agent, per-disease health states.
    pub health: HealthTable,

    /// One epidemic per disease, in disease order.
    pub epidemics: Vec<Epidemic>,

    /// One RNG stream per epidemic.
    pub(crate) rngs: Vec<SimRng>,

    pub(crate) prepared: bool,
}

/// Borrow the world out of disjoint `Sim` fields.
fn world_mut<'a, P: Population, L: Places>(
    health:     &'a mut HealthTable,
    population: &'a mut P,
    places:     &'a mut L,
    network:    &'a mut Option<Box<dyn PartnerNetwork>>,
) -> WorldMut<'a> {
    WorldMut {
        health,
        population,
        places,
        network: network.as_deref_mut().map(|n| n as &mut dyn PartnerNetwork),
    }
}

impl<P: Population, L: Places> Sim<P, L> {
    // ── Public API ────────────────────────────────────────────────────────

    /// Run the simulation from the current day to `config.end_day()`.
    ///
    /// Calls observer hooks at every day boundary.  Use
    /// [`NoopObserver`][crate::NoopObserver] if you don't need callbacks.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        self.prepare(observer)?;
        while self.clock.current_day < self.config.end_day() {
            let day = self.clock.current_day;
            self.process_day(day, observer)?;
            self.clock.advance();
        }
        observer.on_sim_end(self.clock.current_day);
        info!("simulation finished on {}", self.clock.current_day);
        Ok(())
    }

    /// Run exactly `n` days from the current position (ignores `end_day`).
    ///
    /// Useful for tests and incremental stepping.
    pub fn run_days<O: SimObserver>(&mut self, n: u32, observer: &mut O) -> SimResult<()> {
        self.prepare(observer)?;
        for _ in 0..n {
            let day = self.clock.current_day;
            self.process_day(day, observer)?;
            self.clock.advance();
        }
        Ok(())
    }

    /// Prepare every epidemic at the current day.  Called by
    /// [`run`](Self::run) and [`run_days`](Self::run_days); later calls do
    /// nothing.
    pub fn prepare<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        if self.prepared {
            return Ok(());
        }
        let start = self.clock.current_day;
        for (epidemic, rng) in self.epidemics.iter_mut().zip(self.rngs.iter_mut()) {
            let mut world = world_mut(
                &mut self.health,
                &mut self.population,
                &mut self.places,
                &mut self.network,
            );
            epidemic.prepare(start, &mut world, rng, observer)?;
        }
        self.prepared = true;
        Ok(())
    }

    pub fn epidemic(&self, disease: DiseaseId) -> Option<&Epidemic> {
        self.epidemics.iter().find(|e| e.id() == disease)
    }

    pub fn epidemic_mut(&mut self, disease: DiseaseId) -> Option<&mut Epidemic> {
        self.epidemics.iter_mut().find(|e| e.id() == disease)
    }

    /// Schedule immunity for `agent` against `disease` from `start` until
    /// `end`.  Returns the effective start, or `None` for an unknown
    /// disease.
    pub fn schedule_immunity(
        &mut self,
        disease: DiseaseId,
        agent: AgentId,
        start: Day,
        end: Option<Day>,
    ) -> SimResult<Option<Day>> {
        match self.epidemic_mut(disease) {
            Some(e) => Ok(Some(e.schedule_immunity(agent, start, end)?)),
            None => Ok(None),
        }
    }

    // ── Core day processing ───────────────────────────────────────────────

    fn process_day<O: SimObserver>(&mut self, day: Day, observer: &mut O) -> SimResult<()> {
        observer.on_day_start(day);

        // ── Diseases ───────────────────────────────────────────────────────
        for (epidemic, rng) in self.epidemics.iter_mut().zip(self.rngs.iter_mut()) {
            let mut world = world_mut(
                &mut self.health,
                &mut self.population,
                &mut self.places,
                &mut self.network,
            );
            let counts = epidemic.update(day, &mut world, rng, observer)?;
            observer.on_daily_counts(&counts, epidemic.id());
        }

        // ── Day-boundary deaths ────────────────────────────────────────────
        let deaths = self.population.apply_deaths(day);
        if !deaths.is_empty() {
            let mut world = world_mut(
                &mut self.health,
                &mut self.population,
                &mut self.places,
                &mut self.network,
            );
            for &agent in &deaths {
                for epidemic in &mut self.epidemics {
                    epidemic.terminate_person(agent, day, &mut world)?;
                }
            }
        }
        observer.on_day_end(day, &deaths);
        Ok(())
    }
}
