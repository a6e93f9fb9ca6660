//! Markov-chain progression.
//!
//! Chain states replace the sampled trajectory: each state carries an
//! infectivity level, a symptom level, and a fatal flag, and moving between
//! states drives the host's health flags.
//!
//! | Move                                     | Effect                         |
//! |------------------------------------------|--------------------------------|
//! | none / 0 → k > 0 (susceptible host)      | exposure without infector      |
//! | into symptoms > 0                        | symptomatic, `Is`/`Cs` counted |
//! | into infectivity > 0                     | infectious, leaves `E`         |
//! | into symptoms ≤ 0 while symptomatic      | symptoms resolve               |
//! | into infectivity ≤ 0 while infectious    | no longer infectious           |
//! | k > 0 → 0                                | recovered                      |
//! | into a fatal state                       | case fatality                  |
//!
//! All agents share one chain; there are no per-age-group chains.

use epi_core::{AgentId, Day, EpiResult, EpiRng};
use epi_health::{InfectionRecord, Trajectory};

use crate::epidemic::{Epidemic, WorldMut};
use crate::SimObserver;

/// Levels of the state an agent just moved into.
struct Entered {
    old:         Option<usize>,
    infectivity: f64,
    symptoms:    f64,
    fatal:       bool,
}

impl Epidemic {
    /// Step ①b: fire every chain transition due on `day`, state by state.
    pub fn markov_updates(
        &mut self,
        day: Day,
        world: &mut WorldMut<'_>,
        rng: &mut dyn EpiRng,
        observer: &mut dyn SimObserver,
    ) -> EpiResult<()> {
        let states = self.markov.as_ref().map_or(0, |m| m.chain.state_count());
        for state in 0..states {
            let due = match self.markov.as_mut() {
                Some(m) => m.queues[state].drain(day)?,
                None => break,
            };
            for agent in due {
                self.transition_person(agent, day, state, world, rng, observer)?;
            }
        }
        Ok(())
    }

    /// Move `agent` into chain `state` on `day` and apply what the move
    /// means for its infection.  No-op for standard epidemics.
    pub fn transition_person(
        &mut self,
        agent: AgentId,
        day: Day,
        state: usize,
        world: &mut WorldMut<'_>,
        rng: &mut dyn EpiRng,
        observer: &mut dyn SimObserver,
    ) -> EpiResult<()> {
        let d = self.id();
        let entered = match self.markov.as_mut() {
            Some(m) => {
                let old = m.move_to(agent, day, state, rng)?;
                Entered {
                    old,
                    infectivity: m.chain.infectivity(state),
                    symptoms:    m.chain.symptoms(state),
                    fatal:       m.chain.is_fatal_state(state),
                }
            }
            None => return Ok(()),
        };

        let was_healthy = entered.old.is_none_or(|s| s == 0);
        if was_healthy
            && state > 0
            && world.health.is_susceptible(agent, d)
            && !world.health.has_infection(agent, d)
        {
            let record = InfectionRecord::new(Trajectory::open_ended(day), None, None);
            self.open_infection(day, agent, record, world, observer)?;
        }

        if !world.health.has_infection(agent, d) {
            return Ok(());
        }

        if entered.symptoms > 0.0 && !world.health.is_symptomatic(agent, d) {
            if let Some(record) = world.health.infection_mut(agent, d) {
                record.open_symptoms_phase(day);
            }
            world.health.become_symptomatic(agent, d, day)?;
            self.tallies.symptomatic += 1;
            self.tallies.new_symptomatic += 1;
            self.tallies.total_symptomatic += 1;
        }
        if entered.infectivity > 0.0 && !world.health.is_infectious(agent, d) {
            if let Some(record) = world.health.infection_mut(agent, d) {
                record.open_infectious_phase(day);
            }
            world.health.become_infectious(agent, d, day)?;
            self.enter_potentially_infectious(agent);
        }
        if entered.symptoms <= 0.0 && world.health.is_symptomatic(agent, d) {
            if let Some(record) = world.health.infection_mut(agent, d) {
                record.set_symptoms_end(day);
            }
            world.health.resolve_symptoms(agent, d, day)?;
            self.tallies.symptomatic = self.tallies.symptomatic.saturating_sub(1);
        }
        if entered.infectivity <= 0.0 && world.health.is_infectious(agent, d) {
            if let Some(record) = world.health.infection_mut(agent, d) {
                record.set_infectious_end(day);
            }
            world.health.become_noninfectious(agent, d, day)?;
        }

        if entered.old.is_some_and(|s| s > 0) && state == 0 {
            self.recover(agent, day, world)?;
        } else if entered.fatal {
            self.case_fatality(agent, day, world)?;
        }
        Ok(())
    }
}
