//! Exogenous case importation and seed advancement.
//!
//! Each active [`ImportWindow`] asks for a number of cases.  Candidates are
//! the susceptible, living, age-eligible members of households inside the
//! window's search circle.  When the circle holds too few candidates, all of
//! them are exposed and the radius doubles, up to [`MAX_SEARCHES`] times.
//! A window without a center searches every household once.

use log::{debug, warn};

use epi_core::{AgentId, Day, EpiResult, EpiRng, GeoPoint, MixingGroupKind};
use epi_health::{HostAttributes, InfectionRecord};
use epi_schedule::ImportWindow;

use crate::epidemic::{Epidemic, WorldMut};
use crate::{SeedingMode, SimObserver};

/// Searches per window before giving up on a shortfall.
pub const MAX_SEARCHES: usize = 10;

/// Cases `window` asks for today: successful attempts, at least
/// `min_successful`.
pub fn requested_imports(window: &ImportWindow, rng: &mut dyn EpiRng) -> usize {
    let successes = (0..window.attempts)
        .filter(|_| rng.gen_bool(window.attempt_prob))
        .count();
    successes.max(window.min_successful as usize)
}

impl Epidemic {
    /// Step ① of the daily update.  Markov epidemics import nothing.
    pub(crate) fn import_infections(
        &mut self,
        day: Day,
        world: &mut WorldMut<'_>,
        rng: &mut dyn EpiRng,
        observer: &mut dyn SimObserver,
    ) -> EpiResult<()> {
        if self.is_markov() {
            return Ok(());
        }
        let windows: Vec<ImportWindow> = self.imports().active(day, self.id()).cloned().collect();
        for window in &windows {
            self.import_window(day, window, world, rng, observer)?;
        }
        Ok(())
    }

    fn import_window(
        &mut self,
        day: Day,
        window: &ImportWindow,
        world: &mut WorldMut<'_>,
        rng: &mut dyn EpiRng,
        observer: &mut dyn SimObserver,
    ) -> EpiResult<()> {
        let requested = requested_imports(window, rng);
        if requested == 0 {
            return Ok(());
        }

        let mut imported = 0;
        let mut radius = window.radius_km;
        for search in 1..=MAX_SEARCHES {
            let mut pool = self.import_candidates(window.center, radius, world);
            let remaining = requested - imported;
            debug!("import search {search}: seeking {remaining}, found {}", pool.len());

            if pool.len() >= remaining {
                for _ in 0..remaining {
                    let agent = pool.swap_remove(rng.below(pool.len()));
                    self.import_case(day, agent, world, rng, observer)?;
                }
                debug!("{}: imported {requested} cases on {day}", self.disease().name());
                return Ok(());
            }

            for agent in pool {
                self.import_case(day, agent, world, rng, observer)?;
                imported += 1;
            }
            match (window.center, radius) {
                (Some(_), Some(r)) => radius = Some(2.0 * r),
                _ => break,
            }
        }

        warn!(
            "{}: imported only {imported} of {requested} cases on {day}",
            self.disease().name()
        );
        Ok(())
    }

    /// Susceptible, living, age-eligible household members within
    /// `radius_km` of `center`.  Without a center every household counts.
    pub(crate) fn import_candidates(
        &self,
        center: Option<GeoPoint>,
        radius_km: Option<f64>,
        world: &WorldMut<'_>,
    ) -> Vec<AgentId> {
        let d = self.id();
        let band = self.config().import_age_band;
        let households = match center {
            Some(c) => world.places.households_within(c, radius_km),
            None => world.places.places_of_kind(MixingGroupKind::Household).to_vec(),
        };
        households
            .into_iter()
            .flat_map(|h| world.places.members(h).iter().copied())
            .filter(|&a| {
                world.health.is_susceptible(a, d)
                    && world.population.is_alive(a)
                    && band.contains(world.population.age(a))
            })
            .collect()
    }

    /// Expose `agent` as an imported case and advance it per the seeding
    /// mode.
    fn import_case(
        &mut self,
        day: Day,
        agent: AgentId,
        world: &mut WorldMut<'_>,
        rng: &mut dyn EpiRng,
        observer: &mut dyn SimObserver,
    ) -> EpiResult<()> {
        let history = self.disease().natural_history();
        let host = HostAttributes::new(world.population.age(agent));
        let mut record = InfectionRecord::new(history.sample(&host, day, rng), None, None)
            .with_profiles(history);

        if let Some(days) = seed_advance(self.config().seeding, &record, rng) {
            if days > 0 {
                record.advance(days);
                debug!("seed {agent} advanced {days} days");
            }
        }
        self.open_infection(day, agent, record, world, observer)
    }
}

/// Days to move a fresh imported infection along its trajectory, or `None`
/// when it stays newly exposed.
pub fn seed_advance(mode: SeedingMode, record: &InfectionRecord, rng: &mut dyn EpiRng) -> Option<i32> {
    let exposure = record.exposure_date();
    match mode {
        SeedingMode::Exposed => None,
        SeedingMode::Random => {
            let duration = record.infectious_end()? - exposure;
            (duration > 0).then(|| rng.below(duration as usize) as i32)
        }
        SeedingMode::Infectious | SeedingMode::Mixed { .. } => {
            let onset = record.infectious_start()? - exposure;
            rng.gen_bool(mode.infectious_fraction()).then_some(onset)
        }
    }
}
