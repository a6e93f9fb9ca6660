//! The `Transmission` trait — the extension point for spread models.

use epi_core::{Day, EpiRng};

use crate::{Disease, Exposure, SpreadContext, SpreadSite};

/// Pluggable force of infection.
///
/// Called once per active site per day.  For [`SpreadSite::Place`] the
/// infectious agents of the site are `ctx.places.infectious_people(place,
/// disease.id())`; for [`SpreadSite::Network`] they are
/// `ctx.network.infectious_people(disease.id())`.
///
/// Implementations propose exposures and never mutate the world; every
/// random draw goes through `rng` so runs are reproducible.
pub trait Transmission: Send + Sync {
    fn spread_infection(
        &self,
        day:     Day,
        disease: &Disease,
        site:    SpreadSite,
        ctx:     &SpreadContext<'_>,
        rng:     &mut dyn EpiRng,
    ) -> Vec<Exposure>;
}
