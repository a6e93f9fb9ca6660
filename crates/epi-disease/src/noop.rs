//! A transmission model that never spreads.

use epi_core::{Day, EpiRng};

use crate::{Disease, Exposure, SpreadContext, SpreadSite, Transmission};

/// A [`Transmission`] that always returns no exposures.
///
/// The default for a new [`Disease`]; useful for imported-only scenarios.
pub struct NoTransmission;

impl Transmission for NoTransmission {
    fn spread_infection(
        &self,
        _day:     Day,
        _disease: &Disease,
        _site:    SpreadSite,
        _ctx:     &SpreadContext<'_>,
        _rng:     &mut dyn EpiRng,
    ) -> Vec<Exposure> {
        vec![]
    }
}
