//! Read-only world view passed to transmission models.

use epi_core::{PartnerNetwork, Places, Population};
use epi_health::HealthTable;

/// Everything a [`Transmission`][crate::Transmission] may read while
/// proposing exposures.
///
/// Built by the epidemic driver once per spread call; the driver holds no
/// mutable borrow of these structures while the context is live.
pub struct SpreadContext<'a> {
    pub health:     &'a HealthTable,
    pub population: &'a dyn Population,
    pub places:     &'a dyn Places,
    /// `None` when the run has no partner network.
    pub network:    Option<&'a dyn PartnerNetwork>,
}

impl<'a> SpreadContext<'a> {
    #[inline]
    pub fn new(
        health:     &'a HealthTable,
        population: &'a dyn Population,
        places:     &'a dyn Places,
        network:    Option<&'a dyn PartnerNetwork>,
    ) -> Self {
        Self { health, population, places, network }
    }
}
