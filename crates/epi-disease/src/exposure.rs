//! Proposed infections returned by transmission models.

use epi_core::{AgentId, PlaceId};

/// Where a spread attempt takes place.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SpreadSite {
    Place(PlaceId),
    /// The partner network.
    Network,
}

impl SpreadSite {
    /// The mixing group recorded on the new infection, if any.
    pub fn place(self) -> Option<PlaceId> {
        match self {
            SpreadSite::Place(p) => Some(p),
            SpreadSite::Network => None,
        }
    }
}

/// One successful transmission.
///
/// The driver applies exposures in the order returned.  `infector` is
/// `None` for vector-borne infections.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Exposure {
    pub infectee: AgentId,
    pub infector: Option<AgentId>,
    pub site:     SpreadSite,
}
