//! Collaborator contracts between the epidemic engine and the world it runs
//! in.
//!
//! The engine never owns agents or places.  It reads ages and memberships
//! through [`Population`], marks infectious people on mixing groups through
//! [`Places`], and registers them on a sexual partner network through
//! [`PartnerNetwork`].  `epi-world` provides reference implementations;
//! applications can bring their own stores.

use crate::{AgentId, Day, DiseaseId, GeoPoint, PlaceId};

// ── MixingGroupKind ───────────────────────────────────────────────────────────

/// Kinds of place-based mixing groups, in the order the daily spread step
/// visits them.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum MixingGroupKind {
    Household,
    Neighborhood,
    School,
    Classroom,
    Workplace,
    Office,
    Hospital,
}

impl MixingGroupKind {
    /// All kinds in spread order.
    pub const ALL: [MixingGroupKind; 7] = [
        MixingGroupKind::Household,
        MixingGroupKind::Neighborhood,
        MixingGroupKind::School,
        MixingGroupKind::Classroom,
        MixingGroupKind::Workplace,
        MixingGroupKind::Office,
        MixingGroupKind::Hospital,
    ];

    /// Position in [`ALL`](Self::ALL).
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MixingGroupKind::Household    => "household",
            MixingGroupKind::Neighborhood => "neighborhood",
            MixingGroupKind::School       => "school",
            MixingGroupKind::Classroom    => "classroom",
            MixingGroupKind::Workplace    => "workplace",
            MixingGroupKind::Office       => "office",
            MixingGroupKind::Hospital     => "hospital",
        }
    }

    /// Kinds that can host infectious vectors (mosquitoes) in vector mode.
    pub fn hosts_vectors(self) -> bool {
        matches!(
            self,
            MixingGroupKind::Household | MixingGroupKind::School | MixingGroupKind::Workplace
        )
    }
}

impl std::str::FromStr for MixingGroupKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MixingGroupKind::ALL
            .into_iter()
            .find(|k| k.as_str() == s.trim())
            .ok_or_else(|| format!("unknown mixing group kind {s:?}"))
    }
}

impl std::fmt::Display for MixingGroupKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── GroupInfectionCounts ──────────────────────────────────────────────────────

/// One infected member's contribution to its mixing group's daily counters.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct GroupInfectionCounts {
    /// Exposed today.
    pub newly_infected:    bool,
    /// Symptomatic today.
    pub symptomatic:       bool,
    /// Became symptomatic today.
    pub newly_symptomatic: bool,
}

// ── Population ────────────────────────────────────────────────────────────────

/// Read access to agents plus deferred removal.
///
/// Removal requests from [`prepare_to_die`](Self::prepare_to_die) must not
/// take effect until [`apply_deaths`](Self::apply_deaths) is called at the
/// day boundary; the engine iterates agent sets in between.
pub trait Population {
    /// Size of the agent index space (dead agents keep their slot).
    fn agent_count(&self) -> usize;

    fn is_alive(&self, agent: AgentId) -> bool;

    /// Real-valued age in years.
    fn age(&self, agent: AgentId) -> f64;

    /// The agent's group of `kind`, if it has one.
    fn mixing_group(&self, agent: AgentId, kind: MixingGroupKind) -> Option<PlaceId>;

    /// Queue `agent` for removal at the end of `day`.
    fn prepare_to_die(&mut self, day: Day, agent: AgentId);

    /// Apply queued removals; returns the agents removed.
    fn apply_deaths(&mut self, day: Day) -> Vec<AgentId>;

    /// All live agents in ascending id order.
    fn live_agents(&self) -> Vec<AgentId> {
        (0..self.agent_count() as u32)
            .map(AgentId)
            .filter(|&a| self.is_alive(a))
            .collect()
    }

    /// Number of live agents.
    fn population_size(&self) -> usize {
        (0..self.agent_count() as u32)
            .filter(|&i| self.is_alive(AgentId(i)))
            .count()
    }
}

// ── Places ────────────────────────────────────────────────────────────────────

/// Mixing groups: membership, presence, and the per-day infectious marker.
pub trait Places {
    fn place_count(&self) -> usize;

    fn kind(&self, place: PlaceId) -> MixingGroupKind;

    /// Enrolled members of `place`.
    fn members(&self, place: PlaceId) -> &[AgentId];

    fn location(&self, place: PlaceId) -> Option<GeoPoint>;

    /// Every place of `kind`, in ascending id order.
    fn places_of_kind(&self, kind: MixingGroupKind) -> &[PlaceId];

    /// Households within `radius_km` of `center`; `None` means anywhere.
    fn households_within(&self, center: GeoPoint, radius_km: Option<f64>) -> Vec<PlaceId>;

    /// Is `agent` scheduled to be at `place` on `day`?
    fn is_present(&self, day: Day, agent: AgentId, place: PlaceId) -> bool;

    fn add_infectious_person(&mut self, place: PlaceId, disease: DiseaseId, agent: AgentId);

    fn clear_infectious_people(&mut self, place: PlaceId, disease: DiseaseId);

    fn infectious_people(&self, place: PlaceId, disease: DiseaseId) -> &[AgentId];

    /// Infectious vectors at `place` (vector-borne diseases only).
    fn infectious_vectors(&self, _place: PlaceId, _disease: DiseaseId) -> u32 {
        0
    }

    fn record_infection_counts(
        &mut self,
        _day:     Day,
        _place:   PlaceId,
        _disease: DiseaseId,
        _counts:  GroupInfectionCounts,
    ) {
    }

    fn record_case_fatality(&mut self, _day: Day, _place: PlaceId, _disease: DiseaseId) {}
}

// ── PartnerNetwork ────────────────────────────────────────────────────────────

/// Sexual partner network used by sexual-contact diseases instead of
/// place-based spread.
pub trait PartnerNetwork {
    fn add_infectious_person(&mut self, disease: DiseaseId, agent: AgentId);

    fn clear_infectious_people(&mut self, disease: DiseaseId);

    fn infectious_people(&self, disease: DiseaseId) -> &[AgentId];

    fn partners(&self, agent: AgentId) -> &[AgentId];
}
