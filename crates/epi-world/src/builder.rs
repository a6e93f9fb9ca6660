//! Fluent builder for a [`PopulationStore`] + [`PlaceRegistry`] pair.
//!
//! # Usage
//!
//! ```rust
//! use epi_core::{GeoPoint, MixingGroupKind, Places, Population};
//! use epi_world::WorldBuilder;
//!
//! let mut b = WorldBuilder::new();
//! let home = b.add_place("h1", MixingGroupKind::Household, Some(GeoPoint::new(40.44, -79.99)));
//! let school = b.add_place("s1", MixingGroupKind::School, None);
//! let kid = b.add_agent(8.0, &[home, school]).unwrap();
//!
//! let (people, places) = b.build();
//! assert_eq!(people.mixing_group(kid, MixingGroupKind::School), Some(school));
//! assert_eq!(places.members(home), &[kid]);
//! ```

use rustc_hash::FxHashMap;

use epi_core::{AgentId, GeoPoint, MixingGroupKind, PlaceId};

use crate::{PlaceRegistry, PopulationStore, WorldError, WorldResult};

/// Places first, then agents that reference them.
#[derive(Default)]
pub struct WorldBuilder {
    kinds:     Vec<MixingGroupKind>,
    locations: Vec<Option<GeoPoint>>,
    labels:    Vec<String>,
    members:   Vec<Vec<AgentId>>,
    by_label:  FxHashMap<String, PlaceId>,
    people:    PopulationStore,
}

impl WorldBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a place and return its id.  A repeated label returns the
    /// existing id unchanged.
    pub fn add_place(
        &mut self,
        label: impl Into<String>,
        kind: MixingGroupKind,
        location: Option<GeoPoint>,
    ) -> PlaceId {
        let label = label.into();
        if let Some(&id) = self.by_label.get(&label) {
            return id;
        }
        let id = PlaceId(self.kinds.len() as u32);
        self.kinds.push(kind);
        self.locations.push(location);
        self.labels.push(label.clone());
        self.members.push(Vec::new());
        self.by_label.insert(label, id);
        id
    }

    pub fn place_by_label(&self, label: &str) -> Option<PlaceId> {
        self.by_label.get(label).copied()
    }

    /// Add an agent enrolled in `places` (at most one per kind; a later
    /// place of the same kind replaces the earlier one).
    pub fn add_agent(&mut self, age: f64, places: &[PlaceId]) -> WorldResult<AgentId> {
        if let Some(&bad) = places.iter().find(|p| p.index() >= self.kinds.len()) {
            return Err(WorldError::PlaceNotFound(bad));
        }
        let agent = self.people.push_agent(age);
        for &place in places {
            let kind = self.kinds[place.index()];
            if let Some(previous) = self.people.groups[agent.index()][kind.index()] {
                self.members[previous.index()].retain(|&a| a != agent);
            }
            self.people.set_mixing_group(agent, kind, place);
            self.members[place.index()].push(agent);
        }
        Ok(agent)
    }

    pub fn agent_count(&self) -> usize {
        self.people.len()
    }

    pub fn build(self) -> (PopulationStore, PlaceRegistry) {
        let places = PlaceRegistry::new(self.kinds, self.locations, self.labels, self.members);
        (self.people, places)
    }
}
