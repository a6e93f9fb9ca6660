//! CSV loaders for synthetic populations.
//!
//! # places.csv
//!
//! ```csv
//! label,kind,lat,lon
//! h1,household,40.44,-79.99
//! s1,school,,
//! ```
//!
//! # people.csv
//!
//! Agent ids follow row order.  Membership columns hold place labels and may
//! be empty.
//!
//! ```csv
//! age,household,neighborhood,school,classroom,workplace,office,hospital
//! 8,h1,,s1,,,,
//! ```
//!
//! # partnerships.csv
//!
//! ```csv
//! agent_a,agent_b
//! 0,1
//! ```

use std::io::Read;
use std::path::Path;

use log::info;
use serde::Deserialize;

use epi_core::{AgentId, GeoPoint, MixingGroupKind};

use crate::{ContactNetwork, PlaceRegistry, PopulationStore, WorldBuilder, WorldError, WorldResult};

// ── CSV records ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct PlaceRecord {
    label: String,
    kind:  String,
    lat:   Option<f32>,
    lon:   Option<f32>,
}

#[derive(Deserialize)]
struct PersonRecord {
    age:          f64,
    household:    Option<String>,
    neighborhood: Option<String>,
    school:       Option<String>,
    classroom:    Option<String>,
    workplace:    Option<String>,
    office:       Option<String>,
    hospital:     Option<String>,
}

impl PersonRecord {
    fn memberships(&self) -> impl Iterator<Item = &str> {
        [
            &self.household,
            &self.neighborhood,
            &self.school,
            &self.classroom,
            &self.workplace,
            &self.office,
            &self.hospital,
        ]
        .into_iter()
        .filter_map(|label| label.as_deref())
        .filter(|label| !label.is_empty())
    }
}

#[derive(Deserialize)]
struct PartnershipRecord {
    agent_a: u32,
    agent_b: u32,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load places then people from two CSV files.
pub fn load_world_csv(places: &Path, people: &Path) -> WorldResult<(PopulationStore, PlaceRegistry)> {
    let places_file = std::fs::File::open(places)?;
    let people_file = std::fs::File::open(people)?;
    load_world_readers(places_file, people_file)
}

/// Like [`load_world_csv`] but accepts any `Read` sources.
pub fn load_world_readers<P: Read, Q: Read>(
    places: P,
    people: Q,
) -> WorldResult<(PopulationStore, PlaceRegistry)> {
    let mut builder = WorldBuilder::new();

    let mut reader = csv::Reader::from_reader(places);
    for (line, result) in reader.deserialize::<PlaceRecord>().enumerate() {
        let row = result.map_err(|e| WorldError::Parse(e.to_string()))?;
        let kind: MixingGroupKind = row
            .kind
            .parse()
            .map_err(|e| WorldError::Parse(format!("places line {}: {e}", line + 2)))?;
        if builder.place_by_label(&row.label).is_some() {
            return Err(WorldError::DuplicatePlaceLabel(row.label));
        }
        let location = match (row.lat, row.lon) {
            (Some(lat), Some(lon)) => Some(GeoPoint::new(lat, lon)),
            _ => None,
        };
        builder.add_place(row.label, kind, location);
    }

    let mut reader = csv::Reader::from_reader(people);
    for result in reader.deserialize::<PersonRecord>() {
        let row = result.map_err(|e| WorldError::Parse(e.to_string()))?;
        let places = row
            .memberships()
            .map(|label| {
                builder
                    .place_by_label(label)
                    .ok_or_else(|| WorldError::UnknownPlaceLabel(label.to_string()))
            })
            .collect::<WorldResult<Vec<_>>>()?;
        builder.add_agent(row.age, &places)?;
    }

    let (people, registry) = builder.build();
    info!("loaded {} agents in {} places", people.len(), registry.kinds.len());
    Ok((people, registry))
}

/// Load a partner network for `agent_count` agents.
pub fn load_partnerships_csv(path: &Path, agent_count: usize) -> WorldResult<ContactNetwork> {
    let file = std::fs::File::open(path)?;
    load_partnerships_reader(file, agent_count)
}

/// Like [`load_partnerships_csv`] but accepts any `Read` source.
pub fn load_partnerships_reader<R: Read>(reader: R, agent_count: usize) -> WorldResult<ContactNetwork> {
    let mut network = ContactNetwork::new(agent_count);
    let mut reader = csv::Reader::from_reader(reader);
    for result in reader.deserialize::<PartnershipRecord>() {
        let row = result.map_err(|e| WorldError::Parse(e.to_string()))?;
        let (a, b) = (AgentId(row.agent_a), AgentId(row.agent_b));
        if let Some(&bad) = [a, b].iter().find(|id| id.index() >= agent_count) {
            return Err(WorldError::AgentNotFound(bad));
        }
        network.add_partnership(a, b);
    }
    Ok(network)
}
