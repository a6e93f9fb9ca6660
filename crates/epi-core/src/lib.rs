//! `epi-core` — foundational types for the `epi` epidemic engine.
//!
//! Every other `epi-*` crate depends on this one.  It has no `epi-*`
//! dependencies and few external ones (`rand`, `rand_distr`, `thiserror`,
//! plus optional `serde`).
//!
//! # What lives here
//!
//! | Module      | Contents                                                    |
//! |-------------|-------------------------------------------------------------|
//! | [`ids`]     | `AgentId`, `PlaceId`, `DiseaseId`                           |
//! | [`time`]    | `Day`, `SimClock`, `SimConfig`                              |
//! | [`geo`]     | `GeoPoint`, haversine distance, radius → bbox helper        |
//! | [`rng`]     | `EpiRng` trait, `SimRng` (production), `ScriptedRng` (tests)|
//! | [`world`]   | `Population`, `Places`, `PartnerNetwork` collaborator traits|
//! | [`error`]   | `EpiError`, `EpiResult`                                     |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to ids, days, and config.   |

pub mod error;
pub mod geo;
pub mod ids;
pub mod rng;
pub mod time;
pub mod world;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{EpiError, EpiResult};
pub use geo::GeoPoint;
pub use ids::{AgentId, DiseaseId, PlaceId};
pub use rng::{EpiRng, ScriptedRng, SimRng};
pub use time::{Day, SimClock, SimConfig};
pub use world::{GroupInfectionCounts, MixingGroupKind, PartnerNetwork, Places, Population};
