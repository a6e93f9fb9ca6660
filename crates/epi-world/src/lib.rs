//! `epi-world` — the world an epidemic runs in.
//!
//! Reference implementations of the `epi_core` collaborator traits, sized
//! for synthetic populations of up to a few million agents.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                    |
//! |----------------|-------------------------------------------------------------|
//! | [`population`] | `PopulationStore` (SoA ages, liveness, memberships)         |
//! | [`places`]     | `PlaceRegistry` (members, R-tree of households, closures)   |
//! | [`network`]    | `ContactNetwork` (undirected partner lists)                 |
//! | [`builder`]    | `WorldBuilder` — places and agents in one pass              |
//! | [`loader`]     | CSV loaders for places, people, and partnerships            |
//! | [`error`]      | `WorldError`, `WorldResult<T>`                              |

pub mod builder;
pub mod error;
pub mod loader;
pub mod network;
pub mod places;
pub mod population;

#[cfg(test)]
mod tests;

pub use builder::WorldBuilder;
pub use error::{WorldError, WorldResult};
pub use loader::{
    load_partnerships_csv, load_partnerships_reader, load_world_csv, load_world_readers,
};
pub use network::ContactNetwork;
pub use places::{Closure, GroupStats, PlaceRegistry};
pub use population::PopulationStore;
