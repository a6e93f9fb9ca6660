//! `epi-disease` — what a disease is and how it spreads.
//!
//! # Crate layout
//!
//! | Module           | Contents                                                   |
//! |------------------|------------------------------------------------------------|
//! | [`disease`]      | `Disease`, `TransmissionMode`                              |
//! | [`exposure`]     | `Exposure`, `SpreadSite`                                   |
//! | [`context`]      | `SpreadContext<'a>` — read-only view handed to spreaders   |
//! | [`transmission`] | `Transmission` trait                                       |
//! | [`contact`]      | `ContactTransmission` — contact-rate and pairwise models   |
//! | [`noop`]         | `NoTransmission` — never produces exposures                |
//! | [`markov`]       | `MarkovChain`, `MarkovState`                               |
//!
//! # Design notes
//!
//! Spreading is split in two phases, like the rest of the engine:
//!
//! 1. **Propose**: `Transmission::spread_infection` reads the world through
//!    `&SpreadContext` and returns `Vec<Exposure>`.  No mutation.
//! 2. **Apply**: the epidemic driver (epi-sim) opens infection records for
//!    each exposure in order, skipping infectees that are no longer
//!    susceptible.
//!
//! Transmission models therefore only need `Send + Sync`.

pub mod contact;
pub mod context;
pub mod disease;
pub mod exposure;
pub mod markov;
pub mod noop;
pub mod transmission;

#[cfg(test)]
mod tests;

pub use contact::ContactTransmission;
pub use context::SpreadContext;
pub use disease::{Disease, TransmissionMode};
pub use exposure::{Exposure, SpreadSite};
pub use markov::{MarkovChain, MarkovState};
pub use noop::NoTransmission;
pub use transmission::Transmission;
