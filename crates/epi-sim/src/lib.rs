//! `epi-sim` — daily epidemic driver and run loop for the epi engine.
//!
//! # Daily loop
//!
//! ```text
//! for day in 0..config.total_days:
//!   for each disease (in order):
//!     Epidemic::update(day)   — import, drain event queues, advance
//!                               infections, spread, report DailyCounts
//!   Population::apply_deaths  — then terminate the dead in every epidemic
//! ```
//!
//! # Modules
//!
//! | Module        | Contents                                                   |
//! |---------------|------------------------------------------------------------|
//! | `epidemic`    | [`Epidemic`], the per-disease driver, and [`WorldMut`]     |
//! | `importation` | Import windows, candidate search, seed advancement         |
//! | `markov`      | Chain-state transitions for Markov epidemics               |
//! | `model`       | [`EpidemicModel`]                                          |
//! | `cohort`      | [`CohortTracker`] and the lagged reproduction number       |
//! | `counters`    | [`DailyCounts`]                                            |
//! | `config`      | [`EpidemicConfig`], [`SeedingMode`], [`AgeBand`]           |
//! | `observer`    | [`SimObserver`], [`InfectionEvent`]                        |
//! | `sim`         | [`Sim`] and [`SimBuilder`]                                 |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use epi_core::SimConfig;
//! use epi_sim::{Epidemic, EpidemicConfig, NoopObserver, SimBuilder};
//!
//! let (population, places) = world.build();
//! let mut sim = SimBuilder::new(SimConfig { total_days: 120, seed: 42 }, population, places)
//!     .epidemic(Epidemic::new(flu, EpidemicConfig::default()).with_imports(&imports))
//!     .build()?;
//! sim.run(&mut NoopObserver)?;
//! ```

pub mod builder;
pub mod cohort;
pub mod config;
pub mod counters;
pub mod epidemic;
pub mod error;
pub mod importation;
pub mod markov;
pub mod model;
pub mod observer;
pub mod sim;


pub use builder::SimBuilder;
pub use cohort::CohortTracker;
pub use config::{AgeBand, EpidemicConfig, SeedingMode};
pub use counters::DailyCounts;
pub use epidemic::{Epidemic, WorldMut};
pub use error::{SimError, SimResult};
pub use importation::{MAX_SEARCHES, requested_imports, seed_advance};
pub use model::EpidemicModel;
pub use observer::{InfectionEvent, NoopObserver, SimObserver};
pub use sim::Sim;
