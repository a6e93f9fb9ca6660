//! `epi-health` — infection records and per-agent health state.
//!
//! # Crate layout
//!
//! | Module              | Contents                                                   |
//! |---------------------|------------------------------------------------------------|
//! | [`trajectory`]      | `Trajectory` (sampled dates), `HostAttributes`             |
//! | [`natural_history`] | `NaturalHistory` trait, `RampProfile`, `FixedNaturalHistory`, `ParametricNaturalHistory` |
//! | [`infection`]       | `InfectionRecord`, `Progress`, `PeriodChange`              |
//! | [`flags`]           | `HealthFlags`                                              |
//! | [`table`]           | `HealthTable`, `HealthState`                               |
//! | [`builder`]         | `HealthTableBuilder`                                       |
//!
//! # Invariants
//!
//! - At most one open [`InfectionRecord`] per (agent, disease); a second
//!   exposure while one is open is [`EpiError::DoubleExposure`].
//! - `infectious` and `symptomatic` flags are only true while a record is
//!   open; `susceptible` is false while a record is open.
//! - Record operations on a closed (agent, disease) pair fail with
//!   [`EpiError::NoOpenInfection`].
//!
//! [`EpiError::DoubleExposure`]: epi_core::EpiError::DoubleExposure
//! [`EpiError::NoOpenInfection`]: epi_core::EpiError::NoOpenInfection

pub mod builder;
pub mod flags;
pub mod infection;
pub mod natural_history;
pub mod table;
pub mod trajectory;


pub use builder::HealthTableBuilder;
pub use flags::HealthFlags;
pub use infection::{InfectionRecord, MAX_PERIOD_DAYS, PeriodChange, Progress};
pub use natural_history::{
    AgeTable, CaseFatality, FixedNaturalHistory, InfectiousModel, NaturalHistory,
    ParametricNaturalHistory, RampProfile, SymptomsModel,
};
pub use table::{HealthState, HealthTable};
pub use trajectory::{HostAttributes, Trajectory};
