//! Engine error type.
//!
//! The invariant-violation variants (`DoubleExposure`, `NoOpenInfection`,
//! `EventInPast`, `DayAlreadyDrained`) are fatal: they propagate out of the
//! daily update and stop the run.  Each names the agent, disease, and day
//! involved so the defect can be traced.

use thiserror::Error;

use crate::{AgentId, Day, DiseaseId};

/// The top-level error type for `epi-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum EpiError {
    #[error("double exposure: {agent} already has an open {disease} infection on {day}")]
    DoubleExposure {
        agent:   AgentId,
        disease: DiseaseId,
        day:     Day,
    },

    #[error("{agent} has no open {disease} infection on {day}")]
    NoOpenInfection {
        agent:   AgentId,
        disease: DiseaseId,
        day:     Day,
    },

    #[error("cannot schedule {agent} on {day}: queue already drained through {drained}")]
    EventInPast {
        agent:   AgentId,
        day:     Day,
        drained: Day,
    },

    #[error("event queue for {day} was already drained")]
    DayAlreadyDrained { day: Day },

    #[error("agent {0} not found")]
    AgentNotFound(AgentId),

    #[error("disease {0} not found")]
    DiseaseNotFound(DiseaseId),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand result type for all `epi-*` crates.
pub type EpiResult<T> = Result<T, EpiError>;
