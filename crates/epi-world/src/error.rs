//! World-construction error type.

use thiserror::Error;

use epi_core::{AgentId, PlaceId};

/// Errors produced by `epi-world`.
#[derive(Debug, Error)]
pub enum WorldError {
    #[error("place {0} not found")]
    PlaceNotFound(PlaceId),

    #[error("unknown place label {0:?}")]
    UnknownPlaceLabel(String),

    #[error("duplicate place label {0:?}")]
    DuplicatePlaceLabel(String),

    #[error("agent {0} not found")]
    AgentNotFound(AgentId),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type WorldResult<T> = Result<T, WorldError>;
