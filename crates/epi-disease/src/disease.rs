//! Disease definition.

use std::fmt;
use std::str::FromStr;

use epi_core::{DiseaseId, EpiError};
use epi_health::NaturalHistory;

use crate::{NoTransmission, Transmission};

/// Where a disease spreads.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum TransmissionMode {
    /// Through co-located mixing groups.
    #[default]
    Respiratory,
    /// Through mixing groups, which also count as active while they host
    /// infectious vectors.
    Vector,
    /// Through the partner network only.
    Sexual,
}

impl TransmissionMode {
    pub fn as_str(self) -> &'static str {
        match self {
            TransmissionMode::Respiratory => "respiratory",
            TransmissionMode::Vector      => "vector",
            TransmissionMode::Sexual      => "sexual",
        }
    }
}

impl FromStr for TransmissionMode {
    type Err = EpiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "respiratory" => Ok(TransmissionMode::Respiratory),
            "vector" => Ok(TransmissionMode::Vector),
            "sexual" => Ok(TransmissionMode::Sexual),
            other => Err(EpiError::Parse(format!("unknown transmission mode {other:?}"))),
        }
    }
}

impl fmt::Display for TransmissionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A disease: identity, transmissibility, natural history, and spreader.
pub struct Disease {
    id:               DiseaseId,
    name:             String,
    transmissibility: f64,
    mode:             TransmissionMode,
    natural_history:  Box<dyn NaturalHistory>,
    transmission:     Box<dyn Transmission>,
}

impl Disease {
    /// A respiratory disease with transmissibility 1 that never spreads
    /// until a [`Transmission`] is attached.
    pub fn new(id: DiseaseId, name: impl Into<String>, natural_history: impl NaturalHistory + 'static) -> Self {
        Self {
            id,
            name:             name.into(),
            transmissibility: 1.0,
            mode:             TransmissionMode::default(),
            natural_history:  Box::new(natural_history),
            transmission:     Box::new(NoTransmission),
        }
    }

    pub fn with_transmissibility(mut self, transmissibility: f64) -> Self {
        self.transmissibility = transmissibility;
        self
    }

    pub fn with_mode(mut self, mode: TransmissionMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_transmission(mut self, transmission: impl Transmission + 'static) -> Self {
        self.transmission = Box::new(transmission);
        self
    }

    #[inline]
    pub fn id(&self) -> DiseaseId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn transmissibility(&self) -> f64 {
        self.transmissibility
    }

    /// Zero transmissibility: infections never become infectious.
    #[inline]
    pub fn is_communicable(&self) -> bool {
        self.transmissibility > 0.0
    }

    #[inline]
    pub fn mode(&self) -> TransmissionMode {
        self.mode
    }

    pub fn natural_history(&self) -> &dyn NaturalHistory {
        self.natural_history.as_ref()
    }

    pub fn transmission(&self) -> &dyn Transmission {
        self.transmission.as_ref()
    }
}

impl fmt::Debug for Disease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Disease")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("transmissibility", &self.transmissibility)
            .field("mode", &self.mode)
            .finish_non_exhaustive()
    }
}
