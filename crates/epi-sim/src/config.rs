//! Per-disease epidemic configuration.
//!
//! Loaded from JSON by applications:
//!
//! ```json
//! { "seeding": "exposed:0.7;infectious:0.3", "import_age_band": { "lower": 18.0 }, "rr_lag": 7 }
//! ```

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use epi_core::EpiError;

// ── SeedingMode ───────────────────────────────────────────────────────────────

/// How far along its trajectory an imported case starts.
#[derive(Copy, Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(try_from = "String")]
pub enum SeedingMode {
    /// Newly exposed on the import day.
    #[default]
    Exposed,
    /// Moved back a uniform number of days in `[0, duration)`, where the
    /// duration runs from exposure to the end of infectiousness.
    Random,
    /// Moved back to the onset of infectiousness.
    Infectious,
    /// Moved back to infectious onset with probability
    /// `infectious_fraction`, otherwise newly exposed.
    Mixed { infectious_fraction: f64 },
}

impl SeedingMode {
    /// Probability that a seed starts at infectious onset.
    pub fn infectious_fraction(self) -> f64 {
        match self {
            SeedingMode::Exposed | SeedingMode::Random => 0.0,
            SeedingMode::Infectious => 1.0,
            SeedingMode::Mixed { infectious_fraction } => infectious_fraction,
        }
    }
}

impl FromStr for SeedingMode {
    type Err = EpiError;

    /// Accepts `exposed`, `random`, `infectious`, or
    /// `exposed:<x>;infectious:<y>` with `x + y` within 0.01 of 1.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s {
            "exposed" => return Ok(SeedingMode::Exposed),
            "random" => return Ok(SeedingMode::Random),
            "infectious" => return Ok(SeedingMode::Infectious),
            _ => {}
        }

        let bad = || EpiError::Parse(format!("invalid seeding mode {s:?}"));
        let (exposed, infectious) = s.split_once(';').ok_or_else(bad)?;
        let fraction = |part: &str, key: &str| -> Result<f64, EpiError> {
            let (name, value) = part.trim().split_once(':').ok_or_else(bad)?;
            if name.trim() != key {
                return Err(bad());
            }
            value.trim().parse::<f64>().map_err(|_| bad())
        };
        let exposed = fraction(exposed, "exposed")?;
        let infectious = fraction(infectious, "infectious")?;
        let total = exposed + infectious;
        if !(0.99..=1.01).contains(&total) {
            return Err(EpiError::Parse(format!(
                "seeding fractions in {s:?} sum to {total}, expected 1"
            )));
        }
        Ok(SeedingMode::Mixed { infectious_fraction: infectious })
    }
}

impl TryFrom<String> for SeedingMode {
    type Error = EpiError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl fmt::Display for SeedingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeedingMode::Exposed => f.write_str("exposed"),
            SeedingMode::Random => f.write_str("random"),
            SeedingMode::Infectious => f.write_str("infectious"),
            SeedingMode::Mixed { infectious_fraction } => {
                write!(f, "exposed:{};infectious:{infectious_fraction}", 1.0 - infectious_fraction)
            }
        }
    }
}

// ── AgeBand ───────────────────────────────────────────────────────────────────

/// Inclusive age range; a missing bound is open.
#[derive(Copy, Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AgeBand {
    pub lower: Option<f64>,
    pub upper: Option<f64>,
}

impl AgeBand {
    pub fn new(lower: f64, upper: f64) -> Self {
        Self { lower: Some(lower), upper: Some(upper) }
    }

    #[inline]
    pub fn contains(&self, age: f64) -> bool {
        self.lower.is_none_or(|lo| age >= lo) && self.upper.is_none_or(|hi| age <= hi)
    }
}

// ── EpidemicConfig ────────────────────────────────────────────────────────────

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct EpidemicConfig {
    pub seeding:         SeedingMode,
    /// Only agents in this band are eligible for importation.
    pub import_age_band: AgeBand,
    /// Days between a cohort's exposure and its reproduction number being
    /// reported.  0 disables the RR counter.
    pub rr_lag:          u32,
}

impl EpidemicConfig {
    pub fn with_seeding(mut self, seeding: SeedingMode) -> Self {
        self.seeding = seeding;
        self
    }

    pub fn with_import_age_band(mut self, band: AgeBand) -> Self {
        self.import_age_band = band;
        self
    }

    pub fn with_rr_lag(mut self, lag: u32) -> Self {
        self.rr_lag = lag;
        self
    }
}
