//! Natural-history models: how an infection unfolds in a host.
//!
//! # Design
//!
//! A [`NaturalHistory`] is consulted once at exposure to draw a
//! [`Trajectory`], and then daily for the case-fatality check.  The ramp
//! profiles shaping infectivity and symptom severity over a period are
//! plain values copied into the record at exposure, so the record can
//! answer `infectivity(day)` without holding a reference to its model.
//!
//! | Model                          | Dates                                     |
//! |--------------------------------|-------------------------------------------|
//! | [`FixedNaturalHistory`]        | integer periods, probability of symptoms  |
//! | [`ParametricNaturalHistory`]   | lognormal or offset periods, age tables   |

use epi_core::{Day, EpiRng};

use crate::trajectory::{HostAttributes, Trajectory};

// ── RampProfile ───────────────────────────────────────────────────────────────

/// Shape of a level over a period, in fractional position `f ∈ (0, 1]`.
///
/// The level rises as `exp(f / full_start - 1)` until `full_start`, stays at
/// 1 through `full_end`, then decays as `exp(-3.5 (f - full_end) / (1 - full_end))`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RampProfile {
    pub full_start: f64,
    pub full_end:   f64,
}

impl RampProfile {
    /// Full strength for the whole period.
    pub const FLAT: RampProfile = RampProfile { full_start: 0.0, full_end: 1.0 };

    pub fn new(full_start: f64, full_end: f64) -> Self {
        Self { full_start, full_end }
    }

    /// Level on `day` of a period `[start, end)`; 0 outside it.
    pub fn level(&self, start: Day, end: Day, day: Day) -> f64 {
        if day < start || day >= end {
            return 0.0;
        }
        let f = f64::from(day - start + 1) / f64::from(end - start + 1);
        if f < self.full_start {
            (f / self.full_start - 1.0).exp()
        } else if f <= self.full_end {
            1.0
        } else {
            (-3.5 * (f - self.full_end) / (1.0 - self.full_end)).exp()
        }
    }
}

impl Default for RampProfile {
    fn default() -> Self {
        Self::FLAT
    }
}

// ── NaturalHistory ────────────────────────────────────────────────────────────

/// Disease course model.
pub trait NaturalHistory: Send + Sync {
    /// Draw every date of a new infection exposed on `exposure`.
    fn sample(&self, host: &HostAttributes, exposure: Day, rng: &mut dyn EpiRng) -> Trajectory;

    fn full_infectivity_start(&self) -> f64 {
        0.0
    }

    fn full_infectivity_end(&self) -> f64 {
        1.0
    }

    fn full_symptoms_start(&self) -> f64 {
        0.0
    }

    fn full_symptoms_end(&self) -> f64 {
        1.0
    }

    /// Infectivity scale for cases that never develop symptoms.
    fn asymptomatic_infectivity(&self) -> f64 {
        1.0
    }

    fn case_fatality_enabled(&self) -> bool {
        false
    }

    /// Whether a symptomatic host dies today.
    fn is_fatal(
        &self,
        _host: &HostAttributes,
        _symptoms: f64,
        _days_symptomatic: i32,
        _rng: &mut dyn EpiRng,
    ) -> bool {
        false
    }

    fn infectivity_profile(&self) -> RampProfile {
        RampProfile::new(self.full_infectivity_start(), self.full_infectivity_end())
    }

    fn symptoms_profile(&self) -> RampProfile {
        RampProfile::new(self.full_symptoms_start(), self.full_symptoms_end())
    }
}

// ── FixedNaturalHistory ───────────────────────────────────────────────────────

/// Deterministic whole-day periods.
///
/// A negative `latent_period` means the host never becomes infectious.  The
/// only random draw is whether symptoms develop, and only when
/// `prob_symptoms` lies strictly between 0 and 1.
#[derive(Clone, Debug, PartialEq)]
pub struct FixedNaturalHistory {
    pub latent_period:            i32,
    pub infectious_duration:      Option<i32>,
    pub incubation_period:        i32,
    pub symptoms_duration:        Option<i32>,
    pub prob_symptoms:            f64,
    pub immunity_duration:        Option<i32>,
    pub asymptomatic_infectivity: f64,
}

impl FixedNaturalHistory {
    /// Infectious from `exposure + latent` for `duration` days, never
    /// symptomatic, lifelong immunity.
    pub fn new(latent: i32, duration: i32) -> Self {
        Self {
            latent_period:            latent,
            infectious_duration:      Some(duration),
            incubation_period:        0,
            symptoms_duration:        None,
            prob_symptoms:            0.0,
            immunity_duration:        None,
            asymptomatic_infectivity: 1.0,
        }
    }

    /// Symptomatic from `exposure + incubation` for `duration` days with
    /// probability `prob`.
    pub fn with_symptoms(mut self, incubation: i32, duration: i32, prob: f64) -> Self {
        self.incubation_period = incubation;
        self.symptoms_duration = Some(duration);
        self.prob_symptoms = prob;
        self
    }

    /// Immunity wanes `days` after exposure.
    pub fn with_immunity(mut self, days: i32) -> Self {
        self.immunity_duration = Some(days);
        self
    }

    pub fn with_asymptomatic_infectivity(mut self, scale: f64) -> Self {
        self.asymptomatic_infectivity = scale;
        self
    }
}

impl NaturalHistory for FixedNaturalHistory {
    fn sample(&self, _host: &HostAttributes, exposure: Day, rng: &mut dyn EpiRng) -> Trajectory {
        let will_develop_symptoms = rng.gen_bool(self.prob_symptoms);

        let (infectious_start, infectious_end) = if self.latent_period < 0 {
            (None, None)
        } else {
            let start = exposure + self.latent_period;
            (Some(start), self.infectious_duration.map(|d| start + d))
        };

        let (symptoms_start, symptoms_end) = if will_develop_symptoms {
            let start = exposure + self.incubation_period;
            (Some(start), self.symptoms_duration.map(|d| start + d))
        } else {
            (None, None)
        };

        Trajectory {
            exposure,
            infectious_start,
            infectious_end,
            symptoms_start,
            symptoms_end,
            immunity_end: self.immunity_duration.map(|d| exposure + d),
            will_develop_symptoms,
        }
    }

    fn asymptomatic_infectivity(&self) -> f64 {
        self.asymptomatic_infectivity
    }
}

// ── ParametricNaturalHistory ──────────────────────────────────────────────────

/// Piecewise-constant value by age band.
///
/// `upper_bounds[i]` is the exclusive upper age of band `i`; ages at or past
/// the last bound fall in the last band.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AgeTable {
    upper_bounds: Vec<f64>,
    values:       Vec<f64>,
}

impl AgeTable {
    /// The same value at every age.
    pub fn uniform(value: f64) -> Self {
        Self { upper_bounds: Vec::new(), values: vec![value] }
    }

    /// `bands` is `(upper_bound, value)` pairs in ascending age.
    pub fn from_bands(bands: &[(f64, f64)]) -> Self {
        Self {
            upper_bounds: bands.iter().map(|&(upper, _)| upper).collect(),
            values:       bands.iter().map(|&(_, v)| v).collect(),
        }
    }

    pub fn find(&self, age: f64) -> f64 {
        let band = self
            .upper_bounds
            .iter()
            .position(|&upper| age < upper)
            .unwrap_or(self.values.len().saturating_sub(1));
        self.values.get(band).copied().unwrap_or(0.0)
    }
}

/// How symptom dates are drawn.
#[derive(Clone, Debug, PartialEq)]
pub enum SymptomsModel {
    /// Incubation scale `½ ln dispersion`; duration scale `ln dispersion`.
    Lognormal {
        incubation_median:     f64,
        incubation_dispersion: f64,
        duration_median:       f64,
        duration_dispersion:   f64,
    },
    Fixed { incubation: i32, duration: Option<i32> },
}

/// How infectious dates are drawn.
#[derive(Clone, Debug, PartialEq)]
pub enum InfectiousModel {
    Lognormal {
        latent_median:       f64,
        latent_dispersion:   f64,
        duration_median:     f64,
        duration_dispersion: f64,
    },
    /// Both offsets measured from symptom onset.
    OffsetFromSymptomsStart { start: f64, end: f64 },
    /// Start offset from symptom onset, end offset from symptom end.
    OffsetFromSymptoms { start: f64, end: f64 },
    /// Negative `latent` means never infectious.
    Fixed { latent: i32, duration: Option<i32> },
}

/// Age- and day-dependent probability of death while symptomatic.
#[derive(Clone, Debug, PartialEq)]
pub struct CaseFatality {
    pub min_symptoms: f64,
    pub prob_by_age:  AgeTable,
    /// Indexed by days symptomatic; the last entry covers every later day.
    pub prob_by_day:  Vec<f64>,
}

impl CaseFatality {
    pub fn probability(&self, age: f64, days_symptomatic: i32) -> f64 {
        let day_factor = match self.prob_by_day.len() {
            0 => 1.0,
            n => {
                let idx = usize::try_from(days_symptomatic).unwrap_or(0).min(n - 1);
                self.prob_by_day[idx]
            }
        };
        self.prob_by_age.find(age) * day_factor
    }
}

/// Natural history with lognormal or offset-driven periods.
#[derive(Clone, Debug, PartialEq)]
pub struct ParametricNaturalHistory {
    pub symptoms:                 SymptomsModel,
    pub infectious:               InfectiousModel,
    pub prob_symptoms:            AgeTable,
    pub immunity_duration:        Option<i32>,
    pub infectivity:              RampProfile,
    pub symptoms_ramp:            RampProfile,
    pub asymptomatic_infectivity: f64,
    pub case_fatality:            Option<CaseFatality>,
}

impl ParametricNaturalHistory {
    pub fn new(symptoms: SymptomsModel, infectious: InfectiousModel) -> Self {
        Self {
            symptoms,
            infectious,
            prob_symptoms:            AgeTable::uniform(1.0),
            immunity_duration:        None,
            infectivity:              RampProfile::FLAT,
            symptoms_ramp:            RampProfile::FLAT,
            asymptomatic_infectivity: 1.0,
            case_fatality:            None,
        }
    }

    fn sample_symptoms(&self, exposure: Day, rng: &mut dyn EpiRng) -> (Option<Day>, Option<Day>) {
        match &self.symptoms {
            SymptomsModel::Lognormal {
                incubation_median,
                incubation_dispersion,
                duration_median,
                duration_dispersion,
            } => {
                let incubation =
                    rng.lognormal(incubation_median.ln(), 0.5 * incubation_dispersion.ln());
                let duration = rng.lognormal(duration_median.ln(), duration_dispersion.ln());
                (
                    Some(exposure + round_days(incubation)),
                    Some(exposure + round_days(incubation + duration)),
                )
            }
            SymptomsModel::Fixed { incubation, duration } => {
                let start = exposure + *incubation;
                (Some(start), duration.map(|d| start + d))
            }
        }
    }

    fn sample_infectious(
        &self,
        exposure: Day,
        symptoms: (Option<Day>, Option<Day>),
        rng: &mut dyn EpiRng,
    ) -> (Option<Day>, Option<Day>) {
        match &self.infectious {
            InfectiousModel::Lognormal {
                latent_median,
                latent_dispersion,
                duration_median,
                duration_dispersion,
            } => {
                let latent = rng.lognormal(latent_median.ln(), latent_dispersion.ln());
                let duration = rng.lognormal(duration_median.ln(), duration_dispersion.ln());
                (
                    Some(exposure + round_days(latent)),
                    Some(exposure + round_days(latent + duration)),
                )
            }
            InfectiousModel::OffsetFromSymptomsStart { start, end } => (
                symptoms.0.map(|s| s + round_days(*start)),
                symptoms.0.map(|s| s + round_days(*end)),
            ),
            InfectiousModel::OffsetFromSymptoms { start, end } => (
                symptoms.0.map(|s| s + round_days(*start)),
                symptoms.1.map(|s| s + round_days(*end)),
            ),
            InfectiousModel::Fixed { latent, duration } => {
                if *latent < 0 {
                    (None, None)
                } else {
                    let start = exposure + *latent;
                    (Some(start), duration.map(|d| start + d))
                }
            }
        }
    }
}

impl NaturalHistory for ParametricNaturalHistory {
    fn sample(&self, host: &HostAttributes, exposure: Day, rng: &mut dyn EpiRng) -> Trajectory {
        let will_develop_symptoms = rng.gen_bool(self.prob_symptoms.find(host.age));

        // Offset models anchor on symptom dates even for asymptomatic hosts.
        let symptoms = self.sample_symptoms(exposure, rng);
        let (infectious_start, infectious_end) = self.sample_infectious(exposure, symptoms, rng);
        let (symptoms_start, symptoms_end) = if will_develop_symptoms { symptoms } else { (None, None) };

        Trajectory {
            exposure,
            infectious_start,
            infectious_end,
            symptoms_start,
            symptoms_end,
            immunity_end: self.immunity_duration.map(|d| exposure + d),
            will_develop_symptoms,
        }
    }

    fn full_infectivity_start(&self) -> f64 {
        self.infectivity.full_start
    }

    fn full_infectivity_end(&self) -> f64 {
        self.infectivity.full_end
    }

    fn full_symptoms_start(&self) -> f64 {
        self.symptoms_ramp.full_start
    }

    fn full_symptoms_end(&self) -> f64 {
        self.symptoms_ramp.full_end
    }

    fn asymptomatic_infectivity(&self) -> f64 {
        self.asymptomatic_infectivity
    }

    fn case_fatality_enabled(&self) -> bool {
        self.case_fatality.is_some()
    }

    fn is_fatal(
        &self,
        host: &HostAttributes,
        symptoms: f64,
        days_symptomatic: i32,
        rng: &mut dyn EpiRng,
    ) -> bool {
        match &self.case_fatality {
            Some(cf) if symptoms >= cf.min_symptoms => {
                rng.gen_bool(cf.probability(host.age, days_symptomatic))
            }
            _ => false,
        }
    }
}

#[inline]
fn round_days(days: f64) -> i32 {
    days.round() as i32
}
