//! Sampled infection trajectories.

use epi_core::Day;

/// Attributes of the host a natural-history model may condition on.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct HostAttributes {
    /// Real-valued age in years.
    pub age: f64,
}

impl HostAttributes {
    pub fn new(age: f64) -> Self {
        Self { age }
    }
}

/// The dates an infection will follow, as drawn at exposure.
///
/// `None` means the transition never happens: an infection with no
/// `infectious_start` is non-communicable, one with no `symptoms_start` is
/// asymptomatic, and no `immunity_end` means immunity never wanes.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Trajectory {
    pub exposure:              Day,
    pub infectious_start:      Option<Day>,
    pub infectious_end:        Option<Day>,
    pub symptoms_start:        Option<Day>,
    pub symptoms_end:          Option<Day>,
    pub immunity_end:          Option<Day>,
    pub will_develop_symptoms: bool,
}

impl Trajectory {
    /// A trajectory with no scheduled transitions.  Markov epidemics drive
    /// the record's flags from chain states instead of dates.
    pub fn open_ended(exposure: Day) -> Self {
        Self {
            exposure,
            infectious_start:      None,
            infectious_end:        None,
            symptoms_start:        None,
            symptoms_end:          None,
            immunity_end:          None,
            will_develop_symptoms: false,
        }
    }

    /// Days from exposure to the end of infectiousness, if it ends.
    pub fn duration(&self) -> Option<i32> {
        self.infectious_end.map(|end| end - self.exposure)
    }

    /// Move every date `days` earlier.
    pub fn shift_back(&mut self, days: i32) {
        self.exposure = self.exposure - days;
        for date in [
            &mut self.infectious_start,
            &mut self.infectious_end,
            &mut self.symptoms_start,
            &mut self.symptoms_end,
            &mut self.immunity_end,
        ] {
            if let Some(d) = date.as_mut() {
                *d = *d - days;
            }
        }
    }
}
