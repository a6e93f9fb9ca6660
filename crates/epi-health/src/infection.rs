//! One open infection of one agent by one disease.

use epi_core::{AgentId, Day, EpiRng, PlaceId};

use crate::natural_history::{NaturalHistory, RampProfile};
use crate::trajectory::{HostAttributes, Trajectory};

/// Which phases of the infection have started and finished.
///
/// A phase that never occurs (its start date is `None`) counts as done.  The
/// driver also marks the infectious phase done at exposure when it decides
/// not to schedule infectious events.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Progress {
    pub infectious_started: bool,
    pub infectious_ended:   bool,
    pub symptoms_started:   bool,
    pub symptoms_ended:     bool,
}

/// A changed end date returned by the period modifiers.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PeriodChange {
    pub old_end: Day,
    pub new_end: Day,
}

/// An open infection.
#[derive(Clone, Debug, PartialEq)]
pub struct InfectionRecord {
    exposure_date:             Day,
    infectious_start:          Option<Day>,
    infectious_end:            Option<Day>,
    symptoms_start:            Option<Day>,
    symptoms_end:              Option<Day>,
    immunity_end:              Option<Day>,
    will_develop_symptoms:     bool,
    infector:                  Option<AgentId>,
    mixing_group:              Option<PlaceId>,
    infectivity_multiplier:    f64,
    susceptibility_multiplier: f64,
    infectivity_ramp:          RampProfile,
    symptoms_ramp:             RampProfile,
    asymptomatic_infectivity:  f64,
    fatal:                     bool,
    progress:                  Progress,
}

impl InfectionRecord {
    /// Build a record from a sampled trajectory with flat ramps.
    pub fn new(trajectory: Trajectory, infector: Option<AgentId>, mixing_group: Option<PlaceId>) -> Self {
        Self {
            exposure_date:             trajectory.exposure,
            infectious_start:          trajectory.infectious_start,
            infectious_end:            trajectory.infectious_end,
            symptoms_start:            trajectory.symptoms_start,
            symptoms_end:              trajectory.symptoms_end,
            immunity_end:              trajectory.immunity_end,
            will_develop_symptoms:     trajectory.will_develop_symptoms,
            infector,
            mixing_group,
            infectivity_multiplier:    1.0,
            susceptibility_multiplier: 1.0,
            infectivity_ramp:          RampProfile::FLAT,
            symptoms_ramp:             RampProfile::FLAT,
            asymptomatic_infectivity:  1.0,
            fatal:                     false,
            progress:                  Progress::default(),
        }
    }

    /// Copy the ramp shapes of `history` into the record.
    pub fn with_profiles(mut self, history: &dyn NaturalHistory) -> Self {
        self.infectivity_ramp = history.infectivity_profile();
        self.symptoms_ramp = history.symptoms_profile();
        self.asymptomatic_infectivity = history.asymptomatic_infectivity();
        self
    }

    // ── Dates ─────────────────────────────────────────────────────────────

    pub fn exposure_date(&self) -> Day {
        self.exposure_date
    }

    pub fn infectious_start(&self) -> Option<Day> {
        self.infectious_start
    }

    pub fn infectious_end(&self) -> Option<Day> {
        self.infectious_end
    }

    pub fn symptoms_start(&self) -> Option<Day> {
        self.symptoms_start
    }

    pub fn symptoms_end(&self) -> Option<Day> {
        self.symptoms_end
    }

    pub fn immunity_end(&self) -> Option<Day> {
        self.immunity_end
    }

    pub fn trajectory(&self) -> Trajectory {
        Trajectory {
            exposure:              self.exposure_date,
            infectious_start:      self.infectious_start,
            infectious_end:        self.infectious_end,
            symptoms_start:        self.symptoms_start,
            symptoms_end:          self.symptoms_end,
            immunity_end:          self.immunity_end,
            will_develop_symptoms: self.will_develop_symptoms,
        }
    }

    // Setters used when the driver writes back an effective (warped) date.

    pub fn set_infectious_start(&mut self, day: Day) {
        self.infectious_start = Some(day);
    }

    pub fn set_infectious_end(&mut self, day: Day) {
        self.infectious_end = Some(day);
    }

    pub fn set_symptoms_start(&mut self, day: Day) {
        self.symptoms_start = Some(day);
    }

    pub fn set_symptoms_end(&mut self, day: Day) {
        self.symptoms_end = Some(day);
    }

    pub fn set_immunity_end(&mut self, day: Option<Day>) {
        self.immunity_end = day;
    }

    /// Start an open-ended infectious phase on `day`.  Chain-driven
    /// infections enter and leave phases as their stage changes.
    pub fn open_infectious_phase(&mut self, day: Day) {
        self.infectious_start = Some(day);
        self.infectious_end = None;
        self.progress.infectious_ended = false;
    }

    pub fn open_symptoms_phase(&mut self, day: Day) {
        self.symptoms_start = Some(day);
        self.symptoms_end = None;
        self.will_develop_symptoms = true;
        self.progress.symptoms_ended = false;
    }

    /// Shift every date `days` earlier.
    pub fn advance(&mut self, days: i32) {
        let mut t = self.trajectory();
        t.shift_back(days);
        self.exposure_date = t.exposure;
        self.infectious_start = t.infectious_start;
        self.infectious_end = t.infectious_end;
        self.symptoms_start = t.symptoms_start;
        self.symptoms_end = t.symptoms_end;
        self.immunity_end = t.immunity_end;
    }

    // ── Provenance ────────────────────────────────────────────────────────

    pub fn infector(&self) -> Option<AgentId> {
        self.infector
    }

    pub fn mixing_group(&self) -> Option<PlaceId> {
        self.mixing_group
    }

    pub fn will_develop_symptoms(&self) -> bool {
        self.will_develop_symptoms
    }

    pub fn is_fatal(&self) -> bool {
        self.fatal
    }

    // ── Status ────────────────────────────────────────────────────────────

    /// `infectious_start <= day < infectious_end`; an open end never closes.
    pub fn is_infectious(&self, day: Day) -> bool {
        in_period(self.infectious_start, self.infectious_end, day)
    }

    pub fn is_symptomatic(&self, day: Day) -> bool {
        in_period(self.symptoms_start, self.symptoms_end, day)
    }

    /// Infectivity level on `day`, including the record's multiplier.
    pub fn infectivity(&self, day: Day) -> f64 {
        let Some(start) = self.infectious_start else { return 0.0 };
        if !self.is_infectious(day) {
            return 0.0;
        }
        let level = match self.infectious_end {
            Some(end) => self.infectivity_ramp.level(start, end, day),
            None => 1.0,
        };
        let scale = if self.will_develop_symptoms { 1.0 } else { self.asymptomatic_infectivity };
        level * scale * self.infectivity_multiplier
    }

    /// Symptom severity on `day`.
    pub fn symptoms(&self, day: Day) -> f64 {
        let Some(start) = self.symptoms_start else { return 0.0 };
        if !self.is_symptomatic(day) {
            return 0.0;
        }
        match self.symptoms_end {
            Some(end) => self.symptoms_ramp.level(start, end, day),
            None => 1.0,
        }
    }

    pub fn infectivity_multiplier(&self) -> f64 {
        self.infectivity_multiplier
    }

    pub fn susceptibility_multiplier(&self) -> f64 {
        self.susceptibility_multiplier
    }

    // ── Progress ──────────────────────────────────────────────────────────

    pub fn progress(&self) -> Progress {
        self.progress
    }

    pub fn progress_mut(&mut self) -> &mut Progress {
        &mut self.progress
    }

    /// Treat the infectious phase as already over.
    pub fn skip_infectious_phase(&mut self) {
        self.progress.infectious_ended = true;
    }

    pub fn infectious_phase_done(&self) -> bool {
        self.infectious_start.is_none() || self.progress.infectious_ended
    }

    pub fn symptoms_phase_done(&self) -> bool {
        self.symptoms_start.is_none() || self.progress.symptoms_ended
    }

    /// Both phases finished: the host can be removed.
    pub fn is_complete(&self) -> bool {
        self.infectious_phase_done() && self.symptoms_phase_done()
    }

    // ── Modifiers ─────────────────────────────────────────────────────────

    pub fn modify_infectivity(&mut self, multp: f64) {
        self.infectivity_multiplier *= multp;
    }

    pub fn modify_susceptibility(&mut self, multp: f64) {
        self.susceptibility_multiplier *= multp;
    }

    /// Scale the infectious period; `None` when the end date is unchanged.
    ///
    /// The new length is capped at [`MAX_PERIOD_DAYS`].
    pub fn modify_infectious_period(&mut self, multp: f64, day: Day) -> Option<PeriodChange> {
        let change = scaled_end(self.infectious_start?, self.infectious_end?, multp, day)?;
        self.infectious_end = Some(change.new_end);
        Some(change)
    }

    /// Scale the symptomatic period; `None` when the end date is unchanged.
    pub fn modify_symptomatic_period(&mut self, multp: f64, day: Day) -> Option<PeriodChange> {
        let change = scaled_end(self.symptoms_start?, self.symptoms_end?, multp, day)?;
        self.symptoms_end = Some(change.new_end);
        Some(change)
    }

    // ── Daily update ──────────────────────────────────────────────────────

    /// Advance one day: roll the case-fatality check while symptomatic.
    /// Returns `true` once the infection has turned fatal.
    pub fn update(
        &mut self,
        day: Day,
        history: &dyn NaturalHistory,
        host: &HostAttributes,
        days_symptomatic: i32,
        rng: &mut dyn EpiRng,
    ) -> bool {
        if !self.fatal && history.case_fatality_enabled() && self.is_symptomatic(day) {
            let level = self.symptoms(day);
            self.fatal = history.is_fatal(host, level, days_symptomatic, rng);
        }
        self.fatal
    }
}

fn in_period(start: Option<Day>, end: Option<Day>, day: Day) -> bool {
    match start {
        Some(start) => start <= day && end.is_none_or(|end| day < end),
        None => false,
    }
}

/// Longest period a modifier can produce, in days.
pub const MAX_PERIOD_DAYS: i32 = 36_500;

/// New end of `[start, end)` scaled by `multp` as seen on `day`: the whole
/// duration before onset, the remaining days during the period, nothing
/// once it is over.  Never earlier than `day + 1`.
fn scaled_end(start: Day, end: Day, multp: f64, day: Day) -> Option<PeriodChange> {
    let new_end = if day < start {
        start.saturating_offset(scale_days(end - start, multp))
    } else if day < end {
        day.saturating_offset(scale_days(end - day, multp))
    } else {
        return None;
    };
    let new_end = new_end.max(day.next());
    (new_end != end).then_some(PeriodChange { old_end: end, new_end })
}

/// `days * multp`, rounded and held within `0..=MAX_PERIOD_DAYS`.
#[inline]
fn scale_days(days: i32, multp: f64) -> i32 {
    let scaled = (f64::from(days) * multp).round();
    if scaled.is_nan() {
        return 0;
    }
    scaled.clamp(0.0, f64::from(MAX_PERIOD_DAYS)) as i32
}
