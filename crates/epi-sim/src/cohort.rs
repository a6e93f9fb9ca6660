//! Exposure cohorts and the lagged reproduction number.

use rustc_hash::FxHashMap;

use epi_core::Day;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
struct Cohort {
    size:     u32,
    infected: u32,
}

/// Size of each day's exposure cohort and how many secondary infections
/// its members have caused so far.
#[derive(Clone, Debug, Default)]
pub struct CohortTracker {
    cohorts: FxHashMap<Day, Cohort>,
}

impl CohortTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// An agent was exposed on `day`.
    pub fn record_exposure(&mut self, day: Day) {
        self.cohorts.entry(day).or_default().size += 1;
    }

    /// A member of the `day` cohort infected someone.
    pub fn record_secondary(&mut self, day: Day) {
        self.cohorts.entry(day).or_default().infected += 1;
    }

    pub fn cohort_size(&self, day: Day) -> u32 {
        self.cohorts.get(&day).map_or(0, |c| c.size)
    }

    pub fn infected_by_cohort(&self, day: Day) -> u32 {
        self.cohorts.get(&day).map_or(0, |c| c.infected)
    }

    /// Mean secondary infections of the cohort exposed `lag` days before
    /// `day`.  0 when `lag` is 0, has not yet elapsed, or the cohort is
    /// empty.
    pub fn reproduction_number(&self, day: Day, lag: u32) -> f64 {
        let Ok(lag) = i32::try_from(lag) else { return 0.0 };
        if lag == 0 || lag > day.0 {
            return 0.0;
        }
        match self.cohorts.get(&(day - lag)) {
            Some(c) if c.size > 0 => f64::from(c.infected) / f64::from(c.size),
            _ => 0.0,
        }
    }
}
