//! Daily epidemic counters.

use epi_core::Day;

/// One disease's report for one day.
///
/// `susceptible + exposed + infectious + convalescent + removed + immune`
/// equals the disease's tracked population on every day.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct DailyCounts {
    pub day:                    Day,
    /// `S`
    pub susceptible:            usize,
    /// `E`: open infection, not yet infectious.
    pub exposed:                usize,
    /// `I`: infectious today.
    pub infectious:             usize,
    /// Past infectious onset, not infectious today, not yet removed.
    pub convalescent:           usize,
    /// `Is`
    pub symptomatic:            usize,
    /// `R`: recovered, case fatalities, and agents removed from the run.
    pub removed:                usize,
    /// `M`
    pub immune:                 usize,
    /// `C`: new exposures today.
    pub new_exposed:            usize,
    /// `Cs`: new symptomatic today.
    pub new_symptomatic:        usize,
    /// `CF`: case fatalities today.
    pub case_fatalities:        usize,
    /// `TCF`
    pub total_case_fatalities:  usize,
    pub total_exposed:          usize,
    pub total_symptomatic:      usize,
    /// `N` at the start of the run.
    pub population:             usize,
    /// `RR`: lagged reproduction number.
    pub reproduction:           f64,
}

impl DailyCounts {
    /// `P = E + I`.
    pub fn prevalence(&self) -> usize {
        self.exposed + self.infectious
    }

    /// `AR`: percent of the initial population ever exposed.
    pub fn attack_rate(&self) -> f64 {
        percent(self.total_exposed, self.population)
    }

    /// `ARs`: percent of the initial population ever symptomatic.
    pub fn symptomatic_attack_rate(&self) -> f64 {
        percent(self.total_symptomatic, self.population)
    }

    /// `CFR`: case fatalities per 100 000 symptomatic cases.
    pub fn case_fatality_rate(&self) -> f64 {
        if self.total_symptomatic == 0 {
            return 0.0;
        }
        100_000.0 * self.total_case_fatalities as f64 / self.total_symptomatic as f64
    }

    /// Sum of the compartments; equals the tracked population.
    pub fn compartment_total(&self) -> usize {
        self.susceptible
            + self.exposed
            + self.infectious
            + self.convalescent
            + self.removed
            + self.immune
    }
}

fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    100.0 * part as f64 / whole as f64
}

// ── Tallies ───────────────────────────────────────────────────────────────────

/// Running counts maintained incrementally by the driver.
#[derive(Clone, Debug, Default)]
pub(crate) struct Tallies {
    pub exposed:               usize,
    pub symptomatic:           usize,
    pub removed:               usize,
    pub immune:                usize,
    pub new_exposed:           usize,
    pub new_symptomatic:       usize,
    pub case_fatalities:       usize,
    pub total_case_fatalities: usize,
    pub total_exposed:         usize,
    pub total_symptomatic:     usize,
}

impl Tallies {
    /// Zero the per-day counters after a report.
    pub fn reset_daily(&mut self) {
        self.new_exposed = 0;
        self.new_symptomatic = 0;
        self.case_fatalities = 0;
    }
}
