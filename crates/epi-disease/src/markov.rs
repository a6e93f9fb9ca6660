//! Continuous-rate Markov chain over named health states.
//!
//! # Semantics
//!
//! State 0 is "healthy".  Every other state is an infection stage whose
//! `infectivity` and `symptoms` levels drive the host's flags.  From state
//! `i` each target `j` with rate `λ > 0` draws a waiting time
//! `round(Exp(λ) · period)`; the earliest wins and fires on
//! `day + 1 + wait`.  No positive rate means the state is absorbing.
//!
//! Initial percentages are given for states `1..`; state 0 takes the rest.

use epi_core::{Day, EpiError, EpiResult, EpiRng};
use epi_health::{HostAttributes, NaturalHistory, Trajectory};

/// One state of a [`MarkovChain`].
#[derive(Clone, Debug, PartialEq)]
pub struct MarkovState {
    pub name:        String,
    pub infectivity: f64,
    pub symptoms:    f64,
    pub fatal:       bool,
}

impl MarkovState {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), infectivity: 0.0, symptoms: 0.0, fatal: false }
    }

    pub fn infectious(mut self, level: f64) -> Self {
        self.infectivity = level;
        self
    }

    pub fn symptomatic(mut self, level: f64) -> Self {
        self.symptoms = level;
        self
    }

    pub fn fatal(mut self) -> Self {
        self.fatal = true;
        self
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct MarkovChain {
    states:          Vec<MarkovState>,
    rates:           Vec<Vec<f64>>,
    initial_percent: Vec<f64>,
    period:          f64,
}

impl MarkovChain {
    /// A chain with no transitions and everyone starting healthy.
    pub fn new(states: Vec<MarkovState>) -> Self {
        let n = states.len();
        Self {
            states,
            rates:           vec![vec![0.0; n]; n],
            initial_percent: vec![0.0; n],
            period:          1.0,
        }
    }

    /// Rate of moving from `from` to `to`.  Out-of-range or diagonal
    /// entries are ignored.
    pub fn with_rate(mut self, from: usize, to: usize, rate: f64) -> Self {
        if from != to && from < self.states.len() && to < self.states.len() {
            self.rates[from][to] = rate;
        }
        self
    }

    /// Percent of the population starting in `state` (> 0).
    pub fn with_initial_percent(mut self, state: usize, percent: f64) -> Self {
        if state > 0 && state < self.states.len() {
            self.initial_percent[state] = percent;
        }
        self
    }

    /// Days per unit of rate time.
    pub fn with_period(mut self, days: f64) -> Self {
        self.period = days;
        self
    }

    /// Reject chains without a healthy state, negative rates, or initial
    /// percentages over 100.
    pub fn validate(&self) -> EpiResult<()> {
        if self.states.is_empty() {
            return Err(EpiError::Config("markov chain has no states".into()));
        }
        if self.rates.iter().flatten().any(|&r| r < 0.0 || !r.is_finite()) {
            return Err(EpiError::Config("markov chain has a negative or non-finite rate".into()));
        }
        let assigned: f64 = self.initial_percent.iter().skip(1).sum();
        if assigned > 100.0 || self.initial_percent.iter().any(|&p| p < 0.0) {
            return Err(EpiError::Config(format!(
                "markov initial percentages sum to {assigned}, expected at most 100"
            )));
        }
        Ok(())
    }

    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    pub fn state(&self, index: usize) -> Option<&MarkovState> {
        self.states.get(index)
    }

    pub fn state_name(&self, index: usize) -> &str {
        self.states.get(index).map_or("", |s| s.name.as_str())
    }

    pub fn infectivity(&self, index: usize) -> f64 {
        self.states.get(index).map_or(0.0, |s| s.infectivity)
    }

    pub fn symptoms(&self, index: usize) -> f64 {
        self.states.get(index).map_or(0.0, |s| s.symptoms)
    }

    pub fn is_fatal_state(&self, index: usize) -> bool {
        self.states.get(index).is_some_and(|s| s.fatal)
    }

    /// Draw a starting state.
    pub fn initial_state(&self, rng: &mut dyn EpiRng) -> usize {
        let r = 100.0 * rng.uniform();
        let assigned: f64 = self.initial_percent.iter().skip(1).sum();
        let mut sum = 100.0 - assigned;
        if r < sum {
            return 0;
        }
        for (state, &pct) in self.initial_percent.iter().enumerate().skip(1) {
            sum += pct;
            if r < sum {
                return state;
            }
        }
        0
    }

    /// Competing-exponentials draw of the next state and the day it fires.
    /// `None` for an absorbing state.
    pub fn next_transition(&self, day: Day, state: usize, rng: &mut dyn EpiRng) -> Option<(usize, Day)> {
        let row = self.rates.get(state)?;
        let mut best: Option<(usize, Day)> = None;
        for (target, &rate) in row.iter().enumerate() {
            if target == state || rate <= 0.0 {
                continue;
            }
            let wait = (rng.exponential(rate) * self.period).round() as i32;
            let when = day + 1 + wait;
            if best.is_none_or(|(_, t)| when < t) {
                best = Some((target, when));
            }
        }
        best
    }
}

/// Chain dates are not known up front; records stay open-ended and the
/// chain's states drive the host's flags.
impl NaturalHistory for MarkovChain {
    fn sample(&self, _host: &HostAttributes, exposure: Day, _rng: &mut dyn EpiRng) -> Trajectory {
        Trajectory::open_ended(exposure)
    }
}
