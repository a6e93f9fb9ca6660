//! Simulation day model.
//!
//! # Design
//!
//! The engine advances in whole days.  `Day` is a signed counter: day 0 is
//! the first simulated day, and negative days only appear on infection
//! trajectories that were advanced backwards when a case was seeded
//! mid-course.  "Unset" dates are `Option<Day>::None`, never a magic value.

use std::fmt;

// ── Day ──────────────────────────────────────────────────────────────────────

/// An absolute simulation day.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Day(pub i32);

impl Day {
    pub const ZERO: Day = Day(0);

    /// The following day.
    #[inline]
    pub fn next(self) -> Day {
        Day(self.0 + 1)
    }

    /// Return the day `n` days after `self` (`n` may be negative).
    #[inline]
    pub fn offset(self, n: i32) -> Day {
        Day(self.0 + n)
    }

    /// Like [`offset`](Self::offset) but stops at the ends of the range.
    #[inline]
    pub fn saturating_offset(self, n: i32) -> Day {
        Day(self.0.saturating_add(n))
    }

    /// Days elapsed from `earlier` to `self` (negative if `earlier` is later).
    #[inline]
    pub fn since(self, earlier: Day) -> i32 {
        self.0 - earlier.0
    }

    /// Position in a day-indexed array, or `None` for days before day 0.
    #[inline]
    pub fn index(self) -> Option<usize> {
        usize::try_from(self.0).ok()
    }
}

impl std::ops::Add<i32> for Day {
    type Output = Day;
    #[inline]
    fn add(self, rhs: i32) -> Day {
        Day(self.0 + rhs)
    }
}

impl std::ops::Sub<i32> for Day {
    type Output = Day;
    #[inline]
    fn sub(self, rhs: i32) -> Day {
        Day(self.0 - rhs)
    }
}

impl std::ops::Sub for Day {
    type Output = i32;
    #[inline]
    fn sub(self, rhs: Day) -> i32 {
        self.0 - rhs.0
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "day {}", self.0)
    }
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// Tracks the current simulation day.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimClock {
    pub current_day: Day,
}

impl SimClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the clock by one day.
    #[inline]
    pub fn advance(&mut self) {
        self.current_day = self.current_day.next();
    }

    /// Day of the week, 0 = the weekday of day 0.
    #[inline]
    pub fn weekday(&self) -> u32 {
        self.current_day.0.rem_euclid(7) as u32
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (weekday {})", self.current_day, self.weekday())
    }
}

// ── SimConfig ─────────────────────────────────────────────────────────────────

/// Top-level run configuration.
///
/// Per-disease settings live in `epi_sim::EpidemicConfig`.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimConfig {
    /// Number of days to simulate.  The run covers days `0..total_days`.
    pub total_days: u32,

    /// Master RNG seed.  The same seed always produces identical results.
    pub seed: u64,
}

impl SimConfig {
    /// The day at which the simulation ends (exclusive upper bound).
    #[inline]
    pub fn end_day(&self) -> Day {
        Day(i32::try_from(self.total_days).unwrap_or(i32::MAX))
    }

    /// Construct a `SimClock` positioned at day 0.
    pub fn make_clock(&self) -> SimClock {
        SimClock::new()
    }
}
