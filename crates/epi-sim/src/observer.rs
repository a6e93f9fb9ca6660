//! Simulation observer trait for progress reporting and data collection.

use epi_core::{AgentId, Day, DiseaseId, PlaceId};

use crate::DailyCounts;

/// One exposure, as reported to observers.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct InfectionEvent {
    pub day:      Day,
    pub disease:  DiseaseId,
    pub infectee: AgentId,
    /// `None` for imported, seeded, and vector-borne cases.
    pub infector: Option<AgentId>,
    /// Mixing group where the exposure happened, if any.
    pub place:    Option<PlaceId>,
}

/// Callbacks invoked by [`Sim::run`][crate::Sim::run] at key points of the
/// daily loop.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
///
/// # Example: progress printer
///
/// ```rust,ignore
/// struct Prevalence;
///
/// impl SimObserver for Prevalence {
///     fn on_daily_counts(&mut self, counts: &DailyCounts, disease: DiseaseId) {
///         println!("{disease} {}: P={}", counts.day, counts.prevalence());
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called at the very start of each day, before any disease runs.
    fn on_day_start(&mut self, _day: Day) {}

    /// Called for every new infection, in the order they happen.
    fn on_exposure(&mut self, _event: &InfectionEvent) {}

    /// Called once per disease per day after its update completes.
    fn on_daily_counts(&mut self, _counts: &DailyCounts, _disease: DiseaseId) {}

    /// Called after the day-boundary removals.  `deaths` are the agents
    /// removed from the population at the end of `day`.
    fn on_day_end(&mut self, _day: Day, _deaths: &[AgentId]) {}

    /// Called once after the final day completes.
    fn on_sim_end(&mut self, _final_day: Day) {}
}

/// A [`SimObserver`] that does nothing.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
