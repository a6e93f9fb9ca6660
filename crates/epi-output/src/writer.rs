//! The `OutputWriter` trait implemented by all backend writers.

use crate::{DailyCountsRow, InfectionEventRow, OutputResult};

/// Trait implemented by CSV, SQLite, and Parquet writers.
///
/// Errors never reach the simulation; [`SimOutputObserver`] keeps the first
/// one for [`take_error`].
///
/// [`SimOutputObserver`]: crate::SimOutputObserver
/// [`take_error`]: crate::SimOutputObserver::take_error
pub trait OutputWriter {
    /// Write one disease's counters for one day.
    fn write_daily_counts(&mut self, row: &DailyCountsRow) -> OutputResult<()>;

    /// Write a batch of exposures.
    fn write_infection_events(&mut self, rows: &[InfectionEventRow]) -> OutputResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Idempotent: safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}
