//! `SimOutputObserver<W>` — bridges `SimObserver` to an `OutputWriter`.

use epi_core::{AgentId, Day, DiseaseId};
use epi_sim::{DailyCounts, InfectionEvent, SimObserver};

use crate::row::{DailyCountsRow, InfectionEventRow};
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// A [`SimObserver`] that writes daily counters and exposures to any
/// [`OutputWriter`] backend (CSV, SQLite, Parquet, …).
///
/// Exposures are buffered and written as one batch at the end of each day.
///
/// Errors from the writer are stored internally because `SimObserver` methods
/// have no return value.  After `sim.run()` returns, check for errors with
/// [`take_error`][Self::take_error].
pub struct SimOutputObserver<W: OutputWriter> {
    writer:     W,
    pending:    Vec<InfectionEventRow>,
    last_error: Option<OutputError>,
}

impl<W: OutputWriter> SimOutputObserver<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            pending:    Vec::new(),
            last_error: None,
        }
    }

    /// Take the stored write error (if any) after `sim.run()` returns.
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Write buffered exposures and close the writer.
    ///
    /// `Sim::run` triggers this through `on_sim_end`; call it directly after
    /// stepping with `Sim::run_days`.
    pub fn finish(&mut self) -> OutputResult<()> {
        self.flush_events()?;
        self.writer.finish()
    }

    /// Unwrap the inner writer (e.g. to inspect files after the run).
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn flush_events(&mut self) -> OutputResult<()> {
        if self.pending.is_empty() {
            return Ok(());
        }
        let result = self.writer.write_infection_events(&self.pending);
        self.pending.clear();
        result
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: OutputWriter> SimObserver for SimOutputObserver<W> {
    fn on_exposure(&mut self, event: &InfectionEvent) {
        self.pending.push(InfectionEventRow::from(event));
    }

    fn on_daily_counts(&mut self, counts: &DailyCounts, disease: DiseaseId) {
        let row = DailyCountsRow::from_counts(counts, disease);
        let result = self.writer.write_daily_counts(&row);
        self.store_err(result);
    }

    fn on_day_end(&mut self, _day: Day, _deaths: &[AgentId]) {
        let result = self.flush_events();
        self.store_err(result);
    }

    fn on_sim_end(&mut self, _final_day: Day) {
        let result = self.finish();
        self.store_err(result);
    }
}
