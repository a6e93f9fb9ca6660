//! CSV output backend.
//!
//! Creates two files in the configured output directory:
//! - `daily_counts.csv`
//! - `infection_events.csv`
//!
//! Missing infectors and places are written as empty fields.

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::OutputWriter;
use crate::{DailyCountsRow, InfectionEventRow, OutputResult};

/// Writes run output to two CSV files.
pub struct CsvWriter {
    counts:   Writer<File>,
    events:   Writer<File>,
    finished: bool,
}

impl CsvWriter {
    /// Open (or create) the two CSV files in `dir` and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut counts = Writer::from_path(dir.join("daily_counts.csv"))?;
        counts.write_record(DailyCountsRow::COLUMNS)?;

        let mut events = Writer::from_path(dir.join("infection_events.csv"))?;
        events.write_record(InfectionEventRow::COLUMNS)?;

        Ok(Self {
            counts,
            events,
            finished: false,
        })
    }
}

fn optional(v: Option<u32>) -> String {
    v.map(|v| v.to_string()).unwrap_or_default()
}

impl OutputWriter for CsvWriter {
    fn write_daily_counts(&mut self, row: &DailyCountsRow) -> OutputResult<()> {
        let mut record = Vec::with_capacity(DailyCountsRow::COLUMNS.len());
        record.push(row.day.to_string());
        record.push(row.disease.to_string());
        record.extend(row.counters().iter().map(u64::to_string));
        record.extend(row.rates().iter().map(f64::to_string));
        self.counts.write_record(&record)?;
        Ok(())
    }

    fn write_infection_events(&mut self, rows: &[InfectionEventRow]) -> OutputResult<()> {
        for row in rows {
            self.events.write_record(&[
                row.day.to_string(),
                row.disease.to_string(),
                row.infectee.to_string(),
                optional(row.infector),
                optional(row.place),
            ])?;
        }
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.counts.flush()?;
        self.events.flush()?;
        Ok(())
    }
}
