//! Parquet output backend (feature `parquet`).
//!
//! Creates two files in the configured output directory:
//! - `daily_counts.parquet`
//! - `infection_events.parquet`

use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Builder, Int32Builder, UInt16Builder, UInt32Builder, UInt64Builder};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;

use crate::writer::OutputWriter;
use crate::{DailyCountsRow, InfectionEventRow, OutputResult};

fn counts_schema() -> Arc<Schema> {
    let mut fields = vec![
        Field::new("day",     DataType::Int32,  false),
        Field::new("disease", DataType::UInt16, false),
    ];
    fields.extend(DailyCountsRow::COLUMNS[2..14].iter().map(|c| Field::new(*c, DataType::UInt64, false)));
    fields.extend(DailyCountsRow::COLUMNS[14..].iter().map(|c| Field::new(*c, DataType::Float64, false)));
    Arc::new(Schema::new(fields))
}

fn events_schema() -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        Field::new("day",      DataType::Int32,  false),
        Field::new("disease",  DataType::UInt16, false),
        Field::new("infectee", DataType::UInt32, false),
        Field::new("infector", DataType::UInt32, true),
        Field::new("place",    DataType::UInt32, true),
    ]))
}

fn snappy_props() -> WriterProperties {
    WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .build()
}

/// Writes run output to two Parquet files.
///
/// `finish()` **must** be called to write the Parquet file footer; files
/// written without calling `finish()` cannot be opened by Parquet readers.
pub struct ParquetWriter {
    counts:        Option<ArrowWriter<File>>,
    events:        Option<ArrowWriter<File>>,
    counts_schema: Arc<Schema>,
    events_schema: Arc<Schema>,
}

impl ParquetWriter {
    /// Create both Parquet files in `dir`.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let counts_schema = counts_schema();
        let events_schema = events_schema();

        let counts_file = File::create(dir.join("daily_counts.parquet"))?;
        let counts = ArrowWriter::try_new(counts_file, Arc::clone(&counts_schema), Some(snappy_props()))?;

        let events_file = File::create(dir.join("infection_events.parquet"))?;
        let events = ArrowWriter::try_new(events_file, Arc::clone(&events_schema), Some(snappy_props()))?;

        Ok(Self {
            counts: Some(counts),
            events: Some(events),
            counts_schema,
            events_schema,
        })
    }
}

impl OutputWriter for ParquetWriter {
    fn write_daily_counts(&mut self, row: &DailyCountsRow) -> OutputResult<()> {
        let Some(writer) = self.counts.as_mut() else {
            return Ok(());
        };

        let mut day     = Int32Builder::new();
        let mut disease = UInt16Builder::new();
        day.append_value(row.day);
        disease.append_value(row.disease);

        let mut columns: Vec<ArrayRef> = vec![Arc::new(day.finish()), Arc::new(disease.finish())];
        for value in row.counters() {
            let mut b = UInt64Builder::new();
            b.append_value(value);
            columns.push(Arc::new(b.finish()));
        }
        for value in row.rates() {
            let mut b = Float64Builder::new();
            b.append_value(value);
            columns.push(Arc::new(b.finish()));
        }

        let batch = RecordBatch::try_new(Arc::clone(&self.counts_schema), columns)?;
        writer.write(&batch)?;
        Ok(())
    }

    fn write_infection_events(&mut self, rows: &[InfectionEventRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let Some(writer) = self.events.as_mut() else {
            return Ok(());
        };

        let mut days      = Int32Builder::new();
        let mut diseases  = UInt16Builder::new();
        let mut infectees = UInt32Builder::new();
        let mut infectors = UInt32Builder::new();
        let mut places    = UInt32Builder::new();

        for row in rows {
            days.append_value(row.day);
            diseases.append_value(row.disease);
            infectees.append_value(row.infectee);
            infectors.append_option(row.infector);
            places.append_option(row.place);
        }

        let batch = RecordBatch::try_new(
            Arc::clone(&self.events_schema),
            vec![
                Arc::new(days.finish()),
                Arc::new(diseases.finish()),
                Arc::new(infectees.finish()),
                Arc::new(infectors.finish()),
                Arc::new(places.finish()),
            ],
        )?;
        writer.write(&batch)?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if let Some(w) = self.counts.take() {
            w.close()?;
        }
        if let Some(w) = self.events.take() {
            w.close()?;
        }
        Ok(())
    }
}
