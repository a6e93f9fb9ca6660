//! Unit tests for epi-output.

use tempfile::TempDir;

use epi_core::{AgentId, Day, DiseaseId, PlaceId};
use epi_sim::{DailyCounts, InfectionEvent};

use crate::row::{DailyCountsRow, InfectionEventRow};

fn tmp() -> TempDir {
    tempfile::tempdir().expect("create temp dir")
}

fn counts_row(day: i32) -> DailyCountsRow {
    let counts = DailyCounts {
        day:                   Day(day),
        susceptible:           90,
        exposed:               4,
        infectious:            3,
        removed:               3,
        new_exposed:           2,
        total_exposed:         10,
        total_symptomatic:     5,
        total_case_fatalities: 1,
        population:            100,
        reproduction:          1.5,
        ..DailyCounts::default()
    };
    DailyCountsRow::from_counts(&counts, DiseaseId(0))
}

fn event_row(infectee: u32, infector: Option<u32>) -> InfectionEventRow {
    InfectionEventRow { day: 3, disease: 0, infectee, infector, place: infector.map(|_| 7) }
}

#[cfg(test)]
mod rows {
    use super::*;

    #[test]
    fn counts_row_carries_derived_rates() {
        let row = counts_row(4);
        assert_eq!((row.day, row.disease), (4, 0));
        assert_eq!(row.prevalence, 7);
        assert_eq!(row.attack_rate, 10.0);
        assert_eq!(row.symptomatic_attack_rate, 5.0);
        assert_eq!(row.case_fatality_rate, 20_000.0);
        assert_eq!(row.reproduction, 1.5);
        assert_eq!(row.counters().len() + row.rates().len() + 2, DailyCountsRow::COLUMNS.len());
    }

    #[test]
    fn event_row_keeps_missing_handles() {
        let event = InfectionEvent {
            day:      Day(2),
            disease:  DiseaseId(1),
            infectee: AgentId(5),
            infector: None,
            place:    Some(PlaceId(9)),
        };
        let row = InfectionEventRow::from(&event);
        assert_eq!(row, InfectionEventRow { day: 2, disease: 1, infectee: 5, infector: None, place: Some(9) });
    }
}

// ── CSV ───────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod csv_tests {
    use super::*;

    use crate::csv::CsvWriter;
    use crate::writer::OutputWriter;

    #[test]
    fn csv_files_created() {
        let dir = tmp();
        let _w = CsvWriter::new(dir.path()).unwrap();
        assert!(dir.path().join("daily_counts.csv").exists());
        assert!(dir.path().join("infection_events.csv").exists());
    }

    #[test]
    fn csv_headers_correct() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("daily_counts.csv")).unwrap();
        let headers: Vec<_> = rdr.headers().unwrap().iter().map(str::to_owned).collect();
        assert_eq!(headers, DailyCountsRow::COLUMNS);

        let mut rdr2 = csv::Reader::from_path(dir.path().join("infection_events.csv")).unwrap();
        let headers2: Vec<_> = rdr2.headers().unwrap().iter().map(str::to_owned).collect();
        assert_eq!(headers2, ["day", "disease", "infectee", "infector", "place"]);
    }

    #[test]
    fn csv_daily_counts_written() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_daily_counts(&counts_row(0)).unwrap();
        w.write_daily_counts(&counts_row(1)).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("daily_counts.csv")).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[1][0], "1");   // day
        assert_eq!(&rows[1][2], "90");  // susceptible
        assert_eq!(&rows[1][13], "7");  // prevalence
        assert_eq!(&rows[1][17], "1.5"); // reproduction
    }

    #[test]
    fn csv_missing_infector_is_empty() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_infection_events(&[event_row(4, None), event_row(5, Some(4))]).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("infection_events.csv")).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!((&rows[0][3], &rows[0][4]), ("", ""));
        assert_eq!((&rows[1][2], &rows[1][3], &rows[1][4]), ("5", "4", "7"));
    }

    #[test]
    fn csv_finish_idempotent() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_infection_events(&[]).unwrap();
        w.finish().unwrap();
        w.finish().unwrap();
    }
}

// ── Observer ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod observer_tests {
    use super::*;

    use epi_core::{GeoPoint, MixingGroupKind, SimConfig};
    use epi_disease::Disease;
    use epi_health::FixedNaturalHistory;
    use epi_schedule::{ImportSchedule, ImportWindow};
    use epi_sim::{Epidemic, EpidemicConfig, SimBuilder, SimObserver};
    use epi_world::WorldBuilder;

    use crate::csv::CsvWriter;
    use crate::observer::SimOutputObserver;
    use crate::writer::OutputWriter;
    use crate::{OutputError, OutputResult};

    /// Fails every counts write; records event batches.
    #[derive(Default)]
    struct Flaky {
        batches:  Vec<usize>,
        finished: bool,
    }

    impl OutputWriter for Flaky {
        fn write_daily_counts(&mut self, row: &DailyCountsRow) -> OutputResult<()> {
            Err(OutputError::Io(std::io::Error::other(format!("day {}", row.day))))
        }

        fn write_infection_events(&mut self, rows: &[InfectionEventRow]) -> OutputResult<()> {
            self.batches.push(rows.len());
            Ok(())
        }

        fn finish(&mut self) -> OutputResult<()> {
            self.finished = true;
            Ok(())
        }
    }

    fn event(day: i32, infectee: u32) -> InfectionEvent {
        InfectionEvent {
            day:      Day(day),
            disease:  DiseaseId(0),
            infectee: AgentId(infectee),
            infector: None,
            place:    None,
        }
    }

    #[test]
    fn exposures_are_batched_per_day() {
        let mut obs = SimOutputObserver::new(Flaky::default());
        obs.on_exposure(&event(0, 1));
        obs.on_exposure(&event(0, 2));
        obs.on_day_end(Day(0), &[]);
        obs.on_day_end(Day(1), &[]);
        obs.on_exposure(&event(2, 3));
        obs.on_sim_end(Day(3));

        let writer = obs.into_writer();
        assert_eq!(writer.batches, [2, 1]);
        assert!(writer.finished);
    }

    #[test]
    fn first_error_is_kept() {
        let mut obs = SimOutputObserver::new(Flaky::default());
        obs.on_daily_counts(&DailyCounts { day: Day(3), ..DailyCounts::default() }, DiseaseId(0));
        obs.on_daily_counts(&DailyCounts { day: Day(4), ..DailyCounts::default() }, DiseaseId(0));

        let err = obs.take_error().expect("stored error");
        assert!(err.to_string().contains("day 3"));
        assert!(obs.take_error().is_none());
    }

    #[test]
    fn integration_csv() {
        let mut world = WorldBuilder::new();
        for h in 0..20 {
            let home = world.add_place(
                format!("h{h}"),
                MixingGroupKind::Household,
                Some(GeoPoint::new(40.0 + 0.0045 * h as f32, -80.0)),
            );
            world.add_agent(30.0, &[home]).unwrap();
        }
        let (population, places) = world.build();

        let imports = ImportSchedule::new(vec![ImportWindow::anywhere(DiseaseId(0), Day(0), Day(0), 1)]);
        let flu = Disease::new(DiseaseId(0), "flu", FixedNaturalHistory::new(2, 3));
        let mut sim = SimBuilder::new(SimConfig { total_days: 6, seed: 3 }, population, places)
            .epidemic(Epidemic::new(flu, EpidemicConfig::default()).with_imports(&imports))
            .build()
            .unwrap();

        let dir = tmp();
        let mut obs = SimOutputObserver::new(CsvWriter::new(dir.path()).unwrap());
        sim.run(&mut obs).unwrap();
        assert!(obs.take_error().is_none(), "no write errors expected");

        let mut rdr = csv::Reader::from_path(dir.path().join("daily_counts.csv")).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 6, "one row per day for one disease");
        assert_eq!(&rows[5][7], "1"); // removed on the last day

        let mut rdr = csv::Reader::from_path(dir.path().join("infection_events.csv")).unwrap();
        let events: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(events.len(), 1);
        assert_eq!((&events[0][0], &events[0][3]), ("0", ""));
    }
}

// ── SQLite tests ──────────────────────────────────────────────────────────────

#[cfg(all(test, feature = "sqlite"))]
mod sqlite_tests {
    use super::*;

    use crate::sqlite::SqliteWriter;
    use crate::writer::OutputWriter;

    #[test]
    fn sqlite_db_created() {
        let dir = tmp();
        let _w = SqliteWriter::new(dir.path()).unwrap();
        assert!(dir.path().join("output.db").exists());
    }

    #[test]
    fn sqlite_daily_counts() {
        let dir = tmp();
        let mut w = SqliteWriter::new(dir.path()).unwrap();
        w.write_daily_counts(&counts_row(7)).unwrap();
        w.finish().unwrap();

        let conn = rusqlite::Connection::open(dir.path().join("output.db")).unwrap();
        let (susceptible, prevalence, rr): (i64, i64, f64) = conn
            .query_row(
                "SELECT susceptible, prevalence, reproduction FROM daily_counts WHERE day = 7",
                [],
                |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)),
            )
            .unwrap();
        assert_eq!((susceptible, prevalence, rr), (90, 7, 1.5));
    }

    #[test]
    fn sqlite_duplicate_day_rejected() {
        let dir = tmp();
        let mut w = SqliteWriter::new(dir.path()).unwrap();
        w.write_daily_counts(&counts_row(1)).unwrap();
        assert!(w.write_daily_counts(&counts_row(1)).is_err());
    }

    #[test]
    fn sqlite_missing_infector_is_null() {
        let dir = tmp();
        let mut w = SqliteWriter::new(dir.path()).unwrap();
        w.write_infection_events(&[event_row(4, None), event_row(5, Some(4))]).unwrap();
        w.finish().unwrap();

        let conn = rusqlite::Connection::open(dir.path().join("output.db")).unwrap();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM infection_events", [], |r| r.get(0))
            .unwrap();
        assert_eq!(count, 2);
        let infector: Option<i64> = conn
            .query_row("SELECT infector FROM infection_events WHERE infectee = 4", [], |r| r.get(0))
            .unwrap();
        assert_eq!(infector, None);
    }
}

// ── Parquet tests ─────────────────────────────────────────────────────────────

#[cfg(all(test, feature = "parquet"))]
mod parquet_tests {
    use super::*;

    use arrow::array::Array;
    use arrow::datatypes::DataType;
    use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

    use crate::parquet::ParquetWriter;
    use crate::writer::OutputWriter;

    #[test]
    fn parquet_files_created() {
        let dir = tmp();
        let mut w = ParquetWriter::new(dir.path()).unwrap();
        w.finish().unwrap();
        assert!(dir.path().join("daily_counts.parquet").exists());
        assert!(dir.path().join("infection_events.parquet").exists());
    }

    #[test]
    fn parquet_counts_schema() {
        let dir = tmp();
        let mut w = ParquetWriter::new(dir.path()).unwrap();
        w.write_daily_counts(&counts_row(0)).unwrap();
        w.write_daily_counts(&counts_row(1)).unwrap();
        w.finish().unwrap();

        let file = std::fs::File::open(dir.path().join("daily_counts.parquet")).unwrap();
        let builder = ParquetRecordBatchReaderBuilder::try_new(file).unwrap();
        let schema = builder.schema().clone();
        let total_rows: usize = builder.build().unwrap().map(|b| b.unwrap().num_rows()).sum();
        assert_eq!(total_rows, 2);

        let names: Vec<&str> = schema.fields().iter().map(|f| f.name().as_str()).collect();
        assert_eq!(names, DailyCountsRow::COLUMNS);
        assert_eq!(*schema.field_with_name("removed").unwrap().data_type(), DataType::UInt64);
        assert_eq!(*schema.field_with_name("reproduction").unwrap().data_type(), DataType::Float64);
    }

    #[test]
    fn parquet_infector_is_nullable() {
        let dir = tmp();
        let mut w = ParquetWriter::new(dir.path()).unwrap();
        w.write_infection_events(&[event_row(4, None), event_row(5, Some(4))]).unwrap();
        w.finish().unwrap();

        let file = std::fs::File::open(dir.path().join("infection_events.parquet")).unwrap();
        let builder = ParquetRecordBatchReaderBuilder::try_new(file).unwrap();
        assert!(builder.schema().field_with_name("infector").unwrap().is_nullable());
        let batches: Vec<_> = builder.build().unwrap().map(|b| b.unwrap()).collect();
        let nulls: usize = batches.iter().map(|b| b.column(3).null_count()).sum();
        assert_eq!(nulls, 1);
    }

    #[test]
    fn parquet_finish_required() {
        let dir = tmp();
        {
            let mut w = ParquetWriter::new(dir.path()).unwrap();
            w.write_infection_events(&[event_row(1, None)]).unwrap();
        }

        let file = std::fs::File::open(dir.path().join("infection_events.parquet")).unwrap();
        assert!(ParquetRecordBatchReaderBuilder::try_new(file).is_err());
    }
}
