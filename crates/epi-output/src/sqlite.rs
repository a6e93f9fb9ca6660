//! SQLite output backend (feature `sqlite`).
//!
//! Creates a single `output.db` file in the configured output directory with
//! two tables: `daily_counts` and `infection_events`.

use std::path::Path;

use rusqlite::Connection;

use crate::writer::OutputWriter;
use crate::{DailyCountsRow, InfectionEventRow, OutputResult};

/// Writes run output to an SQLite database.
pub struct SqliteWriter {
    conn:     Connection,
    finished: bool,
}

impl SqliteWriter {
    /// Open (or create) `output.db` in `dir` and initialise the schema.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let conn = Connection::open(dir.join("output.db"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous  = NORMAL;
             CREATE TABLE IF NOT EXISTS daily_counts (
                 day                     INTEGER NOT NULL,
                 disease                 INTEGER NOT NULL,
                 susceptible             INTEGER NOT NULL,
                 exposed                 INTEGER NOT NULL,
                 infectious              INTEGER NOT NULL,
                 convalescent            INTEGER NOT NULL,
                 symptomatic             INTEGER NOT NULL,
                 removed                 INTEGER NOT NULL,
                 immune                  INTEGER NOT NULL,
                 new_exposed             INTEGER NOT NULL,
                 new_symptomatic         INTEGER NOT NULL,
                 case_fatalities         INTEGER NOT NULL,
                 total_case_fatalities   INTEGER NOT NULL,
                 prevalence              INTEGER NOT NULL,
                 attack_rate             REAL    NOT NULL,
                 symptomatic_attack_rate REAL    NOT NULL,
                 case_fatality_rate      REAL    NOT NULL,
                 reproduction            REAL    NOT NULL,
                 PRIMARY KEY (day, disease)
             );
             CREATE TABLE IF NOT EXISTS infection_events (
                 day      INTEGER NOT NULL,
                 disease  INTEGER NOT NULL,
                 infectee INTEGER NOT NULL,
                 infector INTEGER,
                 place    INTEGER
             );",
        )?;

        Ok(Self { conn, finished: false })
    }
}

impl OutputWriter for SqliteWriter {
    fn write_daily_counts(&mut self, row: &DailyCountsRow) -> OutputResult<()> {
        self.conn.execute(
            "INSERT INTO daily_counts \
             (day, disease, susceptible, exposed, infectious, convalescent, symptomatic, \
              removed, immune, new_exposed, new_symptomatic, case_fatalities, \
              total_case_fatalities, prevalence, attack_rate, symptomatic_attack_rate, \
              case_fatality_rate, reproduction) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18)",
            rusqlite::params![
                row.day,
                row.disease,
                row.susceptible,
                row.exposed,
                row.infectious,
                row.convalescent,
                row.symptomatic,
                row.removed,
                row.immune,
                row.new_exposed,
                row.new_symptomatic,
                row.case_fatalities,
                row.total_case_fatalities,
                row.prevalence,
                row.attack_rate,
                row.symptomatic_attack_rate,
                row.case_fatality_rate,
                row.reproduction,
            ],
        )?;
        Ok(())
    }

    fn write_infection_events(&mut self, rows: &[InfectionEventRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO infection_events (day, disease, infectee, infector, place) \
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;
            for row in rows {
                stmt.execute(rusqlite::params![
                    row.day,
                    row.disease,
                    row.infectee,
                    row.infector,
                    row.place,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
        Ok(())
    }
}
