//! CSV import-window loader.
//!
//! # CSV format
//!
//! One row per window.  `seeding_attempt_prob`, `min_num_successful`, `lat`,
//! `lon`, and `radius` may be left empty.
//!
//! ```csv
//! sim_day_start,sim_day_end,num_seeding_attempts,disease_id,seeding_attempt_prob,min_num_successful,lat,lon,radius
//! 0,0,10,0,1.0,0,,,
//! 5,9,2,0,0.5,1,40.44,-79.99,5.0
//! ```
//!
//! | Column                 | Default | Meaning                                  |
//! |------------------------|---------|------------------------------------------|
//! | `seeding_attempt_prob` | 1.0     | success probability of each attempt      |
//! | `min_num_successful`   | 0       | floor on the requested count             |
//! | `lat`, `lon`           | —       | search center; both or neither           |
//! | `radius`               | anywhere| km; empty or ≤ 0 means anywhere          |

use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use epi_core::{Day, DiseaseId, GeoPoint};

use crate::{ImportSchedule, ImportWindow, ScheduleError};

// ── CSV record ────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct ImportRecord {
    sim_day_start:        i32,
    sim_day_end:          i32,
    num_seeding_attempts: u32,
    disease_id:           u16,
    seeding_attempt_prob: Option<f64>,
    min_num_successful:   Option<u32>,
    lat:                  Option<f32>,
    lon:                  Option<f32>,
    radius:               Option<f64>,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load an [`ImportSchedule`] from a CSV file.
pub fn load_import_windows_csv(path: &Path) -> Result<ImportSchedule, ScheduleError> {
    let file = std::fs::File::open(path).map_err(ScheduleError::Io)?;
    load_import_windows_reader(file)
}

/// Like [`load_import_windows_csv`] but accepts any `Read` source.
pub fn load_import_windows_reader<R: Read>(reader: R) -> Result<ImportSchedule, ScheduleError> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut schedule = ImportSchedule::default();

    for (line, result) in csv_reader.deserialize::<ImportRecord>().enumerate() {
        let row = result.map_err(|e| ScheduleError::Parse(e.to_string()))?;
        schedule.push(to_window(row, line + 2)?);
    }

    Ok(schedule)
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn to_window(row: ImportRecord, line: usize) -> Result<ImportWindow, ScheduleError> {
    if row.sim_day_end < row.sim_day_start {
        return Err(ScheduleError::Parse(format!(
            "line {line}: sim_day_end {} precedes sim_day_start {}",
            row.sim_day_end, row.sim_day_start
        )));
    }

    let attempt_prob = row.seeding_attempt_prob.unwrap_or(1.0);
    if !(0.0..=1.0).contains(&attempt_prob) {
        return Err(ScheduleError::Parse(format!(
            "line {line}: seeding_attempt_prob {attempt_prob} outside [0, 1]"
        )));
    }

    let center = match (row.lat, row.lon) {
        (Some(lat), Some(lon)) => Some(GeoPoint::new(lat, lon)),
        (None, None) => None,
        _ => {
            return Err(ScheduleError::Parse(format!(
                "line {line}: lat and lon must be given together"
            )));
        }
    };

    Ok(ImportWindow {
        start:          Day(row.sim_day_start),
        end:            Day(row.sim_day_end),
        attempts:       row.num_seeding_attempts,
        disease:        DiseaseId(row.disease_id),
        attempt_prob,
        min_successful: row.min_num_successful.unwrap_or(0),
        center,
        radius_km:      row.radius.filter(|&r| r > 0.0),
    })
}
