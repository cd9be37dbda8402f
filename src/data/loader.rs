//! CSV ingest
//!
//! Loads the daily bike-sharing CSV into a typed `Dataset` while
//! profiling data quality on the way through: per-column missing cells,
//! duplicate rows, and rows dropped as unparseable. Nothing here is
//! fatal beyond a missing required header; bad rows are skipped and
//! counted.

use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use csv::StringRecord;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::columns::NumericColumn;
use super::records::{DayRecord, Dataset, Season, Weather};
use crate::error::{EdaError, EdaResult};

/// Headers that must be present for the pipeline to run at all
const REQUIRED_HEADERS: [&str; 5] = ["dteday", "season", "weathersit", "workingday", "cnt"];

/// Ingest-time data quality profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestProfile {
    /// Rows read from the file, excluding the header
    pub rows_read: usize,
    /// Rows that parsed into records
    pub rows_loaded: usize,
    /// Rows dropped for missing or unparseable cells
    pub rows_skipped: usize,
    /// Rows identical to an earlier row
    pub duplicate_rows: usize,
    /// Empty-cell count per column, in header order
    pub missing_by_column: Vec<(String, usize)>,
}

impl IngestProfile {
    /// Total missing cells across all columns
    pub fn total_missing(&self) -> usize {
        self.missing_by_column.iter().map(|(_, n)| n).sum()
    }
}

/// Loader for the day-level bike-sharing CSV
pub struct DataLoader;

impl DataLoader {
    /// Load a dataset from a CSV file
    pub fn load<P: AsRef<Path>>(path: P) -> EdaResult<(Dataset, IngestProfile)> {
        let file = File::open(path.as_ref())?;
        Self::load_from_reader(file)
    }

    /// Load a dataset from any reader
    pub fn load_from_reader<R: Read>(reader: R) -> EdaResult<(Dataset, IngestProfile)> {
        let mut csv_reader = csv::Reader::from_reader(reader);

        let headers: Vec<String> = csv_reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();
        let index: HashMap<&str, usize> = headers
            .iter()
            .enumerate()
            .map(|(i, h)| (h.as_str(), i))
            .collect();

        for required in REQUIRED_HEADERS {
            if !index.contains_key(required) {
                return Err(EdaError::MissingHeader(required.to_string()));
            }
        }

        let numeric_columns: Vec<NumericColumn> = NumericColumn::ALL
            .iter()
            .copied()
            .filter(|c| index.contains_key(c.name()))
            .collect();

        let mut missing = vec![0usize; headers.len()];
        let mut seen = HashSet::new();
        let mut records = Vec::new();
        let mut rows_read = 0;
        let mut rows_skipped = 0;
        let mut duplicate_rows = 0;

        for result in csv_reader.records() {
            let row = result?;
            rows_read += 1;

            let mut has_missing = false;
            for (i, cell) in row.iter().enumerate() {
                if cell.trim().is_empty() {
                    if i < missing.len() {
                        missing[i] += 1;
                    }
                    has_missing = true;
                }
            }

            if !seen.insert(row.iter().collect::<Vec<_>>().join("\u{1f}")) {
                duplicate_rows += 1;
            }

            if has_missing {
                rows_skipped += 1;
                continue;
            }

            match Self::parse_row(&row, &index) {
                Ok(record) => records.push(record),
                Err(reason) => {
                    warn!(row = rows_read, %reason, "skipping unparseable row");
                    rows_skipped += 1;
                }
            }
        }

        let profile = IngestProfile {
            rows_read,
            rows_loaded: records.len(),
            rows_skipped,
            duplicate_rows,
            missing_by_column: headers.iter().cloned().zip(missing).collect(),
        };

        Ok((Dataset::with_columns(records, numeric_columns), profile))
    }

    fn parse_row(row: &StringRecord, index: &HashMap<&str, usize>) -> Result<DayRecord, String> {
        let cell = |name: &str| -> Option<&str> {
            index.get(name).and_then(|&i| row.get(i)).map(str::trim)
        };
        let numeric = |name: &str, default: f64| -> Result<f64, String> {
            match cell(name) {
                Some(text) => text
                    .parse()
                    .map_err(|_| format!("{name}: invalid number {text:?}")),
                None => Ok(default),
            }
        };
        let integer = |name: &str, default: u32| -> Result<u32, String> {
            match cell(name) {
                Some(text) => text
                    .parse()
                    .map_err(|_| format!("{name}: invalid integer {text:?}")),
                None => Ok(default),
            }
        };

        let date_text = cell("dteday").unwrap_or_default();
        let dteday =
            parse_date(date_text).ok_or_else(|| format!("dteday: invalid date {date_text:?}"))?;

        let season_code = integer("season", 0)? as u8;
        let season = Season::from_code(season_code)
            .ok_or_else(|| format!("season: code {season_code} out of range"))?;

        let weather_code = integer("weathersit", 0)? as u8;
        let weathersit = Weather::from_code(weather_code)
            .ok_or_else(|| format!("weathersit: code {weather_code} out of range"))?;

        Ok(DayRecord {
            instant: integer("instant", 0)?,
            dteday,
            season,
            yr: integer("yr", 0)? as u8,
            mnth: integer("mnth", 0)? as u8,
            holiday: integer("holiday", 0)? != 0,
            weekday: integer("weekday", 0)? as u8,
            workingday: integer("workingday", 0)? != 0,
            weathersit,
            temp: numeric("temp", 0.0)?,
            atemp: numeric("atemp", 0.0)?,
            hum: numeric("hum", 0.0)?,
            windspeed: numeric("windspeed", 0.0)?,
            casual: integer("casual", 0)?,
            registered: integer("registered", 0)?,
            cnt: integer("cnt", 0)?,
        })
    }
}

/// Parse a record date, accepting plain dates and common datetime forms
fn parse_date(text: &str) -> Option<NaiveDateTime> {
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Some(date.and_time(NaiveTime::MIN));
    }
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(text, format) {
            return Some(datetime);
        }
    }
    None
}
