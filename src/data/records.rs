//! Daily bike-sharing records
//!
//! Core data structures for the day-level rental dataset. One record is
//! one calendar day of observations; a `Dataset` is the ordered
//! collection loaded for a session.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::columns::{Factor, NumericColumn};

/// Season code, 1 through 4
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Season {
    Winter,
    Spring,
    Summer,
    Fall,
}

impl Season {
    /// All seasons in code order
    pub const ALL: [Season; 4] = [Season::Winter, Season::Spring, Season::Summer, Season::Fall];

    /// Parse the dataset's 1-4 season code
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Season::Winter),
            2 => Some(Season::Spring),
            3 => Some(Season::Summer),
            4 => Some(Season::Fall),
            _ => None,
        }
    }

    /// The dataset's integer code
    pub fn code(&self) -> u8 {
        match self {
            Season::Winter => 1,
            Season::Spring => 2,
            Season::Summer => 3,
            Season::Fall => 4,
        }
    }

    /// Display label
    pub fn label(&self) -> &'static str {
        match self {
            Season::Winter => "Winter",
            Season::Spring => "Spring",
            Season::Summer => "Summer",
            Season::Fall => "Fall",
        }
    }
}

/// Weather situation code, 1 (clear) through 4 (heavy precipitation)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Weather {
    Clear,
    Mist,
    LightPrecip,
    HeavyPrecip,
}

impl Weather {
    /// Parse the dataset's 1-4 weather code
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Weather::Clear),
            2 => Some(Weather::Mist),
            3 => Some(Weather::LightPrecip),
            4 => Some(Weather::HeavyPrecip),
            _ => None,
        }
    }

    /// The dataset's integer code (ordinal severity)
    pub fn code(&self) -> u8 {
        match self {
            Weather::Clear => 1,
            Weather::Mist => 2,
            Weather::LightPrecip => 3,
            Weather::HeavyPrecip => 4,
        }
    }

    /// Display label
    pub fn label(&self) -> &'static str {
        match self {
            Weather::Clear => "Clear",
            Weather::Mist => "Mist",
            Weather::LightPrecip => "Light Rain/Snow",
            Weather::HeavyPrecip => "Heavy Rain/Snow",
        }
    }
}

/// One day of bike-rental observations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayRecord {
    pub instant: u32,
    /// Record date. Ingest accepts date or datetime text; cleaning
    /// normalizes any time-of-day component away.
    pub dteday: NaiveDateTime,
    pub season: Season,
    pub yr: u8,
    pub mnth: u8,
    pub holiday: bool,
    pub weekday: u8,
    pub workingday: bool,
    pub weathersit: Weather,
    pub temp: f64,
    pub atemp: f64,
    pub hum: f64,
    pub windspeed: f64,
    pub casual: u32,
    pub registered: u32,
    pub cnt: u32,
}

impl DayRecord {
    /// Calendar date of the observation
    pub fn date(&self) -> NaiveDate {
        self.dteday.date()
    }

    /// Whether the stored date carries a time-of-day component
    pub fn has_time_component(&self) -> bool {
        self.dteday.time() != chrono::NaiveTime::MIN
    }
}

/// Ordered collection of day records for one session
///
/// Immutable once ingested: the cleaner builds a new `Dataset` rather
/// than mutating the raw one in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dataset {
    pub records: Vec<DayRecord>,
    /// Numeric columns actually present in the source file, in schema
    /// order. Quality checks and cleaning iterate over this set.
    pub numeric_columns: Vec<NumericColumn>,
}

impl Dataset {
    /// Create a dataset with the full day.csv column set
    pub fn from_records(records: Vec<DayRecord>) -> Self {
        Self {
            records,
            numeric_columns: NumericColumn::ALL.to_vec(),
        }
    }

    /// Create a dataset restricted to the given numeric columns
    pub fn with_columns(records: Vec<DayRecord>, numeric_columns: Vec<NumericColumn>) -> Self {
        Self {
            records,
            numeric_columns,
        }
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset has no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All values of a numeric column, in record order
    pub fn column_values(&self, column: NumericColumn) -> Vec<f64> {
        self.records.iter().map(|r| column.value(r)).collect()
    }

    /// All rental counts, in record order
    pub fn rental_counts(&self) -> Vec<f64> {
        self.column_values(NumericColumn::Cnt)
    }

    /// Rental counts of the records where the factor takes `code`
    pub fn rentals_where(&self, factor: Factor, code: u8) -> Vec<f64> {
        self.records
            .iter()
            .filter(|r| factor.code(r) == code)
            .map(|r| r.cnt as f64)
            .collect()
    }

    /// Distinct factor codes present, ascending
    pub fn factor_codes(&self, factor: Factor) -> Vec<u8> {
        let mut codes: Vec<u8> = self.records.iter().map(|r| factor.code(r)).collect();
        codes.sort_unstable();
        codes.dedup();
        codes
    }
}
