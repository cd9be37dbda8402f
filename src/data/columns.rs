//! Column and factor identifiers
//!
//! The aggregator and tester address columns by the exact CSV header
//! names (`cnt`, `season`, `weathersit`, ...), so lookups go through
//! `from_name` and unknown names fail loudly as configuration errors.

use serde::{Deserialize, Serialize};

use super::records::DayRecord;
use crate::error::{EdaError, EdaResult};

/// Numeric columns of the daily bike-sharing schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NumericColumn {
    Instant,
    Season,
    Yr,
    Mnth,
    Holiday,
    Weekday,
    Workingday,
    Weathersit,
    Temp,
    Atemp,
    Hum,
    Windspeed,
    Casual,
    Registered,
    Cnt,
}

impl NumericColumn {
    /// All numeric columns, in CSV schema order. Cleaning iterates in
    /// this order, so per-column filters run left to right.
    pub const ALL: [NumericColumn; 15] = [
        NumericColumn::Instant,
        NumericColumn::Season,
        NumericColumn::Yr,
        NumericColumn::Mnth,
        NumericColumn::Holiday,
        NumericColumn::Weekday,
        NumericColumn::Workingday,
        NumericColumn::Weathersit,
        NumericColumn::Temp,
        NumericColumn::Atemp,
        NumericColumn::Hum,
        NumericColumn::Windspeed,
        NumericColumn::Casual,
        NumericColumn::Registered,
        NumericColumn::Cnt,
    ];

    /// CSV header name
    pub fn name(&self) -> &'static str {
        match self {
            NumericColumn::Instant => "instant",
            NumericColumn::Season => "season",
            NumericColumn::Yr => "yr",
            NumericColumn::Mnth => "mnth",
            NumericColumn::Holiday => "holiday",
            NumericColumn::Weekday => "weekday",
            NumericColumn::Workingday => "workingday",
            NumericColumn::Weathersit => "weathersit",
            NumericColumn::Temp => "temp",
            NumericColumn::Atemp => "atemp",
            NumericColumn::Hum => "hum",
            NumericColumn::Windspeed => "windspeed",
            NumericColumn::Casual => "casual",
            NumericColumn::Registered => "registered",
            NumericColumn::Cnt => "cnt",
        }
    }

    /// Look up a column by its CSV header name
    pub fn from_name(name: &str) -> EdaResult<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.name() == name)
            .ok_or_else(|| EdaError::UnknownColumn(name.to_string()))
    }

    /// Extract this column's value from a record as f64
    pub fn value(&self, record: &DayRecord) -> f64 {
        match self {
            NumericColumn::Instant => record.instant as f64,
            NumericColumn::Season => record.season.code() as f64,
            NumericColumn::Yr => record.yr as f64,
            NumericColumn::Mnth => record.mnth as f64,
            NumericColumn::Holiday => record.holiday as u8 as f64,
            NumericColumn::Weekday => record.weekday as f64,
            NumericColumn::Workingday => record.workingday as u8 as f64,
            NumericColumn::Weathersit => record.weathersit.code() as f64,
            NumericColumn::Temp => record.temp,
            NumericColumn::Atemp => record.atemp,
            NumericColumn::Hum => record.hum,
            NumericColumn::Windspeed => record.windspeed,
            NumericColumn::Casual => record.casual as f64,
            NumericColumn::Registered => record.registered as f64,
            NumericColumn::Cnt => record.cnt as f64,
        }
    }
}

/// Categorical factors used for grouping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Factor {
    Season,
    Weathersit,
    Workingday,
    Holiday,
}

impl Factor {
    /// All grouping factors
    pub const ALL: [Factor; 4] = [
        Factor::Season,
        Factor::Weathersit,
        Factor::Workingday,
        Factor::Holiday,
    ];

    /// CSV header name
    pub fn name(&self) -> &'static str {
        match self {
            Factor::Season => "season",
            Factor::Weathersit => "weathersit",
            Factor::Workingday => "workingday",
            Factor::Holiday => "holiday",
        }
    }

    /// Look up a factor by its CSV header name
    pub fn from_name(name: &str) -> EdaResult<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|f| f.name() == name)
            .ok_or_else(|| EdaError::UnknownFactor(name.to_string()))
    }

    /// Extract the factor's integer code from a record
    pub fn code(&self, record: &DayRecord) -> u8 {
        match self {
            Factor::Season => record.season.code(),
            Factor::Weathersit => record.weathersit.code(),
            Factor::Workingday => record.workingday as u8,
            Factor::Holiday => record.holiday as u8,
        }
    }

    /// Human-readable label for a factor code
    pub fn label(&self, code: u8) -> String {
        match self {
            Factor::Season => super::records::Season::from_code(code)
                .map(|s| s.label().to_string())
                .unwrap_or_else(|| format!("season {code}")),
            Factor::Weathersit => super::records::Weather::from_code(code)
                .map(|w| w.label().to_string())
                .unwrap_or_else(|| format!("weather {code}")),
            Factor::Workingday => match code {
                0 => "Weekend/Holiday".to_string(),
                _ => "Working Day".to_string(),
            },
            Factor::Holiday => match code {
                0 => "Regular Day".to_string(),
                _ => "Holiday".to_string(),
            },
        }
    }
}
