//! Data cleaning
//!
//! Produces a new dataset from the raw one: date values lose any
//! time-of-day component, then rows falling outside each continuous
//! column's IQR fences (clean multiplier, default 1.0) are removed.
//! Filters run successively column by column in schema order, each
//! pass computing fences on the rows that survived the previous
//! passes. The raw dataset is never touched.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::data::Dataset;
use crate::quality::{column_bounds, continuous_columns, OutlierConfig};

/// Non-fatal conditions raised by a cleaning pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CleanWarning {
    /// Every row was removed; downstream analyses must not run
    EmptyResult,
    /// Fewer than `threshold` of the rows survived; the multiplier may
    /// be too tight
    HighShrinkage { ratio: f64, threshold: f64 },
}

impl std::fmt::Display for CleanWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CleanWarning::EmptyResult => {
                write!(f, "dataset is empty after outlier removal")
            }
            CleanWarning::HighShrinkage { ratio, threshold } => write!(
                f,
                "only {:.1}% of rows remain (threshold {:.0}%); consider a wider multiplier",
                ratio * 100.0,
                threshold * 100.0
            ),
        }
    }
}

/// Outcome of a cleaning pass
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleanReport {
    pub raw_rows: usize,
    pub clean_rows: usize,
    /// clean_rows / raw_rows
    pub shrinkage_ratio: f64,
    /// Records whose date carried a time component that was stripped
    pub dates_normalized: usize,
    /// Rows removed per column filter, in the order the filters ran
    pub removed_by_column: Vec<(String, usize)>,
    pub warnings: Vec<CleanWarning>,
}

/// One-shot outlier cleaner
///
/// Re-running on an already-cleaned dataset is safe but not a no-op
/// guarantee: fences recomputed on the shrunk distribution are tighter
/// than the original pass. Iterative convergence is deliberately not
/// attempted.
#[derive(Debug, Clone, Default)]
pub struct Cleaner {
    config: OutlierConfig,
}

impl Cleaner {
    /// Create a cleaner with the given fence configuration
    pub fn new(config: OutlierConfig) -> Self {
        Self { config }
    }

    /// Clean a dataset, returning the new dataset and a report
    pub fn clean(&self, raw: &Dataset) -> (Dataset, CleanReport) {
        let raw_rows = raw.len();

        let mut dates_normalized = 0;
        let records: Vec<_> = raw
            .records
            .iter()
            .map(|r| {
                let mut record = r.clone();
                if record.has_time_component() {
                    record.dteday = record.date().and_time(NaiveTime::MIN);
                    dates_normalized += 1;
                }
                record
            })
            .collect();

        let mut current = Dataset::with_columns(records, raw.numeric_columns.clone());

        // Column classification happens once, on the pre-clean frame;
        // fences are recomputed per pass on the surviving rows.
        let continuous = continuous_columns(&current);
        let mut removed_by_column = Vec::with_capacity(continuous.len());

        for column in continuous {
            if current.is_empty() {
                removed_by_column.push((column.name().to_string(), 0));
                continue;
            }
            let bounds = column_bounds(&current, column, self.config.clean_multiplier);
            let before = current.len();
            current.records.retain(|r| bounds.contains(column.value(r)));
            let removed = before - current.len();
            debug!(
                column = column.name(),
                lower = bounds.lower,
                upper = bounds.upper,
                removed,
                "outlier filter pass"
            );
            removed_by_column.push((column.name().to_string(), removed));
        }

        let clean_rows = current.len();
        let shrinkage_ratio = if raw_rows > 0 {
            clean_rows as f64 / raw_rows as f64
        } else {
            0.0
        };

        let mut warnings = Vec::new();
        if clean_rows == 0 {
            warnings.push(CleanWarning::EmptyResult);
        } else if shrinkage_ratio < self.config.shrinkage_warn_ratio {
            warnings.push(CleanWarning::HighShrinkage {
                ratio: shrinkage_ratio,
                threshold: self.config.shrinkage_warn_ratio,
            });
        }
        for warning in &warnings {
            warn!(%warning, "cleaning pass raised a warning");
        }

        let report = CleanReport {
            raw_rows,
            clean_rows,
            shrinkage_ratio,
            dates_normalized,
            removed_by_column,
            warnings,
        };

        (current, report)
    }
}
