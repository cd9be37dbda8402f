//! IQR-based outlier detection
//!
//! Values below Q1 - k*IQR or above Q3 + k*IQR are considered outliers.
//! Quartiles use linear interpolation on the sorted column. Only
//! columns with more than two distinct values are treated as
//! continuous; binary 0/1 columns are never flagged.

use serde::{Deserialize, Serialize};

use crate::data::{Dataset, NumericColumn};
use crate::error::EdaResult;

/// Multipliers and thresholds for outlier handling
///
/// Detection and cleaning deliberately use different multipliers: the
/// report flags with the conventional 1.5 fence while the cleaning pass
/// removes with the tighter 1.0 fence. The two are configured
/// independently.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutlierConfig {
    /// Fence multiplier for reporting (typically 1.5)
    pub detect_multiplier: f64,
    /// Fence multiplier for the cleaning pass (typically 1.0)
    pub clean_multiplier: f64,
    /// Cleaning warns when fewer than this fraction of rows survive
    pub shrinkage_warn_ratio: f64,
}

impl Default for OutlierConfig {
    fn default() -> Self {
        Self {
            detect_multiplier: 1.5,
            clean_multiplier: 1.0,
            shrinkage_warn_ratio: 0.10,
        }
    }
}

/// IQR fences for one column
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnBounds {
    pub column: String,
    pub q1: f64,
    pub q3: f64,
    pub iqr: f64,
    pub lower: f64,
    pub upper: f64,
}

impl ColumnBounds {
    /// Whether a value lies inside the fences (inclusive)
    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower && value <= self.upper
    }
}

/// Outlier count and fences for one column
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnOutliers {
    pub bounds: ColumnBounds,
    pub count: usize,
}

/// Outlier report over all continuous columns
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutlierReport {
    pub multiplier: f64,
    pub columns: Vec<ColumnOutliers>,
}

impl OutlierReport {
    /// Columns that actually have outliers
    pub fn flagged(&self) -> impl Iterator<Item = &ColumnOutliers> {
        self.columns.iter().filter(|c| c.count > 0)
    }

    /// Number of columns with at least one outlier
    pub fn flagged_count(&self) -> usize {
        self.flagged().count()
    }
}

/// Quantile of a sorted slice using linear interpolation
pub fn quantile(sorted: &[f64], q: f64) -> f64 {
    debug_assert!(!sorted.is_empty());
    debug_assert!((0.0..=1.0).contains(&q));
    if sorted.len() == 1 {
        return sorted[0];
    }
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    if lo == hi {
        sorted[lo]
    } else {
        sorted[lo] + (pos - lo as f64) * (sorted[hi] - sorted[lo])
    }
}

/// Number of distinct values in a column
pub fn distinct_count(values: &[f64]) -> usize {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    sorted.dedup();
    sorted.len()
}

/// Continuous numeric columns of a dataset: present, with more than
/// two distinct values. Binary and constant columns are excluded.
pub fn continuous_columns(dataset: &Dataset) -> Vec<NumericColumn> {
    dataset
        .numeric_columns
        .iter()
        .copied()
        .filter(|&c| distinct_count(&dataset.column_values(c)) > 2)
        .collect()
}

/// IQR fences for a column at multiplier `k`
///
/// An empty dataset yields NaN fences; callers report zero outliers in
/// that case rather than erroring.
pub fn column_bounds(dataset: &Dataset, column: NumericColumn, k: f64) -> ColumnBounds {
    let mut values = dataset.column_values(column);
    if values.is_empty() {
        return ColumnBounds {
            column: column.name().to_string(),
            q1: f64::NAN,
            q3: f64::NAN,
            iqr: f64::NAN,
            lower: f64::NAN,
            upper: f64::NAN,
        };
    }
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let q1 = quantile(&values, 0.25);
    let q3 = quantile(&values, 0.75);
    let iqr = q3 - q1;
    ColumnBounds {
        column: column.name().to_string(),
        q1,
        q3,
        iqr,
        lower: q1 - k * iqr,
        upper: q3 + k * iqr,
    }
}

/// Count outliers in one column, addressed by CSV header name
///
/// Unknown names are configuration errors. An empty dataset reports
/// zero outliers.
pub fn detect_column(dataset: &Dataset, name: &str, k: f64) -> EdaResult<ColumnOutliers> {
    let column = NumericColumn::from_name(name)?;
    Ok(count_outliers(dataset, column, k))
}

/// Outlier report over every continuous column at the detection fence
pub fn detect(dataset: &Dataset, config: &OutlierConfig) -> OutlierReport {
    let k = config.detect_multiplier;
    let columns = continuous_columns(dataset)
        .into_iter()
        .map(|c| count_outliers(dataset, c, k))
        .collect();
    OutlierReport {
        multiplier: k,
        columns,
    }
}

fn count_outliers(dataset: &Dataset, column: NumericColumn, k: f64) -> ColumnOutliers {
    let bounds = column_bounds(dataset, column, k);
    let count = if dataset.is_empty() {
        0
    } else {
        dataset
            .column_values(column)
            .iter()
            .filter(|&&v| v < bounds.lower || v > bounds.upper)
            .count()
    };
    ColumnOutliers { bounds, count }
}
