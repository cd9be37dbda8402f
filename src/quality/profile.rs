//! Descriptive statistics and the combined quality report
//!
//! Mirrors the assessment step of the workflow: per-column describe
//! tables plus the ingest profile and outlier report in one structure.

use serde::{Deserialize, Serialize};

use super::outlier::{self, quantile, OutlierConfig, OutlierReport};
use crate::data::{Dataset, IngestProfile, NumericColumn};
use crate::error::EdaResult;

/// Count, mean, std, min, quartiles, max of one series
///
/// `std` is the sample standard deviation (ddof = 1); it is NaN for a
/// single observation, matching the describe semantics analysts expect.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DescriptiveStats {
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

impl DescriptiveStats {
    /// Compute the describe row for a series; None when empty
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let n = sorted.len();
        let mean = sorted.iter().sum::<f64>() / n as f64;
        let std = if n > 1 {
            let ss: f64 = sorted.iter().map(|v| (v - mean).powi(2)).sum();
            (ss / (n - 1) as f64).sqrt()
        } else {
            f64::NAN
        };

        Some(Self {
            count: n,
            mean,
            std,
            min: sorted[0],
            q1: quantile(&sorted, 0.25),
            median: quantile(&sorted, 0.5),
            q3: quantile(&sorted, 0.75),
            max: sorted[n - 1],
        })
    }
}

/// Describe table over the dataset's numeric columns
pub fn describe(dataset: &Dataset) -> Vec<(String, DescriptiveStats)> {
    dataset
        .numeric_columns
        .iter()
        .filter_map(|&c| {
            DescriptiveStats::from_values(&dataset.column_values(c))
                .map(|stats| (c.name().to_string(), stats))
        })
        .collect()
}

/// Describe one column addressed by CSV header name
pub fn describe_column(dataset: &Dataset, name: &str) -> EdaResult<Option<DescriptiveStats>> {
    let column = NumericColumn::from_name(name)?;
    Ok(DescriptiveStats::from_values(&dataset.column_values(column)))
}

/// Combined data quality assessment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityReport {
    pub ingest: IngestProfile,
    pub describe: Vec<(String, DescriptiveStats)>,
    pub outliers: OutlierReport,
}

/// Assess a raw dataset: ingest profile, describe table, outlier report
pub fn assess(dataset: &Dataset, ingest: IngestProfile, config: &OutlierConfig) -> QualityReport {
    QualityReport {
        ingest,
        describe: describe(dataset),
        outliers: outlier::detect(dataset, config),
    }
}
