//! Grouped summaries and correlation
//!
//! Groups the cleaned records by a categorical factor and computes
//! describe-style statistics of the rental count per group, plus the
//! Pearson correlation matrix over numeric-coded columns. Every factor
//! value present in the data keeps its group, including singletons.

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use super::charts::ChartSpec;
use crate::data::{Dataset, Factor, NumericColumn};
use crate::error::{EdaError, EdaResult};
use crate::quality::DescriptiveStats;

/// Describe statistics for one factor value
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupStats {
    pub code: u8,
    pub label: String,
    pub stats: DescriptiveStats,
}

/// Rental-count summary per group of a factor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupSummary {
    pub factor: String,
    /// Groups in ascending code order; none dropped regardless of size
    pub groups: Vec<GroupStats>,
}

impl GroupSummary {
    /// Sum of group counts; equals the dataset size by construction
    pub fn total_count(&self) -> usize {
        self.groups.iter().map(|g| g.stats.count).sum()
    }
}

/// Pearson correlation matrix over named columns
///
/// Constant columns produce NaN entries, as a correlation against zero
/// variance is undefined.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    pub values: Array2<f64>,
}

impl CorrelationMatrix {
    /// Correlation between two named columns
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.columns.iter().position(|c| c == a)?;
        let j = self.columns.iter().position(|c| c == b)?;
        Some(self.values[[i, j]])
    }
}

/// Describe the rental count per group of `factor`
pub fn group_describe(dataset: &Dataset, factor: Factor) -> EdaResult<GroupSummary> {
    if dataset.is_empty() {
        return Err(EdaError::EmptyDataset);
    }
    let groups = dataset
        .factor_codes(factor)
        .into_iter()
        .filter_map(|code| {
            DescriptiveStats::from_values(&dataset.rentals_where(factor, code)).map(|stats| {
                GroupStats {
                    code,
                    label: factor.label(code),
                    stats,
                }
            })
        })
        .collect();
    Ok(GroupSummary {
        factor: factor.name().to_string(),
        groups,
    })
}

/// Mean rental count per group as a bar chart with the top group
/// highlighted
pub fn group_mean_chart(dataset: &Dataset, factor: Factor) -> EdaResult<ChartSpec> {
    let summary = group_describe(dataset, factor)?;
    let categories = summary.groups.iter().map(|g| g.label.clone()).collect();
    let values = summary.groups.iter().map(|g| g.stats.mean).collect();
    Ok(ChartSpec::bar(
        format!("Average Rentals by {}", factor.name()),
        factor.name(),
        "Average Rentals",
        categories,
        values,
    ))
}

/// Mean rental count per season as a line chart
pub fn seasonal_trend(dataset: &Dataset) -> EdaResult<ChartSpec> {
    let summary = group_describe(dataset, Factor::Season)?;
    let categories = summary.groups.iter().map(|g| g.label.clone()).collect();
    let values = summary.groups.iter().map(|g| g.stats.mean).collect();
    Ok(ChartSpec::line(
        "Seasonal Rental Trend",
        "Season",
        "Average Rentals",
        categories,
        values,
    ))
}

/// Pearson correlation between two series; None on zero variance
pub fn pearson(x: &[f64], y: &[f64]) -> Option<f64> {
    if x.len() != y.len() || x.len() < 2 {
        return None;
    }
    let n = x.len() as f64;
    let mean_x = x.iter().sum::<f64>() / n;
    let mean_y = y.iter().sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (xi, yi) in x.iter().zip(y.iter()) {
        let dx = xi - mean_x;
        let dy = yi - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }
    Some(cov / (var_x.sqrt() * var_y.sqrt()))
}

/// Default column set for the factor correlation screen
pub const CORRELATION_COLUMNS: [NumericColumn; 3] = [
    NumericColumn::Season,
    NumericColumn::Weathersit,
    NumericColumn::Cnt,
];

/// Pairwise Pearson correlation over the given columns
pub fn correlation_matrix(
    dataset: &Dataset,
    columns: &[NumericColumn],
) -> EdaResult<CorrelationMatrix> {
    if dataset.is_empty() {
        return Err(EdaError::EmptyDataset);
    }
    let series: Vec<Vec<f64>> = columns.iter().map(|&c| dataset.column_values(c)).collect();
    let k = columns.len();
    let mut values = Array2::from_elem((k, k), f64::NAN);
    for i in 0..k {
        for j in 0..k {
            values[[i, j]] = if i == j {
                1.0
            } else {
                pearson(&series[i], &series[j]).unwrap_or(f64::NAN)
            };
        }
    }
    Ok(CorrelationMatrix {
        columns: columns.iter().map(|c| c.name().to_string()).collect(),
        values,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::test_support;

    #[test]
    fn test_group_counts_sum_to_dataset_size() {
        let ds = test_support::banded_dataset(100, 0, 0);
        for factor in Factor::ALL {
            let summary = group_describe(&ds, factor).unwrap();
            assert_eq!(summary.total_count(), ds.len(), "factor {}", factor.name());
        }
    }

    #[test]
    fn test_singleton_groups_are_kept() {
        let mut ds = test_support::banded_dataset(40, 0, 0);
        // Push every record into season 1 except a lone season 4 row.
        for r in &mut ds.records {
            r.season = crate::data::Season::Winter;
        }
        ds.records[7].season = crate::data::Season::Fall;
        let summary = group_describe(&ds, Factor::Season).unwrap();
        assert_eq!(summary.groups.len(), 2);
        let lone = summary.groups.iter().find(|g| g.code == 4).unwrap();
        assert_eq!(lone.stats.count, 1);
        assert!(lone.stats.std.is_nan());
    }

    #[test]
    fn test_group_mean_chart_highlights_top_group() {
        let ds = test_support::banded_dataset(100, 0, 0);
        let chart = group_mean_chart(&ds, Factor::Season).unwrap();
        assert_eq!(chart.categories.len(), 4);
        let max_idx = chart.highlighted.unwrap();
        for v in &chart.values {
            assert!(*v <= chart.values[max_idx]);
        }
    }

    #[test]
    fn test_pearson_of_identical_series_is_one() {
        let x = vec![1.0, 2.0, 3.0, 4.0];
        assert!((pearson(&x, &x).unwrap() - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_correlation_matrix_shape_and_diagonal() {
        let ds = test_support::banded_dataset(100, 0, 0);
        let matrix = correlation_matrix(&ds, &CORRELATION_COLUMNS).unwrap();
        assert_eq!(matrix.columns, vec!["season", "weathersit", "cnt"]);
        for i in 0..3 {
            assert!((matrix.values[[i, i]] - 1.0).abs() < 1e-10);
        }
        // Symmetric off-diagonal.
        let ab = matrix.get("season", "cnt").unwrap();
        let ba = matrix.get("cnt", "season").unwrap();
        assert!((ab - ba).abs() < 1e-10);
    }

    #[test]
    fn test_constant_column_yields_nan_entry() {
        let mut ds = test_support::banded_dataset(50, 0, 0);
        for r in &mut ds.records {
            r.weathersit = crate::data::Weather::Clear;
        }
        let matrix = correlation_matrix(&ds, &CORRELATION_COLUMNS).unwrap();
        assert!(matrix.get("weathersit", "cnt").unwrap().is_nan());
        assert!((matrix.get("weathersit", "weathersit").unwrap() - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_empty_dataset_is_advisory() {
        let ds = Dataset::from_records(vec![]);
        assert!(matches!(
            group_describe(&ds, Factor::Season),
            Err(EdaError::EmptyDataset)
        ));
    }
}
