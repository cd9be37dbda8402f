//! Quartile-based rental segmentation
//!
//! Splits days into Low / Medium / High rental bands around Q1 and Q3
//! of the rental count: below Q1 is Low, above Q3 is High, the middle
//! half is Medium.

use serde::{Deserialize, Serialize};

use super::charts::ChartSpec;
use crate::data::Dataset;
use crate::error::{EdaError, EdaResult};
use crate::quality::quantile;

/// Rental volume band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RentalBand {
    Low,
    Medium,
    High,
}

impl RentalBand {
    /// Bands in display order
    pub const ALL: [RentalBand; 3] = [RentalBand::Low, RentalBand::Medium, RentalBand::High];

    /// Display label
    pub fn label(&self) -> &'static str {
        match self {
            RentalBand::Low => "Low Rental",
            RentalBand::Medium => "Medium Rental",
            RentalBand::High => "High Rental",
        }
    }
}

/// Day counts per rental band
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentReport {
    pub q1: f64,
    pub q3: f64,
    pub low: usize,
    pub medium: usize,
    pub high: usize,
}

impl SegmentReport {
    /// Count for one band
    pub fn count(&self, band: RentalBand) -> usize {
        match band {
            RentalBand::Low => self.low,
            RentalBand::Medium => self.medium,
            RentalBand::High => self.high,
        }
    }

    /// Total days across all bands
    pub fn total(&self) -> usize {
        self.low + self.medium + self.high
    }

    /// Bar chart of band counts with the largest band highlighted
    pub fn chart(&self) -> ChartSpec {
        ChartSpec::bar(
            "Rental Volume Segments",
            "Rental Band",
            "Days",
            RentalBand::ALL.iter().map(|b| b.label().to_string()).collect(),
            RentalBand::ALL
                .iter()
                .map(|b| self.count(*b) as f64)
                .collect(),
        )
    }
}

/// Segment a dataset's days by rental count quartiles
pub fn segment_rentals(dataset: &Dataset) -> EdaResult<SegmentReport> {
    if dataset.is_empty() {
        return Err(EdaError::EmptyDataset);
    }
    let mut counts = dataset.rental_counts();
    counts.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let q1 = quantile(&counts, 0.25);
    let q3 = quantile(&counts, 0.75);

    let mut report = SegmentReport {
        q1,
        q3,
        low: 0,
        medium: 0,
        high: 0,
    };
    for value in dataset.rental_counts() {
        if value < q1 {
            report.low += 1;
        } else if value > q3 {
            report.high += 1;
        } else {
            report.medium += 1;
        }
    }
    Ok(report)
}
