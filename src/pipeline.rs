//! Session pipeline
//!
//! Explicit context object for one analysis session. Holds the two
//! dataset slots (raw, cleaned), each written at most once per
//! lifecycle event and read many times after. Every analysis entry
//! point validates the stage it needs and returns an advisory error
//! when the session has not reached it.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::analysis::{
    self, ChartSpec, CorrelationMatrix, GroupSummary, SegmentReport, TestResult,
    CORRELATION_COLUMNS,
};
use crate::clean::{CleanReport, Cleaner};
use crate::data::{DataLoader, Dataset, Factor, IngestProfile, Season};
use crate::error::{EdaError, EdaResult};
use crate::quality::{self, OutlierConfig, OutlierReport, QualityReport};

/// Lifecycle stage of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stage {
    /// Nothing ingested yet
    Empty,
    /// Raw dataset loaded, not yet cleaned
    Gathered,
    /// Cleaned dataset available, analyses may run
    Cleaned,
}

/// One analysis session over a raw and a cleaned dataset
#[derive(Debug, Default)]
pub struct Pipeline {
    config: OutlierConfig,
    raw: Option<Dataset>,
    ingest: Option<IngestProfile>,
    clean: Option<Dataset>,
    clean_report: Option<CleanReport>,
}

impl Pipeline {
    /// Create a session with the given outlier configuration
    pub fn new(config: OutlierConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    /// Current lifecycle stage
    pub fn stage(&self) -> Stage {
        if self.clean.is_some() {
            Stage::Cleaned
        } else if self.raw.is_some() {
            Stage::Gathered
        } else {
            Stage::Empty
        }
    }

    /// Ingest a CSV file into the raw slot
    ///
    /// Replaces any previous session state, including a cached cleaned
    /// dataset.
    pub fn ingest_csv<P: AsRef<Path>>(&mut self, path: P) -> EdaResult<&IngestProfile> {
        let (dataset, profile) = DataLoader::load(path)?;
        self.ingest_dataset(dataset, profile);
        self.ingest.as_ref().ok_or(EdaError::MissingRaw)
    }

    /// Ingest an already-built dataset (embedding and tests)
    pub fn ingest_dataset(&mut self, dataset: Dataset, profile: IngestProfile) {
        info!(rows = dataset.len(), "ingested dataset");
        self.raw = Some(dataset);
        self.ingest = Some(profile);
        self.clean = None;
        self.clean_report = None;
    }

    /// The raw dataset, if ingested
    pub fn raw(&self) -> EdaResult<&Dataset> {
        self.raw.as_ref().ok_or(EdaError::MissingRaw)
    }

    /// The cleaned, non-empty dataset
    pub fn cleaned(&self) -> EdaResult<&Dataset> {
        let dataset = self.clean.as_ref().ok_or(EdaError::MissingClean)?;
        if dataset.is_empty() {
            return Err(EdaError::EmptyDataset);
        }
        Ok(dataset)
    }

    /// Assess the raw dataset: ingest profile, describe, outliers
    pub fn assess(&self) -> EdaResult<QualityReport> {
        let raw = self.raw()?;
        let ingest = self.ingest.clone().ok_or(EdaError::MissingRaw)?;
        Ok(quality::assess(raw, ingest, &self.config))
    }

    /// Outlier report alone, at the detection fence
    pub fn outlier_report(&self) -> EdaResult<OutlierReport> {
        Ok(quality::detect(self.raw()?, &self.config))
    }

    /// Run the cleaner, filling the cleaned slot
    ///
    /// The raw slot is left untouched; warnings ride along in the
    /// report rather than failing the call.
    pub fn run_cleaning(&mut self) -> EdaResult<&CleanReport> {
        let raw = self.raw.as_ref().ok_or(EdaError::MissingRaw)?;
        let (cleaned, report) = Cleaner::new(self.config.clone()).clean(raw);
        info!(
            raw = report.raw_rows,
            clean = report.clean_rows,
            "cleaning pass complete"
        );
        self.clean = Some(cleaned);
        self.clean_report = Some(report);
        self.clean_report.as_ref().ok_or(EdaError::MissingClean)
    }

    /// The last cleaning report, if cleaning ran
    pub fn clean_report(&self) -> EdaResult<&CleanReport> {
        self.clean_report.as_ref().ok_or(EdaError::MissingClean)
    }

    /// Grouped describe of rentals by a factor addressed by name
    pub fn group_summary(&self, factor_name: &str) -> EdaResult<GroupSummary> {
        let factor = Factor::from_name(factor_name)?;
        analysis::group_describe(self.cleaned()?, factor)
    }

    /// Bar chart of mean rentals per group of a named factor
    pub fn group_mean_chart(&self, factor_name: &str) -> EdaResult<ChartSpec> {
        let factor = Factor::from_name(factor_name)?;
        analysis::group_mean_chart(self.cleaned()?, factor)
    }

    /// Correlation among season, weather, and rentals
    pub fn correlation(&self) -> EdaResult<CorrelationMatrix> {
        analysis::correlation_matrix(self.cleaned()?, &CORRELATION_COLUMNS)
    }

    /// Mean rentals per season as a line chart
    pub fn seasonal_trend(&self) -> EdaResult<ChartSpec> {
        analysis::seasonal_trend(self.cleaned()?)
    }

    /// Quartile segmentation of rental volume
    pub fn segments(&self) -> EdaResult<SegmentReport> {
        analysis::segment_rentals(self.cleaned()?)
    }

    /// Shapiro-Wilk over the full cleaned rental column
    pub fn normality_test(&self) -> EdaResult<TestResult> {
        analysis::shapiro_wilk(&self.cleaned()?.rental_counts())
    }

    /// Welch t-test over the working-day partition
    pub fn workingday_test(&self) -> EdaResult<TestResult> {
        let dataset = self.cleaned()?;
        let workdays = dataset.rentals_where(Factor::Workingday, 1);
        let offdays = dataset.rentals_where(Factor::Workingday, 0);
        for (code, group) in [(1u8, &workdays), (0u8, &offdays)] {
            if group.is_empty() {
                return Err(EdaError::EmptyPartition {
                    factor: Factor::Workingday.name().to_string(),
                    group: Factor::Workingday.label(code),
                });
            }
        }
        analysis::welch_t_test(&workdays, &offdays)
    }

    /// One-way ANOVA over the four seasons
    pub fn season_anova(&self) -> EdaResult<TestResult> {
        let dataset = self.cleaned()?;
        let mut groups = Vec::with_capacity(Season::ALL.len());
        for season in Season::ALL {
            let rentals = dataset.rentals_where(Factor::Season, season.code());
            if rentals.is_empty() {
                return Err(EdaError::EmptyPartition {
                    factor: Factor::Season.name().to_string(),
                    group: season.label().to_string(),
                });
            }
            groups.push(rentals);
        }
        analysis::one_way_anova(&groups)
    }
}
