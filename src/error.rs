//! Error types for the analysis pipeline
//!
//! Three families of failure: missing input (an analysis was requested
//! before the session reached the required stage), degenerate results
//! (empty partitions, zero variance), and configuration errors (unknown
//! columns or factors). Only the last family indicates a programming
//! mistake; the rest degrade to advisories at the caller.

use thiserror::Error;

/// Errors produced by the EDA pipeline
#[derive(Error, Debug)]
pub enum EdaError {
    #[error("no dataset has been ingested yet")]
    MissingRaw,

    #[error("dataset has not been cleaned yet")]
    MissingClean,

    #[error("cleaned dataset is empty; adjust the outlier multiplier and re-clean")]
    EmptyDataset,

    #[error("unknown column: {0}")]
    UnknownColumn(String),

    #[error("unknown factor: {0}")]
    UnknownFactor(String),

    #[error("missing required column header: {0}")]
    MissingHeader(String),

    #[error("{factor} partition {group:?} has no observations")]
    EmptyPartition { factor: String, group: String },

    #[error("test undefined: {0}")]
    Degenerate(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl EdaError {
    /// Whether the error is an advisory condition rather than a
    /// programming or environment failure. Advisories are surfaced as
    /// warnings scoped to the current analysis request.
    pub fn is_advisory(&self) -> bool {
        matches!(
            self,
            EdaError::MissingRaw
                | EdaError::MissingClean
                | EdaError::EmptyDataset
                | EdaError::EmptyPartition { .. }
                | EdaError::Degenerate(_)
        )
    }
}

/// Result type alias for pipeline operations
pub type EdaResult<T> = Result<T, EdaError>;
