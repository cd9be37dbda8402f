//! Exploratory data analysis pipeline for the bike-sharing dataset
//!
//! This library implements the data side of an EDA dashboard over the
//! daily bike-rental dataset: ingest, quality assessment, IQR-based
//! cleaning, grouped summaries, correlation, and hypothesis tests.
//! Rendering and narrative text are left entirely to the UI layer; the
//! analyses produce plain tables and chart specifications.
//!
//! # Modules
//!
//! - `data`: CSV ingest and the typed day-record dataset
//! - `quality`: missing values, duplicates, describe, outlier report
//! - `clean`: date normalization and IQR outlier removal
//! - `analysis`: grouped statistics, correlation, segmentation, tests
//! - `pipeline`: the session context sequencing all of the above
//!
//! # Example
//!
//! ```no_run
//! use rust_bikeshare_eda::pipeline::Pipeline;
//!
//! let mut session = Pipeline::default();
//! session.ingest_csv("day.csv").unwrap();
//! session.run_cleaning().unwrap();
//!
//! let by_season = session.group_summary("season").unwrap();
//! for group in &by_season.groups {
//!     println!("{}: mean {:.0}", group.label, group.stats.mean);
//! }
//! ```

pub mod analysis;
pub mod clean;
pub mod data;
pub mod error;
pub mod pipeline;
pub mod quality;

pub use analysis::*;
pub use clean::*;
pub use data::*;
pub use error::*;
pub use pipeline::*;
pub use quality::*;
