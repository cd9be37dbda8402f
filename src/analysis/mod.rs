//! Descriptive and inferential analyses over the cleaned dataset
//!
//! - `aggregate`: grouped describe tables, correlation, trend charts
//! - `segment`: quartile-based rental volume bands
//! - `tests`: Shapiro-Wilk, Welch t-test, one-way ANOVA
//! - `charts`: plain-data chart specifications for the UI layer

mod aggregate;
mod charts;
mod segment;
mod tests;

pub use aggregate::*;
pub use charts::*;
pub use segment::*;
pub use tests::*;
