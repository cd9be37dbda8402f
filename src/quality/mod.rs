//! Data quality assessment
//!
//! - `profile`: missing values, duplicates, describe tables
//! - `outlier`: IQR fences and outlier counts per continuous column

mod outlier;
mod profile;

pub use outlier::*;
pub use profile::*;
