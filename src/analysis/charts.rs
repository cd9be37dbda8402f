//! Chart specifications
//!
//! Plain-data descriptions of the charts the UI layer renders: a
//! category axis, a value axis, and optionally the index of the
//! category to highlight (the dashboard colors the tallest bar darker).
//! No rendering happens here.

use serde::{Deserialize, Serialize};

/// Kind of chart to render
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChartKind {
    Bar,
    Line,
}

/// One category-vs-value chart
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub title: String,
    pub category_label: String,
    pub categories: Vec<String>,
    pub value_label: String,
    pub values: Vec<f64>,
    /// Index of the highlighted category, usually the maximum value
    pub highlighted: Option<usize>,
}

impl ChartSpec {
    /// Bar chart with the maximum value highlighted
    pub fn bar(
        title: impl Into<String>,
        category_label: impl Into<String>,
        value_label: impl Into<String>,
        categories: Vec<String>,
        values: Vec<f64>,
    ) -> Self {
        let highlighted = index_of_max(&values);
        Self {
            kind: ChartKind::Bar,
            title: title.into(),
            category_label: category_label.into(),
            categories,
            value_label: value_label.into(),
            values,
            highlighted,
        }
    }

    /// Line chart, no highlight
    pub fn line(
        title: impl Into<String>,
        category_label: impl Into<String>,
        value_label: impl Into<String>,
        categories: Vec<String>,
        values: Vec<f64>,
    ) -> Self {
        Self {
            kind: ChartKind::Line,
            title: title.into(),
            category_label: category_label.into(),
            categories,
            value_label: value_label.into(),
            values,
            highlighted: None,
        }
    }
}

/// Index of the largest finite value, if any
pub fn index_of_max(values: &[f64]) -> Option<usize> {
    values
        .iter()
        .enumerate()
        .filter(|(_, v)| v.is_finite())
        .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(i, _)| i)
}
