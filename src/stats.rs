//! Per-column summary statistics for numeric columns.
//!
//! Only [`Cell::Number`](crate::dataset::Cell::Number) cells take part;
//! text and null cells in a numeric column are skipped, not coerced.
//! Sums accumulate in row order with plain `f64` addition, and
//! `average` is exactly `sum / count`.
//!
//! # Example
//!
//! ```
//! use tabular_insight::dataset::{Cell, Dataset};
//! use tabular_insight::stats::compute_stats;
//!
//! let ds = Dataset::from_table(
//!     &["Sales"],
//!     vec![vec![Cell::from(10.0)], vec![Cell::from("n/a")], vec![Cell::from(30.0)]],
//! )
//! .unwrap();
//! let stats = compute_stats(&ds);
//! assert_eq!(stats[0].count, 2);
//! assert_eq!(stats[0].sum, 40.0);
//! assert_eq!(stats[0].average, 20.0);
//! ```

use crate::classifier::{classify_columns, numeric_columns, ColumnProfile};
use crate::dataset::Dataset;
use serde::Serialize;

/// Summary of one numeric column.
///
/// When the column holds no numbers, `average`, `max` and `min` are NaN
/// (serialized as `null`) and `has_numeric_data` is `false`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatSummary {
    /// Column name.
    pub name: String,
    /// Number of numeric cells.
    pub count: usize,
    /// Sum of numeric cells.
    pub sum: f64,
    /// `sum / count`.
    pub average: f64,
    /// Largest numeric cell.
    pub max: f64,
    /// Smallest numeric cell.
    pub min: f64,
    /// `false` when `count == 0`.
    pub has_numeric_data: bool,
}

/// Summarizes a slice of values under the column name `name`.
///
/// ```
/// use tabular_insight::stats::summarize;
///
/// let s = summarize("x", &[]);
/// assert_eq!(s.count, 0);
/// assert!(s.average.is_nan());
/// assert!(!s.has_numeric_data);
/// ```
pub fn summarize(name: &str, values: &[f64]) -> StatSummary {
    if values.is_empty() {
        return StatSummary {
            name: name.to_string(),
            count: 0,
            sum: 0.0,
            average: f64::NAN,
            max: f64::NAN,
            min: f64::NAN,
            has_numeric_data: false,
        };
    }

    let total = sum(values);
    let count = values.len();
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);

    StatSummary {
        name: name.to_string(),
        count,
        sum: total,
        average: total / count as f64,
        max,
        min,
        has_numeric_data: true,
    }
}

/// Computes a [`StatSummary`] for every numeric column, in header order.
pub fn compute_stats(ds: &Dataset) -> Vec<StatSummary> {
    compute_stats_for(ds, &classify_columns(ds))
}

/// Like [`compute_stats`], reusing an existing classification.
pub fn compute_stats_for(ds: &Dataset, profiles: &[ColumnProfile]) -> Vec<StatSummary> {
    numeric_columns(profiles)
        .into_iter()
        .map(|name| summarize(name, &ds.numeric_values(name)))
        .collect()
}

/// Left-to-right sum.
pub(crate) fn sum(values: &[f64]) -> f64 {
    values.iter().fold(0.0, |acc, v| acc + v)
}

/// Arithmetic mean; NaN for an empty slice.
pub(crate) fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    sum(values) / values.len() as f64
}

/// Population standard deviation (divides by N); NaN for an empty slice.
pub(crate) fn population_std_dev(values: &[f64]) -> f64 {
    let m = mean(values);
    let squares: Vec<f64> = values.iter().map(|v| (v - m).powi(2)).collect();
    mean(&squares).sqrt()
}

// ── Tests ─────────────────────────────────────────────────────────────
