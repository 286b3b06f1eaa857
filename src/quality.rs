//! Data-quality diagnostics: duplicate rows, missing values, outliers.
//!
//! Missing values are expected input, not errors. Every function here
//! accepts any dataset shape and degrades to zero counts.
//!
//! | Check | Rule |
//! |-------|------|
//! | Duplicates | `rows − distinct rows`, whole-record structural equality |
//! | Missing | per header, cells matching [`is_missing`] |
//! | Outliers | per numeric column, values `> μ + kσ` (population σ, `k = 3`) |
//!
//! The outlier rule is one-sided: values far below the mean are never
//! flagged.
//!
//! # Example
//!
//! ```
//! use tabular_insight::config::AnalysisConfig;
//! use tabular_insight::dataset::{Cell, Dataset};
//! use tabular_insight::quality::analyze_quality;
//!
//! let ds = Dataset::from_table(
//!     &["Product", "Sales"],
//!     vec![
//!         vec![Cell::from("A"), Cell::from(100.0)],
//!         vec![Cell::from("B"), Cell::from("")],
//!         vec![Cell::from("A"), Cell::from(100.0)],
//!     ],
//! )
//! .unwrap();
//! let report = analyze_quality(&ds, &AnalysisConfig::default());
//! assert_eq!(report.duplicate_count, 1);
//! assert_eq!(report.missing_by_column[0].column, "Sales");
//! assert_eq!(report.missing_by_column[0].count, 1);
//! ```

use crate::config::AnalysisConfig;
use crate::dataset::{is_missing, CellKey, Dataset, Record};
use crate::insights::Severity;
use crate::stats::{mean, population_std_dev};
use serde::Serialize;
use std::collections::HashSet;

/// A per-column count (missing cells or outliers).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnCount {
    pub column: String,
    pub count: usize,
}

/// A human-readable quality finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityIssue {
    pub severity: Severity,
    pub message: String,
}

/// Quality diagnostics for a dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityReport {
    /// Number of rows.
    pub total_rows: usize,
    /// `total_rows − distinct rows`.
    pub duplicate_count: usize,
    /// Missing-cell counts in header order; zero counts omitted.
    pub missing_by_column: Vec<ColumnCount>,
    /// Upper-tail outlier counts in header order; zero counts omitted.
    pub outliers: Vec<ColumnCount>,
    /// Duplicate and missing-value findings, in that order.
    pub issues: Vec<QualityIssue>,
}

/// Runs all quality checks.
pub fn analyze_quality(ds: &Dataset, config: &AnalysisConfig) -> QualityReport {
    let duplicate_count = count_duplicate_rows(ds);
    let missing_by_column = missing_by_column(ds);
    let outliers = detect_outliers(ds, config.outlier_sigma);

    let mut issues = Vec::new();
    if duplicate_count > 0 {
        issues.push(QualityIssue {
            severity: Severity::Warning,
            message: format!("{duplicate_count} duplicate rows found"),
        });
    }
    for m in &missing_by_column {
        issues.push(QualityIssue {
            severity: Severity::Warning,
            message: format!("{}: {} missing values", m.column, m.count),
        });
    }

    QualityReport {
        total_rows: ds.row_count(),
        duplicate_count,
        missing_by_column,
        outliers,
        issues,
    }
}

// ── Duplicates ────────────────────────────────────────────────────────

/// Counts duplicate rows: total rows minus distinct rows.
///
/// Two rows are equal iff they hold the same set of keys and every key
/// maps to the same cell. Absent, `null` and `""` are distinct values;
/// nothing is normalized before comparison. Key order never matters.
pub fn count_duplicate_rows(ds: &Dataset) -> usize {
    let n = ds.row_count();
    if n <= 1 {
        return 0;
    }

    let mut seen = HashSet::with_capacity(n);
    ds.rows()
        .iter()
        .filter(|row| !seen.insert(row_key(row)))
        .count()
}

/// Hashable identity of a whole record.
fn row_key(row: &Record) -> Vec<(&str, CellKey)> {
    // BTreeMap iteration is sorted by key, so column order cannot leak in
    row.iter()
        .map(|(k, v)| (k.as_str(), CellKey::of(Some(v))))
        .collect()
}

// ── Missing values ────────────────────────────────────────────────────

/// Counts missing cells per header; headers with none are omitted.
pub fn missing_by_column(ds: &Dataset) -> Vec<ColumnCount> {
    ds.headers()
        .iter()
        .filter_map(|h| {
            let count = ds.column_cells(h).filter(|c| is_missing(*c)).count();
            (count > 0).then(|| ColumnCount {
                column: h.clone(),
                count,
            })
        })
        .collect()
}

// ── Outliers ──────────────────────────────────────────────────────────

/// Returns `mean + sigma * population_std_dev`, or `None` for no values.
///
/// ```
/// use tabular_insight::quality::upper_outlier_fence;
///
/// let v = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]; // μ = 5, σ = 2
/// assert_eq!(upper_outlier_fence(&v, 3.0), Some(11.0));
/// assert_eq!(upper_outlier_fence(&[], 3.0), None);
/// ```
pub fn upper_outlier_fence(values: &[f64], sigma: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(mean(values) + sigma * population_std_dev(values))
}

/// Counts values strictly above the upper fence.
pub fn count_outliers(values: &[f64], sigma: f64) -> usize {
    match upper_outlier_fence(values, sigma) {
        Some(fence) => values.iter().filter(|&&v| v > fence).count(),
        None => 0,
    }
}

/// Counts upper-tail outliers for every header holding at least one number.
pub fn detect_outliers(ds: &Dataset, sigma: f64) -> Vec<ColumnCount> {
    ds.headers()
        .iter()
        .filter_map(|h| {
            let count = count_outliers(&ds.numeric_values(h), sigma);
            (count > 0).then(|| ColumnCount {
                column: h.clone(),
                count,
            })
        })
        .collect()
}

// ── Tests ─────────────────────────────────────────────────────────────
