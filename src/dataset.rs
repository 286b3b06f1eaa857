//! Row-oriented dataset of loosely-typed records.
//!
//! A [`Dataset`] is what the upstream file adapter hands to the engine:
//! an ordered list of unique headers and an ordered list of [`Record`]s.
//! Each record maps a column name to a [`Cell`]. A key missing from a
//! record is *absent*, which is distinct from an explicit [`Cell::Null`].
//!
//! # Cell semantics
//!
//! | Cell | numeric? | missing? | stringified |
//! |------|----------|----------|-------------|
//! | `Number(v)` | yes | no | shortest round-trip (`100`, `1.5`) |
//! | `Text(s)` | no | if `""`, `na`, `n/a` (any case) | `s` |
//! | `Null` | no | yes | `null` |
//! | absent | no | yes | `undefined` |
//!
//! Numeric-or-not is decided here, once, by [`Cell::as_number`]. Text that
//! looks like a number stays text; the engine never coerces.
//!
//! # Example
//!
//! ```
//! use tabular_insight::dataset::{Cell, Dataset};
//!
//! let ds = Dataset::from_table(
//!     &["Product", "Sales"],
//!     vec![
//!         vec![Cell::from("A"), Cell::from(100.0)],
//!         vec![Cell::from("B"), Cell::Null],
//!     ],
//! )
//! .unwrap();
//! assert_eq!(ds.row_count(), 2);
//! assert_eq!(ds.numeric_values("Sales"), vec![100.0]);
//! ```

use crate::error::InsightError;
use crate::format::plain_number;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

// ── Cell ──────────────────────────────────────────────────────────────

/// A single loosely-typed value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    /// Any finite or non-finite double.
    Number(f64),
    /// Free-form text.
    Text(String),
    /// Explicit null.
    Null,
}

impl Cell {
    /// Returns the numeric value, or `None` for text and null.
    #[inline]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(v) => Some(*v),
            Self::Text(_) | Self::Null => None,
        }
    }

    /// Returns the text value, or `None` for numbers and null.
    #[inline]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Number(_) | Self::Null => None,
        }
    }

    /// Returns `true` for [`Cell::Null`].
    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl From<f64> for Cell {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<i64> for Cell {
    fn from(v: i64) -> Self {
        Self::Number(v as f64)
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl<T: Into<Cell>> From<Option<T>> for Cell {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

// ── Cell helpers over possibly-absent values ─────────────────────────

/// Returns `true` if the cell counts as a missing value.
///
/// Absent, null, empty text, and the text markers `na` / `n/a` in any
/// letter case are missing. Whitespace is not trimmed.
///
/// ```
/// use tabular_insight::dataset::{is_missing, Cell};
///
/// assert!(is_missing(None));
/// assert!(is_missing(Some(&Cell::Null)));
/// assert!(is_missing(Some(&Cell::from("N/A"))));
/// assert!(!is_missing(Some(&Cell::from(" "))));
/// assert!(!is_missing(Some(&Cell::from(0.0))));
/// ```
pub fn is_missing(cell: Option<&Cell>) -> bool {
    match cell {
        None | Some(Cell::Null) => true,
        Some(Cell::Text(s)) => {
            s.is_empty() || s.eq_ignore_ascii_case("na") || s.eq_ignore_ascii_case("n/a")
        }
        Some(Cell::Number(_)) => false,
    }
}

/// Stringifies a cell the way it appears in labels, group keys and filters.
///
/// ```
/// use tabular_insight::dataset::{cell_to_string, Cell};
///
/// assert_eq!(cell_to_string(Some(&Cell::from(42.0))), "42");
/// assert_eq!(cell_to_string(Some(&Cell::Null)), "null");
/// assert_eq!(cell_to_string(None), "undefined");
/// ```
pub fn cell_to_string(cell: Option<&Cell>) -> String {
    match cell {
        None => "undefined".to_string(),
        Some(Cell::Null) => "null".to_string(),
        Some(Cell::Number(v)) => plain_number(*v),
        Some(Cell::Text(s)) => s.clone(),
    }
}

/// Hashable identity of a possibly-absent cell.
///
/// Two cells share a key iff they are the same value of the same type:
/// `1` and `"1"` differ, `null` and absent differ, `-0` equals `0`, and
/// every NaN equals every other NaN.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CellKey {
    Absent,
    Null,
    Number(u64),
    Text(String),
}

impl CellKey {
    /// Builds the identity key for a possibly-absent cell.
    pub fn of(cell: Option<&Cell>) -> Self {
        match cell {
            None => Self::Absent,
            Some(Cell::Null) => Self::Null,
            Some(Cell::Number(v)) => Self::Number(number_bits(*v)),
            Some(Cell::Text(s)) => Self::Text(s.clone()),
        }
    }
}

/// Bit pattern with -0 folded into 0 and all NaNs folded together.
fn number_bits(v: f64) -> u64 {
    if v.is_nan() {
        f64::NAN.to_bits()
    } else if v == 0.0 {
        0.0f64.to_bits()
    } else {
        v.to_bits()
    }
}

// ── Record ────────────────────────────────────────────────────────────

/// One row: column name → cell. Keys not present are absent cells.
pub type Record = BTreeMap<String, Cell>;

// ── Dataset ───────────────────────────────────────────────────────────

/// Ordered headers plus ordered rows.
///
/// Headers are unique; their order is the first-seen order in the
/// source. Rows may carry keys that are not listed as headers (they take
/// part in duplicate detection but never in column analysis) and may
/// omit header keys (those cells are absent).
///
/// The JSON form is `{"headers": [...], "rows": [{...}, ...]}`.
///
/// ```
/// use tabular_insight::dataset::Dataset;
///
/// let json = r#"{"headers":["Region","Sales"],
///               "rows":[{"Region":"East","Sales":10},{"Region":"West","Sales":null}]}"#;
/// let ds = Dataset::from_json(json).unwrap();
/// assert_eq!(ds.headers(), &["Region", "Sales"]);
/// assert_eq!(ds.row_count(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawDataset")]
pub struct Dataset {
    headers: Vec<String>,
    rows: Vec<Record>,
}

#[derive(Deserialize)]
struct RawDataset {
    #[serde(default)]
    headers: Vec<String>,
    #[serde(default)]
    rows: Vec<Record>,
}

impl TryFrom<RawDataset> for Dataset {
    type Error = InsightError;

    fn try_from(raw: RawDataset) -> Result<Self, Self::Error> {
        Self::with_rows(raw.headers, raw.rows)
    }
}

impl Dataset {
    /// Creates a dataset with the given headers and no rows.
    ///
    /// Returns an error if a header name repeats.
    pub fn new(headers: Vec<String>) -> Result<Self, InsightError> {
        let mut seen = HashSet::with_capacity(headers.len());
        for name in &headers {
            if !seen.insert(name.as_str()) {
                return Err(InsightError::DuplicateHeader { name: name.clone() });
            }
        }
        Ok(Self {
            headers,
            rows: Vec::new(),
        })
    }

    /// Creates a dataset from headers and fully-formed records.
    pub fn with_rows(headers: Vec<String>, rows: Vec<Record>) -> Result<Self, InsightError> {
        let mut ds = Self::new(headers)?;
        ds.rows = rows;
        Ok(ds)
    }

    /// Creates a dataset from positional rows.
    ///
    /// Cell `i` of each row belongs to header `i`. Short rows leave the
    /// trailing columns absent; extra cells are dropped.
    pub fn from_table(headers: &[&str], rows: Vec<Vec<Cell>>) -> Result<Self, InsightError> {
        let mut ds = Self::new(headers.iter().map(|h| (*h).to_string()).collect())?;
        ds.rows = rows
            .into_iter()
            .map(|cells| {
                ds.headers
                    .iter()
                    .cloned()
                    .zip(cells)
                    .collect::<Record>()
            })
            .collect();
        Ok(ds)
    }

    /// Decodes a dataset from its JSON form.
    pub fn from_json(json: &str) -> Result<Self, InsightError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Appends a record.
    pub fn push_row(&mut self, row: Record) {
        self.rows.push(row);
    }

    /// Returns the headers in source order.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Returns all rows in source order.
    pub fn rows(&self) -> &[Record] {
        &self.rows
    }

    /// Returns the number of rows.
    #[inline]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Returns the number of headers.
    #[inline]
    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Returns `true` if the dataset has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns the cell at (`row`, `column`), `None` if absent or out of range.
    pub fn cell(&self, row: usize, column: &str) -> Option<&Cell> {
        self.rows.get(row).and_then(|r| r.get(column))
    }

    /// Iterates over a column's possibly-absent cells in row order.
    pub fn column_cells<'a>(
        &'a self,
        column: &'a str,
    ) -> impl Iterator<Item = Option<&'a Cell>> + 'a {
        self.rows.iter().map(move |r| r.get(column))
    }

    /// Returns the column's numeric cells in row order; other cells are skipped.
    pub fn numeric_values(&self, column: &str) -> Vec<f64> {
        self.column_cells(column)
            .filter_map(|c| c.and_then(Cell::as_number))
            .collect()
    }

    /// Returns `true` if at least one row holds a number for `column`.
    pub fn has_numeric(&self, column: &str) -> bool {
        self.column_cells(column)
            .any(|c| matches!(c, Some(Cell::Number(_))))
    }

    /// Number of distinct cells in a column, absent counted as its own value.
    pub fn distinct_count(&self, column: &str) -> usize {
        self.column_cells(column)
            .map(CellKey::of)
            .collect::<HashSet<_>>()
            .len()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────
