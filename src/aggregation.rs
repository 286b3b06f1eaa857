//! Group-by aggregations feeding the dashboard charts.
//!
//! All aggregations group rows by the stringified value of a key column
//! (see [`cell_to_string`]), so a numeric `1` and the text `"1"` land in
//! the same group, and absent / `null` keys group under `"undefined"` /
//! `"null"`.
//!
//! Groups are enumerated in a fixed order before any sorting: keys that
//! are canonical array indices (`"0"`, `"7"`, `"42"`, …) come first in
//! ascending numeric order, then every other key in first-seen order.
//! Sorts are stable, so this order decides ties.

use crate::classifier::RoleColumns;
use crate::config::AnalysisConfig;
use crate::dataset::{cell_to_string, Cell, Dataset, Record};
use crate::format::truncate_label;
use crate::stats::sum;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::HashMap;

// ── Output types ──────────────────────────────────────────────────────

/// Sum of one numeric column within a group.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnTotal {
    pub column: String,
    pub total: f64,
}

/// One bar of the category chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartGroup {
    /// Group key truncated for display.
    pub name: String,
    /// Sales total; `None` when no sales column was detected.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sales: Option<f64>,
    /// Profit total; `None` when no profit column was detected.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profit: Option<f64>,
    /// Totals of the remaining numeric columns, in header order.
    pub measures: Vec<ColumnTotal>,
}

/// Sales per region.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionGroup {
    pub region: String,
    pub sales: f64,
    pub orders: usize,
}

/// Sales per date key.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimePoint {
    pub date: String,
    pub sales: f64,
    pub orders: usize,
}

/// One slice of the category distribution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributionSlice {
    pub name: String,
    pub value: usize,
}

// ── Grouping ──────────────────────────────────────────────────────────

/// Insertion-tracking map from group key to accumulated value.
pub(crate) struct Groups<V> {
    slots: HashMap<String, usize>,
    entries: Vec<(String, V)>,
}

impl<V> Groups<V> {
    pub(crate) fn new() -> Self {
        Self {
            slots: HashMap::new(),
            entries: Vec::new(),
        }
    }

    /// Returns the value for `key`, inserting `init()` on first sight.
    pub(crate) fn entry(&mut self, key: String, init: impl FnOnce() -> V) -> &mut V {
        let idx = match self.slots.get(&key) {
            Some(&idx) => idx,
            None => {
                let idx = self.entries.len();
                self.slots.insert(key.clone(), idx);
                self.entries.push((key, init()));
                idx
            }
        };
        &mut self.entries[idx].1
    }

    /// Consumes the map, yielding entries in enumeration order.
    pub(crate) fn into_ordered(self) -> Vec<(String, V)> {
        let mut indexed = Vec::new();
        let mut named = Vec::new();
        for (key, value) in self.entries {
            match array_index(&key) {
                Some(n) => indexed.push((n, key, value)),
                None => named.push((key, value)),
            }
        }
        indexed.sort_by_key(|(n, _, _)| *n);
        indexed
            .into_iter()
            .map(|(_, key, value)| (key, value))
            .chain(named)
            .collect()
    }
}

/// Parses `key` as a canonical array index (`0 ..= 2³² − 2`, no sign,
/// no leading zeros).
///
/// ```
/// use tabular_insight::aggregation::array_index;
///
/// assert_eq!(array_index("17"), Some(17));
/// assert_eq!(array_index("017"), None);
/// assert_eq!(array_index("-1"), None);
/// assert_eq!(array_index("1.5"), None);
/// assert_eq!(array_index("4294967295"), None);
/// ```
pub fn array_index(key: &str) -> Option<u32> {
    let n: u32 = key.parse().ok()?;
    (n != u32::MAX && n.to_string() == key).then_some(n)
}

/// Groups rows by the stringified value of `column`, in enumeration order.
pub(crate) fn group_rows<'a>(ds: &'a Dataset, column: &str) -> Vec<(String, Vec<&'a Record>)> {
    let mut groups = Groups::new();
    for row in ds.rows() {
        groups
            .entry(cell_to_string(row.get(column)), Vec::new)
            .push(row);
    }
    groups.into_ordered()
}

/// Sums the numeric cells of `column` across `rows`.
pub(crate) fn sum_numbers(rows: &[&Record], column: &str) -> f64 {
    let values: Vec<f64> = rows
        .iter()
        .filter_map(|r| r.get(column).and_then(Cell::as_number))
        .collect();
    sum(&values)
}

fn has_number(rows: &[&Record], column: &str) -> bool {
    rows.iter()
        .any(|r| r.get(column).and_then(Cell::as_number).is_some())
}

fn descending(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}

// ── Aggregations ──────────────────────────────────────────────────────

/// Per-category totals for the bar chart, largest sales first.
///
/// Groups by the `grouping` column; empty when none was detected.
///
/// ```
/// use tabular_insight::aggregation::chart_data;
/// use tabular_insight::classifier::RoleColumns;
/// use tabular_insight::config::AnalysisConfig;
/// use tabular_insight::dataset::{Cell, Dataset};
///
/// let ds = Dataset::from_table(
///     &["Product", "Sales"],
///     vec![
///         vec![Cell::from("A"), Cell::from(100.0)],
///         vec![Cell::from("B"), Cell::from(50.0)],
///         vec![Cell::from("A"), Cell::from(100.0)],
///     ],
/// )
/// .unwrap();
/// let roles = RoleColumns::detect(ds.headers());
/// let chart = chart_data(&ds, &roles, &AnalysisConfig::default());
/// assert_eq!(chart[0].name, "A");
/// assert_eq!(chart[0].sales, Some(200.0));
/// assert_eq!(chart[1].sales, Some(50.0));
/// ```
pub fn chart_data(ds: &Dataset, roles: &RoleColumns, config: &AnalysisConfig) -> Vec<ChartGroup> {
    let Some(group_col) = roles.grouping.as_deref() else {
        tracing::trace!("chart skipped: no grouping column");
        return Vec::new();
    };
    let sales_col = roles.sales.as_deref();
    let profit_col = roles.profit.as_deref();

    let mut chart: Vec<ChartGroup> = group_rows(ds, group_col)
        .into_iter()
        .map(|(key, rows)| {
            let measures = ds
                .headers()
                .iter()
                .filter(|h| {
                    h.as_str() != group_col
                        && Some(h.as_str()) != sales_col
                        && Some(h.as_str()) != profit_col
                        && has_number(&rows, h)
                })
                .map(|h| ColumnTotal {
                    column: h.clone(),
                    total: sum_numbers(&rows, h),
                })
                .collect();
            ChartGroup {
                name: truncate_label(&key, config.label_max_chars),
                sales: sales_col.map(|c| sum_numbers(&rows, c)),
                profit: profit_col.map(|c| sum_numbers(&rows, c)),
                measures,
            }
        })
        .collect();

    chart.sort_by(|a, b| descending(a.sales.unwrap_or(0.0), b.sales.unwrap_or(0.0)));
    chart.truncate(config.chart_limit);
    chart
}

/// Sales and row counts per region, largest sales first.
pub fn region_data(ds: &Dataset, roles: &RoleColumns, config: &AnalysisConfig) -> Vec<RegionGroup> {
    let (Some(region_col), Some(sales_col)) = (roles.region.as_deref(), roles.sales.as_deref())
    else {
        tracing::trace!("region aggregation skipped: region or sales column missing");
        return Vec::new();
    };

    let mut regions: Vec<RegionGroup> = group_rows(ds, region_col)
        .into_iter()
        .map(|(region, rows)| RegionGroup {
            sales: sum_numbers(&rows, sales_col),
            orders: rows.len(),
            region,
        })
        .collect();

    regions.sort_by(|a, b| descending(a.sales, b.sales));
    regions.truncate(config.region_limit);
    regions
}

/// Sales and row counts per date key, in ascending key order.
///
/// Keys compare as plain strings, so `"10"` sorts before `"9"`; ISO
/// dates order chronologically.
pub fn time_series_data(
    ds: &Dataset,
    roles: &RoleColumns,
    config: &AnalysisConfig,
) -> Vec<TimePoint> {
    let (Some(date_col), Some(sales_col)) = (roles.date.as_deref(), roles.sales.as_deref()) else {
        tracing::trace!("time series skipped: date or sales column missing");
        return Vec::new();
    };

    let mut points: Vec<TimePoint> = group_rows(ds, date_col)
        .into_iter()
        .map(|(date, rows)| TimePoint {
            sales: sum_numbers(&rows, sales_col),
            orders: rows.len(),
            date,
        })
        .collect();

    points.sort_by(|a, b| a.date.cmp(&b.date));
    points.truncate(config.time_series_limit);
    points
}

/// Row counts per value of the first all-text column.
///
/// A column qualifies only if every row holds a text cell for it. The
/// first `distribution_limit` groups in enumeration order are returned,
/// unsorted.
pub fn category_distribution(ds: &Dataset, config: &AnalysisConfig) -> Vec<DistributionSlice> {
    let Some(column) = ds
        .headers()
        .iter()
        .find(|h| ds.column_cells(h).all(|c| matches!(c, Some(Cell::Text(_)))))
    else {
        return Vec::new();
    };

    let mut counts = Groups::new();
    for cell in ds.column_cells(column) {
        *counts.entry(cell_to_string(cell), || 0usize) += 1;
    }
    counts
        .into_ordered()
        .into_iter()
        .take(config.distribution_limit)
        .map(|(name, value)| DistributionSlice { name, value })
        .collect()
}

// ── Tests ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn cfg() -> AnalysisConfig {
        AnalysisConfig::default()
    }

    fn roles(ds: &Dataset) -> RoleColumns {
        RoleColumns::detect(ds.headers())
    }

    // ── Group ordering ───────────────────────────────────────────

    #[test]
    fn index_keys_come_first_in_numeric_order() {
        let mut g = Groups::new();
        for key in ["b", "10", "a", "2", "02", "0"] {
            *g.entry(key.to_string(), || 0) += 1;
        }
        let keys: Vec<String> = g.into_ordered().into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["0", "2", "10", "b", "a", "02"]);
    }

    #[test]
    fn group_rows_uses_stringified_keys() {
        let ds = Dataset::from_table(
            &["k"],
            vec![
                vec![Cell::from(1.0)],
                vec![Cell::from("1")],
                vec![Cell::Null],
                vec![],
            ],
        )
        .unwrap();
        let groups = group_rows(&ds, "k");
        let summary: Vec<(&str, usize)> = groups.iter().map(|(k, r)| (k.as_str(), r.len())).collect();
        assert_eq!(summary, vec![("1", 2), ("null", 1), ("undefined", 1)]);
    }

    // ── Chart ────────────────────────────────────────────────────

    #[test]
    fn chart_sums_and_sorts() {
        let ds = Dataset::from_table(
            &["Category", "Sales", "Profit", "Qty"],
            vec![
                vec!["Tools".into(), 10.0.into(), 1.0.into(), 2.0.into()],
                vec!["Toys".into(), 30.0.into(), 3.0.into(), "".into()],
                vec!["Tools".into(), 5.0.into(), 2.0.into(), 4.0.into()],
            ],
        )
        .unwrap();
        let chart = chart_data(&ds, &roles(&ds), &cfg());
        assert_eq!(chart.len(), 2);
        assert_eq!(chart[0].name, "Toys");
        assert_eq!(chart[0].sales, Some(30.0));
        assert_eq!(chart[0].profit, Some(3.0));
        assert!(chart[0].measures.is_empty());
        assert_eq!(chart[1].name, "Tools");
        assert_eq!(chart[1].sales, Some(15.0));
        assert_eq!(
            chart[1].measures,
            vec![ColumnTotal {
                column: "Qty".into(),
                total: 6.0
            }]
        );
    }

    #[test]
    fn chart_without_sales_keeps_enumeration_order() {
        let ds = Dataset::from_table(
            &["Name", "Score"],
            vec![
                vec!["z".into(), 1.0.into()],
                vec!["a".into(), 9.0.into()],
            ],
        )
        .unwrap();
        let chart = chart_data(&ds, &roles(&ds), &cfg());
        let names: Vec<&str> = chart.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["z", "a"]);
        assert_eq!(chart[0].sales, None);
        assert_eq!(chart[1].measures[0].total, 9.0);
    }

    #[test]
    fn chart_labels_are_truncated_but_groups_use_full_key() {
        let long_a = "abcdefghijklmnopqrstuvwxyz-A";
        let long_b = "abcdefghijklmnopqrstuvwxyz-B";
        let ds = Dataset::from_table(
            &["Product", "Sales"],
            vec![vec![long_a.into(), 1.0.into()], vec![long_b.into(), 2.0.into()]],
        )
        .unwrap();
        let chart = chart_data(&ds, &roles(&ds), &cfg());
        assert_eq!(chart.len(), 2);
        assert_eq!(chart[0].name, "abcdefghijklmnopqrst");
        assert_eq!(chart[0].name, chart[1].name);
    }

    #[test]
    fn chart_is_capped() {
        let rows = (0..30)
            .map(|i| vec![Cell::from(format!("p{i}")), Cell::from(f64::from(i))])
            .collect();
        let ds = Dataset::from_table(&["Product", "Sales"], rows).unwrap();
        let chart = chart_data(&ds, &roles(&ds), &cfg());
        assert_eq!(chart.len(), 20);
        assert_eq!(chart[0].sales, Some(29.0));
    }

    #[test]
    fn chart_empty_without_grouping_column() {
        let ds = Dataset::from_table(&["Sales"], vec![vec![1.0.into()]]).unwrap();
        assert!(chart_data(&ds, &roles(&ds), &cfg()).is_empty());
    }

    // ── Region / time series ─────────────────────────────────────

    #[test]
    fn regions_sorted_descending_and_capped() {
        let mut rows = Vec::new();
        for i in 0..12 {
            rows.push(vec![Cell::from(format!("r{i}")), Cell::from(f64::from(i * 10))]);
        }
        rows.push(vec![Cell::from("r0"), Cell::from(500.0)]);
        let ds = Dataset::from_table(&["Region", "Revenue"], rows).unwrap();
        let regions = region_data(&ds, &roles(&ds), &cfg());
        assert_eq!(regions.len(), 10);
        assert_eq!(
            regions[0],
            RegionGroup {
                region: "r0".into(),
                sales: 500.0,
                orders: 2
            }
        );
        assert_eq!(regions[1].sales, 110.0);
    }

    #[test]
    fn region_requires_sales() {
        let ds = Dataset::from_table(&["Region"], vec![vec!["East".into()]]).unwrap();
        assert!(region_data(&ds, &roles(&ds), &cfg()).is_empty());
    }

    #[test]
    fn time_series_sorted_lexically() {
        let ds = Dataset::from_table(
            &["Month", "Amount"],
            vec![
                vec!["2024-03".into(), 3.0.into()],
                vec!["2024-01".into(), 1.0.into()],
                vec!["2024-03".into(), 4.0.into()],
                vec!["2024-02".into(), 2.0.into()],
            ],
        )
        .unwrap();
        let points = time_series_data(&ds, &roles(&ds), &cfg());
        let dates: Vec<&str> = points.iter().map(|p| p.date.as_str()).collect();
        assert_eq!(dates, vec!["2024-01", "2024-02", "2024-03"]);
        assert_eq!(points[2].sales, 7.0);
        assert_eq!(points[2].orders, 2);
    }

    #[test]
    fn numeric_date_keys_sort_as_strings() {
        let ds = Dataset::from_table(
            &["Year", "Sales"],
            vec![vec![9.0.into(), 1.0.into()], vec![10.0.into(), 1.0.into()]],
        )
        .unwrap();
        let points = time_series_data(&ds, &roles(&ds), &cfg());
        assert_eq!(points[0].date, "10");
        assert_eq!(points[1].date, "9");
    }

    // ── Distribution ─────────────────────────────────────────────

    #[test]
    fn distribution_uses_first_all_text_column() {
        let ds = Dataset::from_table(
            &["Id", "Segment", "Tier"],
            vec![
                vec![1.0.into(), "Retail".into(), "Gold".into()],
                vec![2.0.into(), "Retail".into(), "Silver".into()],
                vec![3.0.into(), "Online".into(), "Gold".into()],
            ],
        )
        .unwrap();
        let slices = category_distribution(&ds, &cfg());
        assert_eq!(
            slices,
            vec![
                DistributionSlice {
                    name: "Retail".into(),
                    value: 2
                },
                DistributionSlice {
                    name: "Online".into(),
                    value: 1
                },
            ]
        );
    }

    #[test]
    fn distribution_skips_columns_with_null_or_absent() {
        let ds = Dataset::from_table(
            &["A", "B"],
            vec![vec![Cell::Null, "x".into()], vec!["y".into(), "x".into()]],
        )
        .unwrap();
        let slices = category_distribution(&ds, &cfg());
        assert_eq!(slices.len(), 1);
        assert_eq!(slices[0].name, "x");
        assert_eq!(slices[0].value, 2);
    }

    #[test]
    fn distribution_is_capped() {
        let rows = (0..10).map(|i| vec![Cell::from(format!("v{i}"))]).collect();
        let ds = Dataset::from_table(&["Kind"], rows).unwrap();
        assert_eq!(category_distribution(&ds, &cfg()).len(), 6);
    }

    // ── Properties ───────────────────────────────────────────────

    proptest! {
        #[test]
        fn chart_group_sums_equal_column_sum(
            rows in prop::collection::vec((0u8..8, -1000i32..1000), 0..60),
        ) {
            let ds = Dataset::from_table(
                &["Category", "Sales"],
                rows.iter()
                    .map(|(k, v)| vec![Cell::from(format!("c{k}")), Cell::from(f64::from(*v))])
                    .collect(),
            ).unwrap();
            let chart = chart_data(&ds, &roles(&ds), &cfg());
            let grouped: f64 = chart.iter().map(|g| g.sales.unwrap_or(0.0)).sum();
            let expected: f64 = rows.iter().map(|(_, v)| f64::from(*v)).sum();
            prop_assert_eq!(grouped, expected);
        }
    }
}
