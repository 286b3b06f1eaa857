//! Top/bottom product rankings and free-text row filtering.

use crate::aggregation::{group_rows, sum_numbers};
use crate::classifier::RoleColumns;
use crate::config::AnalysisConfig;
use crate::dataset::{cell_to_string, Dataset, Record};
use crate::format::truncate_label;
use serde::Serialize;
use std::cmp::Ordering;

/// Sales total for one product.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Performer {
    /// Product key truncated for display.
    pub product: String,
    pub total: f64,
}

/// Best and worst products by sales.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Performers {
    /// Highest totals first.
    pub top: Vec<Performer>,
    /// Lowest totals first.
    pub bottom: Vec<Performer>,
}

/// Ranks products by total sales.
///
/// Only positive totals are ranked. With fewer than `2 × performer_count`
/// products the two lists overlap.
///
/// ```
/// use tabular_insight::classifier::RoleColumns;
/// use tabular_insight::config::AnalysisConfig;
/// use tabular_insight::dataset::{Cell, Dataset};
/// use tabular_insight::ranking::top_bottom_performers;
///
/// let ds = Dataset::from_table(
///     &["Product", "Sales"],
///     vec![
///         vec![Cell::from("A"), Cell::from(30.0)],
///         vec![Cell::from("B"), Cell::from(10.0)],
///         vec![Cell::from("C"), Cell::from(0.0)],
///     ],
/// )
/// .unwrap();
/// let p = top_bottom_performers(&ds, &RoleColumns::detect(ds.headers()), &AnalysisConfig::default());
/// assert_eq!(p.top.len(), 2);
/// assert_eq!(p.top[0].product, "A");
/// assert_eq!(p.bottom[0].product, "B");
/// ```
pub fn top_bottom_performers(
    ds: &Dataset,
    roles: &RoleColumns,
    config: &AnalysisConfig,
) -> Performers {
    let (Some(product_col), Some(sales_col)) = (roles.product.as_deref(), roles.sales.as_deref())
    else {
        tracing::trace!("performers skipped: product or sales column missing");
        return Performers::default();
    };

    let mut ranked: Vec<Performer> = group_rows(ds, product_col)
        .into_iter()
        .map(|(key, rows)| Performer {
            product: truncate_label(&key, config.label_max_chars),
            total: sum_numbers(&rows, sales_col),
        })
        .filter(|p| p.total > 0.0)
        .collect();
    ranked.sort_by(|a, b| b.total.partial_cmp(&a.total).unwrap_or(Ordering::Equal));

    let n = config.performer_count;
    let top = ranked.iter().take(n).cloned().collect();
    let bottom = ranked.iter().rev().take(n).cloned().collect();
    Performers { top, bottom }
}

/// Keeps rows whose `column` value contains `query`, case-insensitively.
///
/// Cells are stringified first, so absent cells match `"undefined"` and
/// numbers match their plain decimal form. An empty column name or
/// query keeps every row.
///
/// ```
/// use tabular_insight::dataset::{Cell, Dataset};
/// use tabular_insight::ranking::filter_rows;
///
/// let ds = Dataset::from_table(
///     &["Region"],
///     vec![vec![Cell::from("North East")], vec![Cell::from("South")]],
/// )
/// .unwrap();
/// assert_eq!(filter_rows(&ds, "Region", "EAST").len(), 1);
/// assert_eq!(filter_rows(&ds, "", "EAST").len(), 2);
/// ```
pub fn filter_rows<'a>(ds: &'a Dataset, column: &str, query: &str) -> Vec<&'a Record> {
    if column.is_empty() || query.is_empty() {
        return ds.rows().iter().collect();
    }
    let needle = query.to_lowercase();
    ds.rows()
        .iter()
        .filter(|row| {
            cell_to_string(row.get(column))
                .to_lowercase()
                .contains(&needle)
        })
        .collect()
}
