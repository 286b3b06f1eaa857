//! Headline KPI cards.
//!
//! When the headers reveal sales, profit or product columns, the
//! role-aware set is produced and fully replaces the generic fallback
//! (record count, column count, first numeric column's average and max).

use crate::classifier::RoleColumns;
use crate::config::AnalysisConfig;
use crate::dataset::Dataset;
use crate::format::{grouped, plain_number, to_fixed};
use crate::stats::{mean, sum, StatSummary};
use serde::Serialize;

/// One KPI card.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Kpi {
    pub title: String,
    /// Raw value behind `display`.
    pub value: f64,
    /// Formatted value as shown on the card.
    pub display: String,
    /// Change indicator, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change: Option<String>,
}

impl Kpi {
    fn new(title: impl Into<String>, value: f64, display: String) -> Self {
        Self {
            title: title.into(),
            value,
            display,
            change: None,
        }
    }
}

/// Derives the KPI set.
///
/// `stats` are the numeric-column summaries in header order; only the
/// first one is used, and only by the fallback set.
///
/// ```
/// use tabular_insight::classifier::RoleColumns;
/// use tabular_insight::config::AnalysisConfig;
/// use tabular_insight::dataset::{Cell, Dataset};
/// use tabular_insight::kpi::derive_kpis;
///
/// let ds = Dataset::from_table(
///     &["Product", "Sales"],
///     vec![
///         vec![Cell::from("A"), Cell::from(1200.0)],
///         vec![Cell::from("B"), Cell::from(800.0)],
///     ],
/// )
/// .unwrap();
/// let kpis = derive_kpis(&ds, &RoleColumns::detect(ds.headers()), &[], &AnalysisConfig::default());
/// assert_eq!(kpis[0].title, "Total Sales");
/// assert_eq!(kpis[0].display, "2,000");
/// assert_eq!(kpis[2].title, "Total Products");
/// ```
pub fn derive_kpis(
    ds: &Dataset,
    roles: &RoleColumns,
    stats: &[StatSummary],
    config: &AnalysisConfig,
) -> Vec<Kpi> {
    let kpis = role_kpis(ds, roles, config);
    if !kpis.is_empty() {
        return kpis;
    }
    tracing::trace!("no role columns; using fallback KPIs");
    fallback_kpis(ds, stats)
}

/// KPIs driven by detected sales, profit and product columns.
pub fn role_kpis(ds: &Dataset, roles: &RoleColumns, config: &AnalysisConfig) -> Vec<Kpi> {
    let mut kpis = Vec::new();

    if let Some(sales_col) = roles.sales.as_deref() {
        let values = ds.numeric_values(sales_col);
        let total = sum(&values);
        let avg = mean(&values);

        let mut total_kpi = Kpi::new("Total Sales", total, grouped(total, 0));
        total_kpi.change = Some(config.sales_change_indicator.clone());
        kpis.push(total_kpi);
        kpis.push(Kpi::new("Avg Order Value", avg, grouped(avg, 0)));
    }

    if let Some(profit_col) = roles.profit.as_deref() {
        let total = sum(&ds.numeric_values(profit_col));
        let title = if total >= 0.0 {
            "Total Profit"
        } else {
            "Total Loss"
        };
        kpis.push(Kpi::new(title, total.abs(), grouped(total.abs(), 0)));
    }

    if let Some(product_col) = roles.product.as_deref() {
        let n = ds.distinct_count(product_col);
        kpis.push(Kpi::new("Total Products", n as f64, n.to_string()));
    }

    kpis
}

/// Generic KPIs for datasets without recognizable role columns.
pub fn fallback_kpis(ds: &Dataset, stats: &[StatSummary]) -> Vec<Kpi> {
    let rows = ds.row_count() as f64;
    let columns = ds.column_count() as f64;
    let mut kpis = vec![
        Kpi::new("Total Records", rows, grouped(rows, 3)),
        Kpi::new("Columns", columns, plain_number(columns)),
    ];

    if let Some(first) = stats.first() {
        // the card shows the two-decimal average, re-parsed
        let avg = to_fixed(first.average, 2)
            .parse::<f64>()
            .unwrap_or(first.average);
        kpis.push(Kpi::new(format!("Avg {}", first.name), avg, grouped(avg, 3)));
        kpis.push(Kpi::new(
            format!("Max {}", first.name),
            first.max,
            grouped(first.max, 3),
        ));
    }

    kpis
}

// ── Tests ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Cell;
    use crate::stats::compute_stats;

    fn kpis_for(ds: &Dataset) -> Vec<Kpi> {
        derive_kpis(
            ds,
            &RoleColumns::detect(ds.headers()),
            &compute_stats(ds),
            &AnalysisConfig::default(),
        )
    }

    fn titles(kpis: &[Kpi]) -> Vec<&str> {
        kpis.iter().map(|k| k.title.as_str()).collect()
    }

    #[test]
    fn role_aware_set() {
        let ds = Dataset::from_table(
            &["Product", "Sales", "Profit"],
            vec![
                vec!["A".into(), 1000.4.into(), 50.0.into()],
                vec!["B".into(), 2000.0.into(), 25.0.into()],
                vec!["A".into(), "".into(), 25.0.into()],
            ],
        )
        .unwrap();
        let kpis = kpis_for(&ds);
        assert_eq!(
            titles(&kpis),
            vec!["Total Sales", "Avg Order Value", "Total Profit", "Total Products"]
        );
        assert_eq!(kpis[0].display, "3,000");
        assert_eq!(kpis[0].change.as_deref(), Some("+12.5%"));
        assert_eq!(kpis[1].display, "1,500");
        assert_eq!(kpis[1].change, None);
        assert_eq!(kpis[2].value, 100.0);
        assert_eq!(kpis[3].value, 2.0);
        assert_eq!(kpis[3].display, "2");
    }

    #[test]
    fn negative_profit_is_a_loss() {
        let ds = Dataset::from_table(
            &["Profit"],
            vec![vec![(-1500.0).into()], vec![200.0.into()]],
        )
        .unwrap();
        let kpis = kpis_for(&ds);
        assert_eq!(titles(&kpis), vec!["Total Loss"]);
        assert_eq!(kpis[0].value, 1300.0);
        assert_eq!(kpis[0].display, "1,300");
    }

    #[test]
    fn zero_profit_is_profit() {
        let ds = Dataset::from_table(&["Profit"], vec![vec![0.0.into()]]).unwrap();
        assert_eq!(titles(&kpis_for(&ds)), vec!["Total Profit"]);
    }

    #[test]
    fn sales_column_without_numbers() {
        let ds = Dataset::from_table(&["Sales"], vec![vec!["n/a".into()]]).unwrap();
        let kpis = kpis_for(&ds);
        assert_eq!(kpis[0].display, "0");
        assert_eq!(kpis[1].display, "NaN");
    }

    #[test]
    fn fallback_set() {
        let ds = Dataset::from_table(
            &["Score", "Weight"],
            vec![
                vec![1.0.into(), 10.0.into()],
                vec![2.0.into(), 1234.0.into()],
                vec![2.0.into(), 5.0.into()],
            ],
        )
        .unwrap();
        let kpis = kpis_for(&ds);
        assert_eq!(
            titles(&kpis),
            vec!["Total Records", "Columns", "Avg Score", "Max Score"]
        );
        assert_eq!(kpis[0].display, "3");
        assert_eq!(kpis[1].display, "2");
        assert_eq!(kpis[2].value, 1.67);
        assert_eq!(kpis[2].display, "1.67");
        assert_eq!(kpis[3].display, "2");
    }

    #[test]
    fn fallback_without_numeric_columns() {
        let ds = Dataset::from_table(&["Notes"], vec![vec!["x".into()]]).unwrap();
        let kpis = kpis_for(&ds);
        assert_eq!(titles(&kpis), vec!["Total Records", "Columns"]);
    }

    #[test]
    fn fallback_groups_large_record_counts() {
        let rows = (0..1500).map(|i| vec![Cell::from(f64::from(i))]).collect();
        let ds = Dataset::from_table(&["Score"], rows).unwrap();
        let kpis = kpis_for(&ds);
        assert_eq!(kpis[0].display, "1,500");
        assert_eq!(kpis[3].display, "1,499");
    }

    #[test]
    fn empty_dataset_fallback() {
        let kpis = kpis_for(&Dataset::default());
        assert_eq!(titles(&kpis), vec!["Total Records", "Columns"]);
        assert_eq!(kpis[0].value, 0.0);
    }
}
