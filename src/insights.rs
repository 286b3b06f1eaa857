//! Rule-based insights and alerts.
//!
//! Three independent lists are produced, each in generation order:
//!
//! - **summary facts**: dataset size, per-column statistics, category counts
//! - **business insights**: sales trend, top performer, profit margin
//! - **alerts**: duplicates, missing values, low performers
//!
//! A rule whose role column was not detected is skipped silently. All
//! cut-offs are strict (`>`), and come from [`AnalysisConfig`].

use crate::aggregation::{array_index, group_rows, sum_numbers};
use crate::classifier::{categorical_columns, ColumnProfile, RoleColumns};
use crate::config::AnalysisConfig;
use crate::dataset::Dataset;
use crate::format::{grouped, plain_number, to_fixed};
use crate::quality::QualityReport;
use crate::stats::{mean, sum, StatSummary};
use serde::Serialize;

/// How a finding should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Success,
    Warning,
    Danger,
}

/// A titled, human-readable finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Insight {
    pub severity: Severity,
    pub title: String,
    pub message: String,
}

impl Insight {
    fn new(severity: Severity, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity,
            title: title.into(),
            message: message.into(),
        }
    }
}

// ── Summary facts ─────────────────────────────────────────────────────

/// Descriptive facts about the dataset as a whole.
///
/// `stats` must be the summaries of the numeric columns in header order
/// (see [`compute_stats`](crate::stats::compute_stats)).
pub fn summary_insights(
    ds: &Dataset,
    profiles: &[ColumnProfile],
    stats: &[StatSummary],
    config: &AnalysisConfig,
) -> Vec<Insight> {
    let mut out = Vec::new();

    if !ds.is_empty() {
        out.push(Insight::new(
            Severity::Info,
            "Dataset Size",
            format!(
                "Total {} rows with {} columns",
                ds.row_count(),
                ds.column_count()
            ),
        ));
    }

    for s in stats.iter().filter(|s| s.has_numeric_data) {
        out.push(Insight::new(
            Severity::Success,
            format!("{} Statistics", s.name),
            format!(
                "Avg: {} | Max: {} | Min: {}",
                to_fixed(s.average, 2),
                plain_number(s.max),
                plain_number(s.min)
            ),
        ));
    }

    for col in categorical_columns(profiles)
        .into_iter()
        .take(config.category_fact_limit)
    {
        out.push(Insight::new(
            Severity::Info,
            format!("{col} Categories"),
            format!("{} unique values found", ds.distinct_count(col)),
        ));
    }

    out
}

// ── Business insights ─────────────────────────────────────────────────

/// Trend, top-performer and margin insights, in that order.
pub fn business_insights(ds: &Dataset, roles: &RoleColumns, config: &AnalysisConfig) -> Vec<Insight> {
    [
        trend_insight(ds, roles, config),
        top_performer_insight(ds, roles),
        margin_insight(ds, roles, config),
    ]
    .into_iter()
    .flatten()
    .collect()
}

/// Percentage change between the mean of the trailing and the leading
/// `window` values.
///
/// Both windows are clipped to the slice length and may overlap. `None`
/// for an empty slice.
///
/// ```
/// use tabular_insight::insights::trend_change_pct;
///
/// let v = [100.0, 100.0, 110.0, 110.0];
/// assert_eq!(trend_change_pct(&v, 2), Some(10.0));
/// assert_eq!(trend_change_pct(&[], 5), None);
/// ```
pub fn trend_change_pct(values: &[f64], window: usize) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let w = window.min(values.len());
    let recent = mean(&values[values.len() - w..]);
    let older = mean(&values[..w]);
    Some((recent - older) / older * 100.0)
}

/// Fires when recent sales moved by more than the trend threshold.
pub fn trend_insight(ds: &Dataset, roles: &RoleColumns, config: &AnalysisConfig) -> Option<Insight> {
    let sales_col = roles.sales_or_revenue.as_deref()?;
    if ds.row_count() <= 1 {
        return None;
    }

    let change = trend_change_pct(&ds.numeric_values(sales_col), config.trend_window)?;
    if change.abs() <= config.trend_threshold_pct || change.is_nan() {
        tracing::trace!(change, "trend below threshold");
        return None;
    }

    let (severity, direction) = if change > 0.0 {
        (Severity::Success, "increased")
    } else {
        (Severity::Warning, "decreased")
    };
    Some(Insight::new(
        severity,
        "Sales Trend Alert",
        format!(
            "Recent sales {direction} by {}% compared to earlier period",
            to_fixed(change.abs(), 1)
        ),
    ))
}

/// Names the product with the largest sales total.
///
/// The first group reaching the maximum wins; groups whose total is NaN
/// never win.
pub fn top_performer_insight(ds: &Dataset, roles: &RoleColumns) -> Option<Insight> {
    let product_col = roles.product_or_item.as_deref()?;
    let sales_col = roles.sales_or_revenue.as_deref()?;

    let mut best: Option<(String, f64)> = None;
    for (product, rows) in group_rows(ds, product_col) {
        let total = sum_numbers(&rows, sales_col);
        let replace = match &best {
            None => !total.is_nan(),
            Some((_, current)) => total > *current,
        };
        if replace {
            best = Some((product, total));
        }
    }

    let (product, total) = best?;
    Some(Insight::new(
        Severity::Success,
        "Top Performer",
        format!(
            "{product} is the best selling product with {} in sales",
            grouped(total, 3)
        ),
    ))
}

/// Profit as a percentage of sales; NaN or infinite when sales sum to zero.
pub fn profit_margin_pct(total_profit: f64, total_sales: f64) -> f64 {
    total_profit / total_sales * 100.0
}

/// Overall profit margin with advice.
pub fn margin_insight(ds: &Dataset, roles: &RoleColumns, config: &AnalysisConfig) -> Option<Insight> {
    let profit_col = roles.profit.as_deref()?;
    let sales_col = roles.sales_or_revenue.as_deref()?;

    let margin = profit_margin_pct(
        sum(&ds.numeric_values(profit_col)),
        sum(&ds.numeric_values(sales_col)),
    );
    let severity = if margin > config.margin_success_pct {
        Severity::Success
    } else if margin > config.margin_info_pct {
        Severity::Info
    } else {
        Severity::Warning
    };
    let advice = if margin < config.margin_advice_pct {
        "Consider optimizing costs or pricing"
    } else {
        "Healthy margin maintained"
    };

    Some(Insight::new(
        severity,
        "Profit Margin",
        format!("Overall profit margin is {}%. {advice}", to_fixed(margin, 1)),
    ))
}

// ── Alerts ────────────────────────────────────────────────────────────

/// Duplicate, missing-value and low-performer alerts, in that order.
pub fn generate_alerts(
    ds: &Dataset,
    roles: &RoleColumns,
    quality: &QualityReport,
    config: &AnalysisConfig,
) -> Vec<Insight> {
    let mut alerts = Vec::new();

    if quality.duplicate_count > 0 {
        alerts.push(Insight::new(
            Severity::Warning,
            "Duplicate Records",
            format!(
                "{} duplicate records detected. Clean data for accurate analysis.",
                quality.duplicate_count
            ),
        ));
    }

    // index-like headers ("2023") alert first, in numeric order
    let mut missing: Vec<_> = quality.missing_by_column.iter().collect();
    missing.sort_by_key(|m| match array_index(&m.column) {
        Some(n) => (0, n),
        None => (1, 0),
    });

    let rows = ds.row_count() as f64;
    for m in missing {
        let count = m.count as f64;
        if count > rows * config.missing_alert_ratio {
            alerts.push(Insight::new(
                Severity::Warning,
                "Missing Values",
                format!(
                    "{} has {} missing values ({}%)",
                    m.column,
                    m.count,
                    to_fixed(count / rows * 100.0, 1)
                ),
            ));
        }
    }

    if let Some(alert) = low_performer_alert(ds, roles, config) {
        alerts.push(alert);
    }

    alerts
}

/// Fires when too many sales values sit far below the mean.
pub fn low_performer_alert(
    ds: &Dataset,
    roles: &RoleColumns,
    config: &AnalysisConfig,
) -> Option<Insight> {
    let sales_col = roles.sales_exact.as_deref()?;
    let values = ds.numeric_values(sales_col);
    let cutoff = mean(&values) * config.low_performer_fraction;
    let low = values.iter().filter(|&&v| v < cutoff).count();

    if low as f64 <= values.len() as f64 * config.low_performer_share {
        return None;
    }
    Some(Insight::new(
        Severity::Danger,
        "Low Performers",
        format!(
            "{low} records show sales below {}% of average. Review pricing or marketing strategy.",
            plain_number(config.low_performer_fraction * 100.0)
        ),
    ))
}

// ── Tests ─────────────────────────────────────────────────────────────
