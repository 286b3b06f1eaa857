//! One-call analysis pass producing every dashboard output.

use crate::aggregation::{
    category_distribution, chart_data, region_data, time_series_data, ChartGroup,
    DistributionSlice, RegionGroup, TimePoint,
};
use crate::classifier::{classify_columns, ColumnProfile, RoleColumns};
use crate::config::AnalysisConfig;
use crate::dataset::Dataset;
use crate::insights::{business_insights, generate_alerts, summary_insights, Insight};
use crate::kpi::{derive_kpis, Kpi};
use crate::quality::{analyze_quality, QualityReport};
use crate::ranking::{top_bottom_performers, Performers};
use crate::stats::{compute_stats_for, StatSummary};
use serde::Serialize;

/// Complete analytical profile of a dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub columns: Vec<ColumnProfile>,
    pub roles: RoleColumns,
    pub stats: Vec<StatSummary>,
    pub quality: QualityReport,
    pub summary_insights: Vec<Insight>,
    pub insights: Vec<Insight>,
    pub alerts: Vec<Insight>,
    pub kpis: Vec<Kpi>,
    pub chart: Vec<ChartGroup>,
    pub regions: Vec<RegionGroup>,
    pub time_series: Vec<TimePoint>,
    pub distribution: Vec<DistributionSlice>,
    pub performers: Performers,
}

/// Runs every analysis stage over `ds`.
///
/// The pass is pure: the same dataset and configuration always yield
/// an identical report.
///
/// ```
/// use tabular_insight::config::AnalysisConfig;
/// use tabular_insight::dataset::Dataset;
/// use tabular_insight::report::analyze;
///
/// let ds = Dataset::from_json(
///     r#"{"headers": ["Product", "Sales"],
///         "rows": [{"Product": "A", "Sales": 100},
///                  {"Product": "B", "Sales": 50},
///                  {"Product": "A", "Sales": 100}]}"#,
/// )
/// .unwrap();
/// let report = analyze(&ds, &AnalysisConfig::default());
/// assert_eq!(report.quality.duplicate_count, 1);
/// assert_eq!(report.chart[0].sales, Some(200.0));
/// assert_eq!(report.insights[0].title, "Top Performer");
/// ```
#[tracing::instrument(skip_all, fields(rows = ds.row_count(), columns = ds.column_count()))]
pub fn analyze(ds: &Dataset, config: &AnalysisConfig) -> AnalysisReport {
    let columns = classify_columns(ds);
    let roles = RoleColumns::detect(ds.headers());
    let stats = compute_stats_for(ds, &columns);
    tracing::debug!(numeric = stats.len(), "columns classified");

    let quality = analyze_quality(ds, config);
    tracing::debug!(
        duplicates = quality.duplicate_count,
        missing_columns = quality.missing_by_column.len(),
        outlier_columns = quality.outliers.len(),
        "quality analyzed"
    );

    let summary_insights = summary_insights(ds, &columns, &stats, config);
    let insights = business_insights(ds, &roles, config);
    let alerts = generate_alerts(ds, &roles, &quality, config);
    tracing::debug!(
        facts = summary_insights.len(),
        insights = insights.len(),
        alerts = alerts.len(),
        "insights generated"
    );

    let kpis = derive_kpis(ds, &roles, &stats, config);
    let chart = chart_data(ds, &roles, config);
    let regions = region_data(ds, &roles, config);
    let time_series = time_series_data(ds, &roles, config);
    let distribution = category_distribution(ds, config);
    let performers = top_bottom_performers(ds, &roles, config);
    tracing::debug!(
        kpis = kpis.len(),
        chart = chart.len(),
        regions = regions.len(),
        time_series = time_series.len(),
        "aggregations built"
    );

    AnalysisReport {
        columns,
        roles,
        stats,
        quality,
        summary_insights,
        insights,
        alerts,
        kpis,
        chart,
        regions,
        time_series,
        distribution,
        performers,
    }
}
