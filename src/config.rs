//! Tunable thresholds for the analysis pass.
//!
//! [`AnalysisConfig::default`] reproduces the dashboard's fixed cut-offs.
//! Every field can be overridden individually from JSON; omitted fields
//! keep their defaults.
//!
//! ```
//! use tabular_insight::config::AnalysisConfig;
//!
//! let cfg = AnalysisConfig::from_json(r#"{"outlierSigma": 2.5}"#).unwrap();
//! assert_eq!(cfg.outlier_sigma, 2.5);
//! assert_eq!(cfg.chart_limit, 20);
//! ```

use crate::error::InsightError;
use serde::{Deserialize, Serialize};

/// Thresholds and caps used by the quality, insight, KPI and aggregation stages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AnalysisConfig {
    /// Outlier fence is `mean + outlier_sigma * σ` (population σ). Default: 3.0.
    pub outlier_sigma: f64,
    /// Missing-value alert fires when `count > ratio * rows`. Default: 0.1.
    pub missing_alert_ratio: f64,
    /// Number of leading / trailing sales values compared by the trend rule. Default: 5.
    pub trend_window: usize,
    /// Trend insight fires when `|change %| > threshold`. Default: 5.0.
    pub trend_threshold_pct: f64,
    /// Margin above this is `success`. Default: 20.0.
    pub margin_success_pct: f64,
    /// Margin above this (and not above the success cut-off) is `info`. Default: 10.0.
    pub margin_info_pct: f64,
    /// Margin below this recommends a cost/price review. Default: 15.0.
    pub margin_advice_pct: f64,
    /// A sales value below `fraction * mean` is a low performer. Default: 0.5.
    pub low_performer_fraction: f64,
    /// Low-performer alert fires when their count exceeds `share * values`. Default: 0.3.
    pub low_performer_share: f64,
    /// Maximum groups returned by the chart aggregation. Default: 20.
    pub chart_limit: usize,
    /// Maximum groups returned by the region aggregation. Default: 10.
    pub region_limit: usize,
    /// Maximum points returned by the time-series aggregation. Default: 30.
    pub time_series_limit: usize,
    /// Maximum slices returned by the category distribution. Default: 6.
    pub distribution_limit: usize,
    /// Display labels are cut to this many characters. Default: 20.
    pub label_max_chars: usize,
    /// Size of the top and bottom performer lists. Default: 5.
    pub performer_count: usize,
    /// Number of non-numeric columns that get a "unique values" fact. Default: 2.
    pub category_fact_limit: usize,
    /// Change indicator attached to the Total Sales KPI. Default: `+12.5%`.
    pub sales_change_indicator: String,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            outlier_sigma: 3.0,
            missing_alert_ratio: 0.1,
            trend_window: 5,
            trend_threshold_pct: 5.0,
            margin_success_pct: 20.0,
            margin_info_pct: 10.0,
            margin_advice_pct: 15.0,
            low_performer_fraction: 0.5,
            low_performer_share: 0.3,
            chart_limit: 20,
            region_limit: 10,
            time_series_limit: 30,
            distribution_limit: 6,
            label_max_chars: 20,
            performer_count: 5,
            category_fact_limit: 2,
            sales_change_indicator: "+12.5%".to_string(),
        }
    }
}

impl AnalysisConfig {
    /// Decodes a configuration from JSON, filling omitted fields with defaults.
    pub fn from_json(json: &str) -> Result<Self, InsightError> {
        Ok(serde_json::from_str(json)?)
    }
}
