//! # tabular-insight
//!
//! Heuristic analytics engine for tabular business data, with C FFI bindings.
//!
//! tabular-insight turns a dataset of heterogeneous rows into the
//! analytical profile behind a business dashboard. Everything is a pure
//! function of the input: no I/O, no global state, no rendering.
//!
//! - **Profiling**: column shape and role detection, summary statistics,
//!   duplicate / missing / outlier diagnostics
//! - **Heuristics**: rule-based insights, alerts and KPIs keyed off
//!   header names such as "Sales", "Profit", "Product" or "Region"
//! - **Aggregation**: chart, region, time-series and distribution groups,
//!   top/bottom performers
//!
//! Dirty data is expected. Empty or degenerate input produces empty or
//! zero-valued results rather than errors.
//!
//! ## Modules
//!
//! - [`dataset`] — Row-oriented data model (Dataset, Record, Cell)
//! - [`classifier`] — Numeric/categorical shape and keyword-based column roles
//! - [`stats`] — Per-column count, sum, average, max, min
//! - [`quality`] — Duplicate rows, missing values, 3σ outliers
//! - [`insights`] — Summary facts, business insights and alerts
//! - [`kpi`] — Headline KPI cards with role-aware and fallback sets
//! - [`aggregation`] — Group-by aggregations for charts
//! - [`ranking`] — Top/bottom performers and row filtering
//! - [`report`] — One-call analysis pass
//! - [`config`] — Tunable thresholds
//! - [`format`] — Number formatting for display strings
//! - [`ffi`] — C FFI bindings (JSON in / JSON out, header generated via cbindgen)
//! - [`error`] — Error types
//!
//! ## Quick Start
//!
//! ```
//! use tabular_insight::config::AnalysisConfig;
//! use tabular_insight::dataset::Dataset;
//! use tabular_insight::report::analyze;
//!
//! let ds = Dataset::from_json(r#"{
//!     "headers": ["Product", "Region", "Sales", "Profit"],
//!     "rows": [
//!         {"Product": "Desk",  "Region": "East", "Sales": 1200, "Profit": 300},
//!         {"Product": "Chair", "Region": "West", "Sales": 400,  "Profit": 40},
//!         {"Product": "Desk",  "Region": "West", "Sales": 900,  "Profit": 150}
//!     ]
//! }"#).unwrap();
//!
//! let report = analyze(&ds, &AnalysisConfig::default());
//!
//! assert_eq!(report.kpis[0].title, "Total Sales");
//! assert_eq!(report.kpis[0].display, "2,500");
//! assert_eq!(report.performers.top[0].product, "Desk");
//! assert_eq!(report.regions[0].region, "West");
//! ```

pub mod aggregation;
pub mod classifier;
pub mod config;
pub mod dataset;
pub mod error;
pub mod ffi;
pub mod format;
pub mod insights;
pub mod kpi;
pub mod quality;
pub mod ranking;
pub mod report;
pub mod stats;
