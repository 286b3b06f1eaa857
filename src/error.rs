//! Error types for tabular-insight.
//!
//! The analysis functions themselves never fail: degenerate input degrades
//! to empty or zero-valued results. Errors only arise at the boundary,
//! when a [`Dataset`](crate::dataset::Dataset) or an
//! [`AnalysisConfig`](crate::config::AnalysisConfig) is built from
//! untrusted input, or when the C ABI receives bad pointers.

use thiserror::Error;

/// All errors produced by tabular-insight operations.
#[derive(Debug, Error)]
pub enum InsightError {
    /// Two headers share the same name.
    #[error("duplicate header '{name}'")]
    DuplicateHeader { name: String },

    /// JSON input could not be decoded (or output encoded).
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A required pointer argument was null.
    #[error("null pointer passed for '{argument}'")]
    NullPointer { argument: &'static str },

    /// A C string argument was not valid UTF-8.
    #[error("invalid UTF-8: {0}")]
    InvalidUtf8(String),

    /// Output text could not be handed to C because it holds a NUL byte.
    #[error("interior NUL byte: {0}")]
    InteriorNul(#[from] std::ffi::NulError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        let e = InsightError::DuplicateHeader {
            name: "Sales".into(),
        };
        assert_eq!(e.to_string(), "duplicate header 'Sales'");

        let e = InsightError::NullPointer {
            argument: "dataset_json",
        };
        assert_eq!(e.to_string(), "null pointer passed for 'dataset_json'");
    }

    #[test]
    fn json_errors_convert() {
        let err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let e: InsightError = err.into();
        assert!(matches!(e, InsightError::Json(_)));
        assert!(e.to_string().starts_with("JSON error:"));
    }
}
