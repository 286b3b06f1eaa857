//! C FFI bindings for tabular-insight.
//!
//! Exposes the analysis pass through a JSON-in / JSON-out C interface.
//!
//! # Design
//!
//! - **JSON strings**: datasets and configuration go in as UTF-8 JSON,
//!   reports come out as heap-allocated JSON owned by the caller
//! - **Null on failure**: functions returning `*mut c_char` return null
//!   on error and record a message
//! - **Thread-local error message**: `insight_last_error()`
//! - **`catch_unwind`**: All FFI entry points wrapped to prevent panic propagation
//!
//! # Ownership
//!
//! Every non-null `*mut c_char` returned here must be released with
//! [`insight_string_free`]. Strings returned as `*const c_char` are
//! borrowed and must not be freed.

use std::cell::RefCell;
use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::panic::{self, UnwindSafe};
use std::ptr;

use crate::config::AnalysisConfig;
use crate::dataset::Dataset;
use crate::error::InsightError;
use crate::ranking::filter_rows;
use crate::report::analyze;

// ── Error handling ────────────────────────────────────────────────────

thread_local! {
    static LAST_ERROR: RefCell<Option<CString>> = const { RefCell::new(None) };
}

fn set_last_error(msg: &str) {
    LAST_ERROR.with(|cell| {
        *cell.borrow_mut() = CString::new(msg).ok();
    });
}

/// Returns the last error message, or null if no error.
/// The returned string is valid until the next FFI call on this thread.
///
/// # Safety
/// The caller must not free the returned pointer.
#[no_mangle]
pub extern "C" fn insight_last_error() -> *const c_char {
    LAST_ERROR.with(|cell| {
        let borrow = cell.borrow();
        match borrow.as_ref() {
            Some(cstr) => cstr.as_ptr(),
            None => ptr::null(),
        }
    })
}

/// Clears the last error message.
#[no_mangle]
pub extern "C" fn insight_clear_error() {
    LAST_ERROR.with(|cell| {
        *cell.borrow_mut() = None;
    });
}

/// Returns the version string of tabular-insight.
///
/// # Safety
/// The returned string is a static string literal. Do not free it.
#[no_mangle]
pub extern "C" fn insight_version() -> *const c_char {
    c"0.1.0".as_ptr()
}

// ── Helpers ───────────────────────────────────────────────────────────

/// Borrows a C string argument as `&str`.
///
/// # Safety
/// `ptr` must be null or a valid null-terminated string that outlives `'a`.
unsafe fn str_arg<'a>(ptr: *const c_char, argument: &'static str) -> Result<&'a str, InsightError> {
    if ptr.is_null() {
        return Err(InsightError::NullPointer { argument });
    }
    let c_str = unsafe { CStr::from_ptr(ptr) };
    c_str
        .to_str()
        .map_err(|e| InsightError::InvalidUtf8(e.to_string()))
}

/// Runs `body` behind `catch_unwind` and hands its JSON to the caller.
fn json_result<F>(name: &'static str, body: F) -> *mut c_char
where
    F: FnOnce() -> Result<String, InsightError> + UnwindSafe,
{
    let result = panic::catch_unwind(|| body().and_then(|json| Ok(CString::new(json)?)));

    match result {
        Ok(Ok(json)) => json.into_raw(),
        Ok(Err(e)) => {
            tracing::warn!(function = name, error = %e, "FFI call failed");
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
        Err(_) => {
            tracing::warn!(function = name, "panic caught at FFI boundary");
            set_last_error(&format!("panic in {name}"));
            ptr::null_mut()
        }
    }
}

// ── Analysis ──────────────────────────────────────────────────────────

/// Analyzes a dataset and returns the full report as JSON.
///
/// `dataset_json` has the form `{"headers": [...], "rows": [{...}, ...]}`.
/// `config_json` may be null for the default thresholds, or a JSON object
/// overriding individual fields.
///
/// Returns null on error; see `insight_last_error()`.
///
/// # Safety
/// - `dataset_json` must be a valid null-terminated UTF-8 string.
/// - `config_json` must be null or a valid null-terminated UTF-8 string.
/// - The returned string must be freed with `insight_string_free`.
#[no_mangle]
pub unsafe extern "C" fn insight_analyze_json(
    dataset_json: *const c_char,
    config_json: *const c_char,
) -> *mut c_char {
    json_result("insight_analyze_json", || {
        let ds = Dataset::from_json(unsafe { str_arg(dataset_json, "dataset_json") }?)?;
        let config = if config_json.is_null() {
            AnalysisConfig::default()
        } else {
            AnalysisConfig::from_json(unsafe { str_arg(config_json, "config_json") }?)?
        };
        let report = analyze(&ds, &config);
        Ok(serde_json::to_string(&report)?)
    })
}

/// Filters rows by case-insensitive substring match and returns them as
/// a JSON array of row objects.
///
/// An empty `column` or `query` returns every row.
///
/// # Safety
/// - All arguments must be valid null-terminated UTF-8 strings.
/// - The returned string must be freed with `insight_string_free`.
#[no_mangle]
pub unsafe extern "C" fn insight_filter_json(
    dataset_json: *const c_char,
    column: *const c_char,
    query: *const c_char,
) -> *mut c_char {
    json_result("insight_filter_json", || {
        let ds = Dataset::from_json(unsafe { str_arg(dataset_json, "dataset_json") }?)?;
        let column = unsafe { str_arg(column, "column") }?;
        let query = unsafe { str_arg(query, "query") }?;
        let rows = filter_rows(&ds, column, query);
        Ok(serde_json::to_string(&rows)?)
    })
}

/// Frees a string returned by this library.
///
/// # Safety
/// `s` must be a pointer returned by an `insight_*_json` function, or null.
/// It must not be freed twice.
#[no_mangle]
pub unsafe extern "C" fn insight_string_free(s: *mut c_char) {
    if !s.is_null() {
        let _ = unsafe { CString::from_raw(s) };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::CString;

    const SAMPLE: &str = r#"{
        "headers": ["Product", "Sales", "Region"],
        "rows": [
            {"Product": "A", "Sales": 100, "Region": "East"},
            {"Product": "B", "Sales": 50, "Region": "West"},
            {"Product": "A", "Sales": 100, "Region": "East"}
        ]
    }"#;

    /// Takes ownership of a returned string and parses it.
    fn take_json(ptr: *mut c_char) -> serde_json::Value {
        assert!(!ptr.is_null(), "unexpected null result");
        let s = unsafe { CStr::from_ptr(ptr) }.to_str().unwrap().to_owned();
        unsafe { insight_string_free(ptr) };
        serde_json::from_str(&s).unwrap()
    }

    fn last_error() -> String {
        let p = insight_last_error();
        assert!(!p.is_null());
        unsafe { CStr::from_ptr(p) }.to_str().unwrap().to_owned()
    }

    #[test]
    fn ffi_version() {
        let v = insight_version();
        let s = unsafe { CStr::from_ptr(v) }.to_str().unwrap();
        assert_eq!(s, "0.1.0");
    }

    #[test]
    fn ffi_error_lifecycle() {
        insight_clear_error();
        assert!(insight_last_error().is_null());

        set_last_error("test error");
        assert_eq!(last_error(), "test error");

        insight_clear_error();
        assert!(insight_last_error().is_null());
    }

    // ── Analysis ─────────────────────────────────────────────────

    #[test]
    fn ffi_analyze_default_config() {
        let ds = CString::new(SAMPLE).unwrap();
        let json = take_json(unsafe { insight_analyze_json(ds.as_ptr(), ptr::null()) });
        assert_eq!(json["quality"]["duplicateCount"], 1);
        assert_eq!(json["chart"][0]["name"], "A");
        assert_eq!(json["chart"][0]["sales"], 200.0);
        assert_eq!(json["insights"][0]["title"], "Top Performer");
    }

    #[test]
    fn ffi_analyze_with_config() {
        let ds = CString::new(SAMPLE).unwrap();
        let cfg = CString::new(r#"{"chartLimit": 1, "salesChangeIndicator": "n/a"}"#).unwrap();
        let json = take_json(unsafe { insight_analyze_json(ds.as_ptr(), cfg.as_ptr()) });
        assert_eq!(json["chart"].as_array().unwrap().len(), 1);
        assert_eq!(json["kpis"][0]["change"], "n/a");
    }

    #[test]
    fn ffi_analyze_null_dataset() {
        insight_clear_error();
        let out = unsafe { insight_analyze_json(ptr::null(), ptr::null()) };
        assert!(out.is_null());
        assert_eq!(last_error(), "null pointer passed for 'dataset_json'");
    }

    #[test]
    fn ffi_analyze_bad_json() {
        let ds = CString::new("{not json").unwrap();
        let out = unsafe { insight_analyze_json(ds.as_ptr(), ptr::null()) };
        assert!(out.is_null());
        assert!(last_error().starts_with("JSON error:"));
    }

    #[test]
    fn ffi_analyze_duplicate_header() {
        let ds = CString::new(r#"{"headers": ["a", "a"], "rows": []}"#).unwrap();
        let out = unsafe { insight_analyze_json(ds.as_ptr(), ptr::null()) };
        assert!(out.is_null());
        assert!(last_error().contains("duplicate header 'a'"));
    }

    #[test]
    fn ffi_analyze_invalid_utf8() {
        let ds = CString::new(vec![0xff, 0xfe]).unwrap();
        let out = unsafe { insight_analyze_json(ds.as_ptr(), ptr::null()) };
        assert!(out.is_null());
        assert!(last_error().starts_with("invalid UTF-8"));
    }

    // ── Filter ───────────────────────────────────────────────────

    #[test]
    fn ffi_filter_rows() {
        let ds = CString::new(SAMPLE).unwrap();
        let col = CString::new("Region").unwrap();
        let q = CString::new("EAST").unwrap();
        let json = take_json(unsafe { insight_filter_json(ds.as_ptr(), col.as_ptr(), q.as_ptr()) });
        let rows = json.as_array().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["Product"], "A");
    }

    #[test]
    fn ffi_filter_empty_query_keeps_all() {
        let ds = CString::new(SAMPLE).unwrap();
        let col = CString::new("Region").unwrap();
        let q = CString::new("").unwrap();
        let json = take_json(unsafe { insight_filter_json(ds.as_ptr(), col.as_ptr(), q.as_ptr()) });
        assert_eq!(json.as_array().unwrap().len(), 3);
    }

    #[test]
    fn ffi_filter_null_query() {
        let ds = CString::new(SAMPLE).unwrap();
        let col = CString::new("Region").unwrap();
        let out = unsafe { insight_filter_json(ds.as_ptr(), col.as_ptr(), ptr::null()) };
        assert!(out.is_null());
        assert_eq!(last_error(), "null pointer passed for 'query'");
    }

    #[test]
    fn ffi_string_free_null_is_noop() {
        unsafe { insight_string_free(ptr::null_mut()) };
    }
}
