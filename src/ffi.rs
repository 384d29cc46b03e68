//! FFI interface for host integration
//!
//! Provides C-compatible functions for scanning a page's HTML.
//! Requests and results are passed as JSON for simplicity and type safety.

use std::ffi::{c_char, CStr, CString};
use std::ptr;

use serde::Deserialize;
use tracing_subscriber::EnvFilter;

use crate::backend::Backend;
use crate::catalog::KeywordCatalog;
use crate::config::{PageType, ScanConfig};
use crate::error::{Result, ScanError};
use crate::scan::{ScanResult, Scanner};

/// Result struct returned to the host
/// Both pointers are owned by Rust and must be freed via feedscan_free_result
#[repr(C)]
pub struct ScanResultFFI {
    /// JSON-serialized ScanResult (null-terminated)
    pub json_ptr: *mut c_char,
    /// Error message if the request was unusable (null-terminated), or null on success
    pub error_ptr: *mut c_char,
}

/// Scan request from the host
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanRequest {
    pub page_url: String,
    /// Inferred from `page_url` when absent
    #[serde(default)]
    pub page_type: Option<PageType>,
    #[serde(default)]
    pub backend: Backend,
    #[serde(default)]
    pub catalog: Option<KeywordCatalog>,
    #[serde(default)]
    pub config: ScanConfig,
}

/// Scan HTML for matching posts according to the request.
///
/// # Arguments
/// * `html_ptr` - Pointer to HTML content (UTF-8, not necessarily null-terminated)
/// * `html_len` - Length of HTML content in bytes
/// * `request_json` - JSON-serialized ScanRequest (null-terminated)
///
/// # Returns
/// ScanResultFFI with either json_ptr set (success) or error_ptr set (failure).
/// An empty page is a success with no posts.
///
/// # Safety
/// - `html_ptr` must point to valid memory of at least `html_len` bytes
/// - `request_json` must be a valid null-terminated C string
/// - Caller must free the result via `feedscan_free_result`
#[no_mangle]
pub unsafe extern "C" fn feedscan_scan_html(
    html_ptr: *const c_char,
    html_len: usize,
    request_json: *const c_char,
) -> ScanResultFFI {
    let html = if html_ptr.is_null() || html_len == 0 {
        ""
    } else {
        let slice = std::slice::from_raw_parts(html_ptr as *const u8, html_len);
        match std::str::from_utf8(slice) {
            Ok(s) => s,
            Err(_) => return make_error_result("Invalid UTF-8 in HTML content"),
        }
    };

    if request_json.is_null() {
        return make_error_result("Request JSON is null");
    }
    let request_str = match CStr::from_ptr(request_json).to_str() {
        Ok(s) => s,
        Err(_) => return make_error_result("Invalid UTF-8 in request JSON"),
    };

    match scan_request(html, request_str).and_then(|result| Ok(serde_json::to_string(&result)?)) {
        Ok(json) => match CString::new(json) {
            Ok(cstr) => ScanResultFFI {
                json_ptr: cstr.into_raw(),
                error_ptr: ptr::null_mut(),
            },
            Err(_) => make_error_result("Result JSON contains null bytes"),
        },
        Err(e) => make_error_result(&e.to_string()),
    }
}

/// Free a ScanResultFFI returned by feedscan_scan_html
///
/// # Safety
/// - `result` must have been returned by `feedscan_scan_html`
/// - Must only be called once per result
#[no_mangle]
pub unsafe extern "C" fn feedscan_free_result(result: ScanResultFFI) {
    if !result.json_ptr.is_null() {
        drop(CString::from_raw(result.json_ptr));
    }
    if !result.error_ptr.is_null() {
        drop(CString::from_raw(result.error_ptr));
    }
}

/// Install a stderr logger filtered by `RUST_LOG`. Safe to call more than
/// once; later calls are ignored.
#[no_mangle]
pub extern "C" fn feedscan_init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();
}

/// Parse a request and run the scan it describes.
pub fn scan_request(html: &str, request_json: &str) -> Result<ScanResult> {
    let request: ScanRequest = serde_json::from_str(request_json)?;
    if request.page_url.trim().is_empty() {
        return Err(ScanError::InvalidInput("pageUrl is empty".to_string()));
    }

    let page_type = request
        .page_type
        .unwrap_or_else(|| PageType::from_url(&request.page_url));
    let catalog = request.catalog.unwrap_or_default();
    let scanner = Scanner::new(&catalog, request.config);

    Ok(scanner.scan_with(request.backend, html, &request.page_url, page_type))
}

// Helper to create error result
fn make_error_result(msg: &str) -> ScanResultFFI {
    let error_cstr = CString::new(msg).unwrap_or_else(|_| CString::from(c"Unknown error"));
    ScanResultFFI {
        json_ptr: ptr::null_mut(),
        error_ptr: error_cstr.into_raw(),
    }
}
