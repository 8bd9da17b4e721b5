//! C-ABI FFI bindings for cross-language integration.
//!
//! Lets a non-Rust backend (the upload service, for instance) hand over the
//! uploaded bytes and get back JSON: the extraction result on success, a
//! `{ kind, message, hint }` failure otherwise.

use std::ffi::{c_char, CStr, CString};
use std::path::Path;
use std::ptr;

use crate::render::{failure_to_json, to_json, JsonFormat};
use crate::{extract_file_with_options, extract_with_options, Error, ExtractOptions};

/// Result structure returned by FFI functions.
#[repr(C)]
pub struct ResumeTextResult {
    /// Whether the operation succeeded.
    pub success: bool,
    /// Result JSON (null if failed). Freed by `resume_text_free_result`.
    pub data: *mut c_char,
    /// Failure JSON (null if succeeded). Freed by `resume_text_free_result`.
    pub error: *mut c_char,
}

impl ResumeTextResult {
    fn success(data: String) -> Self {
        Self {
            success: true,
            data: CString::new(data).unwrap_or_default().into_raw(),
            error: ptr::null_mut(),
        }
    }

    fn error(message: String) -> Self {
        Self {
            success: false,
            data: ptr::null_mut(),
            error: CString::new(message).unwrap_or_default().into_raw(),
        }
    }

    fn failure(err: &Error) -> Self {
        let json = failure_to_json(err, JsonFormat::Compact).unwrap_or_else(|_| err.to_string());
        Self::error(json)
    }
}

fn finish(result: crate::Result<crate::ExtractionResult>) -> ResumeTextResult {
    match result.and_then(|r| to_json(&r, JsonFormat::Compact)) {
        Ok(json) => ResumeTextResult::success(json),
        Err(e) => ResumeTextResult::failure(&e),
    }
}

/// Extract text from a PDF held in memory.
///
/// `file_name` may be null, in which case the result's file name is empty.
///
/// # Safety
///
/// `data` must point to `len` readable bytes (or be null with `len == 0`).
/// `file_name` must be null or a valid null-terminated UTF-8 string.
/// The returned result must be freed with `resume_text_free_result`.
#[no_mangle]
pub unsafe extern "C" fn resume_text_extract(
    data: *const u8,
    len: usize,
    file_name: *const c_char,
) -> ResumeTextResult {
    let bytes: &[u8] = if data.is_null() || len == 0 {
        &[]
    } else {
        std::slice::from_raw_parts(data, len)
    };

    let name = if file_name.is_null() {
        ""
    } else {
        match CStr::from_ptr(file_name).to_str() {
            Ok(s) => s,
            Err(_) => return ResumeTextResult::error("Invalid UTF-8 file name".to_string()),
        }
    };

    finish(extract_with_options(bytes, name, &ExtractOptions::default()))
}

/// Extract text from a PDF file.
///
/// # Safety
///
/// The `path` must be a valid null-terminated UTF-8 string.
/// The returned result must be freed with `resume_text_free_result`.
#[no_mangle]
pub unsafe extern "C" fn resume_text_extract_file(path: *const c_char) -> ResumeTextResult {
    if path.is_null() {
        return ResumeTextResult::error("Path cannot be null".to_string());
    }

    let path_str = match CStr::from_ptr(path).to_str() {
        Ok(s) => s,
        Err(_) => return ResumeTextResult::error("Invalid UTF-8 path".to_string()),
    };

    finish(extract_file_with_options(
        Path::new(path_str),
        &ExtractOptions::default(),
    ))
}

/// Check whether pasted text is actually raw PDF syntax.
///
/// # Safety
///
/// The `text` must be null or a valid null-terminated UTF-8 string.
#[no_mangle]
pub unsafe extern "C" fn resume_text_looks_like_raw_pdf(text: *const c_char) -> bool {
    if text.is_null() {
        return false;
    }
    match CStr::from_ptr(text).to_str() {
        Ok(s) => crate::detect::looks_like_raw_pdf(s),
        Err(_) => false,
    }
}

/// Free a result returned by any resume_text function.
///
/// # Safety
///
/// The `result` must have been returned by a resume_text function.
/// This function should only be called once per result.
#[no_mangle]
pub unsafe extern "C" fn resume_text_free_result(result: ResumeTextResult) {
    if !result.data.is_null() {
        drop(CString::from_raw(result.data));
    }
    if !result.error.is_null() {
        drop(CString::from_raw(result.error));
    }
}

/// Free a string allocated by resume_text.
///
/// # Safety
///
/// The `ptr` must have been allocated by resume_text.
/// This function should only be called once per pointer.
#[no_mangle]
pub unsafe extern "C" fn resume_text_free_string(ptr: *mut c_char) {
    if !ptr.is_null() {
        drop(CString::from_raw(ptr));
    }
}

/// Get the version of the resume_text library.
///
/// The returned string is statically allocated and should not be freed.
#[no_mangle]
pub extern "C" fn resume_text_version() -> *const c_char {
    static VERSION: &[u8] = concat!(env!("CARGO_PKG_VERSION"), "\0").as_bytes();
    VERSION.as_ptr() as *const c_char
}
