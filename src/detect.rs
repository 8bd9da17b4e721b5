//! PDF format detection and raw-syntax sniffing.

use crate::error::{Error, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// PDF format information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfFormat {
    /// PDF version (e.g., "1.7", "2.0")
    pub version: String,
    /// Byte offset of the `%PDF-` header
    pub header_offset: usize,
}

impl std::fmt::Display for PdfFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PDF {}", self.version)
    }
}

/// PDF magic bytes: %PDF-
const PDF_MAGIC: &[u8] = b"%PDF-";
const VERSION_LEN: usize = 3; // e.g., "1.7"

/// Readers accept a header preceded by up to this many bytes of junk.
const HEADER_SEARCH_WINDOW: usize = 1024;

/// Markers that never appear in real prose but always appear in PDF syntax.
const RAW_PDF_MARKERS: [&str; 3] = ["%PDF-", "endobj", "endstream"];

/// Detect PDF format from a file path.
///
/// # Example
/// ```no_run
/// use resume_text::detect::detect_format_from_path;
///
/// let format = detect_format_from_path("resume.pdf").unwrap();
/// println!("PDF version: {}", format.version);
/// ```
pub fn detect_format_from_path<P: AsRef<Path>>(path: P) -> Result<PdfFormat> {
    let file = File::open(path)?;
    let mut header = Vec::with_capacity(HEADER_SEARCH_WINDOW + PDF_MAGIC.len() + VERSION_LEN);
    file.take((HEADER_SEARCH_WINDOW + PDF_MAGIC.len() + VERSION_LEN) as u64)
        .read_to_end(&mut header)?;
    detect_format_from_bytes(&header)
}

/// Detect PDF format from bytes.
///
/// The `%PDF-x.y` header may start anywhere in the first 1024 bytes.
///
/// # Returns
/// * `Ok(PdfFormat)` if a valid header was found
/// * `Err(Error::MalformedDocument)` otherwise
pub fn detect_format_from_bytes(data: &[u8]) -> Result<PdfFormat> {
    if data.is_empty() {
        return Err(Error::MalformedDocument("empty buffer".to_string()));
    }

    let window = &data[..data.len().min(HEADER_SEARCH_WINDOW + PDF_MAGIC.len())];
    let header_offset = window
        .windows(PDF_MAGIC.len())
        .position(|w| w == PDF_MAGIC)
        .ok_or_else(|| Error::MalformedDocument("missing %PDF- header".to_string()))?;

    let version_start = header_offset + PDF_MAGIC.len();
    let version_bytes = data
        .get(version_start..version_start + VERSION_LEN)
        .ok_or_else(|| Error::MalformedDocument("truncated %PDF- header".to_string()))?;
    let version = String::from_utf8_lossy(version_bytes).to_string();

    if !is_valid_version(&version) {
        return Err(Error::MalformedDocument(format!(
            "invalid PDF version '{}'",
            version
        )));
    }

    Ok(PdfFormat {
        version,
        header_offset,
    })
}

/// Check if a version string is valid.
fn is_valid_version(version: &str) -> bool {
    let bytes = version.as_bytes();
    bytes.len() == 3 && bytes[0].is_ascii_digit() && bytes[1] == b'.' && bytes[2].is_ascii_digit()
}

/// Check if a file is a valid PDF.
pub fn is_pdf<P: AsRef<Path>>(path: P) -> bool {
    detect_format_from_path(path).is_ok()
}

/// Check if bytes start with (or shortly contain) a valid PDF header.
pub fn is_pdf_bytes(data: &[u8]) -> bool {
    detect_format_from_bytes(data).is_ok()
}

/// Check whether text contains raw PDF syntax rather than readable content.
///
/// Useful both for validating extractor output and for catching résumé text
/// that was pasted straight out of a PDF file opened in a text editor.
///
/// # Example
/// ```
/// use resume_text::detect::looks_like_raw_pdf;
///
/// assert!(looks_like_raw_pdf("%PDF-1.4\n1 0 obj << >> endobj"));
/// assert!(!looks_like_raw_pdf("Led a mainstream data platform migration."));
/// ```
pub fn looks_like_raw_pdf(text: &str) -> bool {
    RAW_PDF_MARKERS.iter().any(|marker| text.contains(marker))
}
