//! # resume-text
//!
//! Best-effort text extraction from PDF résumés.
//!
//! The extractor does not follow the cross-reference table or build an
//! object graph. It scans the raw bytes for streams, decodes them, pulls the
//! string operands out of `BT`/`ET` text blocks and assembles them into
//! plain text good enough for keyword analysis.
//!
//! ## Quick Start
//!
//! ```no_run
//! use resume_text::extract;
//!
//! fn main() -> resume_text::Result<()> {
//!     let data = std::fs::read("resume.pdf")?;
//!     let result = extract(&data, "resume.pdf")?;
//!
//!     println!("{} pages", result.num_pages);
//!     println!("{}", result.text);
//!     Ok(())
//! }
//! ```
//!
//! ## Failures
//!
//! Every error carries a [`FailureKind`] and a [`hint`](Error::hint) meant for
//! the person who uploaded the file:
//!
//! - `MalformedDocument`: empty or not a PDF
//! - `EncryptedDocument`: password protected
//! - `NoContentFound`: no streams at all
//! - `InsufficientText`: too little text, usually a scanned document
//!
//! Streams with unsupported filters are skipped rather than failing the
//! whole document. [`extract_with_stats`] reports what was skipped, on
//! success and on failure.

pub mod detect;
pub mod error;
pub mod model;
pub mod parser;
pub mod render;

#[cfg(feature = "ffi")]
pub mod ffi;

// Re-export commonly used types
pub use detect::{
    detect_format_from_bytes, detect_format_from_path, is_pdf, looks_like_raw_pdf, PdfFormat,
};
pub use error::{Error, FailureKind, Result};
pub use model::{ExtractionResult, ExtractionStats, Failure, SkipReason, SkippedStream};
pub use parser::{ErrorMode, ExtractOptions, Pipeline, Stage};
pub use render::{CleanupOptions, JsonFormat};

use std::io::Read;
use std::path::Path;

use rayon::prelude::*;

/// Extract text from a PDF held in memory.
///
/// `file_name` is copied into the result as-is.
///
/// # Example
///
/// ```no_run
/// use resume_text::extract;
///
/// let data = std::fs::read("resume.pdf").unwrap();
/// let result = extract(&data, "resume.pdf").unwrap();
/// println!("{}", result.text);
/// ```
pub fn extract(data: &[u8], file_name: &str) -> Result<ExtractionResult> {
    extract_with_options(data, file_name, &ExtractOptions::default())
}

/// Extract text with custom options.
///
/// # Example
///
/// ```no_run
/// use resume_text::{extract_with_options, ExtractOptions};
///
/// let options = ExtractOptions::new().lenient().with_min_text_chars(20);
/// let data = std::fs::read("resume.pdf").unwrap();
/// let result = extract_with_options(&data, "resume.pdf", &options).unwrap();
/// ```
pub fn extract_with_options(
    data: &[u8],
    file_name: &str,
    options: &ExtractOptions,
) -> Result<ExtractionResult> {
    Pipeline::new(data, options).run(file_name)
}

/// Extract text and return the run's diagnostics alongside it.
///
/// The stats are returned whether or not the extraction succeeded, so a
/// failed run still shows which streams were skipped and why.
///
/// # Example
///
/// ```no_run
/// use resume_text::{extract_with_stats, ExtractOptions};
///
/// let data = std::fs::read("scan.pdf").unwrap();
/// let (result, stats) = extract_with_stats(&data, "scan.pdf", &ExtractOptions::default());
/// if let Err(e) = result {
///     eprintln!("{} ({} streams skipped)", e, stats.skipped.len());
/// }
/// ```
pub fn extract_with_stats(
    data: &[u8],
    file_name: &str,
    options: &ExtractOptions,
) -> (Result<ExtractionResult>, ExtractionStats) {
    let mut pipeline = Pipeline::new(data, options);
    let result = pipeline.run(file_name);
    (result, pipeline.into_stats())
}

/// Extract text from a PDF file. The result's file name is the path's final
/// component.
///
/// # Example
///
/// ```no_run
/// use resume_text::extract_file;
///
/// let result = extract_file("resume.pdf").unwrap();
/// println!("{} words", result.word_count());
/// ```
pub fn extract_file<P: AsRef<Path>>(path: P) -> Result<ExtractionResult> {
    extract_file_with_options(path, &ExtractOptions::default())
}

/// Extract text from a PDF file with custom options.
pub fn extract_file_with_options<P: AsRef<Path>>(
    path: P,
    options: &ExtractOptions,
) -> Result<ExtractionResult> {
    let path = path.as_ref();
    let data = std::fs::read(path)?;
    extract_with_options(&data, &file_name_of(path), options)
}

/// Extract text from a reader.
///
/// # Example
///
/// ```no_run
/// use resume_text::extract_reader;
/// use std::fs::File;
///
/// let file = File::open("resume.pdf").unwrap();
/// let result = extract_reader(file, "resume.pdf").unwrap();
/// ```
pub fn extract_reader<R: Read>(mut reader: R, file_name: &str) -> Result<ExtractionResult> {
    let mut data = Vec::new();
    reader.read_to_end(&mut data)?;
    extract(&data, file_name)
}

/// Extract text from many documents.
///
/// Documents are independent: one failure does not affect the others.
/// Results come back in input order. Runs on the rayon pool unless
/// `options.parallel` is off.
pub fn extract_batch<N, B>(inputs: &[(N, B)], options: &ExtractOptions) -> Vec<Result<ExtractionResult>>
where
    N: AsRef<str> + Sync,
    B: AsRef<[u8]> + Sync,
{
    let run = |(name, data): &(N, B)| extract_with_options(data.as_ref(), name.as_ref(), options);

    if options.parallel {
        inputs.par_iter().map(run).collect()
    } else {
        inputs.iter().map(run).collect()
    }
}

/// Extract text from a PDF file without blocking the async runtime.
///
/// The file is read with `tokio::fs` and the extraction runs on the blocking
/// thread pool.
#[cfg(feature = "async")]
pub async fn extract_file_async<P: AsRef<Path>>(path: P) -> Result<ExtractionResult> {
    let path = path.as_ref();
    let data = tokio::fs::read(path).await?;
    let file_name = file_name_of(path);

    tokio::task::spawn_blocking(move || extract(&data, &file_name))
        .await
        .map_err(|e| Error::Io(std::io::Error::other(e)))?
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Builder for configuring and running extractions.
///
/// # Example
///
/// ```no_run
/// use resume_text::Extractor;
///
/// let result = Extractor::new()
///     .lenient()
///     .min_text_chars(20)
///     .extract_file("resume.pdf")?;
/// # Ok::<(), resume_text::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Extractor {
    options: ExtractOptions,
}

impl Extractor {
    /// Create a new Extractor with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Tolerate a missing `%PDF-` header.
    pub fn lenient(mut self) -> Self {
        self.options = self.options.lenient();
        self
    }

    /// Set the minimum viable text length.
    pub fn min_text_chars(mut self, chars: usize) -> Self {
        self.options = self.options.with_min_text_chars(chars);
        self
    }

    /// Set the per-stream decoded size cap.
    pub fn max_stream_bytes(mut self, bytes: usize) -> Self {
        self.options = self.options.with_max_stream_bytes(bytes);
        self
    }

    /// Set the per-document decoded size budget.
    pub fn max_total_decoded_bytes(mut self, bytes: usize) -> Self {
        self.options = self.options.with_max_total_decoded_bytes(bytes);
        self
    }

    /// Enable or disable Unicode NFC normalization.
    pub fn normalize_unicode(mut self, normalize: bool) -> Self {
        self.options = self.options.with_unicode_normalization(normalize);
        self
    }

    /// Set the text cleanup options.
    pub fn cleanup(mut self, cleanup: CleanupOptions) -> Self {
        self.options = self.options.with_cleanup(cleanup);
        self
    }

    /// Disable parallel batch processing.
    pub fn sequential(mut self) -> Self {
        self.options = self.options.sequential();
        self
    }

    /// The options this builder will run with.
    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    /// Extract text from bytes.
    pub fn extract(&self, data: &[u8], file_name: &str) -> Result<ExtractionResult> {
        extract_with_options(data, file_name, &self.options)
    }

    /// Extract text from bytes, with diagnostics on both outcomes.
    pub fn extract_with_stats(
        &self,
        data: &[u8],
        file_name: &str,
    ) -> (Result<ExtractionResult>, ExtractionStats) {
        extract_with_stats(data, file_name, &self.options)
    }

    /// Extract text from a file.
    pub fn extract_file<P: AsRef<Path>>(&self, path: P) -> Result<ExtractionResult> {
        extract_file_with_options(path, &self.options)
    }

    /// Extract text from many documents, in input order.
    pub fn extract_batch<N, B>(&self, inputs: &[(N, B)]) -> Vec<Result<ExtractionResult>>
    where
        N: AsRef<str> + Sync,
        B: AsRef<[u8]> + Sync,
    {
        extract_batch(inputs, &self.options)
    }
}
