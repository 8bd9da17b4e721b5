//! Extraction options and configuration.

use crate::render::CleanupOptions;

/// Default minimum number of characters a successful extraction must yield.
pub const DEFAULT_MIN_TEXT_CHARS: usize = 50;

/// Default cap on the decoded size of a single stream (64 MiB).
pub const DEFAULT_MAX_STREAM_BYTES: usize = 64 * 1024 * 1024;

/// Default cap on the decoded size of all streams in one document (256 MiB).
pub const DEFAULT_MAX_TOTAL_DECODED_BYTES: usize = 256 * 1024 * 1024;

/// Options for extracting text from PDF documents.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Header handling mode
    pub error_mode: ErrorMode,

    /// Minimum trimmed text length (in characters) for a successful result
    pub min_text_chars: usize,

    /// Maximum decoded size of a single stream, in bytes
    pub max_stream_bytes: usize,

    /// Maximum decoded size of all streams together, in bytes. Streams past
    /// the budget are skipped as failed.
    pub max_total_decoded_bytes: usize,

    /// Cleanup applied to the assembled text
    pub cleanup: CleanupOptions,

    /// Use the rayon pool for batch extraction
    pub parallel: bool,
}

impl ExtractOptions {
    /// Create new extract options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set error mode.
    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    /// Enable lenient mode (tolerate a missing `%PDF-` header).
    pub fn lenient(mut self) -> Self {
        self.error_mode = ErrorMode::Lenient;
        self
    }

    /// Set the minimum viable text length.
    pub fn with_min_text_chars(mut self, chars: usize) -> Self {
        self.min_text_chars = chars;
        self
    }

    /// Set the per-stream decoded size cap.
    pub fn with_max_stream_bytes(mut self, bytes: usize) -> Self {
        self.max_stream_bytes = bytes;
        self
    }

    /// Set the per-document decoded size budget.
    pub fn with_max_total_decoded_bytes(mut self, bytes: usize) -> Self {
        self.max_total_decoded_bytes = bytes;
        self
    }

    /// Enable or disable Unicode normalization.
    pub fn with_unicode_normalization(mut self, normalize: bool) -> Self {
        self.cleanup.normalize_unicode = normalize;
        self
    }

    /// Set the text cleanup options.
    pub fn with_cleanup(mut self, cleanup: CleanupOptions) -> Self {
        self.cleanup = cleanup;
        self
    }

    /// Enable or disable parallel batch processing.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Disable parallel batch processing.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            error_mode: ErrorMode::Strict,
            min_text_chars: DEFAULT_MIN_TEXT_CHARS,
            max_stream_bytes: DEFAULT_MAX_STREAM_BYTES,
            max_total_decoded_bytes: DEFAULT_MAX_TOTAL_DECODED_BYTES,
            cleanup: CleanupOptions::default(),
            parallel: true,
        }
    }
}

/// How strictly the document header is checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorMode {
    /// Require a `%PDF-x.y` header
    #[default]
    Strict,
    /// Accept a headerless buffer as long as it has object or stream markers
    Lenient,
}
