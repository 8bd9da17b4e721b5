//! Error types for resume-text.

use std::io;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for resume-text operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while extracting text from a PDF.
///
/// Document-level variants end an extraction. `UnsupportedStreamFilter` and
/// `StreamDecode` are raised per stream and absorbed by the pipeline; they
/// only surface through [`crate::ExtractionStats`].
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading input files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The buffer is empty or does not look like a PDF at all.
    #[error("Malformed document: {0}")]
    MalformedDocument(String),

    /// The document parsed but contains no stream objects.
    #[error("No content streams found in document")]
    NoContentFound,

    /// The document carries an encryption dictionary.
    #[error("Document is encrypted")]
    EncryptedDocument,

    /// Extraction finished but recovered too little text.
    #[error("Insufficient text: extracted {found} characters, at least {required} required")]
    InsufficientText { found: usize, required: usize },

    /// A stream declares a filter this crate cannot decode.
    #[error("Unsupported stream filter: {0}")]
    UnsupportedStreamFilter(String),

    /// A stream failed to decode.
    #[error("Stream decode error: {0}")]
    StreamDecode(String),

    /// Error serializing output.
    #[error("Rendering error: {0}")]
    Render(String),

    /// The library was used incorrectly, e.g. a pipeline was run twice.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Caller-facing classification of a failed extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FailureKind {
    MalformedDocument,
    NoContentFound,
    EncryptedDocument,
    InsufficientText,
    UnsupportedStreamFilter,
    Io,
    Internal,
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            FailureKind::MalformedDocument => "malformed-document",
            FailureKind::NoContentFound => "no-content-found",
            FailureKind::EncryptedDocument => "encrypted-document",
            FailureKind::InsufficientText => "insufficient-text",
            FailureKind::UnsupportedStreamFilter => "unsupported-stream-filter",
            FailureKind::Io => "io",
            FailureKind::Internal => "internal",
        };
        f.write_str(name)
    }
}

impl Error {
    /// Classify this error.
    pub fn kind(&self) -> FailureKind {
        match self {
            Error::Io(_) => FailureKind::Io,
            Error::MalformedDocument(_) => FailureKind::MalformedDocument,
            Error::NoContentFound => FailureKind::NoContentFound,
            Error::EncryptedDocument => FailureKind::EncryptedDocument,
            Error::InsufficientText { .. } => FailureKind::InsufficientText,
            Error::UnsupportedStreamFilter(_) => FailureKind::UnsupportedStreamFilter,
            Error::StreamDecode(_) | Error::Render(_) | Error::Internal(_) => {
                FailureKind::Internal
            }
        }
    }

    /// A remediation message suitable for showing to the person who uploaded
    /// the file.
    pub fn hint(&self) -> &'static str {
        match self.kind() {
            FailureKind::MalformedDocument => {
                "This PDF file appears to be corrupted. Please try re-saving it or using the copy/paste method."
            }
            FailureKind::EncryptedDocument => {
                "This PDF is password-protected. Please remove the password protection and try again."
            }
            FailureKind::NoContentFound | FailureKind::InsufficientText => {
                "Could not extract text from PDF. This might be a scanned document or image-based PDF. Please try the copy/paste method instead."
            }
            FailureKind::Io => "The file could not be read. Please check the file and try again.",
            FailureKind::UnsupportedStreamFilter | FailureKind::Internal => {
                "Failed to parse PDF. Please try the copy/paste method."
            }
        }
    }

    /// Whether this error ends an extraction (as opposed to a per-stream
    /// error the pipeline absorbs).
    pub fn is_document_level(&self) -> bool {
        !matches!(
            self,
            Error::UnsupportedStreamFilter(_) | Error::StreamDecode(_)
        )
    }
}
