//! Extraction output types.

use serde::{Deserialize, Serialize};

use crate::error::{Error, FailureKind};

use super::ObjectRef;

/// Text recovered from one PDF.
///
/// This is the only value handed back to callers on success. Serialized with
/// camelCase keys: `{ "text", "numPages", "fileName" }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionResult {
    /// Linearized plain text.
    pub text: String,
    /// Approximate page count (at least 1).
    pub num_pages: u32,
    /// Caller-supplied file name, passed through untouched.
    pub file_name: String,
}

impl ExtractionResult {
    pub fn new(text: String, num_pages: u32, file_name: impl Into<String>) -> Self {
        Self {
            text,
            num_pages,
            file_name: file_name.into(),
        }
    }

    /// Approximate word count (whitespace-separated tokens).
    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }
}

/// Why a stream contributed no text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", content = "detail", rename_all = "camelCase")]
pub enum SkipReason {
    /// Filter (or predictor) this crate does not decode.
    UnsupportedFilter(String),
    /// Decoding started but failed.
    DecodeFailed(String),
}

/// A stream the pipeline could not decode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedStream {
    pub object: Option<ObjectRef>,
    pub offset: usize,
    #[serde(flatten)]
    pub reason: SkipReason,
}

/// Diagnostics collected during one extraction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionStats {
    /// PDF version from the header, when one was found
    pub pdf_version: Option<String>,

    /// Indirect object headers seen by the scanner
    pub object_count: u32,

    /// Streams located in the buffer
    pub streams_found: u32,

    /// Streams decoded successfully
    pub streams_decoded: u32,

    /// Non-content streams (images, fonts, xref, metadata) left alone
    pub streams_ignored: u32,

    /// Streams skipped because of an unsupported filter
    pub streams_unsupported: u32,

    /// Streams whose decoding failed
    pub streams_failed: u32,

    /// Details for every unsupported or failed stream
    pub skipped: Vec<SkippedStream>,

    /// Text blocks found
    pub text_block_count: u32,

    /// Fragments found across all blocks
    pub fragment_count: u32,

    /// Approximate word count of the final text
    pub word_count: u32,

    /// Character count (excluding whitespace) of the final text
    pub char_count: u32,
}

impl ExtractionStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a stream that was skipped.
    pub fn add_skipped(&mut self, skipped: SkippedStream) {
        match skipped.reason {
            SkipReason::UnsupportedFilter(_) => self.streams_unsupported += 1,
            SkipReason::DecodeFailed(_) => self.streams_failed += 1,
        }
        self.skipped.push(skipped);
    }

    /// Add word and character counts from text.
    pub fn count_text(&mut self, text: &str) {
        self.word_count += text.split_whitespace().count() as u32;
        self.char_count += text.chars().filter(|c| !c.is_whitespace()).count() as u32;
    }

    /// True when every decodable stream was skipped.
    pub fn all_streams_skipped(&self) -> bool {
        self.streams_decoded == 0 && !self.skipped.is_empty()
    }
}

/// Serializable projection of a failed extraction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Failure {
    pub kind: FailureKind,
    pub message: String,
    pub hint: String,
}

impl From<&Error> for Failure {
    fn from(err: &Error) -> Self {
        Self {
            kind: err.kind(),
            message: err.to_string(),
            hint: err.hint().to_string(),
        }
    }
}
