//! PDF parsing module.
//!
//! The first three extraction stages live here: the object scanner, the
//! stream decoder and the operator extractor, plus the pipeline that drives
//! them into the text assembler.

mod decoder;
mod lexer;
mod operators;
mod options;
mod pipeline;
mod scanner;

pub use decoder::{
    decode_stream, decoder_for, Ascii85Decoder, AsciiHexDecoder, FlateDecoder, StreamDecoder,
};
pub use operators::{extract_blocks, scan_hex, scan_literal};
pub use options::{
    ErrorMode, ExtractOptions, DEFAULT_MAX_STREAM_BYTES, DEFAULT_MAX_TOTAL_DECODED_BYTES,
    DEFAULT_MIN_TEXT_CHARS,
};
pub use pipeline::{Pipeline, Stage};
pub use scanner::{count_page_markers, ObjectScanner, ScanResult};
