//! Rendering module: text assembly, cleanup and JSON output.

mod assemble;
mod cleanup;
mod json;

pub use assemble::{
    block_text, bytes_to_text, decode_text_simple, fragment_text, resolve_escapes, winansi_to_char,
    TextAssembler,
};
pub use cleanup::{normalize_whitespace, CleanupOptions, CleanupPipeline};
pub use json::{failure_to_json, stats_to_json, to_json, JsonFormat};
