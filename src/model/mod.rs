//! Data model shared by the extraction stages.
//!
//! Nothing here outlives a single extraction call: records are produced by
//! one stage, consumed by the next and dropped.

mod object;
mod result;
mod text;

pub use object::{Filter, ObjectRef, StreamKind, StreamRecord};
pub use result::{ExtractionResult, ExtractionStats, Failure, SkipReason, SkippedStream};
pub use text::{Fragment, Piece, TextBlock};
