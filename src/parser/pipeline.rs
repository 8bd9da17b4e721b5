//! Extraction pipeline driver.
//!
//! Runs the four stages strictly forward:
//! `Scanning → Decoding → Extracting → Assembling → Done`, or `Failed` as soon
//! as a document-level error occurs. Per-stream errors never leave the
//! decoding stage; they are logged and counted in [`ExtractionStats`].
//!
//! Operators are pulled out of each stream as soon as it is decoded, so the
//! `Decoding` stage covers extraction too and `Extracting` only tallies the
//! blocks.

use crate::detect::detect_format_from_bytes;
use crate::error::{Error, FailureKind, Result};
use crate::model::{
    ExtractionResult, ExtractionStats, SkipReason, SkippedStream, StreamKind, StreamRecord,
    TextBlock,
};
use crate::render::TextAssembler;

use super::decoder::decode_stream;
use super::operators::extract_blocks;
use super::options::{ErrorMode, ExtractOptions};
use super::scanner::{count_page_markers, ObjectScanner};

/// Where a pipeline run currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Scanning,
    Decoding,
    Extracting,
    Assembling,
    Done,
    Failed(FailureKind),
}

impl Stage {
    /// Whether the run has finished, successfully or not.
    pub fn is_terminal(self) -> bool {
        matches!(self, Stage::Done | Stage::Failed(_))
    }
}

/// One extraction over one document buffer.
pub struct Pipeline<'a> {
    data: &'a [u8],
    options: &'a ExtractOptions,
    stage: Stage,
    stats: ExtractionStats,
}

impl<'a> Pipeline<'a> {
    pub fn new(data: &'a [u8], options: &'a ExtractOptions) -> Self {
        Self {
            data,
            options,
            stage: Stage::Scanning,
            stats: ExtractionStats::new(),
        }
    }

    /// Current stage.
    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Diagnostics gathered so far.
    pub fn stats(&self) -> &ExtractionStats {
        &self.stats
    }

    pub fn into_stats(self) -> ExtractionStats {
        self.stats
    }

    /// Run every stage. `file_name` is copied into the result untouched.
    ///
    /// A pipeline runs once; calling this again after a terminal stage
    /// returns an error without touching the buffer.
    pub fn run(&mut self, file_name: &str) -> Result<ExtractionResult> {
        if self.stage.is_terminal() {
            return Err(Error::Internal(
                "pipeline has already finished".to_string(),
            ));
        }

        match self.execute(file_name) {
            Ok(result) => {
                self.transition(Stage::Done);
                Ok(result)
            }
            Err(e) => {
                self.transition(Stage::Failed(e.kind()));
                Err(e)
            }
        }
    }

    fn transition(&mut self, next: Stage) {
        log::debug!("pipeline stage {:?} -> {:?}", self.stage, next);
        self.stage = next;
    }

    fn execute(&mut self, file_name: &str) -> Result<ExtractionResult> {
        self.check_header()?;

        // Scanning
        let scan = ObjectScanner::new(self.data).scan()?;
        self.stats.object_count = scan.object_count;
        self.stats.streams_found = scan.streams.len() as u32;

        // Each stream is decoded, searched and dropped before the next one, so
        // at most one decoded buffer is alive at a time.
        self.transition(Stage::Decoding);
        let mut budget = self.options.max_total_decoded_bytes;
        let mut stream_pages: u32 = 0;
        let mut blocks: Vec<TextBlock> = Vec::new();
        for record in &scan.streams {
            let Some(bytes) = self.decode_one(record, &mut budget) else {
                continue;
            };
            match record.kind {
                StreamKind::ObjectStream => {
                    stream_pages = stream_pages.saturating_add(count_page_markers(&bytes));
                }
                StreamKind::Content => blocks.extend(extract_blocks(&bytes)),
                _ => {}
            }
        }
        let num_pages = page_total(scan.page_markers, stream_pages);

        self.transition(Stage::Extracting);
        self.stats.text_block_count = blocks.len() as u32;
        self.stats.fragment_count = blocks
            .iter()
            .fold(0u32, |acc, b| acc.saturating_add(b.len() as u32));

        self.transition(Stage::Assembling);
        let assembler = TextAssembler::new(self.options.cleanup.clone(), self.options.min_text_chars);
        let text = assembler.assemble(&blocks);
        self.stats.count_text(&text);

        if let Err(e) = assembler.validate(&text) {
            if self.stats.all_streams_skipped() {
                log::warn!(
                    "all {} decodable streams were skipped",
                    self.stats.skipped.len()
                );
            }
            return Err(e);
        }

        Ok(ExtractionResult::new(text, num_pages, file_name))
    }

    fn check_header(&mut self) -> Result<()> {
        match detect_format_from_bytes(self.data) {
            Ok(format) => {
                log::debug!("detected {} at byte {}", format, format.header_offset);
                self.stats.pdf_version = Some(format.version);
                Ok(())
            }
            Err(e) if self.data.is_empty() => Err(e),
            Err(e) => match self.options.error_mode {
                ErrorMode::Strict => Err(e),
                ErrorMode::Lenient => {
                    log::warn!("{}; continuing in lenient mode", e);
                    Ok(())
                }
            },
        }
    }

    /// Decode one text-bearing stream against the remaining byte budget.
    /// Failures are recorded and yield `None`.
    fn decode_one(&mut self, record: &StreamRecord, budget: &mut usize) -> Option<Vec<u8>> {
        if !record.kind.is_decodable() {
            self.stats.streams_ignored += 1;
            return None;
        }

        let result = if *budget == 0 {
            Err(Error::StreamDecode(format!(
                "total decoded size budget of {} bytes exhausted",
                self.options.max_total_decoded_bytes
            )))
        } else {
            let cap = self.options.max_stream_bytes.min(*budget);
            decode_stream(record, self.data, cap)
        };

        match result {
            Ok(bytes) => {
                *budget = budget.saturating_sub(bytes.len());
                self.stats.streams_decoded += 1;
                Some(bytes)
            }
            Err(e) => {
                log::warn!("skipping stream {}: {}", record.label(), e);
                let reason = match e {
                    Error::UnsupportedStreamFilter(name) => SkipReason::UnsupportedFilter(name),
                    other => SkipReason::DecodeFailed(other.to_string()),
                };
                self.stats.add_skipped(SkippedStream {
                    object: record.object,
                    offset: record.data_range.start,
                    reason,
                });
                None
            }
        }
    }
}

/// Marker-based page count: never zero, and saturating on absurd inputs.
fn page_total(gap_markers: u32, object_stream_markers: u32) -> u32 {
    gap_markers.saturating_add(object_stream_markers).max(1)
}
