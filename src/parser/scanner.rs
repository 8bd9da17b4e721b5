//! Object scanner.
//!
//! Walks the raw buffer looking for `stream` keywords and `N G obj` headers
//! instead of following the cross-reference table, so slightly broken files
//! (bad offsets, missing xref, objects in any order) still scan. Object order
//! is byte order; page order is not reconstructed.

use std::ops::Range;

use crate::error::{Error, Result};
use crate::model::{Filter, ObjectRef, StreamKind, StreamRecord};

use super::lexer::{
    ends_token, find_from, find_name, is_whitespace, parse_uint, read_name, skip_whitespace,
    starts_token,
};

const STREAM_KEYWORD: &[u8] = b"stream";
const ENDSTREAM_KEYWORD: &[u8] = b"endstream";
const OBJ_KEYWORD: &[u8] = b"obj";

/// Everything the scanner learned about a document.
#[derive(Debug, Clone, Default)]
pub struct ScanResult {
    /// Streams in byte order.
    pub streams: Vec<StreamRecord>,
    /// `/Type /Page` markers found outside stream data.
    pub page_markers: u32,
    /// An `/Encrypt` entry was found.
    pub encrypted: bool,
    /// `N G obj` headers found.
    pub object_count: u32,
}

impl ScanResult {
    /// Whether anything resembling PDF object structure was found.
    pub fn has_structure(&self) -> bool {
        self.object_count > 0 || !self.streams.is_empty()
    }
}

/// Marker-based scanner over a document buffer.
pub struct ObjectScanner<'a> {
    data: &'a [u8],
}

impl<'a> ObjectScanner<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    /// Scan the whole buffer.
    ///
    /// Fails with `MalformedDocument` for an empty buffer or one without any
    /// object or stream markers, `EncryptedDocument` when an `/Encrypt` entry
    /// is present and `NoContentFound` when no streams exist.
    pub fn scan(&self) -> Result<ScanResult> {
        let result = self.scan_markers()?;

        if !result.has_structure() {
            return Err(Error::MalformedDocument(
                "no PDF objects or streams found".to_string(),
            ));
        }
        if result.encrypted {
            return Err(Error::EncryptedDocument);
        }
        if result.streams.is_empty() {
            return Err(Error::NoContentFound);
        }
        Ok(result)
    }

    /// Collect markers without judging the outcome.
    pub fn scan_markers(&self) -> Result<ScanResult> {
        let data = self.data;
        if data.is_empty() {
            return Err(Error::MalformedDocument("empty buffer".to_string()));
        }

        let mut result = ScanResult::default();
        let mut cursor = 0;

        loop {
            let Some(keyword) = find_stream_keyword(data, cursor) else {
                self.scan_gap(cursor..data.len(), &mut result);
                break;
            };

            let last_object = self.scan_gap(cursor..keyword, &mut result);
            let (object, dict_start) = match last_object {
                Some((obj, header_end)) => (Some(obj), header_end),
                None => (None, cursor),
            };
            let dict_range = dict_start..keyword;
            let dict = &data[dict_range.clone()];

            let data_start = skip_stream_eol(data, keyword + STREAM_KEYWORD.len());
            let (data_range, resume) = match locate_stream_end(data, data_start, dict) {
                Some(found) => found,
                None => {
                    log::debug!(
                        "stream at byte {} has no endstream, reading to end of file",
                        data_start
                    );
                    (data_start..data.len(), data.len())
                }
            };

            result.streams.push(StreamRecord {
                object,
                filters: parse_filters(dict),
                has_predictor: has_predictor(dict),
                kind: classify(dict),
                dict_range,
                data_range,
            });

            if resume >= data.len() {
                break;
            }
            cursor = resume;
        }

        log::debug!(
            "scanned {} bytes: {} objects, {} streams, {} page markers",
            data.len(),
            result.object_count,
            result.streams.len(),
            result.page_markers
        );
        Ok(result)
    }

    /// Inspect a region outside stream data. Returns the last object header in
    /// it together with the absolute position just after its `obj` keyword.
    fn scan_gap(&self, range: Range<usize>, result: &mut ScanResult) -> Option<(ObjectRef, usize)> {
        let gap = &self.data[range.clone()];
        result.page_markers = result.page_markers.saturating_add(count_page_markers(gap));
        if find_name(gap, b"/Encrypt", 0).is_some() {
            result.encrypted = true;
        }

        let mut last = None;
        let mut search = 0;
        while let Some(pos) = find_from(gap, OBJ_KEYWORD, search) {
            search = pos + OBJ_KEYWORD.len();
            if !ends_token(gap, search) || pos == 0 || !is_whitespace(gap[pos - 1]) {
                continue;
            }
            if let Some(obj) = parse_object_header(gap, pos) {
                result.object_count += 1;
                last = Some((obj, range.start + search));
            }
        }
        last
    }
}

/// Count `/Type /Page` markers, ignoring `/Type /Pages`.
pub fn count_page_markers(bytes: &[u8]) -> u32 {
    let mut count: u32 = 0;
    let mut search = 0;
    while let Some(after_key) = find_name(bytes, b"/Type", search) {
        search = after_key;
        let value = skip_whitespace(bytes, after_key);
        if let Some((name, _)) = read_name(bytes, value) {
            if name == b"Page" {
                count = count.saturating_add(1);
            }
        }
    }
    count
}

/// Find the next `stream` keyword that opens stream data.
fn find_stream_keyword(data: &[u8], from: usize) -> Option<usize> {
    let mut search = from;
    while let Some(pos) = find_from(data, STREAM_KEYWORD, search) {
        let end = pos + STREAM_KEYWORD.len();
        let preceded = pos == 0 || is_whitespace(data[pos - 1]) || data[pos - 1] == b'>';
        let followed = matches!(data.get(end), Some(b'\r' | b'\n' | b' ' | b'\t')) || end == data.len();
        if preceded && followed && starts_token(data, pos) {
            return Some(pos);
        }
        search = end;
    }
    None
}

/// Step over the end-of-line marker after `stream`. Stray spaces before the
/// EOL are tolerated.
fn skip_stream_eol(data: &[u8], mut pos: usize) -> usize {
    while matches!(data.get(pos), Some(b' ' | b'\t')) {
        pos += 1;
    }
    match (data.get(pos), data.get(pos + 1)) {
        (Some(b'\r'), Some(b'\n')) => pos + 2,
        (Some(b'\r' | b'\n'), _) => pos + 1,
        _ => pos,
    }
}

/// Work out where stream data ends. Returns the data range and the position
/// just past `endstream`.
fn locate_stream_end(data: &[u8], start: usize, dict: &[u8]) -> Option<(Range<usize>, usize)> {
    if let Some(length) = direct_length(dict) {
        if let Some(end) = start.checked_add(length).filter(|&end| end <= data.len()) {
            let marker = skip_whitespace(data, end);
            if data[marker..].starts_with(ENDSTREAM_KEYWORD) {
                return Some((start..end, marker + ENDSTREAM_KEYWORD.len()));
            }
        }
        log::debug!("/Length {} does not match stream at byte {}", length, start);
    }

    let marker = find_from(data, ENDSTREAM_KEYWORD, start)?;
    let mut end = marker;
    if end > start && data[end - 1] == b'\n' {
        end -= 1;
    }
    if end > start && data[end - 1] == b'\r' {
        end -= 1;
    }
    Some((start..end, marker + ENDSTREAM_KEYWORD.len()))
}

/// `/Length N` when given directly. Indirect lengths (`N G R`) are not
/// resolved.
fn direct_length(dict: &[u8]) -> Option<usize> {
    let after_key = find_name(dict, b"/Length", 0)?;
    let pos = skip_whitespace(dict, after_key);
    let (value, after_value) = parse_uint(dict, pos)?;

    let next = skip_whitespace(dict, after_value);
    if let Some((_, after_gen)) = parse_uint(dict, next) {
        let r = skip_whitespace(dict, after_gen);
        if dict.get(r) == Some(&b'R') && ends_token(dict, r + 1) {
            return None;
        }
    }
    usize::try_from(value).ok()
}

/// Parse `N G` preceding an `obj` keyword at `obj_pos`.
fn parse_object_header(gap: &[u8], obj_pos: usize) -> Option<ObjectRef> {
    let gen_end = trim_whitespace_back(gap, obj_pos);
    let gen_start = digits_back(gap, gen_end);
    if gen_start == gen_end {
        return None;
    }
    let num_end = trim_whitespace_back(gap, gen_start);
    if num_end == gen_start {
        return None;
    }
    let num_start = digits_back(gap, num_end);
    if num_start == num_end || !starts_token(gap, num_start) {
        return None;
    }

    let (number, _) = parse_uint(gap, num_start)?;
    let (generation, _) = parse_uint(gap, gen_start)?;
    Some(ObjectRef::new(
        u32::try_from(number).ok()?,
        u16::try_from(generation).ok()?,
    ))
}

fn trim_whitespace_back(bytes: &[u8], mut end: usize) -> usize {
    while end > 0 && is_whitespace(bytes[end - 1]) {
        end -= 1;
    }
    end
}

fn digits_back(bytes: &[u8], mut end: usize) -> usize {
    while end > 0 && bytes[end - 1].is_ascii_digit() {
        end -= 1;
    }
    end
}

/// Read `/Filter /Name` or `/Filter [/A /B]`.
fn parse_filters(dict: &[u8]) -> Vec<Filter> {
    let Some(after_key) = find_name(dict, b"/Filter", 0) else {
        return Vec::new();
    };
    let mut pos = skip_whitespace(dict, after_key);

    match dict.get(pos) {
        Some(b'/') => read_name(dict, pos)
            .map(|(name, _)| vec![Filter::from_name(name)])
            .unwrap_or_default(),
        Some(b'[') => {
            let mut filters = Vec::new();
            pos += 1;
            loop {
                pos = skip_whitespace(dict, pos);
                match read_name(dict, pos) {
                    Some((name, next)) => {
                        filters.push(Filter::from_name(name));
                        pos = next;
                    }
                    None => break,
                }
            }
            filters
        }
        _ => Vec::new(),
    }
}

/// `/DecodeParms` with `/Predictor` greater than 1.
fn has_predictor(dict: &[u8]) -> bool {
    find_name(dict, b"/Predictor", 0)
        .and_then(|after| parse_uint(dict, skip_whitespace(dict, after)))
        .is_some_and(|(value, _)| value > 1)
}

fn name_value<'d>(dict: &'d [u8], key: &[u8]) -> Option<&'d [u8]> {
    let after_key = find_name(dict, key, 0)?;
    read_name(dict, skip_whitespace(dict, after_key)).map(|(name, _)| name)
}

/// Decide what a stream holds from its dictionary.
fn classify(dict: &[u8]) -> StreamKind {
    match name_value(dict, b"/Type") {
        Some(b"ObjStm") => return StreamKind::ObjectStream,
        Some(b"XRef") => return StreamKind::XRef,
        Some(b"Metadata") => return StreamKind::Metadata,
        Some(b"EmbeddedFile") => return StreamKind::EmbeddedFile,
        _ => {}
    }
    match name_value(dict, b"/Subtype") {
        Some(b"Image") => return StreamKind::Image,
        Some(b"Type1C" | b"CIDFontType0C" | b"OpenType") => return StreamKind::Font,
        Some(b"XML") => return StreamKind::Metadata,
        _ => {}
    }
    let font_program = [b"/Length1".as_slice(), b"/Length2", b"/Length3"]
        .iter()
        .any(|key| find_name(dict, key, 0).is_some());
    if font_program {
        return StreamKind::Font;
    }
    StreamKind::Content
}
