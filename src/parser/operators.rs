//! Operator extractor.
//!
//! Tokenizes decoded content-stream bytes just far enough to find `BT`/`ET`
//! text blocks and the string operands inside them. Graphics and positioning
//! operators are skipped, not interpreted.

use crate::model::{Fragment, Piece, TextBlock};

use super::decoder::hex_value;
use super::lexer::{is_regular, is_whitespace, skip_whitespace};

/// `TJ` adjustments below this (in thousandths of text space) read as a word
/// space.
const TJ_SPACE_THRESHOLD: f32 = -200.0;

/// Extract all text blocks from one decoded content stream, in source order.
pub fn extract_blocks(data: &[u8]) -> Vec<TextBlock> {
    let mut extractor = OperatorExtractor::new(data);
    extractor.run();
    extractor.blocks
}

/// Scans literal (`(...)`) string bodies with escape and nesting awareness.
///
/// `start` must point at the opening parenthesis. Returns the raw body (escape
/// sequences untouched, balanced inner parentheses kept) and the position
/// after the closing parenthesis. An unterminated string runs to the end of
/// the data.
pub fn scan_literal(data: &[u8], start: usize) -> (&[u8], usize) {
    let body_start = start + 1;
    let mut depth = 1usize;
    let mut i = body_start;

    while i < data.len() {
        match data[i] {
            b'\\' => {
                i += 2;
                continue;
            }
            b'(' => depth += 1,
            b')' => {
                depth -= 1;
                if depth == 0 {
                    return (&data[body_start..i], i + 1);
                }
            }
            _ => {}
        }
        i += 1;
    }
    (&data[body_start.min(data.len())..], data.len())
}

/// Decodes a hex string starting at `<`. Whitespace and stray non-hex bytes
/// are ignored; an odd final digit is padded with zero.
pub fn scan_hex(data: &[u8], start: usize) -> (Vec<u8>, usize) {
    let mut bytes = Vec::new();
    let mut high: Option<u8> = None;
    let mut i = start + 1;

    while i < data.len() {
        let b = data[i];
        i += 1;
        if b == b'>' {
            break;
        }
        if let Some(nibble) = hex_value(b) {
            match high.take() {
                Some(h) => bytes.push((h << 4) | nibble),
                None => high = Some(nibble),
            }
        }
    }
    if let Some(h) = high {
        bytes.push(h << 4);
    }
    (bytes, i)
}

struct OperatorExtractor<'a> {
    data: &'a [u8],
    pos: usize,
    blocks: Vec<TextBlock>,
    /// Open `BT` block.
    block: Option<TextBlock>,
    /// Open `[` array inside a block (a `TJ` operand).
    array: Option<Fragment>,
    dict_depth: usize,
}

impl<'a> OperatorExtractor<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            pos: 0,
            blocks: Vec::new(),
            block: None,
            array: None,
            dict_depth: 0,
        }
    }

    fn run(&mut self) {
        let data = self.data;
        loop {
            self.pos = skip_whitespace(data, self.pos);
            let Some(&b) = data.get(self.pos) else {
                break;
            };

            match b {
                b'(' => {
                    let (body, next) = scan_literal(data, self.pos);
                    self.pos = next;
                    self.push_string(Piece::Literal(body.to_vec()));
                }
                b'<' if data.get(self.pos + 1) == Some(&b'<') => {
                    self.dict_depth += 1;
                    self.pos += 2;
                }
                b'<' => {
                    let (bytes, next) = scan_hex(data, self.pos);
                    self.pos = next;
                    self.push_string(Piece::Hex(bytes));
                }
                b'>' if data.get(self.pos + 1) == Some(&b'>') => {
                    self.dict_depth = self.dict_depth.saturating_sub(1);
                    self.pos += 2;
                }
                b'[' => {
                    if self.block.is_some() && self.dict_depth == 0 {
                        self.close_array();
                        self.array = Some(Fragment::new());
                    }
                    self.pos += 1;
                }
                b']' => {
                    self.close_array();
                    self.pos += 1;
                }
                b'/' => {
                    self.pos += 1;
                    self.pos += data[self.pos..].iter().take_while(|&&c| is_regular(c)).count();
                }
                _ if is_regular(b) => {
                    let start = self.pos;
                    self.pos += data[start..].iter().take_while(|&&c| is_regular(c)).count();
                    self.handle_token(start);
                }
                _ => self.pos += 1,
            }
        }

        if self.block.is_some() {
            log::debug!("dropping text block without ET at end of stream");
        }
    }

    fn handle_token(&mut self, start: usize) {
        let data = self.data;
        let token = &data[start..self.pos];
        match token {
            b"BT" => {
                if self.block.is_none() {
                    self.block = Some(TextBlock::new());
                }
            }
            b"ET" => {
                self.close_array();
                if let Some(block) = self.block.take() {
                    if block.is_empty() {
                        return;
                    }
                    log::trace!("text block with {} fragments", block.len());
                    self.blocks.push(block);
                }
            }
            b"BI" => self.skip_inline_image(),
            _ => {
                if let Some(array) = self.array.as_mut() {
                    let adjustment = std::str::from_utf8(token)
                        .ok()
                        .and_then(|s| s.parse::<f32>().ok());
                    if adjustment.is_some_and(|n| n < TJ_SPACE_THRESHOLD) {
                        array.push(Piece::Gap);
                    }
                }
            }
        }
    }

    fn push_string(&mut self, piece: Piece) {
        if self.dict_depth > 0 {
            return;
        }
        if let Some(array) = self.array.as_mut() {
            array.push(piece);
        } else if let Some(block) = self.block.as_mut() {
            block.push(Fragment { pieces: vec![piece] });
        }
    }

    fn close_array(&mut self) {
        if let Some(fragment) = self.array.take() {
            if let Some(block) = self.block.as_mut() {
                if !fragment.is_empty() {
                    block.push(fragment);
                }
            }
        }
    }

    /// Skip `BI <dict> ID <binary> EI`. `self.pos` is just past `BI`.
    fn skip_inline_image(&mut self) {
        let data = self.data;
        let mut i = self.pos;

        // Find the ID keyword that ends the inline dictionary.
        while i + 1 < data.len() {
            if &data[i..i + 2] == b"ID"
                && (i == 0 || !is_regular(data[i - 1]))
                && data.get(i + 2).map_or(true, |&c| !is_regular(c))
            {
                break;
            }
            i += 1;
        }
        // One whitespace byte separates ID from the image data.
        i += 3;

        while i + 1 < data.len() {
            if &data[i..i + 2] == b"EI"
                && is_whitespace(data[i - 1])
                && data.get(i + 2).map_or(true, |&c| !is_regular(c))
            {
                self.pos = i + 2;
                return;
            }
            i += 1;
        }
        self.pos = data.len();
    }
}
