//! Text assembler: turns raw fragments into the final text.

use crate::detect::looks_like_raw_pdf;
use crate::error::{Error, Result};
use crate::model::{Fragment, Piece, TextBlock};

use super::cleanup::{CleanupOptions, CleanupPipeline};

/// Assembles text blocks into one normalized string.
#[derive(Debug, Clone)]
pub struct TextAssembler {
    cleanup: CleanupPipeline,
    min_text_chars: usize,
}

impl TextAssembler {
    pub fn new(cleanup: CleanupOptions, min_text_chars: usize) -> Self {
        Self {
            cleanup: CleanupPipeline::new(cleanup),
            min_text_chars,
        }
    }

    /// Join blocks with newlines and clean up the result.
    ///
    /// Blocks whose text contains raw PDF syntax are dropped.
    pub fn assemble(&self, blocks: &[TextBlock]) -> String {
        let mut joined = String::new();
        for block in blocks {
            let text = block_text(block);
            if text.trim().is_empty() {
                continue;
            }
            if looks_like_raw_pdf(&text) {
                log::debug!("dropping text block containing raw PDF syntax");
                continue;
            }
            if !joined.is_empty() {
                joined.push('\n');
            }
            joined.push_str(&text);
        }
        self.cleanup.process(&joined)
    }

    /// Check the assembled text against the minimum viable length.
    pub fn validate(&self, text: &str) -> Result<()> {
        let found = text.trim().chars().count();
        if found < self.min_text_chars {
            return Err(Error::InsufficientText {
                found,
                required: self.min_text_chars,
            });
        }
        Ok(())
    }
}

/// Fragments of one block joined with single spaces.
pub fn block_text(block: &TextBlock) -> String {
    block
        .fragments
        .iter()
        .map(fragment_text)
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Text of one fragment. Pieces are concatenated; a `Gap` becomes a space.
pub fn fragment_text(fragment: &Fragment) -> String {
    let mut out = String::new();
    for piece in &fragment.pieces {
        match piece {
            Piece::Literal(raw) => out.push_str(&bytes_to_text(&resolve_escapes(raw))),
            Piece::Hex(bytes) => out.push_str(&bytes_to_text(bytes)),
            Piece::Gap => {
                if !out.is_empty() && !out.ends_with(' ') {
                    out.push(' ');
                }
            }
        }
    }
    out
}

/// Resolve backslash escapes in a literal string body.
///
/// `\n` becomes a newline, `\t` a tab, `\r`, `\b` and `\f` are dropped,
/// `\ddd` is an octal byte and a backslash before an end-of-line joins the
/// lines. Any other escaped byte (including `\\`, `\(` and `\)`) stands for
/// itself. A bare end-of-line inside the string reads as a newline.
pub fn resolve_escapes(raw: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(raw.len());
    let mut i = 0;

    while i < raw.len() {
        let b = raw[i];
        i += 1;

        if b == b'\r' {
            out.push(b'\n');
            if raw.get(i) == Some(&b'\n') {
                i += 1;
            }
            continue;
        }
        if b != b'\\' {
            out.push(b);
            continue;
        }

        let Some(&escaped) = raw.get(i) else {
            break;
        };
        i += 1;
        match escaped {
            b'n' => out.push(b'\n'),
            b't' => out.push(b'\t'),
            b'r' | b'b' | b'f' => {}
            b'0'..=b'7' => {
                let mut value = u32::from(escaped - b'0');
                let mut digits = 1;
                while digits < 3 {
                    match raw.get(i) {
                        Some(&d @ b'0'..=b'7') => {
                            value = value * 8 + u32::from(d - b'0');
                            i += 1;
                            digits += 1;
                        }
                        _ => break,
                    }
                }
                out.push((value & 0xFF) as u8);
            }
            b'\r' => {
                if raw.get(i) == Some(&b'\n') {
                    i += 1;
                }
            }
            b'\n' => {}
            other => out.push(other),
        }
    }
    out
}

/// Decode string bytes to text: UTF-16BE with BOM, then UTF-8, then
/// WinAnsi (Latin-1 with the 0x80-0x9F punctuation block).
///
/// Control characters other than newline and tab are removed. Returns an
/// empty string when most characters were control characters, which means
/// the bytes were not text in any encoding this crate understands.
pub fn bytes_to_text(bytes: &[u8]) -> String {
    let decoded = decode_text_simple(bytes);

    let total = decoded.chars().count();
    let mut noise = 0;
    let cleaned: String = decoded
        .chars()
        .filter(|&c| {
            let keep = c == '\n' || c == '\t' || !(c.is_control() || c == '\u{FFFD}');
            if !keep {
                noise += 1;
            }
            keep
        })
        .collect();

    if total > 0 && noise * 2 > total {
        log::trace!("dropping string of {} chars as binary", total);
        return String::new();
    }
    cleaned
}

/// Simple text decoding when no font encoding is available.
pub fn decode_text_simple(bytes: &[u8]) -> String {
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let utf16: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();
        return String::from_utf16_lossy(&utf16);
    }

    if let Ok(s) = std::str::from_utf8(bytes) {
        return s.to_string();
    }

    bytes.iter().map(|&b| winansi_to_char(b)).collect()
}

/// Map a WinAnsiEncoding byte to its character.
///
/// WinAnsi matches Latin-1 except in 0x80-0x9F, where Latin-1 has C1
/// controls and WinAnsi has quotes, dashes and bullets. The five undefined
/// codes stay as controls and are filtered out later.
pub fn winansi_to_char(b: u8) -> char {
    match b {
        0x80 => '\u{20AC}', // Euro sign
        0x82 => '\u{201A}', // Single low-9 quotation mark
        0x83 => '\u{0192}', // Latin small letter f with hook
        0x84 => '\u{201E}', // Double low-9 quotation mark
        0x85 => '\u{2026}', // Horizontal ellipsis
        0x86 => '\u{2020}', // Dagger
        0x87 => '\u{2021}', // Double dagger
        0x88 => '\u{02C6}', // Modifier letter circumflex accent
        0x89 => '\u{2030}', // Per mille sign
        0x8A => '\u{0160}', // Latin capital letter S with caron
        0x8B => '\u{2039}', // Single left-pointing angle quotation mark
        0x8C => '\u{0152}', // Latin capital ligature OE
        0x8E => '\u{017D}', // Latin capital letter Z with caron
        0x91 => '\u{2018}', // Left single quotation mark
        0x92 => '\u{2019}', // Right single quotation mark
        0x93 => '\u{201C}', // Left double quotation mark
        0x94 => '\u{201D}', // Right double quotation mark
        0x95 => '\u{2022}', // Bullet
        0x96 => '\u{2013}', // En dash
        0x97 => '\u{2014}', // Em dash
        0x98 => '\u{02DC}', // Small tilde
        0x99 => '\u{2122}', // Trade mark sign
        0x9A => '\u{0161}', // Latin small letter s with caron
        0x9B => '\u{203A}', // Single right-pointing angle quotation mark
        0x9C => '\u{0153}', // Latin small ligature oe
        0x9E => '\u{017E}', // Latin small letter z with caron
        0x9F => '\u{0178}', // Latin capital letter Y with diaeresis
        _ => b as char,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assembler() -> TextAssembler {
        TextAssembler::new(CleanupOptions::default(), 10)
    }

    fn block(fragments: &[&[u8]]) -> TextBlock {
        TextBlock {
            fragments: fragments
                .iter()
                .map(|f| Fragment::literal(f.to_vec()))
                .collect(),
        }
    }

    #[test]
    fn test_resolve_escapes() {
        assert_eq!(resolve_escapes(br"Item \(A\) and \(B\)"), b"Item (A) and (B)");
        assert_eq!(resolve_escapes(br"a\nb\rc"), b"a\nbc");
        assert_eq!(resolve_escapes(br"C:\\dir"), br"C:\dir");
        assert_eq!(resolve_escapes(br"\q"), b"q");
        assert_eq!(resolve_escapes(br"\101\60x"), b"A0x");
        assert_eq!(resolve_escapes(b"split\\\nline"), b"splitline");
        assert_eq!(resolve_escapes(b"trailing\\"), b"trailing");
    }

    #[test]
    fn test_decode_text_simple() {
        assert_eq!(decode_text_simple(b"Hello"), "Hello");
        assert_eq!(decode_text_simple(&[0x48, 0x65, 0x6C, 0x6C, 0xE9]), "Hellé");
        assert_eq!(
            decode_text_simple(&[0xFE, 0xFF, 0x00, 0x48, 0x00, 0x69]),
            "Hi"
        );
    }

    #[test]
    fn test_winansi_punctuation_survives() {
        assert_eq!(
            bytes_to_text(&resolve_escapes(br"Don\222t stop \225 Led \226 shipped")),
            "Don\u{2019}t stop \u{2022} Led \u{2013} shipped"
        );
        assert_eq!(winansi_to_char(0xE9), '\u{E9}');
        assert_eq!(winansi_to_char(0x81), '\u{81}');
    }

    #[test]
    fn test_bytes_to_text_drops_binary() {
        assert_eq!(bytes_to_text(&[0x01, 0x02, 0x03, b'a']), "");
        assert_eq!(bytes_to_text(b"ok\x07"), "ok");
    }

    #[test]
    fn test_fragment_gap() {
        let fragment = Fragment {
            pieces: vec![
                Piece::Literal(b"Data".to_vec()),
                Piece::Gap,
                Piece::Hex(b"Engineer".to_vec()),
            ],
        };
        assert_eq!(fragment_text(&fragment), "Data Engineer");
    }

    #[test]
    fn test_block_joins_fragments_with_space() {
        assert_eq!(block_text(&block(&[b"Senior", b"Rust", b"Engineer"])), "Senior Rust Engineer");
    }

    #[test]
    fn test_assemble_blocks_on_lines() {
        let text = assembler().assemble(&[block(&[b"One"]), block(&[b"Two"])]);
        assert_eq!(text, "One\nTwo");
    }

    #[test]
    fn test_assemble_drops_raw_pdf_blocks() {
        let text = assembler().assemble(&[block(&[b"1 0 obj endobj"]), block(&[b"Kept"])]);
        assert_eq!(text, "Kept");
    }

    #[test]
    fn test_validate_floor() {
        let asm = assembler();
        assert!(asm.validate("long enough text").is_ok());
        assert!(matches!(
            asm.validate("   short   "),
            Err(Error::InsufficientText {
                found: 5,
                required: 10
            })
        ));
    }
}
