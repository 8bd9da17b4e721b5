//! Text cleanup applied to assembled text.
//!
//! Whitespace normalization always runs; it guarantees the output has no run
//! of two or more spaces and no run of three or more newlines. The remaining
//! steps are optional.

use lazy_static::lazy_static;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

lazy_static! {
    static ref HORIZONTAL_WS: Regex = Regex::new(r"[^\S\n]+").unwrap();
    static ref SPACES_AROUND_NEWLINE: Regex = Regex::new(r" ?\n ?").unwrap();
    static ref EXCESS_NEWLINES: Regex = Regex::new(r"\n{3,}").unwrap();
}

const LIGATURES: [(char, &str); 7] = [
    ('\u{FB00}', "ff"),
    ('\u{FB01}', "fi"),
    ('\u{FB02}', "fl"),
    ('\u{FB03}', "ffi"),
    ('\u{FB04}', "ffl"),
    ('\u{FB05}', "st"),
    ('\u{FB06}', "st"),
];

const BULLETS: [char; 10] = ['●', '○', '■', '□', '◆', '◇', '▪', '▫', '►', '▻'];

/// Options for text cleanup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanupOptions {
    /// Normalize Unicode to NFC form
    pub normalize_unicode: bool,

    /// Replace typographic ligatures (ﬁ, ﬂ, ...) with plain letters
    pub fix_ligatures: bool,

    /// Standardize bullet characters (●, ■, ► → •)
    pub standardize_bullets: bool,

    /// Remove the Unicode replacement character (U+FFFD)
    pub remove_replacement_char: bool,
}

impl CleanupOptions {
    /// Whitespace normalization only.
    pub fn minimal() -> Self {
        Self {
            normalize_unicode: false,
            fix_ligatures: false,
            standardize_bullets: false,
            remove_replacement_char: false,
        }
    }

    /// All cleanup steps.
    pub fn standard() -> Self {
        Self {
            normalize_unicode: true,
            fix_ligatures: true,
            standardize_bullets: true,
            remove_replacement_char: true,
        }
    }
}

impl Default for CleanupOptions {
    fn default() -> Self {
        Self::standard()
    }
}

/// Text cleanup pipeline.
#[derive(Debug, Clone, Default)]
pub struct CleanupPipeline {
    options: CleanupOptions,
}

impl CleanupPipeline {
    pub fn new(options: CleanupOptions) -> Self {
        Self { options }
    }

    /// Process text through the cleanup pipeline.
    pub fn process(&self, text: &str) -> String {
        let mut result = text.to_string();

        if self.options.normalize_unicode {
            result = result.nfc().collect();
        }

        if self.options.fix_ligatures {
            for (ligature, replacement) in LIGATURES {
                if result.contains(ligature) {
                    result = result.replace(ligature, replacement);
                }
            }
        }

        if self.options.standardize_bullets {
            result = result.replace(&BULLETS[..], "•");
        }

        if self.options.remove_replacement_char {
            result = result.replace('\u{FFFD}', "");
        }

        normalize_whitespace(&result)
    }
}

/// Collapse whitespace: CR/CRLF become LF, horizontal whitespace runs become
/// one space, spaces next to newlines are dropped, and three or more newlines
/// become exactly two. The result is trimmed.
pub fn normalize_whitespace(text: &str) -> String {
    let unified = text.replace("\r\n", "\n").replace('\r', "\n");
    let collapsed = HORIZONTAL_WS.replace_all(&unified, " ");
    let tightened = SPACES_AROUND_NEWLINE.replace_all(&collapsed, "\n");
    let limited = EXCESS_NEWLINES.replace_all(&tightened, "\n\n");
    limited.trim().to_string()
}
