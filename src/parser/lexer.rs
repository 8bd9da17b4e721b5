//! Byte-level helpers shared by the scanner and the operator extractor.
//!
//! PDF character classes (ISO 32000-1, 7.2.2): whitespace is NUL, TAB, LF,
//! FF, CR and SPACE; delimiters are `( ) < > [ ] { } / %`; everything else
//! is a regular character.

#[inline]
pub fn is_whitespace(b: u8) -> bool {
    matches!(b, b'\0' | b'\t' | b'\n' | b'\x0C' | b'\r' | b' ')
}

#[inline]
pub fn is_delimiter(b: u8) -> bool {
    matches!(
        b,
        b'(' | b')' | b'<' | b'>' | b'[' | b']' | b'{' | b'}' | b'/' | b'%'
    )
}

#[inline]
pub fn is_regular(b: u8) -> bool {
    !is_whitespace(b) && !is_delimiter(b)
}

/// Find `pattern` in `bytes` at or after `from`.
pub fn find_from(bytes: &[u8], pattern: &[u8], from: usize) -> Option<usize> {
    if pattern.is_empty() || from >= bytes.len() {
        return None;
    }
    bytes[from..]
        .windows(pattern.len())
        .position(|window| window == pattern)
        .map(|pos| pos + from)
}

/// Advance past whitespace and `%` comments.
pub fn skip_whitespace(bytes: &[u8], mut pos: usize) -> usize {
    while pos < bytes.len() {
        if is_whitespace(bytes[pos]) {
            pos += 1;
        } else if bytes[pos] == b'%' {
            while pos < bytes.len() && bytes[pos] != b'\n' && bytes[pos] != b'\r' {
                pos += 1;
            }
        } else {
            break;
        }
    }
    pos
}

/// True when the token ending just before `end` is not glued to a following
/// regular character.
#[inline]
pub fn ends_token(bytes: &[u8], end: usize) -> bool {
    bytes.get(end).map_or(true, |&b| !is_regular(b))
}

/// True when a token starting at `start` is not glued to a preceding regular
/// character.
#[inline]
pub fn starts_token(bytes: &[u8], start: usize) -> bool {
    start == 0 || !is_regular(bytes[start - 1])
}

/// Find `name` (including its leading slash) as a complete PDF name at or
/// after `from`. Returns the position just past the name.
pub fn find_name(bytes: &[u8], name: &[u8], from: usize) -> Option<usize> {
    let mut search = from;
    while let Some(pos) = find_from(bytes, name, search) {
        let end = pos + name.len();
        if ends_token(bytes, end) {
            return Some(end);
        }
        search = pos + 1;
    }
    None
}

/// Parse an unsigned decimal integer at `pos`. Returns the value and the
/// position after the last digit.
pub fn parse_uint(bytes: &[u8], pos: usize) -> Option<(u64, usize)> {
    let digits = bytes[pos.min(bytes.len())..]
        .iter()
        .take_while(|b| b.is_ascii_digit())
        .count();
    if digits == 0 {
        return None;
    }
    let text = std::str::from_utf8(&bytes[pos..pos + digits]).ok()?;
    Some((text.parse().ok()?, pos + digits))
}

/// Read the PDF name at `pos` (which must be a `/`). Returns the name without
/// its slash and the position after it.
pub fn read_name(bytes: &[u8], pos: usize) -> Option<(&[u8], usize)> {
    if bytes.get(pos) != Some(&b'/') {
        return None;
    }
    let start = pos + 1;
    let len = bytes[start..].iter().take_while(|&&b| is_regular(b)).count();
    Some((&bytes[start..start + len], start + len))
}
