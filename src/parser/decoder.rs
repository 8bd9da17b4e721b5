//! Stream decoder.
//!
//! Applies a stream's declared filter chain. FlateDecode, ASCIIHexDecode and
//! ASCII85Decode are supported; anything else is reported as
//! `UnsupportedStreamFilter` so the caller can skip the stream.

use std::borrow::Cow;
use std::io::Read;

use flate2::read::{DeflateDecoder, ZlibDecoder};

use crate::error::{Error, Result};
use crate::model::{Filter, StreamRecord};

/// A single filter implementation.
pub trait StreamDecoder {
    /// Decode `input`, producing at most `max_output` bytes.
    fn decode(&self, input: &[u8], max_output: usize) -> Result<Vec<u8>>;
}

/// FlateDecode (zlib/deflate).
pub struct FlateDecoder;

impl StreamDecoder for FlateDecoder {
    fn decode(&self, input: &[u8], max_output: usize) -> Result<Vec<u8>> {
        if input.is_empty() {
            return Ok(Vec::new());
        }

        let output = match inflate(ZlibDecoder::new(input), max_output) {
            Ok(output) => output,
            Err(zlib_err) => {
                // Some writers emit raw deflate data without the zlib wrapper.
                log::debug!("zlib decode failed ({}), trying raw deflate", zlib_err);
                inflate(DeflateDecoder::new(input), max_output).map_err(|deflate_err| {
                    Error::StreamDecode(format!(
                        "FlateDecode: {} (raw deflate: {})",
                        zlib_err, deflate_err
                    ))
                })?
            }
        };
        check_size(output, max_output)
    }
}

/// Inflate at most one byte more than the cap, so oversized output is
/// detected without decompressing all of it.
fn inflate<R: Read>(reader: R, max_output: usize) -> std::io::Result<Vec<u8>> {
    let mut output = Vec::new();
    reader
        .take((max_output as u64).saturating_add(1))
        .read_to_end(&mut output)?;
    Ok(output)
}

/// ASCIIHexDecode.
pub struct AsciiHexDecoder;

impl StreamDecoder for AsciiHexDecoder {
    fn decode(&self, input: &[u8], max_output: usize) -> Result<Vec<u8>> {
        let mut output = Vec::with_capacity(input.len() / 2);
        let mut high: Option<u8> = None;

        for &b in input {
            if b == b'>' {
                break;
            }
            if b.is_ascii_whitespace() || b == b'\0' {
                continue;
            }
            let nibble = hex_value(b).ok_or_else(|| {
                Error::StreamDecode(format!("ASCIIHexDecode: invalid byte 0x{:02x}", b))
            })?;
            match high.take() {
                Some(h) => output.push((h << 4) | nibble),
                None => high = Some(nibble),
            }
        }
        if let Some(h) = high {
            output.push(h << 4);
        }

        check_size(output, max_output)
    }
}

/// ASCII85Decode.
pub struct Ascii85Decoder;

impl StreamDecoder for Ascii85Decoder {
    fn decode(&self, input: &[u8], max_output: usize) -> Result<Vec<u8>> {
        let mut output = Vec::with_capacity(input.len() * 4 / 5);
        let mut group = [0u8; 5];
        let mut count = 0;

        let mut i = 0;
        while i < input.len() {
            let b = input[i];
            i += 1;
            match b {
                b'~' => break,
                b'z' if count == 0 => output.extend_from_slice(&[0, 0, 0, 0]),
                b'!'..=b'u' => {
                    group[count] = b - b'!';
                    count += 1;
                    if count == 5 {
                        output.extend_from_slice(&ascii85_word(&group).to_be_bytes());
                        count = 0;
                    }
                }
                b if b.is_ascii_whitespace() || b == b'\0' => {}
                other => {
                    return Err(Error::StreamDecode(format!(
                        "ASCII85Decode: invalid byte 0x{:02x}",
                        other
                    )))
                }
            }
        }

        if count == 1 {
            return Err(Error::StreamDecode(
                "ASCII85Decode: dangling final character".to_string(),
            ));
        }
        if count > 1 {
            for slot in group.iter_mut().skip(count) {
                *slot = b'u' - b'!';
            }
            let bytes = ascii85_word(&group).to_be_bytes();
            output.extend_from_slice(&bytes[..count - 1]);
        }

        check_size(output, max_output)
    }
}

fn ascii85_word(group: &[u8; 5]) -> u32 {
    group
        .iter()
        .fold(0u32, |acc, &digit| acc.wrapping_mul(85).wrapping_add(digit as u32))
}

fn check_size(output: Vec<u8>, max_output: usize) -> Result<Vec<u8>> {
    if output.len() > max_output {
        return Err(Error::StreamDecode(format!(
            "decoded stream exceeds {} bytes",
            max_output
        )));
    }
    Ok(output)
}

pub(crate) fn hex_value(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

/// The decoder for a filter, if this crate supports it.
pub fn decoder_for(filter: &Filter) -> Option<&'static dyn StreamDecoder> {
    match filter {
        Filter::FlateDecode => Some(&FlateDecoder),
        Filter::AsciiHexDecode => Some(&AsciiHexDecoder),
        Filter::Ascii85Decode => Some(&Ascii85Decoder),
        _ => None,
    }
}

/// Decode one stream's data through its whole filter chain.
///
/// Returns `UnsupportedStreamFilter` before touching the data when any filter
/// in the chain (or a predictor) is unsupported, and `StreamDecode` when a
/// supported filter fails.
pub fn decode_stream(record: &StreamRecord, buffer: &[u8], max_output: usize) -> Result<Vec<u8>> {
    if let Some(filter) = record.filters.iter().find(|f| decoder_for(f).is_none()) {
        return Err(Error::UnsupportedStreamFilter(filter.to_string()));
    }
    if record.has_predictor {
        return Err(Error::UnsupportedStreamFilter(
            "DecodeParms /Predictor".to_string(),
        ));
    }

    let mut data = Cow::Borrowed(record.data(buffer));
    for filter in &record.filters {
        if let Some(decoder) = decoder_for(filter) {
            data = Cow::Owned(decoder.decode(&data, max_output)?);
        }
    }
    Ok(data.into_owned())
}
