//! Object-level types discovered by the scanner.

use std::fmt;
use std::ops::Range;

use serde::{Deserialize, Serialize};

/// Indirect object reference: (object number, generation number).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectRef {
    pub number: u32,
    pub generation: u16,
}

impl ObjectRef {
    pub fn new(number: u32, generation: u16) -> Self {
        Self { number, generation }
    }
}

impl fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} R", self.number, self.generation)
    }
}

/// A stream filter as declared in a stream dictionary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    FlateDecode,
    AsciiHexDecode,
    Ascii85Decode,
    LzwDecode,
    RunLengthDecode,
    DctDecode,
    CcittFaxDecode,
    Jbig2Decode,
    JpxDecode,
    Crypt,
    /// Anything not in the standard filter list.
    Other(String),
}

impl Filter {
    /// Parse a filter from its name (without the leading slash).
    ///
    /// Abbreviated inline-image names (`Fl`, `AHx`, ...) are accepted too.
    pub fn from_name(name: &[u8]) -> Self {
        match name {
            b"FlateDecode" | b"Fl" => Filter::FlateDecode,
            b"ASCIIHexDecode" | b"AHx" => Filter::AsciiHexDecode,
            b"ASCII85Decode" | b"A85" => Filter::Ascii85Decode,
            b"LZWDecode" | b"LZW" => Filter::LzwDecode,
            b"RunLengthDecode" | b"RL" => Filter::RunLengthDecode,
            b"DCTDecode" | b"DCT" => Filter::DctDecode,
            b"CCITTFaxDecode" | b"CCF" => Filter::CcittFaxDecode,
            b"JBIG2Decode" => Filter::Jbig2Decode,
            b"JPXDecode" => Filter::JpxDecode,
            b"Crypt" => Filter::Crypt,
            other => Filter::Other(String::from_utf8_lossy(other).into_owned()),
        }
    }

    /// The canonical PDF name of this filter.
    pub fn name(&self) -> &str {
        match self {
            Filter::FlateDecode => "FlateDecode",
            Filter::AsciiHexDecode => "ASCIIHexDecode",
            Filter::Ascii85Decode => "ASCII85Decode",
            Filter::LzwDecode => "LZWDecode",
            Filter::RunLengthDecode => "RunLengthDecode",
            Filter::DctDecode => "DCTDecode",
            Filter::CcittFaxDecode => "CCITTFaxDecode",
            Filter::Jbig2Decode => "JBIG2Decode",
            Filter::JpxDecode => "JPXDecode",
            Filter::Crypt => "Crypt",
            Filter::Other(name) => name,
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What a stream holds, judged from its dictionary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StreamKind {
    /// Page content or form XObject: may contain text operators.
    Content,
    /// Compressed object stream (`/Type /ObjStm`).
    ObjectStream,
    Image,
    Font,
    XRef,
    Metadata,
    EmbeddedFile,
}

impl StreamKind {
    /// Whether the stream is decoded at all.
    pub fn is_decodable(self) -> bool {
        matches!(self, StreamKind::Content | StreamKind::ObjectStream)
    }
}

/// One stream object located in the document buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamRecord {
    /// The enclosing indirect object, when an `N G obj` header was found.
    pub object: Option<ObjectRef>,
    /// Byte range of the stream dictionary.
    pub dict_range: Range<usize>,
    /// Byte range of the raw (still encoded) stream data.
    pub data_range: Range<usize>,
    /// Declared filters, in application order.
    pub filters: Vec<Filter>,
    /// `/DecodeParms` asks for a PNG or TIFF predictor.
    pub has_predictor: bool,
    pub kind: StreamKind,
}

impl StreamRecord {
    /// Raw stream bytes within the document buffer.
    pub fn data<'a>(&self, buffer: &'a [u8]) -> &'a [u8] {
        &buffer[self.data_range.clone()]
    }

    /// Dictionary bytes within the document buffer.
    pub fn dictionary<'a>(&self, buffer: &'a [u8]) -> &'a [u8] {
        &buffer[self.dict_range.clone()]
    }

    /// A short label for log messages.
    pub fn label(&self) -> String {
        match self.object {
            Some(obj) => format!("object {}", obj),
            None => format!("stream at byte {}", self.data_range.start),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_ref_display() {
        assert_eq!(ObjectRef::new(12, 0).to_string(), "12 0 R");
    }

    #[test]
    fn test_filter_from_name() {
        assert_eq!(Filter::from_name(b"FlateDecode"), Filter::FlateDecode);
        assert_eq!(Filter::from_name(b"AHx"), Filter::AsciiHexDecode);
        assert_eq!(
            Filter::from_name(b"Custom"),
            Filter::Other("Custom".to_string())
        );
        assert_eq!(Filter::RunLengthDecode.to_string(), "RunLengthDecode");
    }

    #[test]
    fn test_stream_kind_decodable() {
        assert!(StreamKind::Content.is_decodable());
        assert!(StreamKind::ObjectStream.is_decodable());
        assert!(!StreamKind::Image.is_decodable());
        assert!(!StreamKind::Font.is_decodable());
    }

    #[test]
    fn test_stream_record_slices() {
        let buffer = b"<< /Length 3 >>\nstream\nabc\nendstream";
        let record = StreamRecord {
            object: None,
            dict_range: 0..15,
            data_range: 23..26,
            filters: Vec::new(),
            has_predictor: false,
            kind: StreamKind::Content,
        };
        assert_eq!(record.data(buffer), b"abc");
        assert_eq!(record.dictionary(buffer), b"<< /Length 3 >>");
        assert_eq!(record.label(), "stream at byte 23");
    }
}
