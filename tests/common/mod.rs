//! Synthetic PDF builder shared by the integration tests.

#![allow(dead_code)]

use std::io::Write;

use flate2::write::ZlibEncoder;
use flate2::Compression;

/// Builds small PDFs object by object. Stream lengths are always correct
/// unless a test writes the dictionary itself.
pub struct PdfBuilder {
    header: bool,
    body: Vec<u8>,
    next_obj: u32,
    trailer: String,
}

impl PdfBuilder {
    pub fn new() -> Self {
        Self {
            header: true,
            body: Vec::new(),
            next_obj: 1,
            trailer: "<< /Root 1 0 R >>".to_string(),
        }
    }

    pub fn without_header(mut self) -> Self {
        self.header = false;
        self
    }

    /// A plain (non-stream) object.
    pub fn object(mut self, dict: &str) -> Self {
        let num = self.take_number();
        self.body
            .extend_from_slice(format!("{} 0 obj\n{}\nendobj\n", num, dict).as_bytes());
        self
    }

    pub fn page(self) -> Self {
        self.object("<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] >>")
    }

    /// A stream object. `extra` is added to the dictionary after `/Length`.
    pub fn stream(mut self, extra: &str, data: &[u8]) -> Self {
        let num = self.take_number();
        self.body.extend_from_slice(
            format!(
                "{} 0 obj\n<< /Length {} {} >>\nstream\n",
                num,
                data.len(),
                extra
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(data);
        self.body.extend_from_slice(b"\nendstream\nendobj\n");
        self
    }

    /// An uncompressed content stream.
    pub fn content(self, ops: &str) -> Self {
        self.stream("", ops.as_bytes())
    }

    /// A FlateDecode content stream.
    pub fn flate_content(self, ops: &str) -> Self {
        let compressed = zlib(ops.as_bytes());
        self.stream("/Filter /FlateDecode", &compressed)
    }

    pub fn trailer(mut self, trailer: &str) -> Self {
        self.trailer = trailer.to_string();
        self
    }

    pub fn build(self) -> Vec<u8> {
        let mut out = Vec::new();
        if self.header {
            out.extend_from_slice(b"%PDF-1.4\n%\xe2\xe3\xcf\xd3\n");
        }
        out.extend_from_slice(&self.body);
        out.extend_from_slice(format!("trailer\n{}\n%%EOF\n", self.trailer).as_bytes());
        out
    }

    fn take_number(&mut self) -> u32 {
        let num = self.next_obj;
        self.next_obj += 1;
        num
    }
}

pub fn zlib(data: &[u8]) -> Vec<u8> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

/// A content stream showing one line of text.
pub fn show(text: &str) -> String {
    format!("BT /F1 11 Tf 72 720 Td ({}) Tj ET", text)
}

pub const SUMMARY: &str =
    "Senior backend engineer with nine years of Rust, Go and PostgreSQL experience";
