//! Integration tests for end-to-end extraction.

mod common;

use std::io::Write;

use common::{show, zlib, PdfBuilder, SUMMARY};
use resume_text::render::{failure_to_json, to_json};
use resume_text::{
    extract, extract_file, extract_with_options, extract_with_stats, Error, ExtractOptions,
    Extractor, FailureKind, JsonFormat, SkipReason,
};

fn permissive() -> ExtractOptions {
    ExtractOptions::new().with_min_text_chars(1)
}

// ==================== Basic Extraction ====================

#[test]
fn test_hello_world() {
    let pdf = PdfBuilder::new()
        .page()
        .content("BT /F1 12 Tf 72 712 Td (Hello World) Tj ET")
        .build();

    let result = extract_with_options(&pdf, "hello.pdf", &permissive()).unwrap();
    assert!(result.text.contains("Hello World"));
    assert_eq!(result.num_pages, 1);
    assert_eq!(result.file_name, "hello.pdf");
}

#[test]
fn test_default_floor_accepts_real_summary() {
    let pdf = PdfBuilder::new().page().content(&show(SUMMARY)).build();

    let result = extract(&pdf, "cv.pdf").unwrap();
    assert_eq!(result.text, SUMMARY);
}

#[test]
fn test_escaped_parentheses() {
    let pdf = PdfBuilder::new()
        .content(r"BT (Item \(A\) and \(B\)) Tj ET")
        .build();

    let result = extract_with_options(&pdf, "x.pdf", &permissive()).unwrap();
    assert_eq!(result.text, "Item (A) and (B)");
}

#[test]
fn test_streams_keep_document_order() {
    let pdf = PdfBuilder::new()
        .content(&show("One"))
        .content(&show("Two"))
        .content(&show("Three"))
        .build();

    let result = extract_with_options(&pdf, "x.pdf", &permissive()).unwrap();
    assert_eq!(result.text, "One\nTwo\nThree");
}

#[test]
fn test_fragments_in_block_join_with_space() {
    let pdf = PdfBuilder::new()
        .content("BT (Jane) Tj (Doe) Tj 0 -14 Td (Engineer) Tj ET")
        .build();

    let result = extract_with_options(&pdf, "x.pdf", &permissive()).unwrap();
    assert_eq!(result.text, "Jane Doe Engineer");
}

#[test]
fn test_flate_compressed_stream() {
    let pdf = PdfBuilder::new()
        .page()
        .flate_content(&show(SUMMARY))
        .build();

    let result = extract(&pdf, "cv.pdf").unwrap();
    assert_eq!(result.text, SUMMARY);
}

#[test]
fn test_ascii_hex_then_flate_chain() {
    let compressed = zlib(show(SUMMARY).as_bytes());
    let mut hex: String = compressed.iter().map(|b| format!("{:02x}", b)).collect();
    hex.push('>');

    let pdf = PdfBuilder::new()
        .stream("/Filter [/ASCIIHexDecode /FlateDecode]", hex.as_bytes())
        .build();

    let result = extract(&pdf, "cv.pdf").unwrap();
    assert_eq!(result.text, SUMMARY);
}

#[test]
fn test_hex_strings_and_tj_kerning() {
    let pdf = PdfBuilder::new()
        .content("BT <4A616E65> Tj [(Dat) -15 (a) -250 (Engineer)] TJ ET")
        .build();

    let result = extract_with_options(&pdf, "x.pdf", &permissive()).unwrap();
    assert_eq!(result.text, "Jane Data Engineer");
}

#[test]
fn test_utf16_hex_string() {
    let pdf = PdfBuilder::new()
        .content("BT <FEFF004A006F00E9> Tj ET")
        .build();

    let result = extract_with_options(&pdf, "x.pdf", &permissive()).unwrap();
    assert_eq!(result.text, "Joé");
}

#[test]
fn test_crlf_document() {
    let content = show("Windows line endings");
    let raw = format!(
        "%PDF-1.3\r\n1 0 obj\r\n<< /Length {} >>\r\nstream\r\n{}\r\nendstream\r\nendobj\r\n%%EOF\r\n",
        content.len(),
        content
    );

    let result = extract_with_options(raw.as_bytes(), "x.pdf", &permissive()).unwrap();
    assert_eq!(result.text, "Windows line endings");
}

#[test]
fn test_missing_length_uses_endstream() {
    let content = show("No length here");
    let raw = format!(
        "%PDF-1.4\n1 0 obj\n<< /Length 9 0 R >>\nstream\n{}\nendstream\nendobj\n",
        content
    );

    let result = extract_with_options(raw.as_bytes(), "x.pdf", &permissive()).unwrap();
    assert_eq!(result.text, "No length here");
}

// ==================== Tolerance ====================

#[test]
fn test_unsupported_filter_is_skipped() {
    let pdf = PdfBuilder::new()
        .content(&show("Before the skipped stream"))
        .stream("/Filter /LZWDecode", b"\x80\x0b\x60\x50\x22")
        .content(&show("After the skipped stream"))
        .build();

    let (result, stats) = extract_with_stats(&pdf, "x.pdf", &permissive());
    let result = result.unwrap();
    assert_eq!(
        result.text,
        "Before the skipped stream\nAfter the skipped stream"
    );
    assert_eq!(stats.streams_unsupported, 1);
    assert_eq!(stats.streams_decoded, 2);
    assert_eq!(
        stats.skipped[0].reason,
        SkipReason::UnsupportedFilter("LZWDecode".to_string())
    );
}

#[test]
fn test_corrupt_flate_stream_is_skipped() {
    let pdf = PdfBuilder::new()
        .stream("/Filter /FlateDecode", b"\xff\xff this is not deflate data")
        .flate_content(&show(SUMMARY))
        .build();

    let (result, stats) = extract_with_stats(&pdf, "x.pdf", &ExtractOptions::default());
    let result = result.unwrap();
    assert_eq!(result.text, SUMMARY);
    assert_eq!(stats.streams_failed, 1);
    assert!(matches!(stats.skipped[0].reason, SkipReason::DecodeFailed(_)));
}

#[test]
fn test_decoded_size_cap() {
    let big = format!("BT ({}) Tj ET", "A".repeat(10_000));
    let pdf = PdfBuilder::new()
        .flate_content(&big)
        .content(&show(SUMMARY))
        .build();

    let options = ExtractOptions::new().with_max_stream_bytes(1024);
    let (result, stats) = extract_with_stats(&pdf, "x.pdf", &options);
    let result = result.unwrap();
    assert_eq!(result.text, SUMMARY);
    assert_eq!(stats.streams_failed, 1);
}

#[test]
fn test_interleaved_objects_any_order() {
    let pdf = PdfBuilder::new()
        .object("<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica >>")
        .content(&show("First"))
        .object("<< /Type /Catalog /Pages 2 0 R >>")
        .page()
        .content(&show("Second"))
        .build();

    let result = extract_with_options(&pdf, "x.pdf", &permissive()).unwrap();
    assert_eq!(result.text, "First\nSecond");
}

#[test]
fn test_lenient_mode_without_header() {
    let pdf = PdfBuilder::new()
        .without_header()
        .content(&show(SUMMARY))
        .build();

    assert!(matches!(
        extract(&pdf, "x.pdf"),
        Err(Error::MalformedDocument(_))
    ));

    let result = Extractor::new().lenient().extract(&pdf, "x.pdf").unwrap();
    assert_eq!(result.text, SUMMARY);
}

#[test]
fn test_header_after_leading_junk() {
    let mut pdf = b"\xef\xbb\xbfJUNK\n".to_vec();
    pdf.extend(PdfBuilder::new().content(&show(SUMMARY)).build());

    let result = extract(&pdf, "x.pdf").unwrap();
    assert_eq!(result.text, SUMMARY);
}

// ==================== Failures ====================

#[test]
fn test_empty_buffer() {
    let err = extract(b"", "empty.pdf").unwrap_err();
    assert!(matches!(err, Error::MalformedDocument(_)));
    assert_eq!(err.kind(), FailureKind::MalformedDocument);
}

#[test]
fn test_not_a_pdf() {
    let err = extract(b"Jane Doe\nSoftware Engineer", "cv.txt").unwrap_err();
    assert_eq!(err.kind(), FailureKind::MalformedDocument);
}

#[test]
fn test_image_only_document_is_insufficient() {
    let pdf = PdfBuilder::new()
        .page()
        .stream(
            "/Type /XObject /Subtype /Image /Width 2 /Height 2 /Filter /DCTDecode",
            b"\xff\xd8\xff\xe0\x00\x10JFIF\x00\xff\xd9",
        )
        .content("q 612 0 0 792 0 0 cm /Im1 Do Q")
        .build();

    let err = extract(&pdf, "scan.pdf").unwrap_err();
    assert!(matches!(err, Error::InsufficientText { found: 0, .. }));
    assert!(err.hint().contains("scanned"));
}

#[test]
fn test_all_streams_unsupported_is_insufficient() {
    let pdf = PdfBuilder::new()
        .stream("/Filter /LZWDecode", b"\x80\x0b\x60\x50\x22")
        .stream("/Filter /RunLengthDecode", b"\x02abc\x80")
        .build();

    let err = extract(&pdf, "x.pdf").unwrap_err();
    assert_eq!(err.kind(), FailureKind::InsufficientText);
}

#[test]
fn test_failed_run_still_reports_skipped_streams() {
    let pdf = PdfBuilder::new()
        .stream("/Filter /LZWDecode", b"\x80\x0b\x60\x50\x22")
        .content(&show("hi"))
        .build();

    let (result, stats) = extract_with_stats(&pdf, "x.pdf", &ExtractOptions::default());
    assert!(matches!(
        result,
        Err(Error::InsufficientText { found: 2, required: 50 })
    ));
    assert_eq!(stats.streams_unsupported, 1);
    assert_eq!(
        stats.skipped[0].reason,
        SkipReason::UnsupportedFilter("LZWDecode".to_string())
    );
}

#[test]
fn test_encrypted_document() {
    let pdf = PdfBuilder::new()
        .content(&show(SUMMARY))
        .trailer("<< /Root 1 0 R /Encrypt 5 0 R /ID [<01> <02>] >>")
        .build();

    let err = extract(&pdf, "locked.pdf").unwrap_err();
    assert!(matches!(err, Error::EncryptedDocument));
    assert!(err.hint().contains("password"));
}

#[test]
fn test_no_streams() {
    let pdf = PdfBuilder::new()
        .object("<< /Type /Catalog /Pages 2 0 R >>")
        .object("<< /Type /Pages /Kids [] /Count 0 >>")
        .build();

    assert!(matches!(extract(&pdf, "x.pdf"), Err(Error::NoContentFound)));
}

#[test]
fn test_raw_pdf_syntax_never_returned() {
    let pdf = PdfBuilder::new()
        .content("BT (1 0 obj << /Length 5 >> stream endstream endobj) Tj ET")
        .content(&show(SUMMARY))
        .build();

    let result = extract(&pdf, "x.pdf").unwrap();
    assert_eq!(result.text, SUMMARY);
    assert!(!resume_text::looks_like_raw_pdf(&result.text));
}

#[test]
fn test_failure_json() {
    let err = extract(b"", "x.pdf").unwrap_err();
    let json = failure_to_json(&err, JsonFormat::Compact).unwrap();
    assert!(json.starts_with("{\"kind\":\"malformedDocument\""));
}

// ==================== Pages ====================

#[test]
fn test_page_count_ignores_pages_node() {
    let pdf = PdfBuilder::new()
        .object("<< /Type /Catalog /Pages 2 0 R >>")
        .object("<< /Type /Pages /Kids [3 0 R 4 0 R 5 0 R] /Count 3 >>")
        .page()
        .page()
        .page()
        .content(&show(SUMMARY))
        .build();

    assert_eq!(extract(&pdf, "x.pdf").unwrap().num_pages, 3);
}

#[test]
fn test_page_count_defaults_to_one() {
    let pdf = PdfBuilder::new().content(&show(SUMMARY)).build();
    assert_eq!(extract(&pdf, "x.pdf").unwrap().num_pages, 1);
}

#[test]
fn test_pages_inside_object_stream() {
    let objects = b"3 0 4 40\n<< /Type /Page /Parent 2 0 R >>\n<< /Type /Page /Parent 2 0 R >>";
    let pdf = PdfBuilder::new()
        .object("<< /Type /Pages /Kids [3 0 R 4 0 R] /Count 2 >>")
        .stream("/Type /ObjStm /N 2 /First 10 /Filter /FlateDecode", &zlib(objects))
        .content(&show(SUMMARY))
        .build();

    let (result, stats) = extract_with_stats(&pdf, "x.pdf", &ExtractOptions::default());
    let result = result.unwrap();
    assert_eq!(result.num_pages, 2);
    assert_eq!(result.text, SUMMARY);
    assert_eq!(stats.streams_decoded, 2);
}

// ==================== Content Edge Cases ====================

#[test]
fn test_inline_image_is_not_text() {
    let mut content = b"q BI /W 4 /H 1 /BPC 8 /CS /G ID ".to_vec();
    content.extend_from_slice(b"\x00(BT (leak) Tj ET)\xff\xfe");
    content.extend_from_slice(b" EI Q BT (Visible text) Tj ET");

    let pdf = PdfBuilder::new().stream("", &content).build();

    let result = extract_with_options(&pdf, "x.pdf", &permissive()).unwrap();
    assert_eq!(result.text, "Visible text");
}

#[test]
fn test_marked_content_properties_ignored() {
    let pdf = PdfBuilder::new()
        .content("/Span << /ActualText (ignored) >> BDC BT (kept) Tj ET EMC")
        .build();

    let result = extract_with_options(&pdf, "x.pdf", &permissive()).unwrap();
    assert_eq!(result.text, "kept");
}

#[test]
fn test_octal_and_newline_escapes() {
    let pdf = PdfBuilder::new()
        .content(r"BT (Caf\351\nMenu) Tj ET")
        .build();

    let result = extract_with_options(&pdf, "x.pdf", &permissive()).unwrap();
    assert_eq!(result.text, "Café\nMenu");
}

#[test]
fn test_winansi_punctuation_kept() {
    let pdf = PdfBuilder::new()
        .content(r"BT (Don\222t stop \225 Led \226 shipped) Tj ET")
        .build();

    let result = extract_with_options(&pdf, "x.pdf", &permissive()).unwrap();
    assert_eq!(result.text, "Don\u{2019}t stop \u{2022} Led \u{2013} shipped");
}

#[test]
fn test_ligatures_and_bullets_cleaned() {
    let pdf = PdfBuilder::new()
        .content("BT <FEFF25CF0020FB010065006C0064> Tj ET")
        .build();

    let result = extract_with_options(&pdf, "x.pdf", &permissive()).unwrap();
    assert_eq!(result.text, "• field");
}

// ==================== Determinism & I/O ====================

#[test]
fn test_extraction_is_idempotent() {
    let pdf = PdfBuilder::new()
        .page()
        .flate_content(&show(SUMMARY))
        .content("BT [(Rust) -300 (Go)] TJ ET")
        .build();

    let first = extract(&pdf, "x.pdf").unwrap();
    let second = extract(&pdf, "x.pdf").unwrap();
    assert_eq!(first.text, second.text);
    assert_eq!(first, second);
}

#[test]
fn test_extract_file() {
    let pdf = PdfBuilder::new().content(&show(SUMMARY)).build();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("candidate.pdf");
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(&pdf).unwrap();

    let result = extract_file(&path).unwrap();
    assert_eq!(result.file_name, "candidate.pdf");
    assert_eq!(result.text, SUMMARY);
}

#[test]
fn test_extract_file_missing() {
    let dir = tempfile::tempdir().unwrap();
    let err = extract_file(dir.path().join("missing.pdf")).unwrap_err();
    assert_eq!(err.kind(), FailureKind::Io);
}

#[test]
fn test_result_json() {
    let pdf = PdfBuilder::new().page().page().content(&show(SUMMARY)).build();
    let result = extract(&pdf, "cv.pdf").unwrap();

    let json = to_json(&result, JsonFormat::Compact).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["numPages"], 2);
    assert_eq!(value["fileName"], "cv.pdf");
    assert_eq!(value["text"], SUMMARY);
}

#[cfg(feature = "async")]
#[tokio::test]
async fn test_extract_file_async() {
    let pdf = PdfBuilder::new().content(&show(SUMMARY)).build();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("async.pdf");
    tokio::fs::write(&path, &pdf).await.unwrap();

    let result = resume_text::extract_file_async(&path).await.unwrap();
    assert_eq!(result.text, SUMMARY);
}
