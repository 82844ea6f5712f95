use std::path::Path;

use lopdf::{Dictionary, Document, Object};

use crate::error::ProcessError;
use crate::processor::{DocumentExtractor, DocumentFormat, DocumentMetadata, ExtractedDocument};

/// Byte-order mark that introduces a UTF-16BE PDF text string.
const UTF16_BE_BOM: [u8; 2] = [0xFE, 0xFF];

pub struct PdfExtractor;

impl PdfExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Parses an in-memory PDF. Fails only when the bytes do not load as a
    /// PDF document at all.
    pub fn extract_bytes(&self, pdf_bytes: &[u8]) -> Result<ExtractedDocument, ProcessError> {
        let doc = Document::load_mem(pdf_bytes)
            .map_err(|e| ProcessError::MalformedDocument(e.to_string()))?;

        let text = extract_text_from_pdf(&doc);
        let metadata = extract_metadata_from_pdf(&doc);

        tracing::debug!(
            pages = doc.get_pages().len(),
            text_chars = text.chars().count(),
            "PDF extracted"
        );

        Ok(ExtractedDocument { text, metadata })
    }
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentExtractor for PdfExtractor {
    fn extract(&self, path: &Path) -> Result<ExtractedDocument, ProcessError> {
        let _span = tracing::info_span!("processor.pdf").entered();

        let pdf_bytes = std::fs::read(path).map_err(|e| ProcessError::ReadDocument {
            path: path.to_path_buf(),
            source: e,
        })?;

        self.extract_bytes(&pdf_bytes)
    }

    fn supports(&self, format: DocumentFormat) -> bool {
        matches!(format, DocumentFormat::Pdf)
    }
}

/// Marks the end of each page in extracted text.
pub const PAGE_BREAK: char = '\u{000C}';

/// Flattens page text in page order, ending every page with a form feed
/// (`PAGE_BREAK`), so splitting on it yields one entry per page plus a
/// trailing empty one. A page whose content stream cannot be decoded
/// contributes only its form feed.
fn extract_text_from_pdf(doc: &Document) -> String {
    let mut text = String::new();

    for (page_num, _) in doc.get_pages() {
        match doc.extract_text(&[page_num]) {
            Ok(page_text) => text.push_str(&page_text),
            Err(e) => {
                tracing::warn!(page = page_num, "Skipping page without decodable text: {}", e);
            }
        }
        text.push(PAGE_BREAK);
    }

    text
}

fn extract_metadata_from_pdf(doc: &Document) -> DocumentMetadata {
    let info = match doc.trailer.get(b"Info").and_then(|obj| doc.dereference(obj)) {
        Ok((_, Object::Dictionary(dict))) => dict,
        _ => return DocumentMetadata::default(),
    };

    DocumentMetadata {
        author: info_string(doc, info, b"Producer"),
        creator: info_string(doc, info, b"Creator"),
        creation_date: info_string(doc, info, b"CreationDate"),
        modification_date: info_string(doc, info, b"ModDate"),
    }
}

fn info_string(doc: &Document, info: &Dictionary, key: &[u8]) -> String {
    match info.get(key).and_then(|obj| doc.dereference(obj)) {
        Ok((_, Object::String(bytes, _))) => decode_text_string(bytes),
        Ok((_, Object::Name(name))) => decode_text_string(name),
        _ => String::new(),
    }
}

/// Decodes a PDF text string. UTF-16BE when it starts with a byte-order
/// mark, UTF-8 otherwise. Undecodable sequences become U+FFFD and a
/// trailing odd byte in UTF-16 data is dropped.
pub fn decode_text_string(bytes: &[u8]) -> String {
    if let Some(rest) = bytes.strip_prefix(&UTF16_BE_BOM) {
        let units: Vec<u16> = rest
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        return String::from_utf16_lossy(&units);
    }

    String::from_utf8_lossy(bytes).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processor::fixtures::{build_pdf, full_info};
    use lopdf::StringFormat;
    use tempfile::NamedTempFile;

    #[test]
    fn test_supports_pdf_format() {
        let extractor = PdfExtractor::new();
        assert!(extractor.supports(DocumentFormat::Pdf));
    }

    #[test]
    fn test_extract_text_and_metadata() {
        let pdf_bytes = build_pdf(&["Quarterly Report"], &full_info());

        let temp_file = NamedTempFile::with_suffix(".pdf").unwrap();
        std::fs::write(temp_file.path(), &pdf_bytes).unwrap();

        let extracted = PdfExtractor::new().extract(temp_file.path()).unwrap();

        assert!(extracted.text.contains("Quarterly Report"));
        assert_eq!(extracted.metadata.author, "Skia/PDF m120");
        assert_eq!(extracted.metadata.creator, "Writer");
        assert_eq!(extracted.metadata.creation_date, "D:20240115093000+01'00'");
        assert_eq!(extracted.metadata.modification_date, "D:20240220120000Z");
    }

    #[test]
    fn test_pages_keep_reading_order() {
        let pdf_bytes = build_pdf(&["Alpha page", "Bravo page", "Charlie page"], &[]);

        let extracted = PdfExtractor::new().extract_bytes(&pdf_bytes).unwrap();

        let alpha = extracted.text.find("Alpha").unwrap();
        let bravo = extracted.text.find("Bravo").unwrap();
        let charlie = extracted.text.find("Charlie").unwrap();
        assert!(alpha < bravo && bravo < charlie);
    }

    #[test]
    fn test_pages_end_with_form_feed() {
        let pdf_bytes = build_pdf(&["Alpha page", "Bravo page", "Charlie page"], &[]);

        let extracted = PdfExtractor::new().extract_bytes(&pdf_bytes).unwrap();

        assert!(extracted.text.ends_with(PAGE_BREAK));
        let pages: Vec<&str> = extracted.text.split(PAGE_BREAK).collect();
        assert_eq!(pages.len(), 4);
        assert!(pages[0].contains("Alpha"));
        assert!(pages[1].contains("Bravo"));
        assert!(pages[2].contains("Charlie"));
        assert!(pages[3].is_empty());
    }

    #[test]
    fn test_missing_info_dictionary_gives_empty_metadata() {
        let pdf_bytes = build_pdf(&["No info here"], &[]);

        let extracted = PdfExtractor::new().extract_bytes(&pdf_bytes).unwrap();

        assert_eq!(extracted.metadata, DocumentMetadata::default());
    }

    #[test]
    fn test_partial_info_dictionary() {
        let info = vec![("Creator", Object::string_literal("LaTeX"))];
        let pdf_bytes = build_pdf(&["Partial"], &info);

        let extracted = PdfExtractor::new().extract_bytes(&pdf_bytes).unwrap();

        assert_eq!(extracted.metadata.creator, "LaTeX");
        assert!(extracted.metadata.author.is_empty());
        assert!(extracted.metadata.creation_date.is_empty());
        assert!(extracted.metadata.modification_date.is_empty());
    }

    #[test]
    fn test_utf16_info_string() {
        // "Ωmega" with a BOM
        let bytes = vec![0xFE, 0xFF, 0x03, 0xA9, 0x00, 0x6D, 0x00, 0x65, 0x00, 0x67, 0x00, 0x61];
        let info = vec![("Producer", Object::String(bytes, StringFormat::Hexadecimal))];
        let pdf_bytes = build_pdf(&["Unicode"], &info);

        let extracted = PdfExtractor::new().extract_bytes(&pdf_bytes).unwrap();

        assert_eq!(extracted.metadata.author, "Ωmega");
    }

    #[test]
    fn test_invalid_utf8_is_tolerated() {
        let bytes = vec![b'A', 0xFF, 0xFE, b'B'];
        let info = vec![("Producer", Object::String(bytes, StringFormat::Literal))];
        let pdf_bytes = build_pdf(&["Bytes"], &info);

        let extracted = PdfExtractor::new().extract_bytes(&pdf_bytes).unwrap();

        assert!(extracted.metadata.author.starts_with('A'));
        assert!(extracted.metadata.author.ends_with('B'));
    }

    #[test]
    fn test_decode_text_string() {
        assert_eq!(decode_text_string(b"plain"), "plain");
        assert_eq!(decode_text_string(&[0xFE, 0xFF, 0x00, 0x41, 0x00]), "A");
        assert_eq!(decode_text_string(&[0xFE, 0xFF]), "");
        assert_eq!(decode_text_string(&[0x61, 0x80, 0x62]), "a\u{FFFD}b");
    }

    #[test]
    fn test_corrupted_pdf_error() {
        let result = PdfExtractor::new().extract_bytes(b"not a valid pdf content");

        match result {
            Err(ProcessError::MalformedDocument(_)) => {}
            other => panic!("Expected MalformedDocument error, got {:?}", other.map(|d| d.text)),
        }
    }

    #[test]
    fn test_pdf_file_not_found_error() {
        let result = PdfExtractor::new().extract(Path::new("/nonexistent/file.pdf"));

        match result {
            Err(ProcessError::ReadDocument { path, .. }) => {
                assert_eq!(path.to_str().unwrap(), "/nonexistent/file.pdf");
            }
            _ => panic!("Expected ReadDocument error"),
        }
    }

    #[test]
    fn test_empty_page_document() {
        let pdf_bytes = build_pdf(&[""], &[]);

        let extracted = PdfExtractor::new().extract_bytes(&pdf_bytes).unwrap();

        assert!(extracted.text.trim().is_empty());
    }
}
