//! PDF text and metadata extraction
//!
//! Text comes from `pdf-extract`; title and author come from the trailer
//! Info dictionary via `lopdf`. Metadata parsing is best-effort: a PDF whose
//! Info dictionary is absent or unreadable still extracts with `"Unknown"`
//! fields, only a text-extraction fault marks the document failed.

use lopdf::{Dictionary, Object};

use super::DocumentExtractor;
use crate::types::document::{Document, FileType};

pub struct PdfExtractor;

impl DocumentExtractor for PdfExtractor {
    fn extract(&self, filename: &str, data: &[u8]) -> Document {
        let text = match pdf_extract::extract_text_from_mem(data) {
            Ok(text) => text,
            Err(e) => {
                return Document::failed(
                    filename,
                    FileType::Pdf,
                    format!("PDF text extraction failed: {}", e),
                )
            }
        };

        if text.trim().is_empty() {
            return Document::failed(filename, FileType::Pdf, "PDF contains no extractable text");
        }

        let (title, author) = info_metadata(data);
        Document::extracted(filename, FileType::Pdf, title, author, text)
    }
}

/// Read Title and Author from the trailer Info dictionary, when present
fn info_metadata(data: &[u8]) -> (Option<String>, Option<String>) {
    let doc = match lopdf::Document::load_mem(data) {
        Ok(doc) => doc,
        Err(_) => return (None, None),
    };

    let info = doc
        .trailer
        .get(b"Info")
        .ok()
        .and_then(|obj| resolve_dict(&doc, obj));

    match info {
        Some(info) => (
            info_string(&doc, info, b"Title"),
            info_string(&doc, info, b"Author"),
        ),
        None => (None, None),
    }
}

fn resolve_dict<'a>(doc: &'a lopdf::Document, obj: &'a Object) -> Option<&'a Dictionary> {
    match obj {
        Object::Reference(id) => doc.get_object(*id).ok().and_then(|o| o.as_dict().ok()),
        other => other.as_dict().ok(),
    }
}

fn info_string(doc: &lopdf::Document, info: &Dictionary, key: &[u8]) -> Option<String> {
    let obj = info.get(key).ok()?;
    let obj = match obj {
        Object::Reference(id) => doc.get_object(*id).ok()?,
        other => other,
    };
    match obj {
        Object::String(bytes, _) => Some(decode_pdf_string(bytes)),
        _ => None,
    }
}

/// Decode a PDF text string: UTF-16BE when BOM-prefixed, otherwise treated
/// as single-byte text (PDFDocEncoding is close enough to Latin-1 for
/// Title/Author fields)
fn decode_pdf_string(bytes: &[u8]) -> String {
    if bytes.starts_with(&[0xFE, 0xFF]) {
        let units: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        String::from_utf16_lossy(&units)
    } else {
        bytes.iter().map(|&b| b as char).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corrupt_pdf_reports_failed_extraction_with_diagnostic() {
        let doc = PdfExtractor.extract("broken.pdf", b"%PDF-1.7 truncated garbage");
        assert!(!doc.extracted_ok);
        assert_eq!(doc.filetype, FileType::Pdf);
        assert!(doc.text.contains("extraction failed") || doc.text.contains("no extractable"));
        assert_eq!(doc.title, "Unknown");
    }

    #[test]
    fn pdf_strings_decode_utf16_and_single_byte() {
        assert_eq!(
            decode_pdf_string(&[0xFE, 0xFF, 0x00, 0x48, 0x00, 0x69]),
            "Hi"
        );
        assert_eq!(decode_pdf_string(b"Caf\xe9"), "Café");
        assert_eq!(decode_pdf_string(b"Plain Title"), "Plain Title");
    }
}
