//! Per-file-type text and metadata extraction
//!
//! Extractors are registered by lowercase file extension and are infallible
//! at the boundary: any internal parser fault is converted into a `Document`
//! with `extracted_ok = false` and a diagnostic, so one corrupt file can
//! never abort a batch. Metadata absent from the source defaults to
//! `"Unknown"`.

mod office;
mod pdf;
mod text;

pub use office::{DocxExtractor, PptxExtractor};
pub use pdf::PdfExtractor;
pub use text::{MarkdownExtractor, TxtExtractor};

use std::collections::HashMap;
use std::sync::Arc;

use crate::types::document::{Document, FileType};

/// Capability of producing a normalized document from raw bytes
pub trait DocumentExtractor: Send + Sync {
    /// Extract text and metadata; never panics or errors past this boundary
    fn extract(&self, filename: &str, data: &[u8]) -> Document;
}

/// Registry mapping file extensions to extractors
///
/// Extensible by the host application without touching the orchestrator:
/// register a new extension and the pipeline picks it up.
pub struct ExtractorRegistry {
    extractors: HashMap<String, Arc<dyn DocumentExtractor>>,
}

impl ExtractorRegistry {
    /// Empty registry; every file falls through to the unsupported result
    pub fn new() -> Self {
        Self {
            extractors: HashMap::new(),
        }
    }

    /// Registry with the built-in extractors: pdf, docx, pptx, txt, md
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register("pdf", Arc::new(PdfExtractor));
        registry.register("docx", Arc::new(DocxExtractor));
        registry.register("pptx", Arc::new(PptxExtractor));
        registry.register("txt", Arc::new(TxtExtractor));
        registry.register("text", Arc::new(TxtExtractor));
        registry.register("md", Arc::new(MarkdownExtractor));
        registry.register("markdown", Arc::new(MarkdownExtractor));
        registry
    }

    /// Register an extractor for an extension (case-insensitive)
    pub fn register(&mut self, extension: &str, extractor: Arc<dyn DocumentExtractor>) {
        self.extractors.insert(extension.to_lowercase(), extractor);
    }

    /// Whether a filename's extension has a registered extractor
    pub fn supports(&self, filename: &str) -> bool {
        self.extractors.contains_key(&extension_of(filename))
    }

    /// Extract a document, falling back to an `extracted_ok = false` result
    /// for unregistered extensions
    pub fn extract(&self, filename: &str, data: &[u8]) -> Document {
        let ext = extension_of(filename);
        match self.extractors.get(&ext) {
            Some(extractor) => extractor.extract(filename, data),
            None => Document::failed(
                filename,
                FileType::from_name(filename),
                format!("Unsupported file type '.{}'", ext),
            ),
        }
    }
}

impl Default for ExtractorRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

fn extension_of(filename: &str) -> String {
    std::path::Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_registry_covers_the_builtin_types() {
        let registry = ExtractorRegistry::with_defaults();
        for name in ["a.pdf", "b.docx", "c.pptx", "d.txt", "e.md", "F.MD"] {
            assert!(registry.supports(name), "{} should be supported", name);
        }
        assert!(!registry.supports("photo.jpg"));
    }

    #[test]
    fn unsupported_extension_yields_failed_document() {
        let registry = ExtractorRegistry::with_defaults();
        let doc = registry.extract("photo.jpg", b"\xff\xd8\xff");
        assert!(!doc.extracted_ok);
        assert_eq!(doc.filetype, FileType::Unsupported);
        assert!(doc.text.contains(".jpg"));
        assert_eq!(doc.title, "Unknown");
    }

    #[test]
    fn host_can_register_custom_extractors() {
        struct Fixed;
        impl DocumentExtractor for Fixed {
            fn extract(&self, filename: &str, _data: &[u8]) -> Document {
                Document::extracted(filename, FileType::Txt, None, None, "fixed".to_string())
            }
        }

        let mut registry = ExtractorRegistry::new();
        registry.register("log", Arc::new(Fixed));
        let doc = registry.extract("service.log", b"ignored");
        assert!(doc.extracted_ok);
        assert_eq!(doc.text, "fixed");
    }

    #[test]
    fn corrupt_bytes_never_escape_the_boundary() {
        let registry = ExtractorRegistry::with_defaults();
        for name in ["bad.pdf", "bad.docx", "bad.pptx"] {
            let doc = registry.extract(name, b"definitely not a valid container");
            assert!(!doc.extracted_ok, "{} should fail cleanly", name);
            assert!(!doc.text.is_empty());
        }
    }
}
