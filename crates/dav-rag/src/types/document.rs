//! Normalized extraction result types

use serde::{Deserialize, Serialize};

/// Metadata placeholder used when a source document carries no value
pub const UNKNOWN: &str = "Unknown";

/// Supported file types
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    /// PDF document
    Pdf,
    /// Microsoft Word document (.docx)
    Docx,
    /// Microsoft PowerPoint presentation (.pptx)
    Pptx,
    /// Plain text file
    Txt,
    /// Markdown file
    Markdown,
    /// Anything without a dedicated extractor
    Unsupported,
}

impl FileType {
    /// Detect file type from an extension
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "pdf" => Self::Pdf,
            "docx" => Self::Docx,
            "pptx" => Self::Pptx,
            "txt" | "text" => Self::Txt,
            "md" | "markdown" => Self::Markdown,
            _ => Self::Unsupported,
        }
    }

    /// Detect file type from a filename
    pub fn from_name(filename: &str) -> Self {
        let ext = std::path::Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("");
        Self::from_extension(ext)
    }

    /// Get display name
    pub fn display_name(&self) -> &str {
        match self {
            Self::Pdf => "PDF",
            Self::Docx => "Word Document (.docx)",
            Self::Pptx => "PowerPoint (.pptx)",
            Self::Txt => "Text File",
            Self::Markdown => "Markdown",
            Self::Unsupported => "Unsupported",
        }
    }
}

/// A normalized document produced by extraction
///
/// One `Document` per source file. When extraction fails the document still
/// exists with `extracted_ok = false` and a diagnostic in `text`, so a bad
/// file occupies a failure slot instead of aborting its batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Filename on the remote store
    pub source_filename: String,
    /// Detected file type
    pub filetype: FileType,
    /// Document title, `"Unknown"` when absent
    pub title: String,
    /// Document author, `"Unknown"` when absent
    pub author: String,
    /// Extracted plain text, or a diagnostic when `extracted_ok` is false
    pub text: String,
    /// Whether extraction succeeded
    pub extracted_ok: bool,
}

impl Document {
    /// Create a successfully extracted document
    ///
    /// Empty or missing metadata fields are normalized to `"Unknown"`.
    pub fn extracted(
        source_filename: impl Into<String>,
        filetype: FileType,
        title: Option<String>,
        author: Option<String>,
        text: String,
    ) -> Self {
        Self {
            source_filename: source_filename.into(),
            filetype,
            title: normalize_meta(title),
            author: normalize_meta(author),
            text,
            extracted_ok: true,
        }
    }

    /// Create a failed-extraction placeholder with a diagnostic message
    pub fn failed(
        source_filename: impl Into<String>,
        filetype: FileType,
        diagnostic: impl Into<String>,
    ) -> Self {
        Self {
            source_filename: source_filename.into(),
            filetype,
            title: UNKNOWN.to_string(),
            author: UNKNOWN.to_string(),
            text: diagnostic.into(),
            extracted_ok: false,
        }
    }
}

fn normalize_meta(value: Option<String>) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v,
        _ => UNKNOWN.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filetype_detection_is_case_insensitive() {
        assert_eq!(FileType::from_name("Report.PDF"), FileType::Pdf);
        assert_eq!(FileType::from_name("slides.pptx"), FileType::Pptx);
        assert_eq!(FileType::from_name("notes.MD"), FileType::Markdown);
        assert_eq!(FileType::from_name("archive.tar.gz"), FileType::Unsupported);
        assert_eq!(FileType::from_name("no_extension"), FileType::Unsupported);
    }

    #[test]
    fn missing_metadata_defaults_to_unknown() {
        let doc = Document::extracted("a.pdf", FileType::Pdf, None, Some("  ".to_string()), "body".to_string());
        assert_eq!(doc.title, UNKNOWN);
        assert_eq!(doc.author, UNKNOWN);
        assert!(doc.extracted_ok);
    }

    #[test]
    fn failed_document_keeps_diagnostic() {
        let doc = Document::failed("bad.pdf", FileType::Pdf, "malformed xref table");
        assert!(!doc.extracted_ok);
        assert_eq!(doc.text, "malformed xref table");
        assert_eq!(doc.title, UNKNOWN);
    }
}
