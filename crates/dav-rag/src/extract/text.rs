//! Plain-text and Markdown extractors

use pulldown_cmark::{Event, HeadingLevel, Parser, Tag, TagEnd};

use super::DocumentExtractor;
use crate::types::document::{Document, FileType};

/// Plain-text files: bytes in, lossy UTF-8 out, no embedded metadata
pub struct TxtExtractor;

impl DocumentExtractor for TxtExtractor {
    fn extract(&self, filename: &str, data: &[u8]) -> Document {
        let text = String::from_utf8_lossy(data).into_owned();
        if text.trim().is_empty() {
            return Document::failed(filename, FileType::Txt, "File contains no text");
        }
        Document::extracted(filename, FileType::Txt, None, None, text)
    }
}

/// Markdown files, rendered down to plain text
///
/// The first top-level heading becomes the document title; markup is
/// stripped, block boundaries become newlines.
pub struct MarkdownExtractor;

impl DocumentExtractor for MarkdownExtractor {
    fn extract(&self, filename: &str, data: &[u8]) -> Document {
        let source = String::from_utf8_lossy(data);
        let (title, text) = markdown_to_text(&source);
        if text.trim().is_empty() {
            return Document::failed(filename, FileType::Markdown, "File contains no text");
        }
        Document::extracted(filename, FileType::Markdown, title, None, text)
    }
}

fn markdown_to_text(source: &str) -> (Option<String>, String) {
    let mut text = String::new();
    let mut title: Option<String> = None;
    let mut in_h1 = false;
    let mut h1_buf = String::new();

    for event in Parser::new(source) {
        match event {
            Event::Start(Tag::Heading { level, .. }) => {
                if level == HeadingLevel::H1 && title.is_none() {
                    in_h1 = true;
                    h1_buf.clear();
                }
            }
            Event::End(TagEnd::Heading(level)) => {
                if level == HeadingLevel::H1 && in_h1 {
                    in_h1 = false;
                    let heading = h1_buf.trim();
                    if !heading.is_empty() {
                        title = Some(heading.to_string());
                    }
                }
                push_newline(&mut text);
            }
            Event::Text(t) | Event::Code(t) => {
                if in_h1 {
                    h1_buf.push_str(&t);
                }
                text.push_str(&t);
            }
            Event::SoftBreak | Event::HardBreak => text.push('\n'),
            Event::End(TagEnd::Paragraph)
            | Event::End(TagEnd::Item)
            | Event::End(TagEnd::CodeBlock)
            | Event::End(TagEnd::BlockQuote(_)) => push_newline(&mut text),
            Event::Rule => push_newline(&mut text),
            _ => {}
        }
    }

    (title, text.trim().to_string())
}

fn push_newline(text: &mut String) {
    if !text.ends_with('\n') {
        text.push('\n');
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn txt_passes_bytes_through_with_unknown_metadata() {
        let doc = TxtExtractor.extract("notes.txt", "hello\nworld".as_bytes());
        assert!(doc.extracted_ok);
        assert_eq!(doc.text, "hello\nworld");
        assert_eq!(doc.title, "Unknown");
        assert_eq!(doc.author, "Unknown");
    }

    #[test]
    fn txt_tolerates_invalid_utf8() {
        let doc = TxtExtractor.extract("notes.txt", b"caf\xe9 plan");
        assert!(doc.extracted_ok);
        assert!(doc.text.contains("plan"));
    }

    #[test]
    fn empty_txt_is_an_extraction_failure() {
        let doc = TxtExtractor.extract("empty.txt", b"  \n ");
        assert!(!doc.extracted_ok);
    }

    #[test]
    fn markdown_strips_markup_and_takes_title_from_first_heading() {
        let src = "# Quarterly Review\n\nSome *bold* claims.\n\n- one\n- two\n";
        let doc = MarkdownExtractor.extract("review.md", src.as_bytes());
        assert!(doc.extracted_ok);
        assert_eq!(doc.title, "Quarterly Review");
        assert!(doc.text.contains("Some bold claims."));
        assert!(doc.text.contains("one\ntwo"));
        assert!(!doc.text.contains('*'));
    }

    #[test]
    fn markdown_without_heading_keeps_unknown_title() {
        let doc = MarkdownExtractor.extract("plain.md", b"just a paragraph");
        assert!(doc.extracted_ok);
        assert_eq!(doc.title, "Unknown");
    }
}
