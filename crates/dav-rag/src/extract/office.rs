//! Office Open XML extractors (.docx, .pptx)
//!
//! Both formats are zip containers sharing a `docProps/core.xml` part with
//! Dublin Core metadata (`dc:title`, `dc:creator`). Word text comes from the
//! `docx-rs` document tree; PowerPoint text is pulled from the slide XML
//! parts directly, in slide order, followed by speaker notes.

use std::io::{Cursor, Read};

use quick_xml::events::Event;
use quick_xml::Reader;
use zip::ZipArchive;

use super::DocumentExtractor;
use crate::types::document::{Document, FileType};

pub struct DocxExtractor;

impl DocumentExtractor for DocxExtractor {
    fn extract(&self, filename: &str, data: &[u8]) -> Document {
        let doc = match docx_rs::read_docx(data) {
            Ok(doc) => doc,
            Err(e) => {
                return Document::failed(
                    filename,
                    FileType::Docx,
                    format!("DOCX parse failed: {}", e),
                )
            }
        };

        let mut text = String::new();
        for child in doc.document.children {
            if let docx_rs::DocumentChild::Paragraph(p) = child {
                for child in p.children {
                    if let docx_rs::ParagraphChild::Run(run) = child {
                        for child in run.children {
                            if let docx_rs::RunChild::Text(t) = child {
                                text.push_str(&t.text);
                            }
                        }
                    }
                }
                text.push('\n');
            }
        }

        if text.trim().is_empty() {
            return Document::failed(filename, FileType::Docx, "DOCX contains no text");
        }

        let (title, author) = core_properties(data);
        Document::extracted(filename, FileType::Docx, title, author, text)
    }
}

pub struct PptxExtractor;

impl DocumentExtractor for PptxExtractor {
    fn extract(&self, filename: &str, data: &[u8]) -> Document {
        let mut archive = match ZipArchive::new(Cursor::new(data)) {
            Ok(archive) => archive,
            Err(e) => {
                return Document::failed(
                    filename,
                    FileType::Pptx,
                    format!("PPTX archive open failed: {}", e),
                )
            }
        };

        let mut text = String::new();
        for slide_name in ordered_parts(&archive, "ppt/slides/slide") {
            let slide_number = part_number(&slide_name, "ppt/slides/slide");
            if let Some(slide_text) = part_text(&mut archive, &slide_name) {
                text.push_str(&format!("Slide {}:\n{}\n\n", slide_number, slide_text));
            }
        }
        for notes_name in ordered_parts(&archive, "ppt/notesSlides/notesSlide") {
            let slide_number = part_number(&notes_name, "ppt/notesSlides/notesSlide");
            if let Some(notes_text) = part_text(&mut archive, &notes_name) {
                text.push_str(&format!("Notes {}:\n{}\n\n", slide_number, notes_text));
            }
        }

        if text.trim().is_empty() {
            return Document::failed(filename, FileType::Pptx, "PPTX contains no text");
        }

        let (title, author) = core_properties(data);
        Document::extracted(filename, FileType::Pptx, title, author, text)
    }
}

/// Part names under a prefix, sorted by their numeric suffix
fn ordered_parts(archive: &ZipArchive<Cursor<&[u8]>>, prefix: &str) -> Vec<String> {
    let mut names: Vec<String> = archive
        .file_names()
        .filter(|name| name.starts_with(prefix) && name.ends_with(".xml"))
        .map(|s| s.to_string())
        .collect();
    names.sort_by_key(|name| part_number(name, prefix));
    names
}

fn part_number(name: &str, prefix: &str) -> u32 {
    name.trim_start_matches(prefix)
        .trim_end_matches(".xml")
        .parse()
        .unwrap_or(0)
}

/// Read one XML part and collect its `<a:t>` runs
fn part_text(archive: &mut ZipArchive<Cursor<&[u8]>>, name: &str) -> Option<String> {
    let mut xml = String::new();
    archive.by_name(name).ok()?.read_to_string(&mut xml).ok()?;
    let text = drawing_text(&xml);
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Extract text runs from DrawingML: `<a:t>` holds the runs, `</a:p>` ends
/// a paragraph
fn drawing_text(xml: &str) -> String {
    // Runs keep their own whitespace; trimming happens per paragraph line.
    let mut reader = Reader::from_str(xml);

    let mut lines: Vec<String> = Vec::new();
    let mut current_line = String::new();
    let mut in_run = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                if e.local_name().as_ref() == b"t" {
                    in_run = true;
                }
            }
            Ok(Event::Text(e)) => {
                if in_run {
                    if let Ok(text) = e.unescape() {
                        current_line.push_str(&text);
                    }
                }
            }
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"t" => in_run = false,
                b"p" => {
                    let line = current_line.trim();
                    if !line.is_empty() {
                        lines.push(line.to_string());
                    }
                    current_line.clear();
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(_) => break,
            _ => {}
        }
    }

    let line = current_line.trim();
    if !line.is_empty() {
        lines.push(line.to_string());
    }
    lines.join("\n")
}

/// Read `dc:title` and `dc:creator` from `docProps/core.xml`, best-effort
fn core_properties(data: &[u8]) -> (Option<String>, Option<String>) {
    let mut archive = match ZipArchive::new(Cursor::new(data)) {
        Ok(archive) => archive,
        Err(_) => return (None, None),
    };
    let mut xml = String::new();
    let read = archive
        .by_name("docProps/core.xml")
        .ok()
        .and_then(|mut part| part.read_to_string(&mut xml).ok());
    if read.is_none() {
        return (None, None);
    }

    let mut reader = Reader::from_str(&xml);
    reader.config_mut().trim_text(true);

    let mut title: Option<String> = None;
    let mut author: Option<String> = None;
    let mut current: Option<&'static str> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"title" => current = Some("title"),
                b"creator" => current = Some("creator"),
                _ => {}
            },
            Ok(Event::Text(e)) => {
                if let Ok(text) = e.unescape() {
                    match current {
                        Some("title") => title = Some(text.into_owned()),
                        Some("creator") => author = Some(text.into_owned()),
                        _ => {}
                    }
                }
            }
            Ok(Event::End(_)) => current = None,
            Ok(Event::Eof) => break,
            Err(_) => break,
            _ => {}
        }
    }

    (title, author)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    const CORE_XML: &str = r#"<?xml version="1.0"?>
        <cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties"
                           xmlns:dc="http://purl.org/dc/elements/1.1/">
          <dc:title>Launch Plan</dc:title>
          <dc:creator>Dana Author</dc:creator>
        </cp:coreProperties>"#;

    fn pptx_with(parts: &[(&str, &str)]) -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        for (name, body) in parts {
            writer
                .start_file(*name, SimpleFileOptions::default())
                .unwrap();
            writer.write_all(body.as_bytes()).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    fn slide_xml(runs: &[&str]) -> String {
        let paragraphs: String = runs
            .iter()
            .map(|r| format!("<a:p><a:r><a:t>{}</a:t></a:r></a:p>", r))
            .collect();
        format!(
            r#"<p:sld xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main"
                      xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main">
                 <p:cSld><p:spTree><p:sp><p:txBody>{}</p:txBody></p:sp></p:spTree></p:cSld>
               </p:sld>"#,
            paragraphs
        )
    }

    #[test]
    fn pptx_extracts_slides_in_order_with_notes_and_metadata() {
        let data = pptx_with(&[
            ("ppt/slides/slide2.xml", &slide_xml(&["Second slide"])),
            ("ppt/slides/slide1.xml", &slide_xml(&["Title slide", "Subtitle"])),
            ("ppt/slides/slide10.xml", &slide_xml(&["Tenth slide"])),
            ("ppt/notesSlides/notesSlide1.xml", &slide_xml(&["Remember the demo"])),
            ("docProps/core.xml", CORE_XML),
        ]);

        let doc = PptxExtractor.extract("deck.pptx", &data);
        assert!(doc.extracted_ok);
        assert_eq!(doc.title, "Launch Plan");
        assert_eq!(doc.author, "Dana Author");

        let first = doc.text.find("Title slide").unwrap();
        let second = doc.text.find("Second slide").unwrap();
        let tenth = doc.text.find("Tenth slide").unwrap();
        assert!(first < second && second < tenth, "slides must be in numeric order");
        assert!(doc.text.contains("Notes 1:\nRemember the demo"));
    }

    #[test]
    fn pptx_without_text_is_an_extraction_failure() {
        let data = pptx_with(&[("ppt/presentation.xml", "<p:presentation/>")]);
        let doc = PptxExtractor.extract("empty.pptx", &data);
        assert!(!doc.extracted_ok);
        assert!(doc.text.contains("no text"));
    }

    #[test]
    fn non_zip_bytes_fail_cleanly() {
        let doc = PptxExtractor.extract("bad.pptx", b"not a zip");
        assert!(!doc.extracted_ok);

        let doc = DocxExtractor.extract("bad.docx", b"not a zip");
        assert!(!doc.extracted_ok);
    }

    #[test]
    fn core_properties_parse_title_and_creator() {
        let data = pptx_with(&[("docProps/core.xml", CORE_XML)]);
        let (title, author) = core_properties(&data);
        assert_eq!(title.as_deref(), Some("Launch Plan"));
        assert_eq!(author.as_deref(), Some("Dana Author"));
    }

    #[test]
    fn missing_core_properties_yield_none() {
        let data = pptx_with(&[("ppt/slides/slide1.xml", &slide_xml(&["hello"]))]);
        assert_eq!(core_properties(&data), (None, None));
    }

    #[test]
    fn drawing_text_joins_runs_and_splits_paragraphs() {
        let xml = r#"<root xmlns:a="x">
            <a:p><a:r><a:t>Hello </a:t></a:r><a:r><a:t>world</a:t></a:r></a:p>
            <a:p><a:r><a:t>Next line</a:t></a:r></a:p>
        </root>"#;
        assert_eq!(drawing_text(xml), "Hello world\nNext line");
    }
}
