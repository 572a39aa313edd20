//! Raw text from word-processing documents (OOXML)

use crate::error::Result;
use crate::extract::{DocxText, DocxTextReader};
use anyhow::{anyhow, Context};
use log::debug;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::io::{Cursor, Read};

const MAIN_PART: &str = "word/document.xml";
const MEDIA_PREFIX: &str = "word/media/";

/// Reads `word/document.xml` out of the zip container and flattens it to
/// text: one blank line between paragraphs, tabs and breaks kept.
#[derive(Debug, Default, Clone, Copy)]
pub struct ZipDocxReader;

impl ZipDocxReader {
    pub fn new() -> Self {
        Self
    }
}

impl DocxTextReader for ZipDocxReader {
    fn extract_raw_text(&self, bytes: &[u8]) -> Result<DocxText> {
        Ok(read_docx(bytes)?)
    }
}

fn read_docx(bytes: &[u8]) -> anyhow::Result<DocxText> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| anyhow!("Not a valid DOCX container: {}", e))?;

    let messages: Vec<String> = archive
        .file_names()
        .filter(|name| name.starts_with(MEDIA_PREFIX) && !name.ends_with('/'))
        .map(|name| format!("Embedded image found: {}", name))
        .collect();

    let mut xml = String::new();
    archive
        .by_name(MAIN_PART)
        .map_err(|e| anyhow!("Main document part missing: {}", e))?
        .read_to_string(&mut xml)
        .context("Failed to read main document part")?;

    let value = flatten_document_xml(&xml)?;
    debug!("DOCX text: {} chars, {} media part(s)", value.chars().count(), messages.len());

    Ok(DocxText { value, messages })
}

fn flatten_document_xml(xml: &str) -> anyhow::Result<String> {
    let mut reader = Reader::from_str(xml);
    let mut text = String::new();
    let mut in_text = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                if e.name().as_ref() == b"w:t" {
                    in_text = true;
                }
            }
            Ok(Event::Empty(e)) => match e.name().as_ref() {
                b"w:tab" => text.push('\t'),
                b"w:br" | b"w:cr" => text.push('\n'),
                _ => {}
            },
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"w:t" => in_text = false,
                b"w:p" => text.push_str("\n\n"),
                _ => {}
            },
            Ok(Event::Text(e)) if in_text => {
                let unescaped = e.unescape().context("Bad character reference in document text")?;
                text.push_str(&unescaped);
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(anyhow!("XML parsing error at {}: {}", reader.buffer_position(), e)),
            _ => {}
        }
    }

    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    fn docx(body: &str, with_image: bool) -> Vec<u8> {
        let mut buf = Cursor::new(Vec::new());
        {
            let mut writer = zip::ZipWriter::new(&mut buf);
            let options = SimpleFileOptions::default();
            writer.start_file("word/document.xml", options).unwrap();
            write!(
                writer,
                r#"<?xml version="1.0"?><w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{}</w:body></w:document>"#,
                body
            )
            .unwrap();
            if with_image {
                writer.start_file("word/media/image1.png", options).unwrap();
                writer.write_all(&[0x89, b'P', b'N', b'G']).unwrap();
            }
            writer.finish().unwrap();
        }
        buf.into_inner()
    }

    #[test]
    fn test_paragraphs_tabs_and_breaks() {
        let body = concat!(
            "<w:p><w:r><w:t>Hello</w:t><w:tab/><w:t>world</w:t></w:r></w:p>",
            "<w:p><w:r><w:t>Line</w:t><w:br/><w:t>two &amp; more</w:t></w:r></w:p>",
        );
        let result = ZipDocxReader::new().extract_raw_text(&docx(body, false)).unwrap();
        assert_eq!(result.value, "Hello\tworld\n\nLine\ntwo & more\n\n");
        assert!(result.messages.is_empty());
    }

    #[test]
    fn test_media_parts_are_reported() {
        let body = "<w:p><w:r><w:t>Figure</w:t></w:r></w:p>";
        let result = ZipDocxReader::new().extract_raw_text(&docx(body, true)).unwrap();
        assert_eq!(result.messages, vec!["Embedded image found: word/media/image1.png"]);
    }

    #[test]
    fn test_not_a_zip() {
        assert!(ZipDocxReader::new().extract_raw_text(b"not a zip").is_err());
    }
}
