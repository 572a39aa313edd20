//! PDF access through lopdf, with pdf-extract as a text fallback

use crate::error::{Result, MetascopeError};
use crate::extract::{PdfDocument, PdfInfo, PdfLoader};
use indexmap::IndexMap;
use log::{debug, warn};
use lopdf::{Document, Object};
use serde::{Deserialize, Serialize};
use std::panic::{self, AssertUnwindSafe};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PdfOptions {
    /// Read text from page 1 for the content preview.
    pub extract_first_page_text: bool,
    /// Retry text extraction with pdf-extract when lopdf yields nothing.
    pub full_text_fallback: bool,
}

impl Default for PdfOptions {
    fn default() -> Self {
        Self {
            extract_first_page_text: true,
            full_text_fallback: true,
        }
    }
}

pub struct LopdfLoader {
    options: PdfOptions,
}

impl LopdfLoader {
    pub fn new(options: PdfOptions) -> Self {
        Self { options }
    }
}

impl PdfLoader for LopdfLoader {
    fn load(&self, bytes: &[u8]) -> Result<Box<dyn PdfDocument>> {
        let document = guarded("loading document", || Document::load_mem(bytes))?
            .map_err(|e| MetascopeError::ExtractionFailed(format!("Invalid PDF structure: {}", e)))?;

        debug!("Loaded PDF {} with {} pages", document.version, document.get_pages().len());

        let fallback_bytes = self.options.full_text_fallback.then(|| bytes.to_vec());
        Ok(Box::new(LopdfDocument {
            document,
            options: self.options.clone(),
            fallback_bytes,
        }))
    }
}

pub struct LopdfDocument {
    document: Document,
    options: PdfOptions,
    fallback_bytes: Option<Vec<u8>>,
}

impl PdfDocument for LopdfDocument {
    fn page_count(&self) -> u32 {
        self.document.get_pages().len() as u32
    }

    fn version(&self) -> Option<String> {
        let version = self.document.version.trim();
        (!version.is_empty()).then(|| version.to_string())
    }

    fn fingerprint(&self) -> Option<String> {
        let ids = self.document.trailer.get(b"ID").ok()?.as_array().ok()?;
        let first = ids.first()?.as_str().ok()?;
        Some(first.iter().map(|b| format!("{:02x}", b)).collect())
    }

    fn is_encrypted(&self) -> bool {
        self.document.trailer.get(b"Encrypt").is_ok()
    }

    fn info(&self) -> Result<PdfInfo> {
        let info = match self.document.trailer.get(b"Info") {
            Ok(object) => object,
            Err(_) => return Ok(PdfInfo::default()),
        };

        let dict = match info {
            Object::Reference(id) => self
                .document
                .get_dictionary(*id)
                .map_err(|e| MetascopeError::PartialExtraction(format!("Info dictionary unreadable: {}", e)))?,
            Object::Dictionary(dict) => dict,
            other => {
                return Err(MetascopeError::PartialExtraction(format!(
                    "Info entry is {} rather than a dictionary",
                    object_kind(other)
                )))
            }
        };

        let mut entries = IndexMap::new();
        for (key, value) in dict.iter() {
            let value = match value {
                Object::Reference(id) => match self.document.get_object(*id) {
                    Ok(resolved) => resolved,
                    Err(_) => continue,
                },
                direct => direct,
            };
            if let Object::String(bytes, _) = value {
                entries.insert(String::from_utf8_lossy(key).into_owned(), decode_pdf_string(bytes));
            }
        }

        Ok(PdfInfo { entries })
    }

    fn page_text(&self, page: u32) -> Result<String> {
        if !self.options.extract_first_page_text {
            return Err(MetascopeError::ExtractionFailed(
                "Page text extraction disabled".to_string(),
            ));
        }

        let primary = guarded("extracting page text", || self.document.extract_text(&[page]))?;
        match primary {
            Ok(text) if !text.trim().is_empty() => return Ok(text),
            Ok(_) => debug!("lopdf returned no text for page {}", page),
            Err(e) => warn!("lopdf text extraction failed on page {}: {}", page, e),
        }

        let no_text = || MetascopeError::ExtractionFailed(format!("No text found on page {}", page));

        let Some(bytes) = &self.fallback_bytes else {
            return Err(no_text());
        };
        let pages = guarded("extracting text", || pdf_extract::extract_text_from_mem_by_pages(bytes))?
            .map_err(|e| MetascopeError::ExtractionFailed(format!("Text extraction failed: {}", e)))?;

        match pages.into_iter().nth(page.saturating_sub(1) as usize) {
            Some(text) if !text.trim().is_empty() => Ok(text),
            _ => Err(no_text()),
        }
    }
}

/// Run a backend call, turning a panic inside the parser into an error.
fn guarded<T>(action: &str, f: impl FnOnce() -> T) -> Result<T> {
    panic::catch_unwind(AssertUnwindSafe(f)).map_err(|payload| {
        let reason = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic".to_string());
        MetascopeError::ExtractionFailed(format!(
            "PDF backend worker crashed while {}: {}",
            action, reason
        ))
    })
}

/// PDF text strings are UTF-16BE when they carry a byte order mark,
/// otherwise PDFDocEncoding, which is close enough to Latin-1 for display.
fn decode_pdf_string(bytes: &[u8]) -> String {
    if let Some(rest) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let units: Vec<u16> = rest
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        return String::from_utf16_lossy(&units);
    }
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => bytes.iter().map(|&b| char::from(b)).collect(),
    }
}

fn object_kind(object: &Object) -> &'static str {
    match object {
        Object::Null => "null",
        Object::Boolean(_) => "a boolean",
        Object::Integer(_) => "an integer",
        Object::Real(_) => "a real number",
        Object::Name(_) => "a name",
        Object::String(..) => "a string",
        Object::Array(_) => "an array",
        Object::Dictionary(_) => "a dictionary",
        Object::Stream(_) => "a stream",
        Object::Reference(_) => "a reference",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::{dictionary, Stream};

    fn sample_pdf(title: &str) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });
        let content = b"BT /F1 24 Tf 72 720 Td (Quarterly numbers) Tj ET".to_vec();
        let content_id = doc.add_object(Stream::new(dictionary! {}, content));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![page_id.into()],
                "Count" => 1,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        let info_id = doc.add_object(dictionary! {
            "Title" => Object::string_literal(title),
            "Author" => Object::string_literal("Finance Team"),
        });
        doc.trailer.set("Root", catalog_id);
        doc.trailer.set("Info", info_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();
        bytes
    }

    #[test]
    fn test_load_reads_pages_and_info() {
        let loader = LopdfLoader::new(PdfOptions::default());
        let doc = loader.load(&sample_pdf("Q3 Report")).unwrap();

        assert_eq!(doc.page_count(), 1);
        assert_eq!(doc.version().as_deref(), Some("1.5"));
        assert!(!doc.is_encrypted());

        let info = doc.info().unwrap();
        assert_eq!(info.get("Title"), Some("Q3 Report"));
        assert_eq!(info.get("Author"), Some("Finance Team"));
        assert_eq!(info.get("Subject"), None);
    }

    #[test]
    fn test_first_page_text() {
        let loader = LopdfLoader::new(PdfOptions::default());
        let doc = loader.load(&sample_pdf("Text")).unwrap();
        let text = doc.page_text(1).unwrap();
        assert!(text.contains("Quarterly numbers"));
    }

    /// Page 1 is an empty content stream, page 2 carries text.
    fn cover_page_pdf() -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let cover_id = doc.add_object(Stream::new(dictionary! {}, Vec::new()));
        let body_id = doc.add_object(Stream::new(
            dictionary! {},
            b"BT /F1 24 Tf 72 720 Td (Chapter one) Tj ET".to_vec(),
        ));
        let kids: Vec<Object> = [cover_id, body_id]
            .iter()
            .map(|content_id| {
                doc.add_object(dictionary! {
                    "Type" => "Page",
                    "Parent" => pages_id,
                    "Contents" => *content_id,
                })
                .into()
            })
            .collect();

        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => 2,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();
        bytes
    }

    #[test]
    fn test_blank_first_page_does_not_borrow_later_text() {
        let doc = LopdfLoader::new(PdfOptions::default())
            .load(&cover_page_pdf())
            .unwrap();

        assert_eq!(doc.page_count(), 2);
        assert!(doc.page_text(1).is_err());
        assert!(doc.page_text(2).unwrap().contains("Chapter one"));
    }

    #[test]
    fn test_info_that_is_not_a_dictionary() {
        let mut document = Document::load_mem(&sample_pdf("Text")).unwrap();
        document.trailer.set("Info", Object::Integer(7));
        let doc = LopdfDocument {
            document,
            options: PdfOptions::default(),
            fallback_bytes: None,
        };

        match doc.info() {
            Err(MetascopeError::PartialExtraction(message)) => {
                assert!(message.contains("an integer rather than a dictionary"));
            }
            other => panic!("expected a partial extraction error, got {:?}", other),
        }
    }

    #[test]
    fn test_page_text_disabled() {
        let options = PdfOptions {
            extract_first_page_text: false,
            full_text_fallback: false,
        };
        let doc = LopdfLoader::new(options).load(&sample_pdf("Text")).unwrap();
        assert!(doc.page_text(1).is_err());
    }

    #[test]
    fn test_garbage_is_rejected() {
        let loader = LopdfLoader::new(PdfOptions::default());
        let result = loader.load(b"%PDF-1.4\nthis is not really a pdf");
        assert!(matches!(result, Err(MetascopeError::ExtractionFailed(_))));
    }

    #[test]
    fn test_guarded_reports_worker_crash() {
        let err = guarded("testing", || -> u32 { panic!("boom") }).unwrap_err();
        assert!(err.to_string().contains("worker"));
        assert!(err.to_string().contains("boom"));
    }

    #[test]
    fn test_decode_pdf_string() {
        assert_eq!(decode_pdf_string(b"Plain"), "Plain");
        assert_eq!(decode_pdf_string(&[0xFE, 0xFF, 0x00, 0x48, 0x00, 0x69]), "Hi");
        assert_eq!(decode_pdf_string(&[0x43, 0x61, 0x66, 0xE9]), "Café");
    }
}
