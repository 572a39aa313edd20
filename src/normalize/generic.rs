//! Fallback for files no dedicated strategy understands

use crate::config::AnalysisConfig;
use crate::error::{Result, MetascopeError};
use crate::input::descriptor::FileDescriptor;
use crate::input::file_detector::GenericKind;
use crate::normalize::format::{char_count, truncate_preview};
use crate::normalize::metadata::{field_map, Category, FieldMap, NormalizedMetadata};
use crate::normalize::with_basic;

/// What the content sniff got to see.
#[derive(Debug)]
pub enum GenericContent {
    /// Over the size cap; never read.
    TooLarge,
    /// Read and classified as text, or the reason it was not.
    Sniffed(Result<String>),
}

/// Whether `size` is small enough to be read for a content sniff.
pub fn within_sniff_limit(size: u64, config: &AnalysisConfig) -> bool {
    size <= config.sniff_limit_bytes
}

/// Accept the bytes as text when the leading window is printable ASCII or
/// whitespace.
pub fn sniff_text(bytes: &[u8], window: usize) -> Result<String> {
    let head = &bytes[..bytes.len().min(window)];
    let printable = head
        .iter()
        .all(|b| (0x20..=0x7E).contains(b) || b.is_ascii_whitespace());

    if !printable {
        return Err(MetascopeError::UnsupportedOrBinary(format!(
            "non-printable bytes in the first {} bytes",
            head.len()
        )));
    }
    Ok(String::from_utf8_lossy(bytes).into_owned())
}

fn content_fields(content: GenericContent, config: &AnalysisConfig) -> FieldMap {
    match content {
        GenericContent::TooLarge => field_map([
            ("note", "File too large for content analysis"),
            ("isLikelyText", "Unknown"),
        ]),
        GenericContent::Sniffed(Ok(text)) if text.is_empty() => field_map([
            ("note", "Empty file"),
            ("isLikelyText", "Unknown"),
        ]),
        GenericContent::Sniffed(Ok(text)) => field_map([
            ("textPreview", truncate_preview(&text, config.text_preview_chars)),
            ("characterCount", char_count(&text).to_string()),
            ("isLikelyText", "Yes".to_string()),
        ]),
        GenericContent::Sniffed(Err(_)) => field_map([
            ("isLikelyText", "No"),
            ("note", "Binary file or unsupported format"),
        ]),
    }
}

pub fn normalize_generic(
    descriptor: &FileDescriptor,
    kind: GenericKind,
    content: GenericContent,
    config: &AnalysisConfig,
) -> NormalizedMetadata {
    let mut metadata = with_basic(descriptor);

    if kind == GenericKind::Archive {
        metadata.set_category(
            Category::Technical,
            field_map([
                ("note", "Archive file detected - contents not analyzed".to_string()),
                ("archiveType", descriptor.extension().to_uppercase()),
            ]),
        );
    }

    metadata.set_category(Category::Content, content_fields(content, config));

    if kind == GenericKind::Video {
        metadata.set_category(
            Category::Media,
            field_map([
                ("note", "Video file detected - stream details are not analyzed"),
                ("estimatedType", "Video"),
            ]),
        );
    }

    metadata
}
