//! PDF document -> categorized metadata

use crate::error::MetascopeError;
use crate::extract::PdfDocument;
use crate::input::descriptor::FileDescriptor;
use crate::normalize::format::truncate_preview;
use crate::normalize::metadata::{field_map, Category, DisplayValue, FieldMap, NormalizedMetadata};
use crate::normalize::with_basic;
use chrono::{NaiveDate, NaiveDateTime};
use log::warn;

const INFO_FIELDS: &[(&str, &str)] = &[
    ("title", "Title"),
    ("author", "Author"),
    ("subject", "Subject"),
    ("keywords", "Keywords"),
    ("creator", "Creator"),
    ("producer", "Producer"),
];

const TEXT_UNAVAILABLE: &str = "Could not extract text";

/// Normalize an opened document. An unreadable info dictionary yields a
/// partial record that still reports the page count.
pub fn normalize_pdf(
    descriptor: &FileDescriptor,
    document: &dyn PdfDocument,
    preview_chars: usize,
) -> NormalizedMetadata {
    let mut metadata = with_basic(descriptor);

    let info = match document.info() {
        Ok(info) => info,
        Err(e) => {
            warn!("PDF metadata extraction failed for {}: {}", descriptor.name, e);
            metadata.set_category(
                Category::Technical,
                field_map([
                    ("pages", document.page_count().to_string()),
                    ("parseStatus", "Partial".to_string()),
                ]),
            );
            metadata.set_category(
                Category::Content,
                field_map([
                    ("error", "Could not extract PDF metadata".to_string()),
                    ("details", e.detail()),
                ]),
            );
            return metadata;
        }
    };

    metadata.set_category(
        Category::Technical,
        field_map([
            ("pages", DisplayValue::text(document.page_count().to_string())),
            ("pdfVersion", DisplayValue::from_option(document.version())),
            ("fingerprint", DisplayValue::from_option(document.fingerprint())),
            ("parseStatus", DisplayValue::text("Success")),
        ]),
    );

    let mut content: FieldMap = INFO_FIELDS
        .iter()
        .map(|(display, key)| (display.to_string(), DisplayValue::from_option(info.get(key))))
        .collect();
    content.insert(
        "creationDate".to_string(),
        DisplayValue::from_option(info.get("CreationDate").map(format_pdf_date)),
    );
    content.insert(
        "modificationDate".to_string(),
        DisplayValue::from_option(info.get("ModDate").map(format_pdf_date)),
    );
    content.insert(
        "firstPageText".to_string(),
        first_page_text(document, preview_chars),
    );
    metadata.set_category(Category::Content, content);

    let encrypted = document.is_encrypted();
    metadata.set_category(
        Category::Security,
        field_map([
            ("encrypted", DisplayValue::yes_no(encrypted)),
            (
                "permissions",
                DisplayValue::text(if encrypted { "Restricted" } else { "Standard" }),
            ),
        ]),
    );

    metadata
}

fn first_page_text(document: &dyn PdfDocument, preview_chars: usize) -> DisplayValue {
    if document.page_count() == 0 {
        return DisplayValue::text(TEXT_UNAVAILABLE);
    }
    match document.page_text(1) {
        Ok(text) => {
            let joined = text.split_whitespace().collect::<Vec<_>>().join(" ");
            DisplayValue::text(truncate_preview(&joined, preview_chars))
        }
        Err(e) => {
            warn!("First page text unavailable: {}", e);
            DisplayValue::text(TEXT_UNAVAILABLE)
        }
    }
}

/// Record for a document the backend could not open at all.
pub fn failed(descriptor: &FileDescriptor, error: &MetascopeError) -> NormalizedMetadata {
    let details = error.detail();
    let worker_issue = if details.to_lowercase().contains("worker") {
        "PDF backend worker failed - the parser crashed instead of rejecting the file"
    } else {
        "Not a worker issue"
    };

    let mut metadata = with_basic(descriptor);
    metadata.set_category(
        Category::Technical,
        field_map([
            ("parseStatus", "Failed".to_string()),
            ("errorType", error.kind().to_string()),
            (
                "possibleCauses",
                "Backend failure, corrupted file, encryption, or unsupported PDF features".to_string(),
            ),
        ]),
    );
    metadata.set_category(
        Category::Content,
        field_map([
            ("error", "PDF parsing failed".to_string()),
            ("details", details),
            (
                "suggestion",
                "File may be corrupted, encrypted, password-protected, or the PDF backend failed to load"
                    .to_string(),
            ),
            ("workerIssue", worker_issue.to_string()),
        ]),
    );
    metadata
}

/// Render a PDF date (`D:YYYYMMDDHHmmSSOHH'mm'`) as `YYYY-MM-DD HH:MM:SS`.
/// Anything that does not parse is shown as written.
pub fn format_pdf_date(raw: &str) -> String {
    parse_pdf_date(raw)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| raw.trim().to_string())
}

fn parse_pdf_date(raw: &str) -> Option<NaiveDateTime> {
    let body = raw.trim();
    let body = body.strip_prefix("D:").unwrap_or(body);
    let digits: String = body.chars().take_while(|c| c.is_ascii_digit()).collect();
    if digits.len() < 4 {
        return None;
    }

    let part = |start: usize, len: usize, default: u32| -> Option<u32> {
        match digits.get(start..start + len) {
            Some(s) => s.parse().ok(),
            None => Some(default),
        }
    };

    let year = i32::try_from(part(0, 4, 0)?).ok()?;
    let date = NaiveDate::from_ymd_opt(year, part(4, 2, 1)?, part(6, 2, 1)?)?;
    date.and_hms_opt(part(8, 2, 0)?, part(10, 2, 0)?, part(12, 2, 0)?)
}
