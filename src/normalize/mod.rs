//! Metadata normalization
//! Reshapes raw extractor output into the categorized display record.

pub mod audio;
pub mod document;
pub mod format;
pub mod generic;
pub mod image;
pub mod lookup;
pub mod metadata;
pub mod pdf;
pub mod tables;
pub mod value;

use crate::error::MetascopeError;
use crate::input::descriptor::FileDescriptor;
use crate::input::file_detector::AnalysisStrategy;
use format::{format_file_size, format_timestamp};
use metadata::{Category, DisplayValue, FieldMap};

pub use lookup::lookup;
pub use metadata::{NormalizedMetadata, SENTINEL};

/// Fields shared by every strategy.
pub fn basic_metadata(descriptor: &FileDescriptor) -> FieldMap {
    let file_type = if descriptor.mime_type.is_empty() {
        "Unknown".to_string()
    } else {
        descriptor.mime_type.clone()
    };

    metadata::field_map([
        ("fileName", DisplayValue::text(descriptor.name.as_str())),
        ("fileSize", DisplayValue::text(format_file_size(descriptor.size))),
        ("fileType", DisplayValue::text(file_type)),
        (
            "lastModified",
            DisplayValue::from_option(descriptor.last_modified.as_ref().map(format_timestamp)),
        ),
        ("extension", DisplayValue::text(descriptor.extension())),
        ("sizeInBytes", DisplayValue::text(descriptor.size.to_string())),
    ])
}

/// A record holding only the basic category.
pub fn with_basic(descriptor: &FileDescriptor) -> NormalizedMetadata {
    let mut metadata = NormalizedMetadata::new();
    metadata.set_category(Category::Basic, basic_metadata(descriptor));
    metadata
}

/// Turn a strategy failure into a displayable record.
pub fn failure_fragment(
    descriptor: &FileDescriptor,
    strategy: AnalysisStrategy,
    error: &MetascopeError,
) -> NormalizedMetadata {
    match strategy {
        AnalysisStrategy::Pdf => pdf::failed(descriptor, error),
        AnalysisStrategy::Image if matches!(error, MetascopeError::NoMetadataFound(_)) => {
            image::without_exif(descriptor)
        }
        _ => {
            let (summary, suggestion) = match strategy {
                AnalysisStrategy::Image => (
                    "Failed to analyze image",
                    "File may be corrupted or use an image container without readable tags",
                ),
                AnalysisStrategy::Audio => (
                    "Failed to analyze audio file",
                    "File may be corrupted, truncated or in an unsupported audio format",
                ),
                AnalysisStrategy::Document => (
                    "Failed to analyze document",
                    "File may be corrupted or not match its extension",
                ),
                _ => ("Failed to analyze file", "File may be corrupted or inaccessible"),
            };

            let mut metadata = with_basic(descriptor);
            metadata.set_category(
                Category::Content,
                metadata::field_map([
                    ("error", summary.to_string()),
                    ("details", error.detail()),
                    ("suggestion", suggestion.to_string()),
                ]),
            );
            metadata.set_category(
                Category::Technical,
                metadata::field_map([
                    ("parseStatus", "Failed"),
                    ("errorType", error.kind()),
                ]),
            );
            metadata
        }
    }
}
