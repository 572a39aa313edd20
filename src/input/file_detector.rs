//! File type detection: pick an analysis strategy from MIME type and extension

use crate::input::descriptor::FileDescriptor;
use std::fmt;

pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "bmp", "webp", "tiff", "raw"];
pub const AUDIO_EXTENSIONS: &[&str] = &["mp3", "wav", "flac", "aac", "m4a", "ogg", "wma"];
pub const DOCUMENT_EXTENSIONS: &[&str] = &["txt", "docx", "json", "yaml", "yml", "xml", "csv"];
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "avi", "mov", "wmv", "flv", "webm", "mkv"];
pub const ARCHIVE_EXTENSIONS: &[&str] = &["zip", "rar", "7z", "tar", "gz"];

const DOCX_MIME: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// Extensions offered by the upload picker. Advisory only.
const ADVERTISED_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "tiff", "gif", "bmp", "webp", "raw", "pdf", "mp3", "wav", "flac", "aac",
    "m4a", "ogg", "wma", "mp4", "avi", "mov", "wmv", "flv", "webm", "mkv", "txt", "csv", "xml",
    "json", "yaml", "yml", "docx",
];

/// Why a file ended up on the generic path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenericKind {
    Plain,
    /// Video, not analyzed beyond the generic sniff.
    Video,
    /// Archive, contents not analyzed.
    Archive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisStrategy {
    Image,
    Pdf,
    Audio,
    Document,
    Generic(GenericKind),
}

impl fmt::Display for AnalysisStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AnalysisStrategy::Image => "image",
            AnalysisStrategy::Pdf => "pdf",
            AnalysisStrategy::Audio => "audio",
            AnalysisStrategy::Document => "document",
            AnalysisStrategy::Generic(GenericKind::Plain) => "generic",
            AnalysisStrategy::Generic(GenericKind::Video) => "generic (video)",
            AnalysisStrategy::Generic(GenericKind::Archive) => "generic (archive)",
        };
        f.write_str(name)
    }
}

impl AnalysisStrategy {
    /// Classify by declared MIME type and lower-cased extension. First match wins.
    pub fn from_mime_and_extension(mime: &str, extension: &str) -> Self {
        let mime = mime.to_lowercase();
        let ext = extension.to_lowercase();
        let ext = ext.as_str();

        if mime.starts_with("image/") || IMAGE_EXTENSIONS.contains(&ext) {
            return AnalysisStrategy::Image;
        }

        if mime == "application/pdf" || ext == "pdf" {
            return AnalysisStrategy::Pdf;
        }

        if mime.starts_with("audio/") || AUDIO_EXTENSIONS.contains(&ext) {
            return AnalysisStrategy::Audio;
        }

        if DOCUMENT_EXTENSIONS.contains(&ext)
            || mime.contains("text/")
            || mime.contains("application/json")
            || mime.contains(DOCX_MIME)
        {
            return AnalysisStrategy::Document;
        }

        if mime.starts_with("video/") || VIDEO_EXTENSIONS.contains(&ext) {
            return AnalysisStrategy::Generic(GenericKind::Video);
        }

        if ARCHIVE_EXTENSIONS.contains(&ext) {
            return AnalysisStrategy::Generic(GenericKind::Archive);
        }

        AnalysisStrategy::Generic(GenericKind::Plain)
    }
}

pub fn classify(descriptor: &FileDescriptor) -> AnalysisStrategy {
    AnalysisStrategy::from_mime_and_extension(&descriptor.mime_type, &descriptor.extension())
}

pub fn is_advertised_type(extension: &str) -> bool {
    ADVERTISED_EXTENSIONS.contains(&extension.to_lowercase().as_str())
}
