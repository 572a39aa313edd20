//! Extraction collaborators
//! Thin seams over the external parsing crates. Each reader turns raw file
//! bytes into a type-specific raw shape for the normalizer.

pub mod audio;
pub mod docx;
pub mod image_tags;
pub mod pdf;

use crate::error::Result;
use crate::normalize::value::RawTags;
use indexmap::IndexMap;

pub use audio::LoftyTagReader;
pub use docx::ZipDocxReader;
pub use image_tags::KamadakExifReader;
pub use pdf::{LopdfLoader, PdfOptions};

/// Image tag dictionary reader.
pub trait ImageTagReader: Send + Sync {
    fn read_tags(&self, bytes: &[u8]) -> Result<RawTags>;
}

/// An opened PDF.
pub trait PdfDocument {
    fn page_count(&self) -> u32;

    /// Header version, e.g. `1.7`.
    fn version(&self) -> Option<String>;

    /// First element of the trailer `/ID` array, hex encoded.
    fn fingerprint(&self) -> Option<String>;

    fn is_encrypted(&self) -> bool;

    /// Document information dictionary. Failure here still leaves the
    /// document usable for page counting.
    fn info(&self) -> Result<PdfInfo>;

    /// Plain text of a 1-based page.
    fn page_text(&self, page: u32) -> Result<String>;
}

pub trait PdfLoader: Send + Sync {
    fn load(&self, bytes: &[u8]) -> Result<Box<dyn PdfDocument>>;
}

/// Decoded string entries of a PDF info dictionary, in file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PdfInfo {
    pub entries: IndexMap<String, String>,
}

impl PdfInfo {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.trim().is_empty())
    }
}

/// Audio tags and stream properties, grouped the way tag libraries report them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AudioProbe {
    pub common: CommonTags,
    pub format: AudioFormat,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommonTags {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub year: Option<u32>,
    pub genre: Vec<String>,
    pub track_no: Option<u32>,
    pub track_of: Option<u32>,
    pub composer: Vec<String>,
    pub comment: Vec<String>,
    pub album_artist: Option<String>,
    pub date: Option<String>,
    pub label: Vec<String>,
    pub isrc: Vec<String>,
    pub barcode: Option<String>,
    pub encoded_by: Option<String>,
    pub pictures: Vec<PictureInfo>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AudioFormat {
    /// Seconds.
    pub duration: Option<f64>,
    /// kbps.
    pub bitrate: Option<u32>,
    pub sample_rate: Option<u32>,
    pub channels: Option<u8>,
    pub codec: Option<String>,
    pub container: Option<String>,
    pub lossless: bool,
    pub bits_per_sample: Option<u8>,
    pub tag_types: Vec<String>,
    pub tool: Option<String>,
    pub codec_profile: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PictureInfo {
    pub format: Option<String>,
    pub size: usize,
    pub description: Option<String>,
    pub kind: Option<String>,
}

pub trait AudioTagReader: Send + Sync {
    fn read(&self, bytes: &[u8]) -> Result<AudioProbe>;
}

/// Raw text of a word-processing document plus reader diagnostics.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocxText {
    pub value: String,
    pub messages: Vec<String>,
}

pub trait DocxTextReader: Send + Sync {
    fn extract_raw_text(&self, bytes: &[u8]) -> Result<DocxText>;
}

/// The set of readers one analysis manager dispatches to.
pub struct Extractors {
    pub image: Box<dyn ImageTagReader>,
    pub pdf: Box<dyn PdfLoader>,
    pub audio: Box<dyn AudioTagReader>,
    pub docx: Box<dyn DocxTextReader>,
}

impl Extractors {
    pub fn new(pdf_options: PdfOptions) -> Self {
        Self {
            image: Box::new(KamadakExifReader::new()),
            pdf: Box::new(LopdfLoader::new(pdf_options)),
            audio: Box::new(LoftyTagReader::new()),
            docx: Box::new(ZipDocxReader::new()),
        }
    }

    pub fn with_image(mut self, reader: impl ImageTagReader + 'static) -> Self {
        self.image = Box::new(reader);
        self
    }

    pub fn with_pdf(mut self, loader: impl PdfLoader + 'static) -> Self {
        self.pdf = Box::new(loader);
        self
    }

    pub fn with_audio(mut self, reader: impl AudioTagReader + 'static) -> Self {
        self.audio = Box::new(reader);
        self
    }

    pub fn with_docx(mut self, reader: impl DocxTextReader + 'static) -> Self {
        self.docx = Box::new(reader);
        self
    }
}

impl Default for Extractors {
    fn default() -> Self {
        Self::new(PdfOptions::default())
    }
}
