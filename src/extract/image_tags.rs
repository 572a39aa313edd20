//! EXIF tag extraction with kamadak-exif

use crate::error::{Result, MetascopeError};
use crate::extract::ImageTagReader;
use crate::normalize::tables::{FILE_SECTION, JFIF_SECTION, THUMBNAIL_SECTION};
use crate::normalize::value::{RawTags, RawValue, Scalar};
use image::codecs::jpeg::JpegDecoder;
use image::codecs::png::PngDecoder;
use image::{ColorType, ImageDecoder, ImageFormat, ImageReader};
use log::debug;
use std::io::Cursor;

/// Undefined-typed payloads longer than this are shown as a byte count.
const MAX_INLINE_BINARY: usize = 64;

/// Reads EXIF from JPEG, TIFF, PNG, WebP and HEIF containers.
///
/// Primary-IFD tags land at the root of the result, thumbnail-IFD tags in a
/// `Thumbnail` section. Header facts (type, dimensions, sample depth) go to a
/// `file` section and JFIF density to `jfif`; those survive a missing EXIF
/// block.
#[derive(Debug, Default, Clone, Copy)]
pub struct KamadakExifReader;

impl KamadakExifReader {
    pub fn new() -> Self {
        Self
    }
}

impl ImageTagReader for KamadakExifReader {
    fn read_tags(&self, bytes: &[u8]) -> Result<RawTags> {
        let mut tags = RawTags::new();

        let mut cursor = Cursor::new(bytes);
        let exif_missing = match ::exif::Reader::new().read_from_container(&mut cursor) {
            Ok(exif) => {
                read_exif(&exif, &mut tags);
                None
            }
            Err(::exif::Error::NotFound(container)) => Some(container),
            Err(other) => return Err(MetascopeError::ExtractionFailed(other.to_string())),
        };

        read_container(bytes, &mut tags);
        read_jfif(bytes, &mut tags);

        if let Some(container) = exif_missing {
            let has_dimensions = tags
                .sections
                .get(FILE_SECTION)
                .is_some_and(|section| section.contains_key("ImageWidth"));
            if !has_dimensions {
                return Err(MetascopeError::NoMetadataFound(format!(
                    "no EXIF data in {}",
                    container
                )));
            }
            debug!("No EXIF block in {} container, keeping header facts", container);
        }

        debug!("Read {} image tags", tags.tag_count());
        Ok(tags)
    }
}

fn read_exif(exif: &::exif::Exif, tags: &mut RawTags) {
    for field in exif.fields() {
        let name = field.tag.to_string();
        let description = field.display_value().with_unit(exif).to_string();
        let raw = raw_value(&field.value, description);

        if field.ifd_num == ::exif::In::THUMBNAIL {
            tags.insert_in(THUMBNAIL_SECTION, name, raw);
        } else {
            tags.insert(name, raw);
        }
    }

    if let Some(len) = exif
        .get_field(::exif::Tag::JPEGInterchangeFormatLength, ::exif::In::THUMBNAIL)
        .and_then(|f| f.value.get_uint(0))
    {
        tags.insert_in(THUMBNAIL_SECTION, "image", RawValue::EmbeddedBinary { len: len as usize });
    }
}

/// Type, dimensions and sample depth read from the container header.
fn read_container(bytes: &[u8], tags: &mut RawTags) {
    if let Some(kind) = infer::get(bytes) {
        tags.insert_in(FILE_SECTION, "FileType", RawValue::text(kind.extension().to_uppercase()));
        tags.insert_in(FILE_SECTION, "MIMEType", RawValue::text(kind.mime_type()));
    }

    let dimensions = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .ok()
        .and_then(|reader| reader.into_dimensions().ok());
    if let Some((width, height)) = dimensions {
        tags.insert_in(FILE_SECTION, "ImageWidth", pixels(width));
        tags.insert_in(FILE_SECTION, "ImageHeight", pixels(height));
    }

    if let Some(color) = color_type(bytes) {
        let channels = color.channel_count();
        let bits = color.bits_per_pixel() / u16::from(channels.max(1));
        tags.insert_in(
            FILE_SECTION,
            "BitsPerSample",
            RawValue::described(i64::from(bits), bits.to_string()),
        );
        tags.insert_in(
            FILE_SECTION,
            "ColorComponents",
            RawValue::described(i64::from(channels), channels.to_string()),
        );
    }
}

fn pixels(value: u32) -> RawValue {
    RawValue::described(i64::from(value), format!("{}px", value))
}

fn color_type(bytes: &[u8]) -> Option<ColorType> {
    match image::guess_format(bytes).ok()? {
        ImageFormat::Png => PngDecoder::new(Cursor::new(bytes)).ok().map(|d| d.color_type()),
        ImageFormat::Jpeg => JpegDecoder::new(Cursor::new(bytes)).ok().map(|d| d.color_type()),
        _ => None,
    }
}

/// JFIF APP0 segment directly after SOI: version, density unit and density.
fn read_jfif(bytes: &[u8], tags: &mut RawTags) {
    let Some(header) = bytes.get(..18) else {
        return;
    };
    if !header.starts_with(&[0xFF, 0xD8, 0xFF, 0xE0]) || &header[6..11] != b"JFIF\0" {
        return;
    }

    let unit = match header[13] {
        1 => "inches",
        2 => "cm",
        _ => "None",
    };
    let x_density = u16::from_be_bytes([header[14], header[15]]);
    let y_density = u16::from_be_bytes([header[16], header[17]]);

    tags.insert_in(
        JFIF_SECTION,
        "JFIFVersion",
        RawValue::text(format!("{}.{:02}", header[11], header[12])),
    );
    tags.insert_in(
        JFIF_SECTION,
        "ResolutionUnit",
        RawValue::described(i64::from(header[13]), unit),
    );
    tags.insert_in(
        JFIF_SECTION,
        "XResolution",
        RawValue::described(i64::from(x_density), x_density.to_string()),
    );
    tags.insert_in(
        JFIF_SECTION,
        "YResolution",
        RawValue::described(i64::from(y_density), y_density.to_string()),
    );
}

fn raw_value(value: &::exif::Value, description: String) -> RawValue {
    use ::exif::Value;

    let scalar = match value {
        Value::Ascii(parts) => {
            let text = parts
                .iter()
                .map(|p| String::from_utf8_lossy(p).trim_end_matches('\0').trim().to_string())
                .filter(|p| !p.is_empty())
                .collect::<Vec<_>>()
                .join(", ");
            Some(Scalar::Text(text))
        }
        Value::Byte(v) => integers(v.iter().map(|x| i64::from(*x))),
        Value::Short(v) => integers(v.iter().map(|x| i64::from(*x))),
        Value::Long(v) => integers(v.iter().map(|x| i64::from(*x))),
        Value::SByte(v) => integers(v.iter().map(|x| i64::from(*x))),
        Value::SShort(v) => integers(v.iter().map(|x| i64::from(*x))),
        Value::SLong(v) => integers(v.iter().map(|x| i64::from(*x))),
        Value::Rational(v) => floats(v.iter().map(|r| r.to_f64())),
        Value::SRational(v) => floats(v.iter().map(|r| r.to_f64())),
        Value::Float(v) => floats(v.iter().map(|x| f64::from(*x))),
        Value::Double(v) => floats(v.iter().copied()),
        Value::Undefined(bytes, _) => {
            if bytes.len() > MAX_INLINE_BINARY {
                return RawValue::Described {
                    value: None,
                    description: Some(format!("{} bytes of binary data", bytes.len())),
                };
            }
            None
        }
        _ => None,
    };

    RawValue::Described {
        value: scalar,
        description: Some(description),
    }
}

fn integers(values: impl Iterator<Item = i64>) -> Option<Scalar> {
    let values: Vec<i64> = values.collect();
    match values.as_slice() {
        [] => None,
        [single] => Some(Scalar::Integer(*single)),
        many => Some(Scalar::Text(
            many.iter().map(|v| v.to_string()).collect::<Vec<_>>().join(", "),
        )),
    }
}

fn floats(values: impl Iterator<Item = f64>) -> Option<Scalar> {
    let values: Vec<f64> = values.collect();
    match values.as_slice() {
        [] => None,
        [single] => Some(Scalar::Float(*single)),
        many => Some(Scalar::Text(
            many.iter().map(|v| v.to_string()).collect::<Vec<_>>().join(", "),
        )),
    }
}
