//! Audio probe -> categorized metadata

use crate::extract::{AudioProbe, PictureInfo};
use crate::input::descriptor::FileDescriptor;
use crate::normalize::format::{format_bitrate, format_duration, format_sample_rate};
use crate::normalize::metadata::{field_map, Category, DisplayValue, FieldMap, NormalizedMetadata};
use crate::normalize::with_basic;

fn joined(values: &[String]) -> DisplayValue {
    DisplayValue::text(values.join(", "))
}

fn track(no: Option<u32>, of: Option<u32>) -> DisplayValue {
    match (no, of) {
        (Some(no), Some(of)) => DisplayValue::Text(format!("{} of {}", no, of)),
        (Some(no), None) => DisplayValue::Text(no.to_string()),
        (None, _) => DisplayValue::NotAvailable,
    }
}

pub fn normalize_audio(descriptor: &FileDescriptor, probe: &AudioProbe) -> NormalizedMetadata {
    let common = &probe.common;
    let format = &probe.format;
    let mut metadata = with_basic(descriptor);

    metadata.set_category(
        Category::Technical,
        field_map([
            ("duration", DisplayValue::from_option(format.duration.map(format_duration))),
            ("bitrate", DisplayValue::from_option(format.bitrate.map(format_bitrate))),
            ("sampleRate", DisplayValue::from_option(format.sample_rate.map(format_sample_rate))),
            ("channels", DisplayValue::from_option(format.channels)),
            (
                "codec",
                DisplayValue::from_option(format.codec.as_ref().or(format.container.as_ref())),
            ),
            ("lossless", DisplayValue::yes_no(format.lossless)),
            ("bitsPerSample", DisplayValue::from_option(format.bits_per_sample)),
            ("tagTypes", joined(&format.tag_types)),
        ]),
    );

    metadata.set_category(
        Category::Media,
        field_map([
            (
                "encoder",
                DisplayValue::from_option(format.tool.as_ref().or(common.encoded_by.as_ref())),
            ),
            ("codecProfile", DisplayValue::from_option(format.codec_profile.as_ref())),
            ("container", DisplayValue::from_option(format.container.as_ref())),
            (
                "quality",
                DisplayValue::text(if format.lossless { "Lossless" } else { "Lossy" }),
            ),
        ]),
    );

    metadata.set_category(
        Category::Content,
        field_map([
            ("title", DisplayValue::from_option(common.title.as_ref())),
            ("artist", DisplayValue::from_option(common.artist.as_ref())),
            ("album", DisplayValue::from_option(common.album.as_ref())),
            ("year", DisplayValue::from_option(common.year)),
            ("genre", joined(&common.genre)),
            ("track", track(common.track_no, common.track_of)),
            ("composer", joined(&common.composer)),
            ("comment", joined(&common.comment)),
            ("albumArtist", DisplayValue::from_option(common.album_artist.as_ref())),
            ("date", DisplayValue::from_option(common.date.as_ref())),
            ("label", joined(&common.label)),
            ("isrc", joined(&common.isrc)),
            ("barcode", DisplayValue::from_option(common.barcode.as_ref())),
        ]),
    );

    metadata.insert_group("albumArt", album_art(common.pictures.first()));
    metadata
}

fn album_art(picture: Option<&PictureInfo>) -> FieldMap {
    match picture {
        Some(picture) => field_map([
            ("present", DisplayValue::text("Yes")),
            (
                "format",
                DisplayValue::text(picture.format.as_deref().unwrap_or("Unknown")),
            ),
            ("size", DisplayValue::Text(format!("{} bytes", picture.size))),
            ("description", DisplayValue::from_option(picture.description.as_ref())),
            ("type", DisplayValue::from_option(picture.kind.as_ref())),
        ]),
        None => field_map([("present", "No")]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::{AudioFormat, CommonTags};

    fn descriptor() -> FileDescriptor {
        FileDescriptor::from_bytes("track01.flac", "audio/flac", vec![0u8; 64])
    }

    #[test]
    fn test_duration_and_format_fields() {
        let probe = AudioProbe {
            common: CommonTags::default(),
            format: AudioFormat {
                duration: Some(125.4),
                bitrate: Some(320),
                sample_rate: Some(44100),
                channels: Some(2),
                container: Some("MPEG".to_string()),
                ..AudioFormat::default()
            },
        };
        let metadata = normalize_audio(&descriptor(), &probe).finish();

        assert_eq!(metadata.text(Category::Technical, "duration"), Some("2:05"));
        assert_eq!(metadata.text(Category::Technical, "bitrate"), Some("320 kbps"));
        assert_eq!(metadata.text(Category::Technical, "sampleRate"), Some("44100 Hz"));
        assert_eq!(metadata.text(Category::Technical, "channels"), Some("2"));
        // codec falls back to the container
        assert_eq!(metadata.text(Category::Technical, "codec"), Some("MPEG"));
        assert_eq!(metadata.text(Category::Technical, "lossless"), Some("No"));
        assert_eq!(metadata.text(Category::Media, "quality"), Some("Lossy"));
        assert_eq!(
            metadata.group("albumArt").unwrap()["present"].to_string(),
            "No"
        );
    }

    #[test]
    fn test_common_tags() {
        let probe = AudioProbe {
            common: CommonTags {
                title: Some("Blue in Green".to_string()),
                artist: Some("Miles Davis".to_string()),
                year: Some(1959),
                genre: vec!["Jazz".to_string(), "Modal".to_string()],
                track_no: Some(3),
                track_of: Some(5),
                encoded_by: Some("iTunes".to_string()),
                pictures: vec![PictureInfo {
                    format: Some("image/jpeg".to_string()),
                    size: 52311,
                    description: None,
                    kind: Some("CoverFront".to_string()),
                }],
                ..CommonTags::default()
            },
            format: AudioFormat {
                lossless: true,
                codec: Some("FLAC".to_string()),
                ..AudioFormat::default()
            },
        };
        let metadata = normalize_audio(&descriptor(), &probe).finish();

        assert_eq!(metadata.text(Category::Content, "genre"), Some("Jazz, Modal"));
        assert_eq!(metadata.text(Category::Content, "track"), Some("3 of 5"));
        assert_eq!(metadata.text(Category::Content, "year"), Some("1959"));
        assert_eq!(metadata.text(Category::Content, "composer"), Some("N/A"));
        assert_eq!(metadata.text(Category::Media, "encoder"), Some("iTunes"));
        assert_eq!(metadata.text(Category::Media, "quality"), Some("Lossless"));

        let art = metadata.group("albumArt").unwrap();
        assert_eq!(art["present"].to_string(), "Yes");
        assert_eq!(art["size"].to_string(), "52311 bytes");
        assert_eq!(art["description"], DisplayValue::NotAvailable);
        assert_eq!(art["type"].to_string(), "CoverFront");
    }

    #[test]
    fn test_track_without_total() {
        assert_eq!(track(Some(7), None), DisplayValue::Text("7".to_string()));
        assert_eq!(track(None, Some(9)), DisplayValue::NotAvailable);
    }
}
