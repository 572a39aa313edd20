//! Audio tags and stream properties via lofty

use crate::error::{Result, MetascopeError};
use crate::extract::{AudioFormat, AudioProbe, AudioTagReader, CommonTags, PictureInfo};
use lofty::file::{FileType, TaggedFile, TaggedFileExt};
use lofty::prelude::*;
use lofty::probe::Probe;
use lofty::tag::{ItemKey, Tag};
use log::debug;
use std::io::Cursor;

#[derive(Debug, Default, Clone, Copy)]
pub struct LoftyTagReader;

impl LoftyTagReader {
    pub fn new() -> Self {
        Self
    }
}

impl AudioTagReader for LoftyTagReader {
    fn read(&self, bytes: &[u8]) -> Result<AudioProbe> {
        let tagged_file = Probe::new(Cursor::new(bytes))
            .guess_file_type()?
            .read()
            .map_err(|e| MetascopeError::ExtractionFailed(format!("Unreadable audio stream: {}", e)))?;

        let format = read_format(&tagged_file);
        let common = tagged_file
            .primary_tag()
            .or_else(|| tagged_file.first_tag())
            .map(read_common)
            .unwrap_or_default();

        debug!(
            "Audio probe: {:?}, {} tag block(s), {} picture(s)",
            tagged_file.file_type(),
            format.tag_types.len(),
            common.pictures.len()
        );

        Ok(AudioProbe { common, format })
    }
}

/// Codec, container and losslessness implied by the detected file type.
fn describe_file_type(file_type: &FileType) -> (Option<&'static str>, Option<&'static str>, bool) {
    match file_type {
        FileType::Mpeg => (Some("MPEG 1 Layer 3"), Some("MPEG"), false),
        FileType::Flac => (Some("FLAC"), Some("FLAC"), true),
        FileType::Aac => (Some("AAC"), Some("ADTS"), false),
        FileType::Mp4 => (None, Some("MPEG-4"), false),
        FileType::Opus => (Some("Opus"), Some("Ogg"), false),
        FileType::Vorbis => (Some("Vorbis"), Some("Ogg"), false),
        FileType::Speex => (Some("Speex"), Some("Ogg"), false),
        FileType::Wav => (Some("PCM"), Some("WAVE"), true),
        FileType::Aiff => (Some("PCM"), Some("AIFF"), true),
        FileType::Ape => (Some("Monkey's Audio"), Some("APE"), true),
        FileType::WavPack => (Some("WavPack"), Some("WavPack"), true),
        FileType::Mpc => (Some("Musepack"), Some("MPC"), false),
        _ => (None, None, false),
    }
}

fn read_format(tagged_file: &TaggedFile) -> AudioFormat {
    let properties = tagged_file.properties();
    let (codec, container, lossless) = describe_file_type(&tagged_file.file_type());

    let duration = properties.duration().as_secs_f64();
    let tool = tagged_file
        .tags()
        .iter()
        .find_map(|tag| tag.get_string(&ItemKey::EncoderSoftware))
        .map(str::to_string);

    AudioFormat {
        duration: (duration > 0.0).then_some(duration),
        bitrate: properties
            .audio_bitrate()
            .or_else(|| properties.overall_bitrate())
            .filter(|b| *b > 0),
        sample_rate: properties.sample_rate().filter(|r| *r > 0),
        channels: properties.channels().filter(|c| *c > 0),
        codec: codec.map(str::to_string),
        container: container.map(str::to_string),
        lossless,
        bits_per_sample: properties.bit_depth().filter(|b| *b > 0),
        tag_types: tagged_file
            .tags()
            .iter()
            .map(|tag| format!("{:?}", tag.tag_type()))
            .collect(),
        tool,
        codec_profile: None,
    }
}

fn read_common(tag: &Tag) -> CommonTags {
    let single = |key: &ItemKey| tag.get_string(key).map(str::to_string);
    let many = |key: &ItemKey| tag.get_strings(key).map(str::to_string).collect::<Vec<_>>();

    CommonTags {
        title: tag.title().map(|s| s.to_string()),
        artist: tag.artist().map(|s| s.to_string()),
        album: tag.album().map(|s| s.to_string()),
        year: tag.year(),
        genre: tag.genre().map(|g| vec![g.to_string()]).unwrap_or_default(),
        track_no: tag.track(),
        track_of: tag.track_total(),
        composer: many(&ItemKey::Composer),
        comment: tag.comment().map(|c| vec![c.to_string()]).unwrap_or_default(),
        album_artist: single(&ItemKey::AlbumArtist),
        date: single(&ItemKey::RecordingDate),
        label: many(&ItemKey::Label),
        isrc: many(&ItemKey::Isrc),
        barcode: single(&ItemKey::Barcode),
        encoded_by: single(&ItemKey::EncodedBy),
        pictures: tag
            .pictures()
            .iter()
            .map(|picture| PictureInfo {
                format: infer::get(picture.data()).map(|kind| kind.mime_type().to_string()),
                size: picture.data().len(),
                description: picture.description().map(str::to_string),
                kind: Some(format!("{:?}", picture.pic_type())),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// One second of 8 kHz mono 16-bit silence.
    fn pcm_wav() -> Vec<u8> {
        let sample_rate: u32 = 8000;
        let data_len: u32 = sample_rate * 2;
        let mut wav = Vec::new();
        wav.extend_from_slice(b"RIFF");
        wav.extend_from_slice(&(36 + data_len).to_le_bytes());
        wav.extend_from_slice(b"WAVE");
        wav.extend_from_slice(b"fmt ");
        wav.extend_from_slice(&16u32.to_le_bytes());
        wav.extend_from_slice(&1u16.to_le_bytes());
        wav.extend_from_slice(&1u16.to_le_bytes());
        wav.extend_from_slice(&sample_rate.to_le_bytes());
        wav.extend_from_slice(&(sample_rate * 2).to_le_bytes());
        wav.extend_from_slice(&2u16.to_le_bytes());
        wav.extend_from_slice(&16u16.to_le_bytes());
        wav.extend_from_slice(b"data");
        wav.extend_from_slice(&data_len.to_le_bytes());
        wav.resize(wav.len() + data_len as usize, 0);
        wav
    }

    #[test]
    fn test_reads_wav_properties() {
        let probe = LoftyTagReader::new().read(&pcm_wav()).unwrap();

        assert_eq!(probe.format.sample_rate, Some(8000));
        assert_eq!(probe.format.channels, Some(1));
        assert_eq!(probe.format.bits_per_sample, Some(16));
        assert_eq!(probe.format.codec.as_deref(), Some("PCM"));
        assert_eq!(probe.format.container.as_deref(), Some("WAVE"));
        assert!(probe.format.lossless);
        assert!(probe.format.tag_types.is_empty());
        assert_eq!(probe.common, CommonTags::default());
    }

    #[test]
    fn test_rejects_non_audio() {
        let result = LoftyTagReader::new().read(b"plain words, no audio here");
        assert!(result.is_err());
    }

    #[test]
    fn test_file_type_descriptions() {
        assert_eq!(describe_file_type(&FileType::Flac), (Some("FLAC"), Some("FLAC"), true));
        assert_eq!(describe_file_type(&FileType::Mp4), (None, Some("MPEG-4"), false));
    }
}
