//! Exporting a normalized record to text or to disk

use crate::config::OutputFormat;
use crate::error::{MetascopeError, Result};
use crate::normalize::NormalizedMetadata;
use std::path::{Path, PathBuf};

/// Indented JSON of the record, as copied to the clipboard.
pub fn export_text(metadata: &NormalizedMetadata) -> Result<String> {
    Ok(serde_json::to_string_pretty(metadata)?)
}

/// Parse an exported record back; sentinels come back as `NotAvailable`.
pub fn parse_export(text: &str) -> Result<NormalizedMetadata> {
    Ok(serde_json::from_str(text)?)
}

/// Serialize a record in one of the machine-readable export formats.
pub fn render_export(metadata: &NormalizedMetadata, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => export_text(metadata),
        OutputFormat::Yaml => Ok(serde_yaml::to_string(metadata)?),
        other => Err(MetascopeError::OutputFormatting(format!(
            "{:?} is not an export format; use json or yaml",
            other
        ))),
    }
}

/// `<stem>_metadata.<ext>` for the analyzed file's name.
pub fn suggest_filename(file_name: &str, format: OutputFormat) -> String {
    let stem = Path::new(file_name)
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "file".to_string());

    format!("{}_metadata.{}", stem, format.extension())
}

pub fn save_report_to_file(content: &str, file_path: &Path) -> Result<()> {
    if let Some(parent) = file_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(file_path, content)?;
    Ok(())
}

/// Write the record into `out_dir` under the suggested name.
pub fn export_to_dir(
    metadata: &NormalizedMetadata,
    file_name: &str,
    format: OutputFormat,
    out_dir: &Path,
) -> Result<PathBuf> {
    let content = render_export(metadata, format)?;
    let path = out_dir.join(suggest_filename(file_name, format));
    save_report_to_file(&content, &path)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::metadata::{field_map, Category, DisplayValue};
    use tempfile::tempdir;

    fn sample() -> NormalizedMetadata {
        let mut metadata = NormalizedMetadata::new();
        metadata.insert(Category::Basic, "fileName", "track.flac");
        metadata.insert(Category::Media, "album", DisplayValue::NotAvailable);
        metadata.insert(Category::Media, "artist", "Someone");
        metadata.insert_group("albumArt", field_map([("format", "image/png"), ("size", "512 bytes")]));
        metadata
    }

    #[test]
    fn test_export_parses_back_to_the_same_record() {
        let metadata = sample();
        let text = export_text(&metadata).unwrap();
        assert!(text.contains("\n  \"basic\": {"));
        assert!(text.contains("\"album\": \"N/A\""));

        let parsed = parse_export(&text).unwrap();
        assert_eq!(parsed, metadata);
        assert_eq!(parsed.field(Category::Media, "album"), Some(&DisplayValue::NotAvailable));
    }

    #[test]
    fn test_yaml_export_and_rejected_formats() {
        let yaml = render_export(&sample(), OutputFormat::Yaml).unwrap();
        assert!(yaml.contains("artist: Someone"));
        assert!(matches!(
            render_export(&sample(), OutputFormat::Markdown),
            Err(MetascopeError::OutputFormatting(_))
        ));
    }

    #[test]
    fn test_suggest_filename() {
        assert_eq!(suggest_filename("photo.jpg", OutputFormat::Json), "photo_metadata.json");
        assert_eq!(suggest_filename("backup.tar.gz", OutputFormat::Yaml), "backup.tar_metadata.yaml");
        assert_eq!(suggest_filename("Makefile", OutputFormat::Json), "Makefile_metadata.json");
        assert_eq!(suggest_filename("", OutputFormat::Markdown), "file_metadata.md");
    }

    #[test]
    fn test_export_to_dir() {
        let dir = tempdir().unwrap();
        let path = export_to_dir(&sample(), "track.flac", OutputFormat::Json, &dir.path().join("out")).unwrap();
        assert_eq!(path.file_name().unwrap(), "track_metadata.json");

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(parse_export(&written).unwrap(), sample());
    }
}
