//! Configuration management for the metadata inspector

use crate::error::{Result, MetascopeError};
use crate::extract::PdfOptions;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub pdf: PdfOptions,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Size bounds applied while reading and previewing file content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Files above this size are never read by the generic strategy.
    pub sniff_limit_bytes: u64,
    /// Leading bytes that must be printable for content to count as text.
    pub sniff_window_bytes: usize,
    pub text_preview_chars: usize,
    pub document_preview_chars: usize,
    pub max_top_level_keys: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub color_output: bool,
    pub pretty_json: bool,
    pub detailed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    Console,
    Json,
    Yaml,
    Markdown,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Console => "txt",
            OutputFormat::Json => "json",
            OutputFormat::Yaml => "yaml",
            OutputFormat::Markdown => "md",
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            sniff_limit_bytes: 1024 * 1024,
            sniff_window_bytes: 1000,
            text_preview_chars: 500,
            document_preview_chars: 1000,
            max_top_level_keys: 10,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Console,
            color_output: true,
            pretty_json: true,
            detailed: false,
        }
    }
}

impl Config {
    /// Load the config from `config_path`, writing defaults on first use.
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            let content = std::fs::read_to_string(config_path)?;
            let config: Config = toml::from_str(&content)
                .map_err(|e| MetascopeError::Configuration(format!("Failed to parse config: {}", e)))?;
            config.validate()?;
            Ok(config)
        } else {
            let config = Self::default();
            config.save_to(config_path)?;
            Ok(config)
        }
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| MetascopeError::Configuration(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("metascope")
            .join("config.toml")
    }

    fn validate(&self) -> Result<()> {
        if self.analysis.sniff_window_bytes == 0 {
            return Err(MetascopeError::Configuration(
                "analysis.sniff_window_bytes must be greater than zero".to_string(),
            ));
        }
        if self.analysis.text_preview_chars == 0 || self.analysis.document_preview_chars == 0 {
            return Err(MetascopeError::Configuration(
                "preview lengths must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_limits() {
        let config = Config::default();
        assert_eq!(config.analysis.sniff_limit_bytes, 1_048_576);
        assert_eq!(config.analysis.sniff_window_bytes, 1000);
        assert_eq!(config.analysis.text_preview_chars, 500);
        assert_eq!(config.analysis.document_preview_chars, 1000);
        assert_eq!(config.analysis.max_top_level_keys, 10);
    }

    #[test]
    fn test_load_writes_defaults_then_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let first = Config::load_from(&path).unwrap();
        assert!(path.exists());

        let second = Config::load_from(&path).unwrap();
        assert_eq!(first.analysis, second.analysis);
        assert_eq!(second.output.format, OutputFormat::Console);
    }

    #[test]
    fn test_partial_config_uses_section_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[output]\nformat = \"Json\"\ncolor_output = false\npretty_json = true\ndetailed = true\n",
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.output.format, OutputFormat::Json);
        assert!(!config.output.color_output);
        assert_eq!(config.analysis, AnalysisConfig::default());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[analysis]\nsniff_limit_bytes = 10\nsniff_window_bytes = 0\ntext_preview_chars = 5\ndocument_preview_chars = 5\nmax_top_level_keys = 1\n",
        )
        .unwrap();

        assert!(matches!(
            Config::load_from(&path),
            Err(MetascopeError::Configuration(_))
        ));
    }
}
