//! Error handling for the metadata inspector

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MetascopeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The external extractor threw or returned nothing usable.
    #[error("Extraction failed: {0}")]
    ExtractionFailed(String),

    /// The extractor succeeded but produced an empty result.
    #[error("No metadata found: {0}")]
    NoMetadataFound(String),

    /// The container opened but its metadata could not be read.
    #[error("Partial extraction: {0}")]
    PartialExtraction(String),

    #[error("Unsupported or binary content: {0}")]
    UnsupportedOrBinary(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Output formatting error: {0}")]
    OutputFormatting(String),
}

impl MetascopeError {
    /// Short class name surfaced in failure fragments (`errorType`).
    pub fn kind(&self) -> &'static str {
        match self {
            MetascopeError::Io(_) => "IoError",
            MetascopeError::ExtractionFailed(_) => "ExtractionFailed",
            MetascopeError::NoMetadataFound(_) => "NoMetadataFound",
            MetascopeError::PartialExtraction(_) => "PartialExtraction",
            MetascopeError::UnsupportedOrBinary(_) => "UnsupportedOrBinary",
            MetascopeError::Configuration(_) => "ConfigurationError",
            MetascopeError::Serialization(_) => "SerializationError",
            MetascopeError::Yaml(_) => "YamlError",
            MetascopeError::InvalidInput(_) => "InvalidInput",
            MetascopeError::OutputFormatting(_) => "OutputFormattingError",
        }
    }

    /// The message without the kind prefix added by `Display`.
    pub fn detail(&self) -> String {
        match self {
            MetascopeError::Io(e) => e.to_string(),
            MetascopeError::Serialization(e) => e.to_string(),
            MetascopeError::Yaml(e) => e.to_string(),
            MetascopeError::ExtractionFailed(msg)
            | MetascopeError::NoMetadataFound(msg)
            | MetascopeError::PartialExtraction(msg)
            | MetascopeError::UnsupportedOrBinary(msg)
            | MetascopeError::Configuration(msg)
            | MetascopeError::InvalidInput(msg)
            | MetascopeError::OutputFormatting(msg) => msg.clone(),
        }
    }
}

pub type Result<T> = std::result::Result<T, MetascopeError>;

/// Convert anyhow errors to our custom error type
impl From<anyhow::Error> for MetascopeError {
    fn from(err: anyhow::Error) -> Self {
        MetascopeError::ExtractionFailed(err.to_string())
    }
}
