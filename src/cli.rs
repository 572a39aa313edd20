//! CLI interface for the metadata inspector

use crate::config::OutputFormat;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "metascope")]
#[command(about = "Inspect file metadata: EXIF, PDF, audio tags, documents")]
#[command(long_about = "Route a file to the right tag extractor and show its metadata grouped into display categories")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze a file and show its metadata
    Analyze {
        /// File to analyze
        file: PathBuf,

        /// Output format: console, json, yaml, markdown
        #[arg(short, long)]
        format: Option<String>,

        /// Declared media type, overriding the sniffed one
        #[arg(short, long)]
        mime: Option<String>,

        /// Save output to file
        #[arg(short, long)]
        save: Option<PathBuf>,

        /// Show raw tags and field statistics
        #[arg(short, long)]
        detailed: bool,
    },

    /// Export the metadata record as <stem>_metadata.<ext>
    Export {
        /// File to analyze
        file: PathBuf,

        /// Export format: json, yaml
        #[arg(short, long, default_value = "json")]
        format: String,

        /// Directory to write the export into
        #[arg(short, long, default_value = ".")]
        out_dir: PathBuf,

        /// Declared media type, overriding the sniffed one
        #[arg(short, long)]
        mime: Option<String>,
    },

    /// Show which analysis strategy a file would get
    Classify {
        file: PathBuf,

        #[arg(short, long)]
        mime: Option<String>,
    },

    /// Show configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Reset configuration to defaults
    Reset,

    /// Print the configuration file location
    Path,
}

/// Parse and validate output format
pub fn parse_output_format(format: &str) -> Result<OutputFormat, String> {
    match format.to_lowercase().as_str() {
        "console" => Ok(OutputFormat::Console),
        "json" => Ok(OutputFormat::Json),
        "yaml" | "yml" => Ok(OutputFormat::Yaml),
        "markdown" | "md" => Ok(OutputFormat::Markdown),
        _ => Err(format!(
            "Invalid output format: {}. Supported: console, json, yaml, markdown",
            format
        )),
    }
}

/// Like `parse_output_format`, restricted to the machine-readable formats.
pub fn parse_export_format(format: &str) -> Result<OutputFormat, String> {
    match parse_output_format(format)? {
        f @ (OutputFormat::Json | OutputFormat::Yaml) => Ok(f),
        _ => Err(format!("Invalid export format: {}. Supported: json, yaml", format)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_output_format() {
        assert_eq!(parse_output_format("JSON").unwrap(), OutputFormat::Json);
        assert_eq!(parse_output_format("md").unwrap(), OutputFormat::Markdown);
        assert_eq!(parse_output_format("yml").unwrap(), OutputFormat::Yaml);
        assert!(parse_output_format("html").is_err());
    }

    #[test]
    fn test_parse_export_format() {
        assert_eq!(parse_export_format("yaml").unwrap(), OutputFormat::Yaml);
        assert!(parse_export_format("console").is_err());
    }

    #[test]
    fn test_analyze_arguments() {
        let cli = Cli::parse_from(["metascope", "-v", "analyze", "photo.jpg", "--format", "json", "--detailed"]);
        assert!(cli.verbose);
        match cli.command {
            Commands::Analyze { file, format, detailed, save, .. } => {
                assert_eq!(file, PathBuf::from("photo.jpg"));
                assert_eq!(format.as_deref(), Some("json"));
                assert!(detailed);
                assert!(save.is_none());
            }
            _ => panic!("expected analyze"),
        }
    }
}
