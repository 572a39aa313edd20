//! metascope: file metadata inspector

use clap::Parser;
use log::{error, info};
use metascope::cli::{self, Cli, Commands, ConfigAction};
use metascope::config::Config;
use metascope::error::{MetascopeError, Result};
use metascope::input::{classify, AnalysisManager, FileDescriptor};
use metascope::output::{export, MetadataReport, ReportGenerator};
use std::path::Path;
use std::process;

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config_path = cli.config.clone().unwrap_or_else(Config::config_path);

    // Load configuration
    let config = match Config::load_from(&config_path) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    // Execute command
    if let Err(e) = run_command(cli.command, config, &config_path).await {
        error!("Command failed: {}", e);
        process::exit(1);
    }
}

async fn describe(file: &Path, mime: Option<String>) -> Result<FileDescriptor> {
    let descriptor = FileDescriptor::from_path(file).await?;
    Ok(match mime {
        Some(mime) => descriptor.with_mime_type(mime),
        None => descriptor,
    })
}

async fn run_command(command: Commands, config: Config, config_path: &Path) -> Result<()> {
    match command {
        Commands::Analyze {
            file,
            format,
            mime,
            save,
            detailed,
        } => {
            let format = match format {
                Some(format) => cli::parse_output_format(&format).map_err(MetascopeError::InvalidInput)?,
                None => config.output.format,
            };

            let descriptor = describe(&file, mime).await?;
            let manager = AnalysisManager::new(&config);
            let metadata = manager.analyze(&descriptor).await;
            let report = MetadataReport::new(&descriptor, classify(&descriptor), metadata);

            let mut output = config.output.clone();
            output.color_output &= save.is_none();
            output.detailed |= detailed;
            let generator = ReportGenerator::from_config(&output);
            let rendered = generator.generate_report(&report, format)?;

            match save {
                Some(path) => {
                    export::save_report_to_file(&rendered, &path)?;
                    info!("Report saved to {}", path.display());
                    println!("✅ Report saved to {}", path.display());
                }
                None => println!("{}", rendered),
            }
        }

        Commands::Export {
            file,
            format,
            out_dir,
            mime,
        } => {
            let format = cli::parse_export_format(&format).map_err(MetascopeError::InvalidInput)?;

            let descriptor = describe(&file, mime).await?;
            let manager = AnalysisManager::new(&config);
            let metadata = manager.analyze(&descriptor).await;

            let path = export::export_to_dir(&metadata, &descriptor.name, format, &out_dir)?;
            info!("Exported metadata for {} to {}", descriptor.name, path.display());
            println!("✅ Exported to {}", path.display());
        }

        Commands::Classify { file, mime } => {
            let descriptor = describe(&file, mime).await?;
            let strategy = classify(&descriptor);
            let mime_type = if descriptor.mime_type.is_empty() {
                "unknown"
            } else {
                descriptor.mime_type.as_str()
            };
            println!("{}: {} ({})", descriptor.name, strategy, mime_type);
        }

        Commands::Config { action } => match action {
            Some(ConfigAction::Show) | None => {
                println!("⚙️  Current Configuration ({})\n", config_path.display());
                let content = toml::to_string_pretty(&config).map_err(|e| {
                    MetascopeError::Configuration(format!("Failed to serialize config: {}", e))
                })?;
                println!("{}", content);
            }

            Some(ConfigAction::Reset) => {
                println!("🔄 Resetting configuration to defaults...");
                Config::default().save_to(config_path)?;
                println!("✅ Configuration reset successfully!");
            }

            Some(ConfigAction::Path) => {
                println!("{}", config_path.display());
            }
        },
    }

    Ok(())
}
