//! Output generation module
//! Renders analysis results for the terminal and exports them to disk

pub mod export;
pub mod formatter;
pub mod report;

pub use export::{export_text, export_to_dir, parse_export, suggest_filename};
pub use formatter::{OutputFormatter, ReportGenerator};
pub use report::MetadataReport;
