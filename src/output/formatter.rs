//! Output formatters: console, JSON, YAML and Markdown renderings of a report

use crate::config::{OutputConfig, OutputFormat};
use crate::error::Result;
use crate::normalize::format::format_timestamp;
use crate::normalize::metadata::{Category, DisplayValue, FieldMap};
use crate::output::report::MetadataReport;
use colored::{Color, Colorize};

/// Custom group holding every raw extractor field; only shown in detailed mode.
const RAW_TAGS_GROUP: &str = "rawTags";

/// Trait for rendering a metadata report
pub trait OutputFormatter {
    fn format_report(&self, report: &MetadataReport) -> Result<String>;
    fn supports_format(&self) -> OutputFormat;
}

/// Console formatter with colored category headings
pub struct ConsoleFormatter {
    use_colors: bool,
    detailed: bool,
}

/// JSON formatter; emits the record exactly as exported
pub struct JsonFormatter {
    pretty: bool,
}

pub struct YamlFormatter;

/// Markdown formatter, one table per category
pub struct MarkdownFormatter {
    include_header: bool,
}

/// Report generator that coordinates the formatters
pub struct ReportGenerator {
    console_formatter: ConsoleFormatter,
    json_formatter: JsonFormatter,
    yaml_formatter: YamlFormatter,
    markdown_formatter: MarkdownFormatter,
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool, detailed: bool) -> Self {
        Self { use_colors, detailed }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn format_header(&self, title: &str, level: u8) -> String {
        let prefix = match level {
            1 => "█",
            2 => "▓",
            _ => "▒",
        };

        let color = match level {
            1 => Color::Blue,
            2 => Color::Green,
            _ => Color::Yellow,
        };

        if self.use_colors {
            format!("\n{} {}\n", prefix.color(color).bold(), title.color(color).bold())
        } else {
            format!("\n{} {}\n", prefix, title)
        }
    }

    fn format_value(&self, value: &DisplayValue) -> String {
        match value {
            DisplayValue::NotAvailable => self.colorize(&value.to_string(), Color::BrightBlack),
            _ => value.to_string(),
        }
    }

    fn format_fields(&self, output: &mut String, fields: &FieldMap, indent: usize) {
        let width = fields.keys().map(|k| k.chars().count()).max().unwrap_or(0);
        let pad = " ".repeat(indent);

        for (name, value) in fields {
            match value {
                DisplayValue::Group(group) => {
                    if name == RAW_TAGS_GROUP && !self.detailed {
                        output.push_str(&format!(
                            "{}{} {}\n",
                            pad,
                            self.colorize(name, Color::Cyan),
                            self.colorize(
                                &format!("({} entries, use --detailed to show)", group.len()),
                                Color::BrightBlack
                            )
                        ));
                        continue;
                    }
                    output.push_str(&format!("{}{}\n", pad, self.colorize(name, Color::Cyan)));
                    self.format_fields(output, group, indent + 2);
                }
                _ => {
                    output.push_str(&format!(
                        "{}{:width$}  {}\n",
                        pad,
                        name,
                        self.format_value(value),
                        width = width
                    ));
                }
            }
        }
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_report(&self, report: &MetadataReport) -> Result<String> {
        let mut output = String::new();

        output.push_str(&self.format_header(&format!("📁 {}", report.file_name), 1));
        output.push_str(&format!(
            "Strategy: {} | Generated: {}\n",
            self.colorize(&report.strategy.to_string(), Color::Cyan),
            format_timestamp(&report.generated_at)
        ));

        for (category, fields) in report.metadata.categories() {
            output.push_str(&self.format_header(category.title(), 2));
            self.format_fields(&mut output, fields, 2);
        }

        if self.detailed {
            output.push_str(&format!(
                "\n{} of {} fields populated\n",
                report.populated_field_count(),
                report.metadata.field_count()
            ));
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Console
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_report(&self, report: &MetadataReport) -> Result<String> {
        if self.pretty {
            Ok(serde_json::to_string_pretty(&report.metadata)?)
        } else {
            Ok(serde_json::to_string(&report.metadata)?)
        }
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Json
    }
}

impl OutputFormatter for YamlFormatter {
    fn format_report(&self, report: &MetadataReport) -> Result<String> {
        Ok(serde_yaml::to_string(&report.metadata)?)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Yaml
    }
}

impl MarkdownFormatter {
    pub fn new(include_header: bool) -> Self {
        Self { include_header }
    }

    fn escape_cell(text: &str) -> String {
        text.replace('|', "\\|").replace('\n', "<br>")
    }

    fn format_table(output: &mut String, fields: &FieldMap) {
        let scalars: Vec<_> = fields
            .iter()
            .filter(|(_, value)| value.as_group().is_none())
            .collect();
        if scalars.is_empty() {
            return;
        }

        output.push_str("| Field | Value |\n");
        output.push_str("|-------|-------|\n");
        for (name, value) in scalars {
            output.push_str(&format!(
                "| {} | {} |\n",
                Self::escape_cell(name),
                Self::escape_cell(&value.to_string())
            ));
        }
        output.push('\n');
    }

    fn format_groups(output: &mut String, fields: &FieldMap, depth: usize) {
        for (name, value) in fields {
            if let DisplayValue::Group(group) = value {
                output.push_str(&format!("{} {}\n\n", "#".repeat(depth), name));
                Self::format_table(output, group);
                Self::format_groups(output, group, (depth + 1).min(6));
            }
        }
    }
}

impl OutputFormatter for MarkdownFormatter {
    fn format_report(&self, report: &MetadataReport) -> Result<String> {
        let mut output = String::new();

        output.push_str(&format!("# 📁 {}\n\n", report.file_name));
        if self.include_header {
            output.push_str(&format!(
                "**Strategy:** {} | **Generated:** {}\n\n",
                report.strategy,
                format_timestamp(&report.generated_at)
            ));
        }

        for (category, fields) in report.metadata.categories() {
            output.push_str(&format!("## {}\n\n", category.title()));
            Self::format_table(&mut output, fields);
            if *category == Category::Custom {
                Self::format_groups(&mut output, fields, 3);
            }
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Markdown
    }
}

impl ReportGenerator {
    pub fn new() -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(true, false),
            json_formatter: JsonFormatter::new(true),
            yaml_formatter: YamlFormatter,
            markdown_formatter: MarkdownFormatter::new(true),
        }
    }

    pub fn with_options(use_colors: bool, detailed: bool, pretty_json: bool) -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(use_colors, detailed),
            json_formatter: JsonFormatter::new(pretty_json),
            yaml_formatter: YamlFormatter,
            markdown_formatter: MarkdownFormatter::new(true),
        }
    }

    pub fn from_config(config: &OutputConfig) -> Self {
        Self::with_options(config.color_output, config.detailed, config.pretty_json)
    }

    pub fn generate_report(&self, report: &MetadataReport, format: OutputFormat) -> Result<String> {
        let formatter: &dyn OutputFormatter = match format {
            OutputFormat::Console => &self.console_formatter,
            OutputFormat::Json => &self.json_formatter,
            OutputFormat::Yaml => &self.yaml_formatter,
            OutputFormat::Markdown => &self.markdown_formatter,
        };
        formatter.format_report(report)
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}
