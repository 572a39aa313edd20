//! Text-bearing documents: DOCX, plain text, JSON and YAML

use crate::config::AnalysisConfig;
use crate::extract::DocxText;
use crate::input::descriptor::FileDescriptor;
use crate::normalize::format::{char_count, line_count, truncate_preview, word_count};
use crate::normalize::metadata::{field_map, Category, DisplayValue, FieldMap, NormalizedMetadata};
use crate::normalize::with_basic;

/// Structured-text flavours with their own validity check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextFlavor {
    Plain,
    Json,
    Yaml,
}

impl TextFlavor {
    pub fn from_extension(extension: &str) -> Self {
        match extension {
            "json" => TextFlavor::Json,
            "yaml" | "yml" => TextFlavor::Yaml,
            _ => TextFlavor::Plain,
        }
    }
}

fn record(descriptor: &FileDescriptor, content: FieldMap) -> NormalizedMetadata {
    let mut metadata = with_basic(descriptor);
    metadata.set_category(Category::Content, content);
    metadata
}

pub fn normalize_docx(
    descriptor: &FileDescriptor,
    docx: &DocxText,
    config: &AnalysisConfig,
) -> NormalizedMetadata {
    let has_images = docx.messages.iter().any(|m| m.contains("image"));
    record(
        descriptor,
        field_map([
            ("textContent", DisplayValue::text(truncate_preview(&docx.value, config.document_preview_chars))),
            ("characterCount", DisplayValue::text(char_count(&docx.value).to_string())),
            ("wordCount", DisplayValue::text(word_count(&docx.value).to_string())),
            ("hasImages", DisplayValue::yes_no(has_images)),
        ]),
    )
}

pub fn normalize_text(
    descriptor: &FileDescriptor,
    text: &str,
    config: &AnalysisConfig,
) -> NormalizedMetadata {
    let content = match TextFlavor::from_extension(&descriptor.extension()) {
        TextFlavor::Plain => plain_text(text, config),
        TextFlavor::Json => match serde_json::from_str::<serde_json::Value>(text) {
            Ok(value) => structured("isValidJson", json_shape(&value, config.max_top_level_keys), text),
            Err(_) => invalid("isValidJson", text, config),
        },
        TextFlavor::Yaml => match serde_yaml::from_str::<serde_yaml::Value>(text) {
            Ok(value) => structured("isValidYaml", yaml_shape(&value, config.max_top_level_keys), text),
            Err(_) => invalid("isValidYaml", text, config),
        },
    };
    record(descriptor, content)
}

fn plain_text(text: &str, config: &AnalysisConfig) -> FieldMap {
    field_map([
        ("textContent", truncate_preview(text, config.document_preview_chars)),
        ("characterCount", char_count(text).to_string()),
        ("wordCount", word_count(text).to_string()),
        ("lineCount", line_count(text).to_string()),
    ])
}

/// Top-level type name and the leading keys of a parsed document.
struct Shape {
    object_type: &'static str,
    top_level_keys: Option<Vec<String>>,
}

fn structured(validity_field: &str, shape: Shape, text: &str) -> FieldMap {
    field_map([
        (validity_field, DisplayValue::text("Yes")),
        ("objectType", DisplayValue::text(shape.object_type)),
        (
            "topLevelKeys",
            DisplayValue::from_option(shape.top_level_keys.map(|keys| keys.join(", "))),
        ),
        ("characterCount", DisplayValue::text(char_count(text).to_string())),
    ])
}

fn invalid(validity_field: &str, text: &str, config: &AnalysisConfig) -> FieldMap {
    field_map([
        (validity_field, "No".to_string()),
        ("characterCount", char_count(text).to_string()),
        ("textPreview", truncate_preview(text, config.text_preview_chars)),
    ])
}

fn json_shape(value: &serde_json::Value, max_keys: usize) -> Shape {
    use serde_json::Value;

    let object_type = match value {
        Value::Array(_) => "Array",
        Value::Object(_) => "object",
        Value::String(_) => "string",
        Value::Number(_) => "number",
        Value::Bool(_) => "boolean",
        Value::Null => "null",
    };
    let top_level_keys = value
        .as_object()
        .map(|map| map.keys().take(max_keys).cloned().collect());

    Shape {
        object_type,
        top_level_keys,
    }
}

fn yaml_shape(value: &serde_yaml::Value, max_keys: usize) -> Shape {
    use serde_yaml::Value;

    match value {
        Value::Tagged(tagged) => yaml_shape(&tagged.value, max_keys),
        Value::Mapping(map) => Shape {
            object_type: "object",
            top_level_keys: Some(map.iter().take(max_keys).map(|(k, _)| yaml_key(k)).collect()),
        },
        other => Shape {
            object_type: match other {
                Value::Sequence(_) => "Array",
                Value::String(_) => "string",
                Value::Number(_) => "number",
                Value::Bool(_) => "boolean",
                _ => "null",
            },
            top_level_keys: None,
        },
    }
}

fn yaml_key(key: &serde_yaml::Value) -> String {
    use serde_yaml::Value;

    match key {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim().to_string())
            .unwrap_or_default(),
    }
}
