//! Field lookup with fallback across sections and name synonyms

use crate::normalize::metadata::DisplayValue;
use crate::normalize::value::{RawTags, RawValue, Scalar, SectionKey};

/// Marker text shown for embedded binary payloads.
pub const EMBEDDED_IMAGE: &str = "[Embedded Image]";

/// Derive the display value of a single raw field.
pub fn display_value(raw: &RawValue) -> DisplayValue {
    match raw {
        RawValue::Described { value, description } => {
            match description.as_deref().filter(|d| !d.is_empty()) {
                Some(desc) => DisplayValue::text(desc),
                None => scalar_display(value.as_ref()),
            }
        }
        RawValue::EmbeddedBinary { .. } => DisplayValue::Text(EMBEDDED_IMAGE.to_string()),
        RawValue::Nested(value) => nested_display(value),
        RawValue::Scalar(scalar) => scalar_display(Some(scalar)),
    }
}

fn scalar_display(scalar: Option<&Scalar>) -> DisplayValue {
    match scalar {
        Some(s) => DisplayValue::text(s.to_string()),
        None => DisplayValue::NotAvailable,
    }
}

fn nested_display(value: &serde_json::Value) -> DisplayValue {
    match value {
        serde_json::Value::Null => DisplayValue::NotAvailable,
        serde_json::Value::String(s) => DisplayValue::text(s.as_str()),
        other => match serde_json::to_string(other) {
            Ok(s) => DisplayValue::text(s),
            Err(_) => DisplayValue::NotAvailable,
        },
    }
}

/// Return the first non-sentinel value found, walking `sections` in order and
/// `synonyms` in order within each section.
pub fn lookup(tags: &RawTags, sections: &[SectionKey], synonyms: &[&str]) -> DisplayValue {
    for key in sections {
        let Some(section) = tags.section(*key) else {
            continue;
        };
        for name in synonyms {
            if let Some(raw) = section.get(*name) {
                let value = display_value(raw);
                if value.is_available() {
                    return value;
                }
            }
        }
    }
    DisplayValue::NotAvailable
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const SECTIONS: &[SectionKey] = &[
        SectionKey::Root,
        SectionKey::Named("file"),
        SectionKey::Named("Thumbnail"),
    ];

    #[test]
    fn test_described_prefers_description() {
        let raw = RawValue::described(28i64, "f/2.8");
        assert_eq!(display_value(&raw), DisplayValue::Text("f/2.8".to_string()));

        let raw = RawValue::Described {
            value: Some(Scalar::Integer(6)),
            description: Some(String::new()),
        };
        assert_eq!(display_value(&raw), DisplayValue::Text("6".to_string()));

        let raw = RawValue::Described { value: None, description: None };
        assert_eq!(display_value(&raw), DisplayValue::NotAvailable);
    }

    #[test]
    fn test_embedded_and_nested() {
        assert_eq!(
            display_value(&RawValue::EmbeddedBinary { len: 10 }),
            DisplayValue::Text("[Embedded Image]".to_string())
        );
        assert_eq!(
            display_value(&RawValue::Nested(json!({"a": [1, 2]}))),
            DisplayValue::Text(r#"{"a":[1,2]}"#.to_string())
        );
        assert_eq!(
            display_value(&RawValue::Nested(serde_json::Value::Null)),
            DisplayValue::NotAvailable
        );
    }

    #[test]
    fn test_lookup_skips_empty_and_falls_through_sections() {
        let mut tags = RawTags::new();
        tags.insert("ImageWidth", RawValue::text(""));
        tags.insert_in("file", "ImageWidth", RawValue::described(4000i64, "4000px"));

        assert_eq!(
            lookup(&tags, SECTIONS, &["ImageWidth", "PixelXDimension"]),
            DisplayValue::Text("4000px".to_string())
        );
    }

    #[test]
    fn test_lookup_missing_everywhere_is_sentinel() {
        let tags = RawTags::new();
        assert_eq!(lookup(&tags, SECTIONS, &["Make"]), DisplayValue::NotAvailable);
    }

    #[test]
    fn test_lookup_is_order_sensitive_and_idempotent() {
        let mut tags = RawTags::new();
        tags.insert("DateTime", RawValue::text("2024:01:01 10:00:00"));
        tags.insert("DateTimeOriginal", RawValue::text("2023:12:31 09:00:00"));

        let first = lookup(&tags, SECTIONS, &["DateTime", "DateTimeOriginal"]);
        let again = lookup(&tags, SECTIONS, &["DateTime", "DateTimeOriginal"]);
        let reordered = lookup(&tags, SECTIONS, &["DateTimeOriginal", "DateTime"]);

        assert_eq!(first, again);
        assert_eq!(first, DisplayValue::Text("2024:01:01 10:00:00".to_string()));
        assert_eq!(reordered, DisplayValue::Text("2023:12:31 09:00:00".to_string()));
    }

    #[test]
    fn test_section_order_beats_synonym_order() {
        let mut tags = RawTags::new();
        tags.insert("PixelXDimension", RawValue::text("800"));
        tags.insert_in("file", "ImageWidth", RawValue::text("1600"));

        assert_eq!(
            lookup(&tags, SECTIONS, &["ImageWidth", "PixelXDimension"]),
            DisplayValue::Text("800".to_string())
        );
    }
}
