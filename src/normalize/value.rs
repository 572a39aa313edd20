//! Raw extractor output: loosely structured sections of tagged values

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A bare value as reported by an extractor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Bool(b) => write!(f, "{}", b),
            Scalar::Integer(i) => write!(f, "{}", i),
            // f64's Display already drops a trailing ".0"
            Scalar::Float(v) => write!(f, "{}", v),
            Scalar::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::Text(s.to_string())
    }
}

impl From<String> for Scalar {
    fn from(s: String) -> Self {
        Scalar::Text(s)
    }
}

impl From<i64> for Scalar {
    fn from(v: i64) -> Self {
        Scalar::Integer(v)
    }
}

impl From<f64> for Scalar {
    fn from(v: f64) -> Self {
        Scalar::Float(v)
    }
}

/// One field of a raw extraction result.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Scalar(Scalar),
    /// Tag with a machine value and a human-readable rendering.
    Described {
        value: Option<Scalar>,
        description: Option<String>,
    },
    /// Binary payload such as an embedded thumbnail.
    EmbeddedBinary { len: usize },
    Nested(serde_json::Value),
}

impl RawValue {
    pub fn text(s: impl Into<String>) -> Self {
        RawValue::Scalar(Scalar::Text(s.into()))
    }

    pub fn described(value: impl Into<Scalar>, description: impl Into<String>) -> Self {
        RawValue::Described {
            value: Some(value.into()),
            description: Some(description.into()),
        }
    }
}

impl From<Scalar> for RawValue {
    fn from(s: Scalar) -> Self {
        RawValue::Scalar(s)
    }
}

pub type RawSection = IndexMap<String, RawValue>;

/// Which part of a raw result to search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKey {
    Root,
    Named(&'static str),
}

/// A tag dictionary: top-level fields plus named sub-sections.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTags {
    pub root: RawSection,
    pub sections: IndexMap<String, RawSection>,
}

impl RawTags {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: RawValue) {
        self.root.insert(name.into(), value);
    }

    pub fn insert_in(&mut self, section: &str, name: impl Into<String>, value: RawValue) {
        self.sections
            .entry(section.to_string())
            .or_default()
            .insert(name.into(), value);
    }

    pub fn section(&self, key: SectionKey) -> Option<&RawSection> {
        match key {
            SectionKey::Root => Some(&self.root),
            SectionKey::Named(name) => self.sections.get(name),
        }
    }

    pub fn has_section(&self, name: &str) -> bool {
        self.sections.get(name).is_some_and(|s| !s.is_empty())
    }

    /// True when any section carries a field with this name, whatever its value.
    pub fn contains_field(&self, name: &str) -> bool {
        self.root.contains_key(name) || self.sections.values().any(|s| s.contains_key(name))
    }

    /// Number of fields across all sections.
    pub fn tag_count(&self) -> usize {
        self.root.len() + self.sections.values().map(|s| s.len()).sum::<usize>()
    }

    pub fn is_empty(&self) -> bool {
        self.tag_count() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_display() {
        assert_eq!(Scalar::Float(2.0).to_string(), "2");
        assert_eq!(Scalar::Float(2.8).to_string(), "2.8");
        assert_eq!(Scalar::Integer(-3).to_string(), "-3");
        assert_eq!(Scalar::Bool(true).to_string(), "true");
    }

    #[test]
    fn test_tag_count_spans_sections() {
        let mut tags = RawTags::new();
        tags.insert("Make", RawValue::text("Canon"));
        tags.insert_in("Thumbnail", "Compression", RawValue::text("JPEG"));
        tags.insert_in("Thumbnail", "image", RawValue::EmbeddedBinary { len: 2048 });

        assert_eq!(tags.tag_count(), 3);
        assert!(tags.has_section("Thumbnail"));
        assert!(!tags.has_section("gps"));
        assert!(tags.contains_field("Compression"));
        assert!(!tags.contains_field("MakerNote"));
    }
}
