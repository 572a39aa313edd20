//! The normalized output record handed to the presentation layer

use indexmap::IndexMap;
use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical "value not available" marker.
pub const SENTINEL: &str = "N/A";

pub type FieldMap = IndexMap<String, DisplayValue>;

/// A value ready for display: stringified text, the sentinel, or a nested group.
#[derive(Debug, Clone, PartialEq)]
pub enum DisplayValue {
    Text(String),
    NotAvailable,
    Group(FieldMap),
}

impl DisplayValue {
    /// Empty strings and the literal sentinel collapse to `NotAvailable`.
    pub fn text(s: impl Into<String>) -> Self {
        let s = s.into();
        if s.is_empty() || s == SENTINEL {
            DisplayValue::NotAvailable
        } else {
            DisplayValue::Text(s)
        }
    }

    pub fn from_option<T: ToString>(value: Option<T>) -> Self {
        match value {
            Some(v) => DisplayValue::text(v.to_string()),
            None => DisplayValue::NotAvailable,
        }
    }

    pub fn yes_no(flag: bool) -> Self {
        DisplayValue::Text(if flag { "Yes" } else { "No" }.to_string())
    }

    pub fn is_available(&self) -> bool {
        !matches!(self, DisplayValue::NotAvailable)
    }

    /// True if this value, or anything nested below it, is not the sentinel.
    pub fn has_content(&self) -> bool {
        match self {
            DisplayValue::Text(_) => true,
            DisplayValue::NotAvailable => false,
            DisplayValue::Group(fields) => fields.values().any(DisplayValue::has_content),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            DisplayValue::Text(s) => Some(s),
            DisplayValue::NotAvailable => Some(SENTINEL),
            DisplayValue::Group(_) => None,
        }
    }

    pub fn as_group(&self) -> Option<&FieldMap> {
        match self {
            DisplayValue::Group(fields) => Some(fields),
            _ => None,
        }
    }
}

impl fmt::Display for DisplayValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayValue::Text(s) => f.write_str(s),
            DisplayValue::NotAvailable => f.write_str(SENTINEL),
            DisplayValue::Group(fields) => write!(f, "{} fields", fields.len()),
        }
    }
}

impl From<String> for DisplayValue {
    fn from(s: String) -> Self {
        DisplayValue::text(s)
    }
}

impl From<&str> for DisplayValue {
    fn from(s: &str) -> Self {
        DisplayValue::text(s)
    }
}

impl From<FieldMap> for DisplayValue {
    fn from(fields: FieldMap) -> Self {
        DisplayValue::Group(fields)
    }
}

impl Serialize for DisplayValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            DisplayValue::Text(s) => serializer.serialize_str(s),
            DisplayValue::NotAvailable => serializer.serialize_str(SENTINEL),
            DisplayValue::Group(fields) => fields.serialize(serializer),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum DisplayValueRepr {
    Text(String),
    Group(FieldMap),
}

impl<'de> Deserialize<'de> for DisplayValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        Ok(match DisplayValueRepr::deserialize(deserializer)? {
            DisplayValueRepr::Text(s) => DisplayValue::text(s),
            DisplayValueRepr::Group(fields) => DisplayValue::Group(fields),
        })
    }
}

/// Top-level display groupings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Basic,
    Technical,
    Media,
    Content,
    Security,
    Custom,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Basic,
        Category::Technical,
        Category::Media,
        Category::Content,
        Category::Security,
        Category::Custom,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Category::Basic => "basic",
            Category::Technical => "technical",
            Category::Media => "media",
            Category::Content => "content",
            Category::Security => "security",
            Category::Custom => "custom",
        }
    }

    /// Heading used by the console and markdown views.
    pub fn title(&self) -> &'static str {
        match self {
            Category::Basic => "File Information",
            Category::Technical => "Technical Details",
            Category::Media => "Camera & Media Settings",
            Category::Content => "Content",
            Category::Security => "Security & Integrity",
            Category::Custom => "Extended Data",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Category name -> display name -> display value, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NormalizedMetadata {
    categories: IndexMap<Category, FieldMap>,
}

impl NormalizedMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace a whole category.
    pub fn set_category(&mut self, category: Category, fields: FieldMap) {
        self.categories.insert(category, fields);
    }

    pub fn category_mut(&mut self, category: Category) -> &mut FieldMap {
        self.categories.entry(category).or_default()
    }

    pub fn insert(&mut self, category: Category, name: &str, value: impl Into<DisplayValue>) {
        self.category_mut(category).insert(name.to_string(), value.into());
    }

    /// Attach a named group under `custom`.
    pub fn insert_group(&mut self, name: &str, fields: FieldMap) {
        self.category_mut(Category::Custom)
            .insert(name.to_string(), DisplayValue::Group(fields));
    }

    pub fn get(&self, category: Category) -> Option<&FieldMap> {
        self.categories.get(&category)
    }

    pub fn field(&self, category: Category, name: &str) -> Option<&DisplayValue> {
        self.categories.get(&category).and_then(|fields| fields.get(name))
    }

    /// Text of a field, if present and not a group.
    pub fn text(&self, category: Category, name: &str) -> Option<&str> {
        self.field(category, name).and_then(DisplayValue::as_text)
    }

    pub fn group(&self, name: &str) -> Option<&FieldMap> {
        self.field(Category::Custom, name).and_then(DisplayValue::as_group)
    }

    pub fn has_category(&self, category: Category) -> bool {
        self.categories.contains_key(&category)
    }

    pub fn categories(&self) -> impl Iterator<Item = (&Category, &FieldMap)> {
        self.categories.iter()
    }

    pub fn field_count(&self) -> usize {
        self.categories.values().map(|fields| fields.len()).sum()
    }

    /// Drop custom groups and categories that hold nothing but sentinels.
    pub fn finish(mut self) -> Self {
        if let Some(custom) = self.categories.get_mut(&Category::Custom) {
            custom.retain(|_, value| match value {
                DisplayValue::Group(_) => value.has_content(),
                _ => true,
            });
        }
        self.categories
            .retain(|_, fields| fields.values().any(DisplayValue::has_content));
        self
    }
}

/// Build a `FieldMap` from `(name, value)` pairs, preserving order.
pub fn field_map<I, K, V>(pairs: I) -> FieldMap
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<DisplayValue>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}
