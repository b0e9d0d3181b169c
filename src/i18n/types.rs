//! Translation data types.

use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::{
    Map,
    Value,
};

/// Identifier selecting a translation resource (e.g. `en`, `zh-CN`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LanguageCode(String);

impl LanguageCode {
    #[must_use]
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LanguageCode {
    fn from(code: &str) -> Self {
        Self::new(code)
    }
}

impl From<String> for LanguageCode {
    fn from(code: String) -> Self {
        Self(code)
    }
}

impl Borrow<str> for LanguageCode {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for LanguageCode {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for LanguageCode {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// A single translation entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranslationValue {
    Text(String),
    /// Ordered variants, e.g. the successive labels of the "No" button.
    Variants(Vec<String>),
}

impl TranslationValue {
    /// Converts one JSON value; `null` and nested objects have no translation form.
    fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(Self::Text(s.clone())),
            Value::Array(items) => Some(Self::Variants(
                items
                    .iter()
                    .map(|item| match item {
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    })
                    .collect(),
            )),
            Value::Number(_) | Value::Bool(_) => Some(Self::Text(value.to_string())),
            Value::Null | Value::Object(_) => None,
        }
    }
}

/// Key to translation mapping for one language.
///
/// Keeps the insertion order of the resource it was parsed from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslationMapping {
    entries: IndexMap<String, TranslationValue>,
}

impl TranslationMapping {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a mapping from a parsed JSON object.
    ///
    /// Entries without a translation form are skipped.
    #[must_use]
    pub fn from_json_object(object: &Map<String, Value>) -> Self {
        let mut mapping = Self::new();
        for (key, value) in object {
            match TranslationValue::from_json(value) {
                Some(translation) => mapping.insert(key.clone(), translation),
                None => tracing::debug!(key = %key, "Skipping translation entry without a text form"),
            }
        }
        mapping
    }

    /// Inserts or replaces an entry. A replaced entry keeps its position.
    pub fn insert(&mut self, key: impl Into<String>, value: TranslationValue) {
        self.entries.insert(key.into(), value);
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&TranslationValue> {
        self.entries.get(key)
    }

    /// Returns the entry as text, if it is a plain string.
    #[must_use]
    pub fn text(&self, key: &str) -> Option<&str> {
        match self.get(key)? {
            TranslationValue::Text(text) => Some(text.as_str()),
            TranslationValue::Variants(_) => None,
        }
    }

    /// Returns the entry as variants, if it is a sequence.
    #[must_use]
    pub fn variants(&self, key: &str) -> Option<&[String]> {
        match self.get(key)? {
            TranslationValue::Variants(variants) => Some(variants.as_slice()),
            TranslationValue::Text(_) => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TranslationValue)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The current language together with its mapping.
///
/// The two are always replaced as a unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub language: LanguageCode,
    pub translations: Arc<TranslationMapping>,
}
