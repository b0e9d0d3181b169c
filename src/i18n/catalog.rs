//! The list of selectable languages.

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::{
    Map,
    Value,
};

use super::types::LanguageCode;

/// One catalog entry as stored in `languages.json`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LanguageEntry {
    /// Label shown in the language selector.
    pub label: String,
}

/// Language code to display label, in resource order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LanguageCatalog {
    entries: IndexMap<LanguageCode, LanguageEntry>,
}

impl LanguageCatalog {
    /// Builds a catalog from a parsed JSON object.
    ///
    /// # Errors
    /// Returns the offending code and the serde error when an entry has no
    /// `label` string.
    pub fn from_json_object(
        object: &Map<String, Value>,
    ) -> Result<Self, (String, serde_json::Error)> {
        let entries = object
            .iter()
            .map(|(code, value)| {
                LanguageEntry::deserialize(value)
                    .map(|entry| (LanguageCode::new(code.clone()), entry))
                    .map_err(|e| (code.clone(), e))
            })
            .collect::<Result<IndexMap<_, _>, _>>()?;
        Ok(Self { entries })
    }

    pub fn iter(&self) -> impl Iterator<Item = (&LanguageCode, &LanguageEntry)> {
        self.entries.iter()
    }

    #[must_use]
    pub fn label(&self, code: &str) -> Option<&str> {
        self.entries.get(code).map(|entry| entry.label.as_str())
    }

    #[must_use]
    pub fn contains(&self, code: &str) -> bool {
        self.entries.contains_key(code)
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
