use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Configuration error in '{field_path}': {message}")]
pub struct ValidationError {
    /// JSON path to the field (e.g., "translationDir")
    pub field_path: String,
    pub message: String,
}

impl ValidationError {
    #[must_use]
    pub fn new(field_path: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field_path: field_path.into(), message: message.into() }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration validation failed:\n{}", format_validation_errors(.0))]
    ValidationErrors(Vec<ValidationError>),

    #[error("Failed to load configuration file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),
}

fn format_validation_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .enumerate()
        .map(|(i, err)| format!("  {}. {} - {}", i + 1, err.field_path, err.message))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Settings read from `.confession.json`.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct PageSettings {
    /// Directory every resource path is resolved against.
    pub resource_root: String,
    /// Translation resources live at `<translation_dir>/<code>.json`.
    pub translation_dir: String,
    pub catalog_path: String,
    /// Loaded when the detected language cannot be.
    pub default_language: String,
    pub preference_file: String,
    /// Storage key of the persisted language preference.
    pub preference_key: String,
    /// Usernames are cut to this many characters.
    pub username_max_chars: usize,
}

impl Default for PageSettings {
    fn default() -> Self {
        Self {
            resource_root: ".".to_string(),
            translation_dir: "i18n".to_string(),
            catalog_path: "languages.json".to_string(),
            default_language: "en".to_string(),
            preference_file: ".confession-preferences.json".to_string(),
            preference_key: "userLangPreference".to_string(),
            username_max_chars: 20,
        }
    }
}

impl PageSettings {
    /// # Errors
    /// - Required field is empty
    /// - Translation directory contains template braces
    /// - Username limit is zero
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        let required = [
            ("resourceRoot", &self.resource_root, "Example: \".\""),
            ("translationDir", &self.translation_dir, "Example: \"i18n\""),
            ("catalogPath", &self.catalog_path, "Example: \"languages.json\""),
            ("defaultLanguage", &self.default_language, "Example: \"en\""),
            ("preferenceFile", &self.preference_file, "Example: \".confession-preferences.json\""),
            ("preferenceKey", &self.preference_key, "Example: \"userLangPreference\""),
        ];
        for (field, value, example) in required {
            if value.trim().is_empty() {
                errors.push(ValidationError::new(
                    field,
                    format!("The value cannot be empty. {example}"),
                ));
            }
        }

        if self.translation_dir.contains(['{', '}']) {
            errors.push(ValidationError::new(
                "translationDir",
                "The directory must be a plain path; the language code is appended automatically",
            ));
        }

        if self.username_max_chars == 0 {
            errors.push(ValidationError::new(
                "usernameMaxChars",
                "At least one character must be allowed. Example: 20",
            ));
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use googletest::prelude::*;
    use rstest::rstest;

    use super::*;

    #[googletest::test]
    fn default_settings_are_valid() {
        let settings = PageSettings::default();

        expect_that!(settings.validate().is_ok(), eq(true));
        expect_that!(settings.default_language.as_str(), eq("en"));
        expect_that!(settings.username_max_chars, eq(20));
    }

    #[rstest]
    fn deserializes_camel_case_and_fills_defaults() {
        let settings: PageSettings =
            serde_json::from_str(r#"{"defaultLanguage": "ja", "usernameMaxChars": 8}"#).unwrap();

        assert_eq!(settings.default_language, "ja");
        assert_eq!(settings.username_max_chars, 8);
        assert_eq!(settings.translation_dir, "i18n");
        assert_eq!(settings.preference_key, "userLangPreference");
    }

    #[rstest]
    #[case::empty_language(r#"{"defaultLanguage": ""}"#, "defaultLanguage")]
    #[case::blank_key(r#"{"preferenceKey": "  "}"#, "preferenceKey")]
    #[case::braces(r#"{"translationDir": "i18n/{lang}"}"#, "translationDir")]
    #[case::zero_limit(r#"{"usernameMaxChars": 0}"#, "usernameMaxChars")]
    fn invalid_settings_are_reported(#[case] json: &str, #[case] field: &str) {
        let settings: PageSettings = serde_json::from_str(json).unwrap();

        let errors = settings.validate().unwrap_err();

        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field_path, field);
    }

    #[rstest]
    fn config_error_lists_every_validation_error() {
        let error = ConfigError::ValidationErrors(vec![
            ValidationError::new("catalogPath", "empty"),
            ValidationError::new("usernameMaxChars", "zero"),
        ]);

        let message = error.to_string();

        assert!(message.contains("1. catalogPath - empty"));
        assert!(message.contains("2. usernameMaxChars - zero"));
    }
}
