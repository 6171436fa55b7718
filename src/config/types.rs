use std::collections::HashMap;
use std::path::PathBuf;

use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Configuration error in '{field_path}': {message}")]
pub struct ValidationError {
    /// JSON path to the field (e.g., "supportedLanguages[0]")
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

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct I18nSettings {
    /// Directory holding one `<lang>.json` locale bundle per language.
    pub locale_dir: PathBuf,

    /// Phrase/token dictionary consumed by the translation pipeline.
    /// If unset, only the built-in pattern rules are active.
    pub dictionary_path: Option<PathBuf>,

    pub default_language: String,
    /// Its bundle is always loaded before the UI is marked ready.
    pub fallback_language: String,
    pub supported_languages: Vec<String>,

    /// Preference key under which the chosen language is persisted.
    pub storage_key: String,

    /// Language code → value written to the document element's `lang` attribute.
    pub html_lang: HashMap<String, String>,

    pub skip: SkipSettings,

    /// Attributes translated on every visited element and watched for changes.
    pub translated_attributes: Vec<String>,
}

/// Subtrees excluded from free-text translation.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SkipSettings {
    pub attributes: Vec<String>,
    pub classes: Vec<String>,
    /// Elements carrying executable or styling payloads.
    pub excluded_tags: Vec<String>,
}

impl Default for SkipSettings {
    fn default() -> Self {
        Self {
            attributes: vec!["data-i18n-skip".to_string()],
            classes: vec!["i18n-skip".to_string(), "no-translate".to_string()],
            excluded_tags: vec!["script".to_string(), "style".to_string()],
        }
    }
}

impl I18nSettings {
    /// # Errors
    /// - Required field is empty
    /// - Default or fallback language is not supported
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if self.supported_languages.is_empty() {
            errors.push(ValidationError::new(
                "supportedLanguages",
                "At least one language is required. Example: [\"pt\", \"es\"]",
            ));
        }

        for (index, lang) in self.supported_languages.iter().enumerate() {
            if !is_valid_language_code(lang) {
                errors.push(ValidationError::new(
                    format!("supportedLanguages[{index}]"),
                    format!("Invalid language code '{lang}'"),
                ));
            }
        }

        for (field, lang) in
            [("defaultLanguage", &self.default_language), ("fallbackLanguage", &self.fallback_language)]
        {
            if lang.is_empty() {
                errors.push(ValidationError::new(field, "The language cannot be empty"));
            } else if !self.supported_languages.contains(lang) {
                errors.push(ValidationError::new(
                    field,
                    format!("'{lang}' is not listed in supportedLanguages"),
                ));
            }
        }

        if self.storage_key.is_empty() {
            errors.push(ValidationError::new("storageKey", "The storage key cannot be empty"));
        }

        if let Some(path) = &self.dictionary_path
            && path.as_os_str().is_empty()
        {
            errors.push(ValidationError::new(
                "dictionaryPath",
                "The path cannot be empty. Please specify a file, or remove this field",
            ));
        }

        for (index, tag) in self.skip.excluded_tags.iter().enumerate() {
            if tag.trim().is_empty() {
                errors.push(ValidationError::new(
                    format!("skip.excludedTags[{index}]"),
                    "The tag name cannot be empty",
                ));
            }
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }

    /// `lang` 属性に書き込む値
    #[must_use]
    pub fn html_lang_for<'a>(&'a self, lang: &'a str) -> &'a str {
        self.html_lang.get(lang).map_or(lang, String::as_str)
    }
}

/// Language codes are path components of locale files, so only a conservative
/// character set is accepted.
fn is_valid_language_code(code: &str) -> bool {
    !code.is_empty() && code.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

impl Default for I18nSettings {
    fn default() -> Self {
        Self {
            locale_dir: PathBuf::from("js/i18n"),
            dictionary_path: None,
            default_language: "es".to_string(),
            fallback_language: "pt".to_string(),
            supported_languages: vec!["pt".to_string(), "es".to_string()],
            storage_key: "lang".to_string(),
            html_lang: HashMap::from([("pt".to_string(), "pt-BR".to_string())]),
            skip: SkipSettings::default(),
            translated_attributes: vec![
                "title".to_string(),
                "placeholder".to_string(),
                "aria-label".to_string(),
                "aria-placeholder".to_string(),
            ],
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing, clippy::expect_used, clippy::panic)]
mod tests {
    use googletest::prelude::*;
    use rstest::*;

    use super::*;

    #[rstest]
    fn validate_valid_settings() {
        let settings = I18nSettings::default();

        assert_that!(settings.validate(), ok(anything()));
    }

    #[rstest]
    fn deserialize_partial_settings() {
        let json = r#"{"defaultLanguage": "pt", "skip": {"classes": ["raw"]}}"#;

        let settings: I18nSettings = serde_json::from_str(json).unwrap();

        assert_that!(settings.default_language, eq("pt"));
        assert_that!(settings.fallback_language, eq("pt"));
        assert_that!(settings.skip.classes, elements_are![eq("raw")]);
        assert_that!(settings.skip.attributes, elements_are![eq("data-i18n-skip")]);
    }

    #[rstest]
    fn deserialize_empty_settings() {
        let settings: I18nSettings = serde_json::from_str("{}").unwrap();

        assert_that!(settings.storage_key, eq("lang"));
        assert_that!(settings.supported_languages, elements_are![eq("pt"), eq("es")]);
        assert_that!(
            settings.translated_attributes,
            elements_are![eq("title"), eq("placeholder"), eq("aria-label"), eq("aria-placeholder")]
        );
        assert_that!(settings.dictionary_path, none());
    }

    #[rstest]
    #[case("pt", "pt-BR")]
    #[case("es", "es")]
    fn html_lang_mapping(#[case] lang: &str, #[case] expected: &str) {
        let settings = I18nSettings::default();

        assert_that!(settings.html_lang_for(lang), eq(expected));
    }

    #[rstest]
    fn validate_default_language_not_supported() {
        let settings =
            I18nSettings { default_language: "fr".to_string(), ..I18nSettings::default() };

        assert_that!(
            settings.validate(),
            err(elements_are![all![
                field!(ValidationError.field_path, eq("defaultLanguage")),
                field!(ValidationError.message, contains_substring("not listed"))
            ]])
        );
    }

    #[rstest]
    fn validate_invalid_language_code() {
        let settings = I18nSettings {
            supported_languages: vec!["pt".to_string(), "es".to_string(), "../etc".to_string()],
            ..I18nSettings::default()
        };

        assert_that!(
            settings.validate(),
            err(elements_are![all![
                field!(ValidationError.field_path, eq("supportedLanguages[2]")),
                field!(ValidationError.message, contains_substring("../etc"))
            ]])
        );
    }

    #[rstest]
    fn config_error_validation_errors_format() {
        let settings = I18nSettings {
            supported_languages: vec![],
            storage_key: String::new(),
            ..I18nSettings::default()
        };

        let errors = settings.validate().unwrap_err();
        let error_message = format!("{}", ConfigError::ValidationErrors(errors));

        assert_that!(error_message, contains_substring("Configuration validation failed"));
        assert_that!(error_message, contains_substring("1. supportedLanguages"));
        assert_that!(error_message, contains_substring("storageKey"));
    }
}
