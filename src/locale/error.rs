use thiserror::Error;

/// Errors raised while loading a locale bundle.
///
/// A failed load leaves the cache empty so the next request retries.
#[derive(Error, Debug)]
pub enum LocaleError {
    #[error("Failed to load locale '{lang}': {source}")]
    Fetch {
        lang: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Locale '{lang}' is not available")]
    NotFound { lang: String },
    #[error("Failed to parse locale '{lang}': {source}")]
    Parse {
        lang: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Locale '{lang}' must be a JSON object")]
    NotAnObject { lang: String },
}

/// Errors raised while persisting the language preference.
#[derive(Error, Debug)]
pub enum PreferenceError {
    #[error("Failed to access preference file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse preference file: {0}")]
    Parse(#[from] serde_json::Error),
}
