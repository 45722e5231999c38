//! Environment variable helpers for service configuration.

use std::str::FromStr;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(String),
    #[error("invalid value for environment variable {key}: {value:?}")]
    Invalid { key: String, value: String },
}

/// Read a required variable. Blank values count as missing.
pub fn required(key: &str) -> Result<String, ConfigError> {
    required_from(key, |k| std::env::var(k).ok())
}

/// Read an optional variable, parsing it when present.
pub fn optional<T: FromStr>(key: &str, default: T) -> Result<T, ConfigError> {
    optional_from(key, default, |k| std::env::var(k).ok())
}

/// Variant of [`required`] with an injectable lookup.
pub fn required_from<F>(key: &str, lookup: F) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| ConfigError::Missing(key.to_string()))
}

/// Variant of [`optional`] with an injectable lookup.
pub fn optional_from<T, F>(key: &str, default: T, lookup: F) -> Result<T, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key).filter(|v| !v.trim().is_empty()) {
        None => Ok(default),
        Some(value) => value.trim().parse().map_err(|_| ConfigError::Invalid {
            key: key.to_string(),
            value,
        }),
    }
}
