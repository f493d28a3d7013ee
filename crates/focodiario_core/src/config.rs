//! Remote service configuration.
//!
//! # Responsibility
//! - Validate the backend endpoint and API key before any client is built.
//! - Resolve configuration from process environment for shell integrations.
//!
//! # Invariants
//! - `RemoteConfig::endpoint` is an absolute http(s) URL without trailing `/`.
//! - `RemoteConfig::api_key` is never empty and never logged.

use reqwest::Url;
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};

pub const ENDPOINT_ENV: &str = "FOCODIARIO_SUPABASE_URL";
pub const API_KEY_ENV: &str = "FOCODIARIO_SUPABASE_ANON_KEY";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    MissingVar(&'static str),
    InvalidEndpoint(String),
    EmptyApiKey,
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingVar(name) => write!(f, "environment variable `{name}` is not set"),
            Self::InvalidEndpoint(detail) => write!(f, "invalid backend endpoint: {detail}"),
            Self::EmptyApiKey => write!(f, "backend api key cannot be empty"),
        }
    }
}

impl Error for ConfigError {}

/// Connection settings for the hosted backend.
#[derive(Clone, PartialEq, Eq)]
pub struct RemoteConfig {
    endpoint: String,
    api_key: String,
}

impl RemoteConfig {
    /// Validates and normalizes `endpoint` and `api_key`.
    ///
    /// # Errors
    /// - `InvalidEndpoint` when the URL does not parse or is not http(s).
    /// - `EmptyApiKey` when the key is blank.
    pub fn new(endpoint: &str, api_key: &str) -> Result<Self, ConfigError> {
        let trimmed = endpoint.trim().trim_end_matches('/');
        let parsed = Url::parse(trimmed)
            .map_err(|err| ConfigError::InvalidEndpoint(format!("`{trimmed}`: {err}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidEndpoint(format!(
                "`{trimmed}`: scheme must be http or https"
            )));
        }
        if parsed.host_str().is_none() {
            return Err(ConfigError::InvalidEndpoint(format!(
                "`{trimmed}`: missing host"
            )));
        }

        let api_key = api_key.trim();
        if api_key.is_empty() {
            return Err(ConfigError::EmptyApiKey);
        }

        Ok(Self {
            endpoint: trimmed.to_string(),
            api_key: api_key.to_string(),
        })
    }

    /// Reads `FOCODIARIO_SUPABASE_URL` and `FOCODIARIO_SUPABASE_ANON_KEY`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let endpoint = lookup(ENDPOINT_ENV)
            .filter(|value| !value.trim().is_empty())
            .ok_or(ConfigError::MissingVar(ENDPOINT_ENV))?;
        let api_key = lookup(API_KEY_ENV)
            .filter(|value| !value.trim().is_empty())
            .ok_or(ConfigError::MissingVar(API_KEY_ENV))?;
        Self::new(&endpoint, &api_key)
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }
}

impl Debug for RemoteConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteConfig")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, RemoteConfig, API_KEY_ENV, ENDPOINT_ENV};

    #[test]
    fn new_trims_trailing_slash() {
        let config = RemoteConfig::new(" https://abc.supabase.co/ ", "anon").unwrap();
        assert_eq!(config.endpoint(), "https://abc.supabase.co");
        assert_eq!(config.api_key(), "anon");
    }

    #[test]
    fn new_rejects_non_http_scheme_and_relative_urls() {
        assert!(matches!(
            RemoteConfig::new("ftp://abc.supabase.co", "anon"),
            Err(ConfigError::InvalidEndpoint(_))
        ));
        assert!(matches!(
            RemoteConfig::new("abc.supabase.co", "anon"),
            Err(ConfigError::InvalidEndpoint(_))
        ));
    }

    #[test]
    fn new_rejects_blank_key() {
        assert_eq!(
            RemoteConfig::new("https://abc.supabase.co", "  "),
            Err(ConfigError::EmptyApiKey)
        );
    }

    #[test]
    fn from_lookup_reports_missing_variable() {
        let err = RemoteConfig::from_lookup(|name| {
            (name == ENDPOINT_ENV).then(|| "https://abc.supabase.co".to_string())
        })
        .unwrap_err();
        assert_eq!(err, ConfigError::MissingVar(API_KEY_ENV));
    }

    #[test]
    fn debug_output_redacts_key() {
        let config = RemoteConfig::new("https://abc.supabase.co", "super-secret").unwrap();
        assert!(!format!("{config:?}").contains("super-secret"));
    }
}
