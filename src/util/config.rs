//! Runtime configuration, read once from the environment at startup.

use std::env;

use thiserror::Error;
use url::Url;

pub const API_URL_VAR: &str = "FREIGHTDOK_API_URL";
pub const PAGE_LIMIT_VAR: &str = "FREIGHTDOK_PAGE_LIMIT";

const DEVELOPMENT_API_URL: &str = "http://localhost:5001/";
const PRODUCTION_API_URL: &str = "https://api.freightdok.io/";
const DEFAULT_PAGE_LIMIT: u32 = 100;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("FREIGHTDOK_API_URL is not a valid URL: {0}")]
    InvalidApiUrl(#[from] url::ParseError),
    #[error("FREIGHTDOK_PAGE_LIMIT must be a positive integer, got {0:?}")]
    InvalidPageLimit(String),
}

#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    /// Base URL of the REST API, always ending in `/`.
    pub api_url: Url,
    /// Page size requested from the listing endpoints.
    pub page_limit: u32,
}

impl AppConfig {
    /// Configuration with nothing overridden by the environment.
    pub fn built_in() -> Result<Self, ConfigError> {
        let default_url = if cfg!(debug_assertions) {
            DEVELOPMENT_API_URL
        } else {
            PRODUCTION_API_URL
        };
        Ok(Self {
            api_url: parse_base_url(default_url)?,
            page_limit: DEFAULT_PAGE_LIMIT,
        })
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::built_in()?;
        if let Some(raw) = lookup(API_URL_VAR).filter(|raw| !raw.trim().is_empty()) {
            config.api_url = parse_base_url(raw.trim())?;
        }
        if let Some(raw) = lookup(PAGE_LIMIT_VAR).filter(|raw| !raw.trim().is_empty()) {
            config.page_limit = raw
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|limit| *limit > 0)
                .ok_or(ConfigError::InvalidPageLimit(raw))?;
        }
        Ok(config)
    }
}

/// Parses `raw` and makes sure relative joins keep its path.
fn parse_base_url(raw: &str) -> Result<Url, url::ParseError> {
    let mut url = Url::parse(raw)?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_without_environment() {
        let config = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, AppConfig::built_in().unwrap());
        assert_eq!(config.page_limit, 100);
        assert!(config.api_url.path().ends_with('/'));
    }

    #[test]
    fn base_url_keeps_its_path() {
        let config =
            AppConfig::from_lookup(lookup(&[(API_URL_VAR, "https://staging.example.com/v2")]))
                .unwrap();
        assert_eq!(
            config.api_url.join("api/load/me").unwrap().as_str(),
            "https://staging.example.com/v2/api/load/me"
        );
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            AppConfig::from_lookup(lookup(&[(API_URL_VAR, "not a url")])),
            Err(ConfigError::InvalidApiUrl(_))
        ));
        assert!(matches!(
            AppConfig::from_lookup(lookup(&[(PAGE_LIMIT_VAR, "0")])),
            Err(ConfigError::InvalidPageLimit(_))
        ));
    }
}
