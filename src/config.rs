//! Wikidata client configuration
//!
//! Loads the API endpoint and request settings from defaults, the environment,
//! or a YAML file.
//!
//! ```yaml
//! api_url: https://www.wikidata.org/w/api.php
//! user_agent: "WikidataClient/1.0 (https://github.com/ukaea/fuel)"
//! timeout_secs: 10
//! language: en
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use url::Url;

pub const DEFAULT_API_URL: &str = "https://www.wikidata.org/w/api.php";
pub const DEFAULT_USER_AGENT: &str = "WikidataClient/1.0 (https://github.com/ukaea/fuel)";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_LANGUAGE: &str = "en";

pub const ENV_API_URL: &str = "WIKIDATA_API_URL";
pub const ENV_USER_AGENT: &str = "WIKIDATA_USER_AGENT";
pub const ENV_TIMEOUT_SECS: &str = "WIKIDATA_TIMEOUT_SECS";
pub const ENV_LANGUAGE: &str = "WIKIDATA_LANGUAGE";

/// Settings for talking to a Wikibase `api.php` endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WikidataConfig {
    /// Full URL of the `api.php` endpoint
    pub api_url: Url,
    /// Identifying User-Agent header (Wikimedia rejects anonymous clients)
    pub user_agent: String,
    /// Per-request timeout
    pub timeout_secs: u64,
    /// Language for search results and labels
    pub language: String,
}

impl Default for WikidataConfig {
    fn default() -> Self {
        Self {
            api_url: Url::parse(DEFAULT_API_URL).expect("default API URL is valid"),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            language: DEFAULT_LANGUAGE.to_string(),
        }
    }
}

impl WikidataConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults overridden by `WIKIDATA_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from a YAML file; missing keys fall back to defaults
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Self = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(api_url) = lookup(ENV_API_URL) {
            config.api_url = Url::parse(&api_url)
                .with_context(|| format!("{} is not a valid URL: {}", ENV_API_URL, api_url))?;
        }
        if let Some(user_agent) = lookup(ENV_USER_AGENT) {
            config.user_agent = user_agent;
        }
        if let Some(timeout) = lookup(ENV_TIMEOUT_SECS) {
            config.timeout_secs = timeout
                .trim()
                .parse()
                .with_context(|| format!("{} must be a whole number of seconds", ENV_TIMEOUT_SECS))?;
        }
        if let Some(language) = lookup(ENV_LANGUAGE) {
            config.language = language;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn with_api_url(mut self, api_url: Url) -> Self {
        self.api_url = api_url;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Reject settings that would make every request fail
    pub fn validate(&self) -> Result<()> {
        if !matches!(self.api_url.scheme(), "http" | "https") {
            anyhow::bail!("api_url must be http(s), got {}", self.api_url);
        }
        if self.user_agent.trim().is_empty() {
            anyhow::bail!("user_agent must not be empty");
        }
        if self.timeout_secs == 0 {
            anyhow::bail!("timeout_secs must be greater than zero");
        }
        if self.language.trim().is_empty() {
            anyhow::bail!("language must not be empty");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = WikidataConfig::default();
        assert_eq!(config.api_url.as_str(), DEFAULT_API_URL);
        assert_eq!(config.user_agent, DEFAULT_USER_AGENT);
        assert_eq!(config.timeout(), Duration::from_secs(10));
        assert_eq!(config.language, "en");
    }

    #[test]
    fn test_env_overrides() {
        let config = WikidataConfig::from_lookup(lookup_from(&[
            (ENV_API_URL, "http://127.0.0.1:9000/w/api.php"),
            (ENV_TIMEOUT_SECS, "3"),
            (ENV_LANGUAGE, "de"),
        ]))
        .unwrap();

        assert_eq!(config.api_url.as_str(), "http://127.0.0.1:9000/w/api.php");
        assert_eq!(config.timeout_secs, 3);
        assert_eq!(config.language, "de");
        assert_eq!(config.user_agent, DEFAULT_USER_AGENT);
    }

    #[test]
    fn test_env_rejects_bad_values() {
        assert!(WikidataConfig::from_lookup(lookup_from(&[(ENV_API_URL, "not a url")])).is_err());
        assert!(WikidataConfig::from_lookup(lookup_from(&[(ENV_TIMEOUT_SECS, "ten")])).is_err());
        assert!(WikidataConfig::from_lookup(lookup_from(&[(ENV_TIMEOUT_SECS, "0")])).is_err());
        assert!(
            WikidataConfig::from_lookup(lookup_from(&[(ENV_API_URL, "ftp://example.org/api")]))
                .is_err()
        );
    }

    #[test]
    fn test_from_file_partial_yaml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "language: fr\ntimeout_secs: 4").unwrap();

        let config = WikidataConfig::from_file(file.path()).unwrap();
        assert_eq!(config.language, "fr");
        assert_eq!(config.timeout_secs, 4);
        assert_eq!(config.api_url.as_str(), DEFAULT_API_URL);
    }

    #[test]
    fn test_from_file_missing() {
        let err = WikidataConfig::from_file("/nonexistent/wikidata.yaml").unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }

    #[test]
    fn test_validate_rejects_builder_values() {
        assert!(WikidataConfig::default().validate().is_ok());
        assert!(WikidataConfig::default().with_timeout_secs(0).validate().is_err());
        assert!(WikidataConfig::default().with_language("").validate().is_err());
        assert!(WikidataConfig::default().with_user_agent("  ").validate().is_err());
    }

    #[test]
    fn test_builder() {
        let config = WikidataConfig::new()
            .with_api_url(Url::parse("http://localhost:1234/api.php").unwrap())
            .with_user_agent("test-agent/0.1")
            .with_timeout_secs(2)
            .with_language("es");

        assert_eq!(config.api_url.port(), Some(1234));
        assert_eq!(config.user_agent, "test-agent/0.1");
        assert_eq!(config.timeout_secs, 2);
        assert_eq!(config.language, "es");
    }
}
