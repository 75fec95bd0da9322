//! Wikidata API Client
//!
//! HTTP client for the Wikibase `api.php` actions used by the resolver.
//!
//! # Important
//!
//! Wikimedia requires an identifying User-Agent header; anonymous clients are
//! throttled or refused.

use super::types::{EntitiesResponse, SearchEntitiesResponse};
use crate::config::WikidataConfig;
use crate::error::WikidataError;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;

/// The two Wikibase actions the resolver needs
///
/// Implemented by [`WikidataClient`] over HTTP, and by scripted fakes in tests.
#[async_trait]
pub trait WikidataApi: Send + Sync {
    /// Language used for search results and labels
    fn language(&self) -> &str;

    /// `action=wbsearchentities` for a single term
    async fn search_entities(&self, term: &str) -> Result<SearchEntitiesResponse, WikidataError>;

    /// `action=wbgetentities` for a batch of ids
    async fn get_entities(&self, ids: &[String]) -> Result<EntitiesResponse, WikidataError>;
}

/// Wikidata API client
pub struct WikidataClient {
    http: Client,
    config: WikidataConfig,
}

impl WikidataClient {
    /// Create a new client from explicit configuration
    pub fn new(config: WikidataConfig) -> Result<Self> {
        config.validate().context("Invalid Wikidata configuration")?;

        let http = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.clone())
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { http, config })
    }

    /// Create a new client from `WIKIDATA_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::new(WikidataConfig::from_env()?)
    }

    pub fn config(&self) -> &WikidataConfig {
        &self.config
    }

    /// Make a GET request against `api.php` and decode the JSON body
    async fn fetch<T: DeserializeOwned>(&self, params: &[(&str, &str)]) -> Result<T, WikidataError> {
        tracing::debug!(url = %self.config.api_url, ?params, "Wikidata request");

        let response = self
            .http
            .get(self.config.api_url.clone())
            .query(params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(WikidataError::http(status.as_u16(), &body));
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

impl Default for WikidataClient {
    fn default() -> Self {
        Self::new(WikidataConfig::default()).expect("Failed to create Wikidata client")
    }
}

#[async_trait]
impl WikidataApi for WikidataClient {
    fn language(&self) -> &str {
        &self.config.language
    }

    async fn search_entities(&self, term: &str) -> Result<SearchEntitiesResponse, WikidataError> {
        self.fetch(&[
            ("action", "wbsearchentities"),
            ("format", "json"),
            ("search", term),
            ("language", self.config.language.as_str()),
        ])
        .await
    }

    async fn get_entities(&self, ids: &[String]) -> Result<EntitiesResponse, WikidataError> {
        let ids = join_ids(ids);
        self.fetch(&[
            ("action", "wbgetentities"),
            ("ids", ids.as_str()),
            ("format", "json"),
            ("languages", self.config.language.as_str()),
        ])
        .await
    }
}

/// Pipe-join ids the way `wbgetentities` expects
pub fn join_ids(ids: &[String]) -> String {
    ids.join("|")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_ids() {
        assert_eq!(join_ids(&[]), "");
        assert_eq!(join_ids(&["Q1".to_string()]), "Q1");
        assert_eq!(
            join_ids(&["Q1".to_string(), "Q42".to_string(), "P31".to_string()]),
            "Q1|Q42|P31"
        );
    }

    #[test]
    fn test_client_keeps_config() {
        let config = WikidataConfig::default().with_language("de");
        let client = WikidataClient::new(config.clone()).unwrap();
        assert_eq!(client.config(), &config);
        assert_eq!(client.language(), "de");
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let err = WikidataClient::new(WikidataConfig::default().with_timeout_secs(0))
            .err()
            .expect("zero timeout must be rejected");
        assert!(err.to_string().contains("Invalid Wikidata configuration"));

        assert!(WikidataClient::new(WikidataConfig::default().with_language("")).is_err());
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_transport_error() {
        // Port 9 (discard) on localhost is expected to refuse connections
        let config = WikidataConfig::default()
            .with_api_url(url::Url::parse("http://127.0.0.1:9/w/api.php").unwrap())
            .with_timeout_secs(2);
        let client = WikidataClient::new(config).unwrap();

        let err = client.search_entities("tokamak").await.unwrap_err();
        assert!(err.is_transport(), "got {:?}", err);
    }
}
