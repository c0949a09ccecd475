//! Search Client - HTTP implementation of the SearchService port.
//!
//! Talks to the hosted document-search query endpoint:
//! `GET {base_url}/v1/environments/{env}/collections/{coll}/query`
//! with `version`, `query` and `count` parameters and basic authentication.
//! Documents come back under `results[]` with the title nested in
//! `extracted_metadata`; both title and body default to empty when absent.

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::time::Duration;

use crate::ports::{Document, SearchError, SearchQuery, SearchService};

/// Configuration for the search client.
#[derive(Debug, Clone)]
pub struct SearchClientConfig {
    /// Base URL of the document-search API.
    pub base_url: String,
    /// Username for basic authentication.
    username: String,
    /// Password for basic authentication.
    password: Secret<String>,
    /// API version date sent as a query parameter.
    pub version: String,
    /// Request timeout.
    pub timeout: Duration,
}

impl SearchClientConfig {
    /// Creates a new configuration with the given endpoint and credentials.
    pub fn new(
        base_url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            username: username.into(),
            password: Secret::new(password.into()),
            version: "2016-12-15".to_string(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Sets the API version date.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Exposes the password (for making requests).
    fn password(&self) -> &str {
        self.password.expose_secret()
    }
}

/// HTTP client for the search collaborator.
pub struct SearchClient {
    config: SearchClientConfig,
    client: Client,
}

impl SearchClient {
    /// Creates a new search client with the given configuration.
    pub fn new(config: SearchClientConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self { config, client }
    }

    /// Builds the query endpoint URL for a collection.
    fn query_url(&self, environment_id: &str, collection_id: &str) -> String {
        format!(
            "{}/v1/environments/{}/collections/{}/query",
            self.config.base_url.trim_end_matches('/'),
            environment_id,
            collection_id
        )
    }
}

#[async_trait]
impl SearchService for SearchClient {
    async fn query(&self, query: SearchQuery) -> Result<Vec<Document>, SearchError> {
        let count = query.count.to_string();
        let response = self
            .client
            .get(self.query_url(&query.environment_id, &query.collection_id))
            .query(&[
                ("version", self.config.version.as_str()),
                ("query", query.query.as_str()),
                ("count", count.as_str()),
            ])
            .basic_auth(&self.config.username, Some(self.config.password()))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SearchError::network(format!(
                        "request timed out after {}s",
                        self.config.timeout.as_secs()
                    ))
                } else if e.is_connect() {
                    SearchError::network(format!("connection failed: {}", e))
                } else {
                    SearchError::network(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SearchError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let wire: WireQueryResponse = response
            .json()
            .await
            .map_err(|e| SearchError::parse(e.to_string()))?;

        Ok(wire.results.into_iter().map(Document::from).collect())
    }
}

// ----- Wire Types -----

#[derive(Debug, Deserialize)]
struct WireQueryResponse {
    #[serde(default)]
    results: Vec<WireDocument>,
}

#[derive(Debug, Default, Deserialize)]
struct WireDocument {
    #[serde(default)]
    extracted_metadata: WireMetadata,
    #[serde(default)]
    text: String,
}

#[derive(Debug, Default, Deserialize)]
struct WireMetadata {
    #[serde(default)]
    title: String,
}

impl From<WireDocument> for Document {
    fn from(wire: WireDocument) -> Self {
        Document {
            title: wire.extracted_metadata.title,
            text: wire.text,
        }
    }
}
