//! Search collaborator configuration

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Search collaborator configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    /// Base URL of the hosted document-search API
    pub base_url: String,

    /// Username for basic authentication
    pub username: String,

    /// Password for basic authentication
    pub password: Secret<String>,

    /// API version date sent with every request
    #[serde(default = "default_version")]
    pub version: String,

    /// Search environment identifier
    pub environment_id: String,

    /// Document collection identifier
    pub collection_id: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl SearchConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Expose the password (for building the HTTP client)
    pub fn password(&self) -> &str {
        self.password.expose_secret()
    }

    /// Validate search collaborator configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ValidationError::InvalidBaseUrl("search"));
        }
        if self.username.is_empty() || self.password().is_empty() {
            return Err(ValidationError::MissingCredentials("search"));
        }
        if self.environment_id.is_empty() {
            return Err(ValidationError::MissingRequired("SEARCH__ENVIRONMENT_ID"));
        }
        if self.collection_id.is_empty() {
            return Err(ValidationError::MissingRequired("SEARCH__COLLECTION_ID"));
        }
        if self.timeout_secs == 0 || self.timeout_secs > 300 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

fn default_version() -> String {
    "2016-12-15".to_string()
}

fn default_timeout() -> u64 {
    30
}
