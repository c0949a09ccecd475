//! Dialog Client - HTTP implementation of the DialogService port.
//!
//! Talks to the hosted dialog engine's workspace message endpoint:
//! `POST {base_url}/v1/workspaces/{workspace_id}/message?version={version}`
//! with basic authentication. Error replies are passed back verbatim so the
//! HTTP layer can propagate the collaborator's status and payload unchanged.
//!
//! # Configuration
//!
//! ```ignore
//! let config = DialogClientConfig::new("https://dialog.example.com/api", "user", "pass")
//!     .with_version("2016-10-21")
//!     .with_timeout(Duration::from_secs(30));
//!
//! let client = DialogClient::new(config);
//! ```

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::Serialize;
use serde_json::{Map, Value};
use std::time::Duration;

use crate::ports::{DialogError, DialogInput, DialogRequest, DialogResponse, DialogService};

/// Configuration for the dialog client.
#[derive(Debug, Clone)]
pub struct DialogClientConfig {
    /// Base URL of the dialog engine API.
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

impl DialogClientConfig {
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
            version: "2016-10-21".to_string(),
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

/// HTTP client for the dialog collaborator.
pub struct DialogClient {
    config: DialogClientConfig,
    client: Client,
}

/// Wire body for the message endpoint. The workspace identifier travels in
/// the URL path, not the body.
#[derive(Serialize)]
struct WireMessage<'a> {
    input: &'a DialogInput,
    context: &'a Map<String, Value>,
}

impl DialogClient {
    /// Creates a new dialog client with the given configuration.
    pub fn new(config: DialogClientConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self { config, client }
    }

    /// Builds the message endpoint URL for a workspace.
    fn message_url(&self, workspace_id: &str) -> String {
        format!(
            "{}/v1/workspaces/{}/message",
            self.config.base_url.trim_end_matches('/'),
            workspace_id
        )
    }
}

#[async_trait]
impl DialogService for DialogClient {
    async fn message(&self, request: DialogRequest) -> Result<DialogResponse, DialogError> {
        let body = WireMessage {
            input: &request.input,
            context: &request.context,
        };

        let response = self
            .client
            .post(self.message_url(&request.workspace_id))
            .query(&[("version", self.config.version.as_str())])
            .basic_auth(&self.config.username, Some(self.config.password()))
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    DialogError::network(format!(
                        "request timed out after {}s",
                        self.config.timeout.as_secs()
                    ))
                } else if e.is_connect() {
                    DialogError::network(format!("connection failed: {}", e))
                } else {
                    DialogError::network(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let text = response
                .text()
                .await
                .map_err(|e| DialogError::network(e.to_string()))?;
            // Keep the payload verbatim; fall back to raw text if it is not JSON
            let body = serde_json::from_str(&text).unwrap_or(Value::String(text));
            return Err(DialogError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<DialogResponse>()
            .await
            .map_err(|e| DialogError::parse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_builder_works() {
        let config = DialogClientConfig::new("https://dialog.example.com/api", "user", "pass")
            .with_version("2017-05-26")
            .with_timeout(Duration::from_secs(10));

        assert_eq!(config.base_url, "https://dialog.example.com/api");
        assert_eq!(config.version, "2017-05-26");
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.password(), "pass");
    }

    #[test]
    fn message_url_joins_workspace_path() {
        let config = DialogClientConfig::new("https://dialog.example.com/api/", "user", "pass");
        let client = DialogClient::new(config);
        assert_eq!(
            client.message_url("ws-123"),
            "https://dialog.example.com/api/v1/workspaces/ws-123/message"
        );
    }

    #[test]
    fn wire_message_omits_workspace_id() {
        let input = DialogInput::new("hello");
        let context = Map::new();
        let body = WireMessage {
            input: &input,
            context: &context,
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["input"]["text"], "hello");
        assert!(value.get("workspace_id").is_none());
    }
}
