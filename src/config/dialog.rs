//! Dialog collaborator configuration

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Literal placeholder that deployment templates ship for the workspace
/// identifier. Treated the same as an unset value.
pub const WORKSPACE_PLACEHOLDER: &str = "<workspace-id>";

/// Dialog collaborator configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DialogConfig {
    /// Base URL of the hosted dialog engine API
    pub base_url: String,

    /// Username for basic authentication
    pub username: String,

    /// Password for basic authentication
    pub password: Secret<String>,

    /// API version date sent with every request
    #[serde(default = "default_version")]
    pub version: String,

    /// Workspace identifier selecting the dialog model to run against.
    ///
    /// Absence (or the literal placeholder) is a recoverable condition:
    /// the message endpoint replies with setup guidance instead of
    /// calling the collaborator.
    pub workspace_id: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl DialogConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Expose the password (for building the HTTP client)
    pub fn password(&self) -> &str {
        self.password.expose_secret()
    }

    /// The workspace identifier, with the unset and placeholder cases
    /// collapsed to `None`.
    pub fn resolved_workspace_id(&self) -> Option<&str> {
        self.workspace_id
            .as_deref()
            .filter(|id| !id.is_empty() && *id != WORKSPACE_PLACEHOLDER)
    }

    /// Validate dialog collaborator configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ValidationError::InvalidBaseUrl("dialog"));
        }
        if self.username.is_empty() || self.password().is_empty() {
            return Err(ValidationError::MissingCredentials("dialog"));
        }
        if self.timeout_secs == 0 || self.timeout_secs > 300 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

fn default_version() -> String {
    "2016-10-21".to_string()
}

fn default_timeout() -> u64 {
    30
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> DialogConfig {
        DialogConfig {
            base_url: "https://dialog.example.com/api".to_string(),
            username: "user".to_string(),
            password: Secret::new("pass".to_string()),
            version: default_version(),
            workspace_id: None,
            timeout_secs: default_timeout(),
        }
    }

    #[test]
    fn test_timeout_duration() {
        let config = DialogConfig {
            timeout_secs: 60,
            ..base_config()
        };
        assert_eq!(config.timeout(), Duration::from_secs(60));
    }

    #[test]
    fn test_resolved_workspace_id_unset() {
        let config = base_config();
        assert_eq!(config.resolved_workspace_id(), None);
    }

    #[test]
    fn test_resolved_workspace_id_placeholder() {
        let config = DialogConfig {
            workspace_id: Some(WORKSPACE_PLACEHOLDER.to_string()),
            ..base_config()
        };
        assert_eq!(config.resolved_workspace_id(), None);
    }

    #[test]
    fn test_resolved_workspace_id_empty() {
        let config = DialogConfig {
            workspace_id: Some(String::new()),
            ..base_config()
        };
        assert_eq!(config.resolved_workspace_id(), None);
    }

    #[test]
    fn test_resolved_workspace_id_set() {
        let config = DialogConfig {
            workspace_id: Some("ws-123".to_string()),
            ..base_config()
        };
        assert_eq!(config.resolved_workspace_id(), Some("ws-123"));
    }

    #[test]
    fn test_validation_invalid_base_url() {
        let config = DialogConfig {
            base_url: "dialog.example.com".to_string(),
            ..base_config()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_missing_credentials() {
        let config = DialogConfig {
            username: String::new(),
            ..base_config()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_invalid_timeout() {
        let config = DialogConfig {
            timeout_secs: 0,
            ..base_config()
        };
        assert!(config.validate().is_err());

        let config = DialogConfig {
            timeout_secs: 500,
            ..base_config()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_valid_config() {
        assert!(base_config().validate().is_ok());
    }
}
