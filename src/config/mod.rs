//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `DIALOG_GATEWAY_` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use dialog_gateway::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Server running on {}", config.server.socket_addr());
//! ```

mod dialog;
mod error;
mod search;
mod server;

pub use dialog::{DialogConfig, WORKSPACE_PLACEHOLDER};
pub use error::{ConfigError, ValidationError};
pub use search::SearchConfig;
pub use server::ServerConfig;

use serde::Deserialize;

/// Root application configuration
///
/// Contains all configuration sections for the dialog gateway.
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, static assets)
    #[serde(default)]
    pub server: ServerConfig,

    /// Dialog collaborator configuration (endpoint, credentials, workspace)
    pub dialog: DialogConfig,

    /// Search collaborator configuration (endpoint, credentials, collection)
    pub search: SearchConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `DIALOG_GATEWAY` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `DIALOG_GATEWAY__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `DIALOG_GATEWAY__DIALOG__WORKSPACE_ID=...` -> `dialog.workspace_id = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Required environment variables are missing
    /// - Values cannot be parsed into expected types
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("DIALOG_GATEWAY")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// Performs semantic validation of configuration:
    /// - Socket address constraints
    /// - Collaborator endpoint URL formats
    /// - Non-empty search collection identifiers
    ///
    /// Note that an absent workspace identifier is deliberately NOT a
    /// validation failure: the message endpoint answers with setup guidance
    /// instead, so an unconfigured deployment stays self-diagnosing.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.dialog.validate()?;
        self.search.validate()?;
        Ok(())
    }
}
