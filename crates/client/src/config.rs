//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `MERCADO_API_URL` - Base URL of the catalog API (e.g. `http://localhost:3333`)
//!
//! ## Optional
//! - `MERCADO_REGISTER_ENDPOINT` - Account creation path (default: `/register`;
//!   deployed backends have also used `/usuarios` and `/cadastro`)
//! - `MERCADO_SESSION_FILE` - Durable session location (default:
//!   `.mercado/session.json`)

use std::path::PathBuf;

use thiserror::Error;
use url::Url;

/// Default account-creation path.
const DEFAULT_REGISTER_ENDPOINT: &str = "/register";

/// Default durable session location, relative to the working directory.
const DEFAULT_SESSION_FILE: &str = ".mercado/session.json";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the catalog API, without a trailing slash.
    pub base_url: String,
    /// Path posted to when creating an account.
    pub register_endpoint: String,
    /// Where the durable session document lives.
    pub session_file: PathBuf,
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `MERCADO_API_URL` is missing or not a valid
    /// absolute URL.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let base_url = get_required_env("MERCADO_API_URL")?;
        let register_endpoint =
            get_env_or_default("MERCADO_REGISTER_ENDPOINT", DEFAULT_REGISTER_ENDPOINT);
        let session_file =
            PathBuf::from(get_env_or_default("MERCADO_SESSION_FILE", DEFAULT_SESSION_FILE));

        Self::build(&base_url, register_endpoint, session_file)
    }

    /// Build a configuration for a known base URL, using defaults elsewhere.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `base_url` is not a valid absolute URL.
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        Self::build(
            base_url,
            DEFAULT_REGISTER_ENDPOINT.to_string(),
            PathBuf::from(DEFAULT_SESSION_FILE),
        )
    }

    fn build(
        base_url: &str,
        register_endpoint: String,
        session_file: PathBuf,
    ) -> Result<Self, ConfigError> {
        // Validate early: every request target is later joined onto this.
        Url::parse(base_url).map_err(|e| {
            ConfigError::InvalidEnvVar("MERCADO_API_URL".to_string(), e.to_string())
        })?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            register_endpoint,
            session_file,
        })
    }
}

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let config = ClientConfig::new("http://localhost:3333/").expect("config");
        assert_eq!(config.base_url, "http://localhost:3333");
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        let result = ClientConfig::new("not a url");
        assert!(matches!(result, Err(ConfigError::InvalidEnvVar(_, _))));
    }

    #[test]
    fn test_defaults() {
        let config = ClientConfig::new("http://localhost:3333").expect("config");
        assert_eq!(config.register_endpoint, "/register");
        assert_eq!(config.session_file, PathBuf::from(".mercado/session.json"));
    }
}
