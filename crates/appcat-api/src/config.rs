//! API server configuration loaded from environment variables.

use std::env;

use thiserror::Error;

/// Errors during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required environment variable is missing.
    #[error("missing required environment variable: {0}")]
    Missing(String),
}

/// API server runtime configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// `PostgreSQL` connection URL.
    pub database_url: String,
    /// TCP address to bind (e.g. `0.0.0.0:8080`).
    pub bind_addr: String,
    /// Base URL of the full-text index engine.
    pub search_url: String,
    /// Name of the app index.
    pub search_index: String,
    /// Sender address for lifecycle emails.
    pub from_email: String,
    /// Mailbox receiving lifecycle notifications.
    pub notify_email: String,
}

impl ApiConfig {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] if `DATABASE_URL`, `SEARCH_URL`,
    /// or `FROM_EMAIL` is not set.
    pub fn from_env() -> Result<Self, ConfigError> {
        let from_email = require("FROM_EMAIL")?;
        Ok(Self {
            database_url: require("DATABASE_URL")?,
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_owned()),
            search_url: require("SEARCH_URL")?,
            search_index: env::var("SEARCH_INDEX").unwrap_or_else(|_| "apps".to_owned()),
            notify_email: env::var("NOTIFY_EMAIL").unwrap_or_else(|_| from_email.clone()),
            from_email,
        })
    }
}

fn require(name: &str) -> Result<String, ConfigError> {
    env::var(name).map_err(|_| ConfigError::Missing(name.to_owned()))
}
