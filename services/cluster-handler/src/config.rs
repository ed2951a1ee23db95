//! Configuration for the cluster handler.

use std::time::Duration;

use anyhow::{Context, Result};
use kubeprov_cluster_api::Credentials;

/// Cluster handler configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the remote cluster API.
    pub api_url: String,

    /// Bearer token for the remote cluster API.
    pub api_token: Option<String>,

    /// Timeout for a single remote call.
    pub request_timeout: Duration,

    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_vars<F>(var: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = var("KUBEPROV_API_URL").unwrap_or_else(|| "http://127.0.0.1:4566".to_string());

        let api_token = var("KUBEPROV_API_TOKEN").filter(|t| !t.is_empty());

        let request_timeout_secs = match var("KUBEPROV_REQUEST_TIMEOUT_SECS") {
            Some(raw) => raw
                .parse()
                .with_context(|| format!("invalid KUBEPROV_REQUEST_TIMEOUT_SECS: {raw:?}"))?,
            None => 30,
        };

        let log_level = var("KUBEPROV_LOG_LEVEL").unwrap_or_else(|| "info".to_string());

        Ok(Self {
            api_url,
            api_token,
            request_timeout: Duration::from_secs(request_timeout_secs),
            log_level,
        })
    }

    /// Credentials the API client acts with, if any.
    pub fn credentials(&self) -> Option<Credentials> {
        self.api_token.as_deref().map(Credentials::new)
    }
}
