use std::env;

use tracing::warn;

/// Environment variable holding the API base URL.
pub const API_URL_VAR: &str = "AGENDA_API_URL";

/// Base URL used when `AGENDA_API_URL` is unset; matches the mock server's
/// default bind address.
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:3000/api";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_url: String,
}

impl ClientConfig {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
        }
    }

    pub fn from_env() -> Self {
        let api_url = env::var(API_URL_VAR)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| {
                warn!("{API_URL_VAR} not set, using {DEFAULT_API_URL}");
                DEFAULT_API_URL.to_string()
            });
        Self { api_url }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL)
    }
}
