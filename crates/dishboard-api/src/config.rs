// Service configuration from environment variables
//
// Required: UPSTREAM_FEED_URL, UPSTREAM_CHART_URL, ADMIN_API_TOKEN.
// Everything else has a default.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

/// Runtime configuration for the API process.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL of the admin event feed.
    pub feed_url: String,
    /// Base URL of the chart REST API.
    pub chart_url: String,
    /// Bearer token presented to both upstreams.
    pub admin_token: String,
    bind_addr: Option<String>,
    preferences_path: Option<PathBuf>,
    refresh_interval_secs: Option<u64>,
    cors_origins: Vec<String>,
}

impl ApiConfig {
    /// Create configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let feed_url = std::env::var("UPSTREAM_FEED_URL")
            .context("UPSTREAM_FEED_URL environment variable required")?;
        let chart_url = std::env::var("UPSTREAM_CHART_URL")
            .context("UPSTREAM_CHART_URL environment variable required")?;
        let admin_token = std::env::var("ADMIN_API_TOKEN")
            .context("ADMIN_API_TOKEN environment variable required")?;

        let bind_addr = std::env::var("BIND_ADDR").ok();
        let preferences_path = std::env::var("PREFERENCES_PATH").ok().map(PathBuf::from);
        let refresh_interval_secs = match std::env::var("REFRESH_INTERVAL_SECS") {
            Ok(value) => Some(
                value
                    .parse()
                    .context("REFRESH_INTERVAL_SECS must be an integer number of seconds")?,
            ),
            Err(_) => None,
        };

        // Only needed when the UI is served from a different origin.
        // Example: CORS_ALLOWED_ORIGINS="https://admin.example.com"
        let cors_origins = std::env::var("CORS_ALLOWED_ORIGINS")
            .ok()
            .filter(|s| !s.is_empty())
            .map(|s| {
                s.split(',')
                    .map(|origin| origin.trim().to_string())
                    .filter(|origin| !origin.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            feed_url,
            chart_url,
            admin_token,
            bind_addr,
            preferences_path,
            refresh_interval_secs,
            cors_origins,
        })
    }

    /// Get bind address with default
    pub fn bind_addr(&self) -> String {
        self.bind_addr
            .clone()
            .unwrap_or_else(|| "0.0.0.0:8700".to_string())
    }

    /// Get preference record path with default
    pub fn preferences_path(&self) -> PathBuf {
        self.preferences_path
            .clone()
            .unwrap_or_else(|| PathBuf::from("dishboard_preferences.json"))
    }

    /// Get refresh interval with default
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs.unwrap_or(60))
    }

    /// CORS origins; empty means same-origin only.
    pub fn cors_origins(&self) -> &[String] {
        &self.cors_origins
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal() -> ApiConfig {
        ApiConfig {
            feed_url: "http://feed.local".to_string(),
            chart_url: "http://chart.local".to_string(),
            admin_token: "token".to_string(),
            bind_addr: None,
            preferences_path: None,
            refresh_interval_secs: None,
            cors_origins: Vec::new(),
        }
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = minimal();
        assert_eq!(config.bind_addr(), "0.0.0.0:8700");
        assert_eq!(
            config.preferences_path(),
            PathBuf::from("dishboard_preferences.json")
        );
        assert_eq!(config.refresh_interval(), Duration::from_secs(60));
        assert!(config.cors_origins().is_empty());
    }

    #[test]
    fn explicit_values_win() {
        let config = ApiConfig {
            bind_addr: Some("127.0.0.1:9900".to_string()),
            refresh_interval_secs: Some(15),
            ..minimal()
        };
        assert_eq!(config.bind_addr(), "127.0.0.1:9900");
        assert_eq!(config.refresh_interval(), Duration::from_secs(15));
    }
}
