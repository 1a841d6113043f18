//! Configuration loaded from reportlens.toml and environment variables.

use serde::{Deserialize, Serialize};

/// Main configuration structure. File values first, `RL_*` env overrides on
/// top.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    pub api: ApiConfig,
}

/// Backend API settings for the viewer client.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
    /// Base URL of the annotation backend, e.g. `http://127.0.0.1:8000`.
    pub base_url: String,
    /// Report whose sentences the viewer loads; injected by the hosting page
    /// in the original, ambient config here.
    pub report_id: i64,
    pub timeout_ms: u64,
    pub retries: u32,
    pub retry_delay_ms: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
            report_id: 1,
            timeout_ms: 10_000,
            retries: 3,
            retry_delay_ms: 200,
        }
    }
}

impl Config {
    /// Load configuration from TOML file and environment variables.
    /// Uses REPORTLENS_CONFIG or defaults to "reportlens.toml".
    pub fn load() -> anyhow::Result<Self> {
        // .env resolution: RL_ENV_FILE if set, else ./.env
        if let Ok(env_path) = std::env::var("RL_ENV_FILE") {
            let _ = dotenvy::from_path(env_path);
        } else {
            let _ = dotenvy::from_path(".env");
        }

        let config_path =
            std::env::var("REPORTLENS_CONFIG").unwrap_or_else(|_| "reportlens.toml".to_string());

        let mut config: Config = if let Ok(content) = std::fs::read_to_string(&config_path) {
            toml::from_str(&content)?
        } else {
            tracing::warn!("Config file {} not found, using defaults", config_path);
            Self::default()
        };

        // Env-first overrides
        if let Ok(base) = std::env::var("RL_API_BASE") {
            config.api.base_url = base;
        }
        if let Some(report_id) = std::env::var("RL_REPORT_ID")
            .ok()
            .and_then(|v| v.parse::<i64>().ok())
        {
            config.api.report_id = report_id;
        }
        if let Some(timeout) = std::env::var("RL_HTTP_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
        {
            config.api.timeout_ms = timeout;
        }
        if let Some(retries) = std::env::var("RL_HTTP_RETRIES")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
        {
            config.api.retries = retries;
        }
        if let Some(delay) = std::env::var("RL_RETRY_DELAY_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
        {
            config.api.retry_delay_ms = delay;
        }

        // Validate base URL format (basic checks; warn, don't fail)
        if !config.api.base_url.starts_with("http://")
            && !config.api.base_url.starts_with("https://")
        {
            tracing::warn!(
                "API base URL '{}' doesn't start with http:// or https://",
                config.api.base_url
            );
        }
        // Trailing slash would double up when endpoint paths are appended
        while config.api.base_url.ends_with('/') {
            config.api.base_url.pop();
        }

        // Validate and clamp retries
        if config.api.retries == 0 {
            config.api.retries = 1;
        } else if config.api.retries > 10 {
            tracing::warn!(
                "retries {} exceeds max 10, clamping to 10",
                config.api.retries
            );
            config.api.retries = 10;
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_sane() {
        let config = Config::default();
        assert_eq!(config.api.report_id, 1);
        assert!(config.api.base_url.starts_with("http://"));
        assert!(config.api.retries >= 1);
    }

    #[test]
    fn test_toml_round_trip() {
        let config = Config::default();
        let text = toml::to_string(&config).unwrap();
        let back: Config = toml::from_str(&text).unwrap();
        assert_eq!(back.api.base_url, config.api.base_url);
        assert_eq!(back.api.timeout_ms, config.api.timeout_ms);
    }
}
