//! Environment-driven configuration
//!
//! Everything is read from the process environment; there is no startup
//! validation phase. In particular a missing provider credential does not
//! stop the server — it surfaces per request as a 500, matching the
//! deployment model where the credential is injected by the host.

use std::env;

use once_cell::sync::Lazy;
use tracing::info;

use crate::core::dispatch::{ModelChain, RetryPolicy};

/// Model used when a payload carries no override.
pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";

/// Built-in fallback chain: preview models degrade toward the stable flash
/// generation.
static DEFAULT_MODEL_CHAIN: Lazy<ModelChain> = Lazy::new(|| {
    ModelChain::from_pairs([
        ("gemini-3-pro-preview", "gemini-3-flash-preview"),
        ("gemini-3-flash-preview", "gemini-2.0-flash"),
    ])
});

/// HTTP binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

/// External log/archive sink. Disabled entirely when no URL is configured.
#[derive(Debug, Clone)]
pub struct SinkConfig {
    pub url: String,
    pub auth_token: String,
    pub app_name: String,
}

/// Full gateway configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    /// Provider credential; `None` until the host injects `GEMINI_API_KEY`.
    pub gemini_api_key: Option<String>,
    /// Endpoint base override, for tests and proxies.
    pub gemini_api_base: Option<String>,
    pub default_model: String,
    pub model_chain: ModelChain,
    pub retry: RetryPolicy,
    pub sink: Option<SinkConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            gemini_api_key: None,
            gemini_api_base: None,
            default_model: DEFAULT_MODEL.to_string(),
            model_chain: DEFAULT_MODEL_CHAIN.clone(),
            retry: RetryPolicy::default(),
            sink: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        info!("Loading configuration from environment");

        let server = ServerConfig {
            host: env_var("ROKUBUN_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: env_var("ROKUBUN_PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
        };

        let retry = RetryPolicy::new(
            env_var("ROKUBUN_MAX_ATTEMPTS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(3),
            env_var("ROKUBUN_BASE_DELAY_MS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(1000),
        );

        let model_chain = match env_var("ROKUBUN_MODEL_CHAIN") {
            Some(spec) => ModelChain::parse(&spec),
            None => DEFAULT_MODEL_CHAIN.clone(),
        };

        let sink = env_var("DRIVE_LOG_URL").map(|url| SinkConfig {
            url,
            auth_token: env_var("DRIVE_LOG_TOKEN").unwrap_or_else(|| "jonsonpanson".to_string()),
            app_name: env_var("DRIVE_LOG_APP").unwrap_or_else(|| "6min".to_string()),
        });

        Self {
            server,
            gemini_api_key: env_var("GEMINI_API_KEY"),
            gemini_api_base: env_var("GEMINI_API_BASE"),
            default_model: env_var("ROKUBUN_DEFAULT_MODEL")
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            model_chain,
            retry,
            sink,
        }
    }

    /// Bind address for the HTTP server.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

/// Non-empty environment variable, or `None`.
fn env_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_chain_degrades_preview_models() {
        let config = Config::default();
        assert_eq!(
            config.model_chain.fallback_for("gemini-3-pro-preview"),
            Some("gemini-3-flash-preview")
        );
        assert_eq!(
            config.model_chain.fallback_for("gemini-3-flash-preview"),
            Some("gemini-2.0-flash")
        );
        assert_eq!(config.model_chain.fallback_for("gemini-2.0-flash"), None);
    }

    #[test]
    fn bind_addr_joins_host_and_port() {
        let config = Config::default();
        assert_eq!(config.bind_addr(), "0.0.0.0:8080");
    }
}
