//! Configuration management for the MCP server.
//!
//! This module provides a centralized configuration structure that can be
//! populated from environment variables or defaults. The defaults reproduce
//! the stock behavior: stdio transport against the public URLhaus API.

use super::transport::TransportConfig;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Default base address of the URLhaus API.
pub const URLHAUS_API_URL: &str = "https://urlhaus-api.abuse.ch/v1";

/// Main configuration structure for the MCP server.
///
/// This struct contains all configurable aspects of the server, organized
/// by domain for clarity and maintainability.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server identification and metadata.
    pub server: ServerConfig,

    /// Upstream URLhaus API configuration.
    pub upstream: UpstreamConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,

    /// Transport configuration.
    pub transport: TransportConfig,
}

/// Server identification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The name of the server as reported to clients.
    pub name: String,

    /// The version of the server.
    pub version: String,
}

/// Configuration for the upstream URLhaus API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// Base address of the URLhaus API, without a trailing slash.
    pub base_url: String,

    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "trace").
    pub level: String,

    /// Whether to include timestamps in log output.
    pub with_timestamps: bool,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: URLHAUS_API_URL.to_string(),
            timeout_secs: 30,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                name: "urlhaus-mcp-server".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            upstream: UpstreamConfig::default(),
            logging: LoggingConfig {
                level: "info".to_string(),
                with_timestamps: true,
            },
            transport: TransportConfig::default(),
        }
    }
}

impl Config {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables.
    ///
    /// Environment variables are expected to be prefixed with `MCP_`,
    /// except for the upstream override `URLHAUS_API_URL`.
    /// For example: `MCP_SERVER_NAME`, `MCP_LOG_LEVEL`.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Ok(name) = std::env::var("MCP_SERVER_NAME") {
            config.server.name = name;
        }

        if let Ok(level) = std::env::var("MCP_LOG_LEVEL") {
            config.logging.level = level;
        }

        // Upstream base URL override, mainly useful for pointing the server
        // at a local stand-in during integration testing.
        if let Ok(base_url) = std::env::var("URLHAUS_API_URL") {
            config.upstream.base_url = base_url.trim_end_matches('/').to_string();
            info!("Upstream base URL overridden: {}", config.upstream.base_url);
        }

        // Load transport configuration from environment
        config.transport = TransportConfig::from_env();

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Mutex to ensure env var tests run serially
    static ENV_TEST_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_default_upstream_is_public_api() {
        let config = Config::default();
        assert_eq!(config.upstream.base_url, URLHAUS_API_URL);
        assert_eq!(config.upstream.timeout_secs, 30);
    }

    #[test]
    fn test_upstream_from_env() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        unsafe {
            std::env::set_var("URLHAUS_API_URL", "http://127.0.0.1:8989/v1/");
        }
        let config = Config::from_env();
        assert_eq!(config.upstream.base_url, "http://127.0.0.1:8989/v1");
        unsafe {
            std::env::remove_var("URLHAUS_API_URL");
        }
    }

    #[test]
    fn test_upstream_default_fallback() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        unsafe {
            std::env::remove_var("URLHAUS_API_URL");
        }
        let config = Config::from_env();
        assert_eq!(config.upstream.base_url, URLHAUS_API_URL);
    }

    #[test]
    fn test_server_name_from_env() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        unsafe {
            std::env::set_var("MCP_SERVER_NAME", "urlhaus-test");
        }
        let config = Config::from_env();
        assert_eq!(config.server.name, "urlhaus-test");
        unsafe {
            std::env::remove_var("MCP_SERVER_NAME");
        }
    }
}
