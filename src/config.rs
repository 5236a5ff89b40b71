//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::api::ApiConfig;
use crate::cube::CubeClientConfig;
use crate::semantic::DEFAULT_PROBE_CONCURRENCY;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub cube: CubeConfig,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub metadata: MetadataConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Cube backend configuration
#[derive(Clone, Deserialize)]
pub struct CubeConfig {
    #[serde(default = "default_cube_url")]
    pub url: String,

    #[serde(default)]
    pub api_secret: Option<String>,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_ms: u64,
}

fn default_cube_url() -> String {
    "http://cube:4000/cubejs-api/v1".to_string()
}

fn default_request_timeout() -> u64 {
    30_000 // 30 seconds
}

impl Default for CubeConfig {
    fn default() -> Self {
        Self {
            url: default_cube_url(),
            api_secret: None,
            request_timeout_ms: default_request_timeout(),
        }
    }
}

impl std::fmt::Debug for CubeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CubeConfig")
            .field("url", &self.url)
            .field("api_secret", &self.api_secret.as_ref().map(|_| "<redacted>"))
            .field("request_timeout_ms", &self.request_timeout_ms)
            .finish()
    }
}

impl CubeConfig {
    /// Client settings for this backend; a timeout of 0 means the default
    pub fn client_config(&self) -> CubeClientConfig {
        let request_timeout_ms = match self.request_timeout_ms {
            0 => default_request_timeout(),
            ms => ms,
        };

        CubeClientConfig {
            base_url: self.url.clone(),
            api_secret: self.api_secret.clone(),
            request_timeout_ms,
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3333
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    /// API settings for this server
    pub fn api_config(&self) -> ApiConfig {
        ApiConfig::new(self.host.clone(), self.port)
    }
}

/// Schema discovery configuration
#[derive(Debug, Clone, Deserialize)]
pub struct MetadataConfig {
    /// Sample-value probes in flight at once (1 = sequential)
    #[serde(default = "default_probe_concurrency")]
    pub probe_concurrency: usize,
}

fn default_probe_concurrency() -> usize {
    DEFAULT_PROBE_CONCURRENCY
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self {
            probe_concurrency: default_probe_concurrency(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("cube-gateway").join("config.toml")),
            Some(PathBuf::from("/etc/cube-gateway/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path_opt in config_paths.iter().flatten() {
            if path_opt.exists() {
                match Self::load_with_env(path_opt) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path_opt);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path_opt, e);
                    }
                }
            }
        }

        // Fall back to environment-only config
        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        // Cube overrides
        if let Some(url) = var("CUBE_API_URL") {
            self.cube.url = url;
        }
        if let Some(secret) = var("CUBE_API_SECRET") {
            self.cube.api_secret = Some(secret).filter(|s| !s.is_empty());
        }
        if let Some(timeout) = var("CUBE_REQUEST_TIMEOUT_MS")
            .and_then(|s| s.parse::<u64>().ok())
            .filter(|ms| *ms > 0)
        {
            self.cube.request_timeout_ms = timeout;
        }

        // Server overrides
        if let Some(host) = var("CUBE_GATEWAY_HOST") {
            self.server.host = host;
        }
        if let Some(port) = var("CUBE_GATEWAY_PORT").and_then(|s| s.parse().ok()) {
            self.server.port = port;
        }

        // Metadata overrides
        if let Some(concurrency) =
            var("CUBE_GATEWAY_PROBE_CONCURRENCY").and_then(|s| s.parse().ok())
        {
            self.metadata.probe_concurrency = concurrency;
        }

        // Logging overrides
        if let Some(level) = var("CUBE_GATEWAY_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = var("CUBE_GATEWAY_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Cube Gateway Configuration
#
# Environment variables override these settings:
# - CUBE_API_URL
# - CUBE_API_SECRET
# - CUBE_REQUEST_TIMEOUT_MS
# - CUBE_GATEWAY_HOST
# - CUBE_GATEWAY_PORT
# - CUBE_GATEWAY_PROBE_CONCURRENCY
# - CUBE_GATEWAY_LOG_LEVEL
# - CUBE_GATEWAY_LOG_FORMAT

[cube]
# Cube REST API base URL
url = "http://cube:4000/cubejs-api/v1"

# API token sent in the Authorization header (prefer CUBE_API_SECRET)
# api_secret = ""

# Per-request timeout (ms)
request_timeout_ms = 30000

[server]
# Gateway host
host = "0.0.0.0"

# Gateway port
port = 3333

[metadata]
# Sample-value probes in flight at once during discovery (1 = sequential)
probe_concurrency = 4

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}
