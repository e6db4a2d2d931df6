//! Configuration management for pokedex-sync
//!
//! This module handles loading, parsing, and validating application
//! configuration from YAML files and environment variables.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Database configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Cache configuration
    #[serde(default)]
    pub cache: CacheConfig,

    /// Upstream catalog API configuration
    #[serde(default)]
    pub upstream: UpstreamConfig,

    /// Background sync configuration
    #[serde(default)]
    pub sync: SyncConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::FileRead(format!("Failed to read config file: {}", e)))?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from a YAML string
    ///
    /// `${VAR}` references are expanded from the environment before parsing.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let expanded = expand_env_vars(yaml);
        serde_yaml::from_str(&expanded)
            .map_err(|e| ConfigError::Parse(format!("Failed to parse YAML: {}", e)))
    }

    /// Load configuration from environment variables with prefix POKEDEX_SYNC_
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Config::default();

        if let Ok(host) = std::env::var("POKEDEX_SYNC_SERVER_HOST") {
            config.server.host = host;
        }
        if let Ok(port) = std::env::var("POKEDEX_SYNC_SERVER_PORT") {
            config.server.port = port
                .parse()
                .map_err(|_| ConfigError::Parse("Invalid port number".to_string()))?;
        }

        if let Ok(path) = std::env::var("POKEDEX_SYNC_DATABASE_PATH") {
            config.database.path = path;
        }

        if let Ok(ttl) = std::env::var("POKEDEX_SYNC_CACHE_TTL_SECS") {
            config.cache.ttl_secs = ttl
                .parse()
                .map_err(|_| ConfigError::Parse("Invalid cache TTL".to_string()))?;
        }

        if let Ok(base_url) = std::env::var("POKEDEX_SYNC_UPSTREAM_BASE_URL") {
            config.upstream.base_url = base_url;
        }
        if let Ok(timeout) = std::env::var("POKEDEX_SYNC_UPSTREAM_TIMEOUT_SECS") {
            config.upstream.timeout_secs = timeout
                .parse()
                .map_err(|_| ConfigError::Parse("Invalid upstream timeout".to_string()))?;
        }
        if let Ok(limit) = std::env::var("POKEDEX_SYNC_UPSTREAM_PAGE_LIMIT") {
            config.upstream.page_limit = limit
                .parse()
                .map_err(|_| ConfigError::Parse("Invalid page limit".to_string()))?;
        }

        if let Ok(interval) = std::env::var("POKEDEX_SYNC_SYNC_INTERVAL_SECS") {
            config.sync.interval_secs = interval
                .parse()
                .map_err(|_| ConfigError::Parse("Invalid sync interval".to_string()))?;
        }
        if let Ok(attempts) = std::env::var("POKEDEX_SYNC_SYNC_MAX_ATTEMPTS") {
            config.sync.retry.max_attempts = attempts
                .parse()
                .map_err(|_| ConfigError::Parse("Invalid max attempts".to_string()))?;
        }

        if let Ok(level) = std::env::var("POKEDEX_SYNC_LOG_LEVEL") {
            config.logging.level = level;
        }

        Ok(config)
    }

    /// Validate cross-field constraints
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.upstream.retry.max_attempts == 0 {
            return Err(ConfigError::InvalidValue(
                "upstream.retry.max_attempts must be at least 1".to_string(),
            ));
        }
        if self.sync.retry.max_attempts == 0 {
            return Err(ConfigError::InvalidValue(
                "sync.retry.max_attempts must be at least 1".to_string(),
            ));
        }
        if self.upstream.page_limit == 0 {
            return Err(ConfigError::InvalidValue(
                "upstream.page_limit must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerConfig {
    /// Host address to bind to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file (`:memory:` for in-memory)
    #[serde(default = "default_database_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
        }
    }
}

fn default_database_path() -> String {
    "/data/pokedex-sync.db".to_string()
}

/// Cache configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CacheConfig {
    /// Time-to-live for cached listings, in seconds
    #[serde(default = "default_cache_ttl")]
    pub ttl_secs: u64,
}

impl CacheConfig {
    /// TTL as a [`Duration`]
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_cache_ttl(),
        }
    }
}

fn default_cache_ttl() -> u64 {
    300 // 5 minutes
}

/// Upstream catalog API configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UpstreamConfig {
    /// Base URL of the upstream API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_upstream_timeout")]
    pub timeout_secs: u64,

    /// Number of entries fetched per listing call (first page only)
    #[serde(default = "default_page_limit")]
    pub page_limit: u32,

    /// Retry configuration for individual fetches
    #[serde(default)]
    pub retry: RetryConfig,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_upstream_timeout(),
            page_limit: default_page_limit(),
            retry: RetryConfig::default(),
        }
    }
}

fn default_base_url() -> String {
    "https://pokeapi.co/api/v2".to_string()
}

fn default_upstream_timeout() -> u64 {
    5
}

fn default_page_limit() -> u32 {
    20
}

/// Background sync configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SyncConfig {
    /// Interval between scheduled sync passes, in seconds
    #[serde(default = "default_sync_interval")]
    pub interval_secs: u64,

    /// Retry configuration for whole sync passes
    ///
    /// Independent of the per-fetch retry in [`UpstreamConfig`].
    #[serde(default)]
    pub retry: RetryConfig,
}

impl SyncConfig {
    /// Interval as a [`Duration`]
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_sync_interval(),
            retry: RetryConfig::default(),
        }
    }
}

fn default_sync_interval() -> u64 {
    900 // 15 minutes
}

/// Retry configuration shared by the fetch client and the refresher
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RetryConfig {
    /// Maximum number of attempts, including the first (must be >= 1)
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Initial backoff duration in milliseconds
    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,

    /// Maximum backoff duration in milliseconds
    #[serde(default = "default_max_backoff_ms")]
    pub max_backoff_ms: u64,
}

impl RetryConfig {
    /// Initial backoff as a [`Duration`]
    pub fn initial_backoff(&self) -> Duration {
        Duration::from_millis(self.initial_backoff_ms)
    }

    /// Maximum backoff as a [`Duration`]
    pub fn max_backoff(&self) -> Duration {
        Duration::from_millis(self.max_backoff_ms)
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            initial_backoff_ms: default_initial_backoff_ms(),
            max_backoff_ms: default_max_backoff_ms(),
        }
    }
}

fn default_max_attempts() -> u32 {
    5
}

fn default_initial_backoff_ms() -> u64 {
    1000
}

fn default_max_backoff_ms() -> u64 {
    30_000
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: "json" or "pretty"
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

/// Configuration error types
#[derive(Debug, thiserror::Error, Clone, PartialEq)]
pub enum ConfigError {
    /// Error reading configuration file
    #[error("Failed to read configuration file: {0}")]
    FileRead(String),

    /// Error parsing configuration
    #[error("Failed to parse configuration: {0}")]
    Parse(String),

    /// Invalid configuration value
    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

/// Expand environment variables in a string
///
/// Supports `${VAR_NAME}` syntax
fn expand_env_vars(input: &str) -> String {
    let re = regex_lite::Regex::new(r"\$\{([^}]+)\}")
        .expect("Invalid regex pattern for environment variable expansion");

    re.replace_all(input, |caps: &regex_lite::Captures| {
        let var_name = &caps[1];
        std::env::var(var_name).unwrap_or_else(|_| caps[0].to_string())
    })
    .into_owned()
}
