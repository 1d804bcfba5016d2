//! Application configuration module
//!
//! Settings are resolved from defaults, then an optional TOML file named by
//! `FIELDCHAT_CONFIG`, then environment variables.

use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://fieldchat.db";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// SQLite connection URL
    pub database_url: String,
    /// Socket address the HTTP server listens on
    pub bind_addr: String,
    /// HS256 secret used to verify bearer tokens
    pub jwt_secret: String,
    /// Pool size
    pub max_connections: u32,
    /// Page size when a caller does not ask for one
    pub default_page_size: i64,
    /// Upper bound on requested page sizes
    pub max_page_size: i64,
    /// How often idle room groups are pruned
    pub cleanup_interval_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            jwt_secret: String::new(),
            max_connections: 5,
            default_page_size: 20,
            max_page_size: 100,
            cleanup_interval_secs: 300,
        }
    }
}

/// Partial configuration as read from a TOML file
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    database_url: Option<String>,
    bind_addr: Option<String>,
    jwt_secret: Option<String>,
    max_connections: Option<u32>,
    default_page_size: Option<i64>,
    max_page_size: Option<i64>,
    cleanup_interval_secs: Option<u64>,
}

impl AppConfig {
    /// Create a new AppConfigBuilder
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }

    /// Load configuration from `FIELDCHAT_CONFIG` (if set) and the environment
    pub fn load() -> Result<Self, ConfigError> {
        let mut builder = match std::env::var("FIELDCHAT_CONFIG") {
            Ok(path) => AppConfigBuilder::from_toml_file(path)?,
            Err(_) => AppConfigBuilder::default(),
        };
        builder = builder.apply_env(|key| std::env::var(key).ok())?;
        builder.build()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt_secret.trim().is_empty() {
            return Err(ConfigError::MissingValue("jwt_secret"));
        }
        if self.database_url.trim().is_empty() {
            return Err(ConfigError::MissingValue("database_url"));
        }
        if self.max_connections == 0 {
            return Err(ConfigError::InvalidValue {
                key: "max_connections",
                message: "must be at least 1".to_string(),
            });
        }
        if self.default_page_size < 1 || self.max_page_size < 1 {
            return Err(ConfigError::InvalidValue {
                key: "default_page_size",
                message: "page sizes must be at least 1".to_string(),
            });
        }
        if self.default_page_size > self.max_page_size {
            return Err(ConfigError::InvalidValue {
                key: "default_page_size",
                message: format!(
                    "{} exceeds max_page_size {}",
                    self.default_page_size, self.max_page_size
                ),
            });
        }
        if self.cleanup_interval_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "cleanup_interval_secs",
                message: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

/// Builder for AppConfig
#[derive(Debug, Default)]
pub struct AppConfigBuilder {
    config: AppConfig,
}

impl AppConfigBuilder {
    /// Start from the contents of a TOML file
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }

    /// Start from a TOML document
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let file: FileConfig = toml::from_str(raw)?;
        let mut builder = Self::default();
        if let Some(url) = file.database_url {
            builder = builder.database_url(url);
        }
        if let Some(addr) = file.bind_addr {
            builder = builder.bind_addr(addr);
        }
        if let Some(secret) = file.jwt_secret {
            builder = builder.jwt_secret(secret);
        }
        if let Some(max) = file.max_connections {
            builder = builder.max_connections(max);
        }
        if let Some(size) = file.default_page_size {
            builder.config.default_page_size = size;
        }
        if let Some(size) = file.max_page_size {
            builder.config.max_page_size = size;
        }
        if let Some(secs) = file.cleanup_interval_secs {
            builder.config.cleanup_interval_secs = secs;
        }
        Ok(builder)
    }

    /// Override values from environment-style lookups
    pub fn apply_env<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("DATABASE_URL") {
            self.config.database_url = url;
        }
        if let Some(addr) = lookup("BIND_ADDR") {
            self.config.bind_addr = addr;
        }
        if let Some(secret) = lookup("JWT_SECRET") {
            self.config.jwt_secret = secret;
        }
        if let Some(raw) = lookup("DB_MAX_CONNECTIONS") {
            self.config.max_connections = parse_number("DB_MAX_CONNECTIONS", &raw)?;
        }
        if let Some(raw) = lookup("DEFAULT_PAGE_SIZE") {
            self.config.default_page_size = parse_number("DEFAULT_PAGE_SIZE", &raw)?;
        }
        if let Some(raw) = lookup("MAX_PAGE_SIZE") {
            self.config.max_page_size = parse_number("MAX_PAGE_SIZE", &raw)?;
        }
        if let Some(raw) = lookup("HUB_CLEANUP_INTERVAL_SECS") {
            self.config.cleanup_interval_secs = parse_number("HUB_CLEANUP_INTERVAL_SECS", &raw)?;
        }
        Ok(self)
    }

    pub fn database_url(mut self, url: impl Into<String>) -> Self {
        self.config.database_url = url.into();
        self
    }

    pub fn bind_addr(mut self, addr: impl Into<String>) -> Self {
        self.config.bind_addr = addr.into();
        self
    }

    pub fn jwt_secret(mut self, secret: impl Into<String>) -> Self {
        self.config.jwt_secret = secret.into();
        self
    }

    pub fn max_connections(mut self, max: u32) -> Self {
        self.config.max_connections = max;
        self
    }

    pub fn page_sizes(mut self, default_page_size: i64, max_page_size: i64) -> Self {
        self.config.default_page_size = default_page_size;
        self.config.max_page_size = max_page_size;
        self
    }

    /// Build and validate the configuration
    pub fn build(self) -> Result<AppConfig, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

fn parse_number<T: std::str::FromStr>(key: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key,
        message: format!("'{}' is not a valid number", raw),
    })
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing value: {0}")]
    MissingValue(&'static str),
    #[error("invalid value for {key}: {message}")]
    InvalidValue { key: &'static str, message: String },
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}
