//! Configuration management for Anime Hub.
//!
//! This module handles loading and parsing configuration from TOML files,
//! with sensible defaults for all settings.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Data directory settings
    pub data: DataConfig,

    /// Local storage database settings
    pub storage: StorageConfig,

    /// Logging settings
    pub logging: LoggingConfig,

    /// Catalog API settings
    pub api: ApiConfig,

    /// Response cache settings
    #[serde(default)]
    pub cache: CacheConfig,

    /// Presentation settings
    #[serde(default)]
    pub ui: UiConfig,
}

/// Data directory configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Root data directory path
    pub root_dir: String,
}

/// Local storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Database file path (relative to data directory or absolute)
    pub path: String,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log directory path (relative to data directory or absolute)
    pub log_dir: String,

    /// Default log level (trace, debug, info, warn, error)
    pub default_level: String,

    /// Enable console output
    pub console: bool,

    /// Enable file output
    pub file: bool,

    /// Enable JSON formatting for file logs
    pub json_format: bool,
}

/// Catalog API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the anime-db API
    pub base_url: String,

    /// Value sent in the `x-rapidapi-host` header
    pub host: String,

    /// Request timeout in seconds
    pub timeout_seconds: u64,

    /// Key used when none has been saved (development only)
    #[serde(default)]
    pub default_key: String,

    /// Endpoint paths
    #[serde(default)]
    pub endpoints: EndpointsConfig,
}

/// Endpoint paths, appended to the base URL
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointsConfig {
    pub anime: String,
    pub genres: String,
    pub by_ranking: String,
    pub by_id: String,
}

/// Cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Seconds a cached response stays fresh
    pub expiration_seconds: u64,
}

/// Presentation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Records requested per page
    pub page_size: u32,

    /// Seconds the error banner stays visible
    pub error_display_seconds: u64,

    /// Seconds the success toast stays visible
    pub success_display_seconds: u64,
}

impl Default for EndpointsConfig {
    fn default() -> Self {
        Self {
            anime: "/anime".to_string(),
            genres: "/genre".to_string(),
            by_ranking: "/anime/by-ranking".to_string(),
            by_id: "/anime/by-id".to_string(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            expiration_seconds: 300,
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            page_size: 12,
            error_display_seconds: 5,
            success_display_seconds: 3,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data: DataConfig {
                root_dir: "data".to_string(),
            },
            storage: StorageConfig {
                path: "anime_hub.db".to_string(),
            },
            logging: LoggingConfig {
                log_dir: "logs".to_string(),
                default_level: "info".to_string(),
                // Console output would interleave with the rendered screen
                console: false,
                file: true,
                json_format: false,
            },
            api: ApiConfig {
                base_url: "https://anime-db.p.rapidapi.com".to_string(),
                host: "anime-db.p.rapidapi.com".to_string(),
                timeout_seconds: 30,
                default_key: String::new(),
                endpoints: EndpointsConfig::default(),
            },
            cache: CacheConfig::default(),
            ui: UiConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// If the file doesn't exist, returns the default configuration.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            tracing::warn!(
                path = %path.display(),
                "Config file not found, using defaults"
            );
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        tracing::info!(
            path = %path.display(),
            "Configuration loaded successfully"
        );

        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        let content = toml::to_string_pretty(self)
            .context("Failed to serialize configuration")?;

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        tracing::info!(
            path = %path.display(),
            "Configuration saved successfully"
        );

        Ok(())
    }

    /// Get the path for the data directory
    pub fn data_dir(&self) -> PathBuf {
        PathBuf::from(&self.data.root_dir)
    }

    /// Get the absolute path for the local storage database
    pub fn storage_path(&self) -> PathBuf {
        self.resolve(&self.storage.path)
    }

    /// Get the absolute path for the log directory
    pub fn log_dir(&self) -> PathBuf {
        self.resolve(&self.logging.log_dir)
    }

    /// Parsed default log level, falling back to INFO on an unknown name
    pub fn log_level(&self) -> tracing::Level {
        self.logging
            .default_level
            .parse()
            .unwrap_or(tracing::Level::INFO)
    }

    /// How long a cached response stays fresh
    pub fn cache_expiry(&self) -> Duration {
        Duration::from_secs(self.cache.expiration_seconds)
    }

    /// HTTP request timeout
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout_seconds)
    }

    fn resolve(&self, configured: &str) -> PathBuf {
        let path = Path::new(configured);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.data_dir().join(path)
        }
    }
}
