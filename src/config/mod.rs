//! Configuration management for threadreel.
//!
//! Configuration is read from `~/.config/threadreel/config.toml` at startup.
//! If the file doesn't exist, a default configuration with comments is created.

use serde::Deserialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Main configuration struct.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub core: CoreConfig,
    pub filter: FilterConfig,
    pub client: ClientConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct CoreConfig {
    /// Skip reading and writing the disk cache.
    pub bypass_cache: bool,
    /// Default `tracing` directive; `RUST_LOG` wins when set.
    pub log_level: String,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            bypass_cache: false,
            log_level: "warn".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct FilterConfig {
    pub keywords: Vec<String>,
    pub subreddits: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct ClientConfig {
    pub timeout_seconds: u64,
    pub cache_ttl_seconds: i64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 10,
            cache_ttl_seconds: 3600,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    pub domain: String,
    /// Markup dialect served by `domain`: `old` or `redlib`.
    #[serde(rename = "type")]
    pub server_type: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            domain: "old.reddit.com".to_string(),
            server_type: "old".to_string(),
        }
    }
}

impl ServerConfig {
    /// `https://<domain>`, or the domain as-is when it already has a scheme.
    pub fn base_url(&self) -> String {
        let domain = self.domain.trim().trim_end_matches('/');
        if domain.starts_with("http://") || domain.starts_with("https://") {
            domain.to_string()
        } else {
            format!("https://{}", domain)
        }
    }
}

impl Config {
    /// Load configuration from the default path.
    ///
    /// If the config file doesn't exist, creates a default one with comments.
    /// If the config file exists but is invalid, returns an error.
    /// Missing fields in the config file will use default values.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::default_config_path()?;
        Self::load_from(&config_path)
    }

    pub fn load_from(config_path: &Path) -> Result<Self, ConfigError> {
        if !config_path.exists() {
            Self::create_default_config(config_path)?;
            return Ok(Self::default());
        }

        let content = fs::read_to_string(config_path).map_err(|e| ConfigError::Io {
            path: config_path.to_path_buf(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: config_path.to_path_buf(),
            source: e,
        })?;

        Ok(config)
    }

    /// Get the default config file path: `~/.config/threadreel/config.toml`
    pub fn default_config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("threadreel").join("config.toml"))
    }

    fn create_default_config(path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let mut file = fs::File::create(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        file.write_all(Self::default_config_content().as_bytes())
            .map_err(|e| ConfigError::Io {
                path: path.to_path_buf(),
                source: e,
            })?;

        Ok(())
    }

    fn default_config_content() -> String {
        r##"# threadreel configuration

[core]
# Skip the disk cache entirely (same as --bypass-cache)
bypass_cache = false

# Log level written to the log file: error, warn, info, debug, trace
# RUST_LOG overrides this when set
log_level = "warn"

[filter]
# Posts whose title contains any of these (case-insensitive) are hidden
keywords = []

# Posts from these subreddits are hidden; "news" and "r/news" are equivalent
subreddits = []

[client]
# Request timeout in seconds
timeout_seconds = 10

# How long fetched pages stay in the cache, in seconds
cache_ttl_seconds = 3600

[server]
# Host to read from
domain = "old.reddit.com"

# Markup served by the host: "old" for old.reddit.com, "redlib" for a
# Redlib instance
type = "old"
"##
        .to_string()
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to read/write config file at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}
