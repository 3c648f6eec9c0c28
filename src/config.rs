//! Service configuration.
//!
//! Loaded from a TOML file. Every section and field has a default, so an
//! empty file is a valid configuration.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::common::config::{DEFAULT_ADDRESS, DEFAULT_BASE_PATH, DEFAULT_DATA_PATH};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Item store location
    #[serde(default)]
    pub store: StoreConfig,

    /// HTTP listener
    #[serde(default)]
    pub http: HttpConfig,

    /// Log output
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Item store configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StoreConfig {
    /// Path to the JSON item file
    #[serde(default = "default_data_path")]
    pub path: PathBuf,

    /// Create an empty store if the file is missing
    #[serde(default)]
    pub create_if_missing: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_data_path(),
            create_if_missing: false,
        }
    }
}

/// HTTP listener configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HttpConfig {
    /// Address to listen on
    #[serde(default = "default_address")]
    pub address: SocketAddr,

    /// Prefix for the catalog routes, e.g. "/api" serves "/api/items"
    #[serde(default = "default_base_path")]
    pub base_path: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            address: default_address(),
            base_path: default_base_path(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Filter directive used when RUST_LOG is unset
    #[serde(default = "default_level")]
    pub level: String,

    /// Output format
    #[serde(default)]
    pub format: LogFormat,

    /// Prefix each line with a timestamp
    #[serde(default = "default_timestamps")]
    pub timestamps: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: LogFormat::default(),
            timestamps: default_timestamps(),
        }
    }
}

/// Log line format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable multi-field lines
    #[default]
    Pretty,
    /// Single-line human-readable output
    Compact,
    /// One JSON object per line
    Json,
}

/// Configuration error.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

fn default_data_path() -> PathBuf {
    PathBuf::from(DEFAULT_DATA_PATH)
}

fn default_address() -> SocketAddr {
    DEFAULT_ADDRESS
        .parse()
        .unwrap_or_else(|_| SocketAddr::from(([127, 0, 0, 1], 4001)))
}

fn default_base_path() -> String {
    DEFAULT_BASE_PATH.to_string()
}

fn default_level() -> String {
    "info".to_string()
}

fn default_timestamps() -> bool {
    true
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse and validate configuration from TOML text.
    pub fn parse(contents: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let base = &self.http.base_path;
        if !base.is_empty() && !base.starts_with('/') {
            return Err(ConfigError::Invalid(format!(
                "http.base_path '{}' must start with '/'",
                base
            )));
        }
        if base.ends_with('/') {
            return Err(ConfigError::Invalid(format!(
                "http.base_path '{}' must not end with '/'",
                base
            )));
        }
        if self.store.path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("store.path must not be empty".into()));
        }
        Ok(())
    }

    /// The default configuration as TOML, for `--print-config`.
    pub fn default_toml() -> String {
        format!(
            r#"[store]
path = "{DEFAULT_DATA_PATH}"
create_if_missing = false

[http]
address = "{DEFAULT_ADDRESS}"
base_path = "{DEFAULT_BASE_PATH}"

[logging]
level = "info"
format = "pretty"   # pretty | compact | json
timestamps = true
"#
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.store.path, PathBuf::from("data/items.json"));
        assert!(!config.store.create_if_missing);
        assert_eq!(config.http.address.port(), 4001);
        assert_eq!(config.http.base_path, "/api");
        assert_eq!(config.logging.format, LogFormat::Pretty);
        assert!(config.logging.timestamps);
    }

    #[test]
    fn test_default_toml_round_trips() {
        let config = Config::parse(&Config::default_toml()).unwrap();
        assert_eq!(config.http.address, default_address());
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_overrides() {
        let config = Config::parse(
            r#"
            [store]
            path = "/var/lib/catalog/items.json"
            create_if_missing = true

            [http]
            address = "0.0.0.0:8080"
            base_path = ""

            [logging]
            format = "json"
            timestamps = false
            "#,
        )
        .unwrap();

        assert!(config.store.create_if_missing);
        assert_eq!(config.http.address.port(), 8080);
        assert_eq!(config.http.base_path, "");
        assert_eq!(config.logging.format, LogFormat::Json);
        assert!(!config.logging.timestamps);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = Config::parse("[http]\nport = 80\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_bad_base_path_rejected() {
        assert!(matches!(
            Config::parse("[http]\nbase_path = \"api\"\n"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            Config::parse("[http]\nbase_path = \"/api/\"\n"),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(&dir.path().join("catalogd.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
