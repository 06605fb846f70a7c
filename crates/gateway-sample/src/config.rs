//! # Configuration
//!
//! The sample host reads a [`GatewayConfig`] from a TOML file. Every section has
//! defaults, so an empty file (or no file at all) yields a gateway serving
//! `networks` and `ports`.
//!
//! ```toml
//! [logging]
//! filter = "info"
//!
//! [store]
//! buffer_size = 32
//!
//! [[resources]]
//! singular = "network"
//! plural = "networks"
//! ```
//!
//! Parsing is serde's job; [`GatewayConfig::validate`] checks what serde cannot.

use gateway_framework::ResourceType;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "GATEWAY_CONFIG";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Root configuration for the sample gateway.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct GatewayConfig {
    pub logging: LoggingConfig,
    pub store: StoreConfig,
    pub resources: Vec<ResourceConfig>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            logging: LoggingConfig::default(),
            store: StoreConfig::default(),
            resources: vec![
                ResourceConfig::new("network", "networks"),
                ResourceConfig::new("port", "ports"),
            ],
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive; `RUST_LOG` overrides it.
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct StoreConfig {
    /// Capacity of each store actor's request channel.
    pub buffer_size: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self { buffer_size: 32 }
    }
}

/// One resource type to serve.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct ResourceConfig {
    pub singular: String,
    pub plural: String,
}

impl ResourceConfig {
    pub fn new(singular: impl Into<String>, plural: impl Into<String>) -> Self {
        Self {
            singular: singular.into(),
            plural: plural.into(),
        }
    }

    pub fn resource_type(&self) -> ResourceType {
        ResourceType::new(self.singular.as_str(), self.plural.as_str())
    }
}

impl GatewayConfig {
    /// Loads the file named by `GATEWAY_CONFIG`, or the defaults when it is unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => load_config(Path::new(&path)),
            None => Ok(Self::default()),
        }
    }

    /// Parses and validates a TOML document.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: GatewayConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.resources.is_empty() {
            return Err(ConfigError::Invalid("no resources configured".into()));
        }
        if self.store.buffer_size == 0 {
            return Err(ConfigError::Invalid("store.buffer_size must be > 0".into()));
        }

        let mut seen = HashSet::new();
        for resource in &self.resources {
            if resource.singular.is_empty() || resource.plural.is_empty() {
                return Err(ConfigError::Invalid("resource names must not be empty".into()));
            }
            if resource.singular == resource.plural {
                return Err(ConfigError::Invalid(format!(
                    "resource {} uses the same singular and plural name",
                    resource.plural
                )));
            }
            for name in [&resource.singular, &resource.plural] {
                if !seen.insert(name.as_str()) {
                    return Err(ConfigError::Invalid(format!("duplicate resource name {name}")));
                }
            }
        }
        Ok(())
    }
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<GatewayConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    GatewayConfig::parse(&content)
}
