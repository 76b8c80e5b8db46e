//! Configuration for a project root.

use crate::error::{PctxError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Name of the optional configuration file in the project root.
pub const CONFIG_FILE: &str = "pctx.toml";

/// Project-level configuration, read from `pctx.toml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// Context size accounting.
    #[serde(default)]
    pub context: ContextConfig,

    /// Defaults for the project block of new documents.
    #[serde(default)]
    pub project: ProjectDefaults,

    /// Session logging defaults.
    #[serde(default)]
    pub session: SessionConfig,
}

impl Config {
    /// Load configuration from the project root.
    ///
    /// A missing file yields the defaults.
    pub fn load(root: &Path) -> Result<Self> {
        let path = root.join(CONFIG_FILE);
        if path.exists() {
            let content = fs::read_to_string(&path)
                .map_err(|e| PctxError::ConfigError(format!("failed to read config: {}", e)))?;
            let config: Config = toml::from_str(&content)
                .map_err(|e| PctxError::ConfigError(format!("failed to parse config: {}", e)))?;
            config.validate()?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Save configuration to the project root.
    pub fn save(&self, root: &Path) -> Result<()> {
        let path = root.join(CONFIG_FILE);
        let content = toml::to_string_pretty(self)
            .map_err(|e| PctxError::ConfigError(format!("failed to serialize config: {}", e)))?;
        fs::write(&path, content)
            .map_err(|e| PctxError::ConfigError(format!("failed to write config: {}", e)))?;
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        let ratio = self.context.compression_ratio;
        if !(ratio > 0.0 && ratio <= 1.0) {
            return Err(PctxError::ConfigError(format!(
                "context.compression_ratio must be in (0, 1], got {}",
                ratio
            )));
        }
        if self.context.size_limit_kb <= 0.0 {
            return Err(PctxError::ConfigError(
                "context.size_limit_kb must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Size accounting configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ContextConfig {
    /// Size limit written into new documents, in KB (default: 100).
    pub size_limit_kb: f64,

    /// Fraction of the limit at which compression is flagged (default: 0.8).
    pub compression_ratio: f64,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            size_limit_kb: 100.0,
            compression_ratio: 0.8,
        }
    }
}

/// Values used for the project block of a fresh document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ProjectDefaults {
    /// Project name (default: "New Project").
    pub name: String,
    /// Project version (default: "0.1.0").
    pub version: String,
    /// Deployment environment (default: "development").
    pub environment: String,
}

impl Default for ProjectDefaults {
    fn default() -> Self {
        Self {
            name: "New Project".to_string(),
            version: "0.1.0".to_string(),
            environment: "development".to_string(),
        }
    }
}

/// Session logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SessionConfig {
    /// Model name recorded when the caller supplies none (default: "claude").
    pub default_model: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            default_model: "claude".to_string(),
        }
    }
}
