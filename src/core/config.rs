//! Configuration file management.
//!
//! Handles reading and validating the optional `.fabrix.toml` project file.
//! A missing file is not an error: every section has a default.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::constants;
use crate::error::{self, ConfigError, Error, Result};

/// Project configuration stored in `.fabrix.toml`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub fabrix: Meta,
    #[serde(default)]
    pub paths: Paths,
    #[serde(default)]
    pub rules: RulesConfig,
    #[serde(default)]
    pub secrets: SecretsConfig,
}

/// Metadata section of the configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meta {
    /// Configuration version
    pub version: String,
}

impl Default for Meta {
    fn default() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Where artifact sets live.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paths {
    /// Root directory holding one artifact directory per application.
    pub builder: String,
}

impl Default for Paths {
    fn default() -> Self {
        Self {
            builder: "builder".to_string(),
        }
    }
}

/// Rule table override.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RulesConfig {
    /// JSON rule table replacing the built-in one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

/// Secret key location.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SecretsConfig {
    /// Key file path; `~/` expands to the home directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_file: Option<String>,
}

impl Config {
    /// Load `.fabrix.toml` from the current directory, or defaults.
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new("."))
    }

    /// Load `.fabrix.toml` from `dir`, or defaults if it is absent.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` if the TOML is malformed, or
    /// `ConfigError::InvalidValue` if a field fails validation.
    pub fn load_from(dir: &Path) -> Result<Self> {
        let path = dir.join(constants::CONFIG_FILE);
        debug!(path = %path.display(), "loading config");

        let contents = match error::read_to_string(&path) {
            Ok(contents) => contents,
            Err(Error::NotFound { .. }) => {
                debug!("no config file, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(e),
        };

        let mut config: Self = toml::from_str(&contents).map_err(ConfigError::Parse)?;
        config.validate()?;

        if let Some(rules) = config.rules.path.take() {
            config.rules.path = Some(if rules.is_relative() {
                dir.join(rules)
            } else {
                rules
            });
        }

        debug!(builder = %config.paths.builder, "config loaded");
        Ok(config)
    }

    /// Validate the configuration structure and contents
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` on validation failure.
    pub fn validate(&self) -> Result<()> {
        let version_parts: Vec<&str> = self.fabrix.version.split('.').collect();
        if version_parts.len() < 2 || version_parts.iter().any(|p| p.is_empty()) {
            return Err(ConfigError::InvalidValue {
                field: "version",
                reason: format!("not a valid semver: '{}'", self.fabrix.version),
            }
            .into());
        }

        if self.paths.builder.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "paths.builder",
                reason: "cannot be empty".to_string(),
            }
            .into());
        }

        if let Some(key_file) = &self.secrets.key_file {
            if key_file.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: "secrets.key_file",
                    reason: "cannot be empty".to_string(),
                }
                .into());
            }
        }

        Ok(())
    }

    /// Artifact directory for an application key.
    pub fn artifact_dir(&self, app_key: &str) -> PathBuf {
        Path::new(&self.paths.builder).join(app_key)
    }
}
