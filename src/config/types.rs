//! Configuration data types.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use super::store::ParameterStore;
use super::validation::Validator;
use crate::domain::{Diagnostics, ValidationFailed};

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Enable debug logging to file
    pub debug: bool,

    /// Path to log directory
    pub log_path: PathBuf,

    /// Program (and leading arguments) used to publish
    pub aws_cli: String,

    /// Notification parameters, type-checked through the parameter schema
    pub sns: toml::Table,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            debug: false,
            log_path: default_log_path(),
            aws_cli: "aws".to_string(),
            sns: toml::Table::new(),
        }
    }
}

impl Config {
    /// Explicit notification parameters from the `[sns]` table.
    pub fn parameters(&self, diagnostics: &dyn Diagnostics) -> Result<ParameterStore, ValidationFailed> {
        ParameterStore::from_table(&self.sns, diagnostics)
    }

    /// Validate configuration and return every violation found.
    pub fn validate(&self, diagnostics: &dyn Diagnostics) -> Result<(), ValidationFailed> {
        let store = self.parameters(diagnostics)?;
        Validator::new(diagnostics).check(&store)
    }
}

/// Get default log path (relative to config directory).
/// This returns a placeholder; the actual path is set by ConfigService based on config file location.
pub fn default_log_path() -> PathBuf {
    default_log_path_for_config_dir(None)
}

/// Get log path based on config directory.
pub fn default_log_path_for_config_dir(config_dir: Option<&Path>) -> PathBuf {
    config_dir
        .map(|d| d.to_path_buf())
        .unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config")
                .join("sns-report")
        })
        .join("logs")
}
