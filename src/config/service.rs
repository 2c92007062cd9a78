//! Configuration service for loading and generating config files.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use super::types::default_log_path_for_config_dir;
use super::Config;

/// Configuration service.
pub struct ConfigService;

impl ConfigService {
    /// Get the default configuration file path.
    /// Always uses ~/.config/sns-report/config.toml for cross-platform consistency.
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("sns-report")
            .join("config.toml")
    }

    /// Load configuration from file.
    ///
    /// If `path` is `None`, uses the default path.
    /// If the file doesn't exist, creates default configuration file.
    /// Log path defaults to the same directory as config file.
    ///
    /// The `[sns]` table is not validated here; the notification pipeline
    /// validates it once probed values are merged in.
    pub fn load(path: Option<&Path>) -> Result<Config> {
        let path = path.map(PathBuf::from).unwrap_or_else(Self::default_path);
        let config_dir = path.parent();

        if !path.exists() {
            Self::generate_at(&path)?;
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let mut config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        // log_path equal to the general default means it was not set in the file
        let general_default = default_log_path_for_config_dir(None);
        if config.log_path == general_default {
            config.log_path = default_log_path_for_config_dir(config_dir);
        }

        if config.aws_cli.split_whitespace().next().is_none() {
            anyhow::bail!("Invalid configuration in {}: aws_cli cannot be empty", path.display());
        }

        Ok(config)
    }

    /// Generate default configuration file at the default path.
    pub fn generate_default() -> Result<()> {
        Self::generate_at(&Self::default_path())
    }

    /// Generate default configuration file at the specified path.
    pub fn generate_at(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let content = Self::default_config_content();
        fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Generate default configuration content with comments.
    fn default_config_content() -> String {
        r#"# sns-report configuration file

# Enable debug logging to file (default: false)
debug = false

# Path to log directory (default: same directory as config.toml/logs)
# log_path = "~/.config/sns-report/logs"

# Program used to publish notifications (default: "aws")
# aws_cli = "aws"

[sns]
# Required. Credentials fall back to AWS_ACCESS_KEY_ID / AWS_SECRET_ACCESS_KEY.
# access_key = "AKIA..."
# secret_key = "..."
# topic_arn = "arn:aws:sns:us-east-1:123456789012:chef-runs"

# Optional. Region falls back to the node's availability zone, then AWS_REGION.
# region = "us-east-1"
# token = "..."

# Subject (may contain {{ placeholders }}, so a literal "{{" is not allowed);
# default: "Chef Client success in <node>"
# subject = "Chef run on {{ node_name }}: {{ status }}"

# Body template file; default: built-in summary
# body_template = "/etc/sns-report/body.tmpl"

# Only notify for these OpsWorks activities
# filter_opsworks_activity = ["deploy", "setup"]
"#
        .to_string()
    }
}
