//! Configuration file support for the jira-changelog CLI
//!
//! Loads settings from `_jira-changelog.toml`.

use anyhow::{Context, Result};
use jira_changelog_core::validate_base_url;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default configuration file name
pub const CONFIG_FILE_NAME: &str = "_jira-changelog.toml";

/// Changelog file used when neither the command line nor the config names one
pub const DEFAULT_CHANGELOG: &str = "CHANGELOG.md";

/// Root configuration structure
#[derive(Debug, Default, Clone, Deserialize, Serialize, JsonSchema)]
#[serde(default)]
pub struct Config {
    /// Changelog file configuration
    #[serde(skip_serializing_if = "ChangelogConfig::is_empty")]
    pub changelog: ChangelogConfig,
    /// Jira instance configuration
    #[serde(skip_serializing_if = "JiraConfig::is_empty")]
    pub jira: JiraConfig,
}

/// Changelog file configuration
#[derive(Debug, Default, Clone, Deserialize, Serialize, JsonSchema)]
#[serde(default)]
pub struct ChangelogConfig {
    /// Path of the changelog file, relative to the working directory (default: "CHANGELOG.md")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

impl ChangelogConfig {
    fn is_empty(&self) -> bool {
        self.path.is_none()
    }
}

/// Jira instance configuration
#[derive(Debug, Default, Clone, Deserialize, Serialize, JsonSchema)]
#[serde(default)]
pub struct JiraConfig {
    /// Base URL of the Jira instance, used to build `<base_url>/browse/<ISSUE>` links
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

impl JiraConfig {
    fn is_empty(&self) -> bool {
        self.base_url.is_none()
    }
}

impl Config {
    /// Load configuration from a specific file path
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        config
            .validate()
            .with_context(|| format!("Invalid config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from a directory (looks for `_jira-changelog.toml`)
    ///
    /// Returns `Ok(None)` if the config file doesn't exist.
    pub fn load_from_dir(dir: &Path) -> Result<Option<Self>> {
        let config_path = dir.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            Ok(Some(Self::load(&config_path)?))
        } else {
            Ok(None)
        }
    }

    /// Check values that TOML deserialization cannot
    pub fn validate(&self) -> Result<()> {
        if let Some(base_url) = &self.jira.base_url {
            validate_base_url(base_url).context("jira.base_url")?;
        }
        Ok(())
    }

    /// Changelog path, falling back to `CHANGELOG.md`
    pub fn changelog_path(&self) -> PathBuf {
        self.changelog
            .path
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CHANGELOG))
    }

    /// Generate JSON schema for the configuration
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Config)
    }

    /// Generate JSON schema as a string
    pub fn json_schema_string() -> Result<String> {
        let schema = Self::json_schema();
        serde_json::to_string_pretty(&schema).context("Failed to serialize JSON schema")
    }

    /// Serialize configuration to a TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config to TOML")
    }

    /// Create a sample configuration for the init command
    pub fn sample() -> Self {
        Config {
            changelog: ChangelogConfig {
                path: Some(PathBuf::from(DEFAULT_CHANGELOG)),
            },
            jira: JiraConfig {
                base_url: Some("https://your-domain.atlassian.net".to_string()),
            },
        }
    }
}
