//! YAML-backed configuration.
//!
//! Configuration is loaded from an explicit path into an explicit [`Config`]
//! instance that the caller passes around; there is no process-global
//! configuration state. Unknown keys are rejected so typos fail loudly
//! instead of silently falling back to defaults.
//!
//! Every field has a default, so an empty file (or no file at all) yields a
//! fully usable configuration.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::info;

use crate::utils::is_valid_url;

/// Configuration loading and validation failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse YAML: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("invalid configuration: {0}")]
    Validation(String),
}

/// Top-level configuration document.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Crawl cadence and output location.
    #[serde(default)]
    pub scraper: ScraperConfig,
    /// Rendering engine session settings.
    #[serde(default)]
    pub engine: EngineConfig,
    /// Audit-log client; events are only sent when this is present.
    #[serde(default)]
    pub audit: Option<AuditConfig>,
    /// Defaults for the `github_stats` binary.
    #[serde(default)]
    pub github: Option<GitHubConfig>,
}

/// Crawl cadence and output settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScraperConfig {
    /// Site offered when the prompt is left blank.
    #[serde(default = "default_blog_url")]
    pub default_blog_url: String,
    /// Pause after each scroll command, in seconds.
    #[serde(default = "default_scroll_pause_secs")]
    pub scroll_pause_secs: u64,
    /// Scroll-and-pause steps between height comparisons.
    #[serde(default = "default_scrolls_before_check")]
    pub scrolls_before_check: u32,
    /// Directory the CSV file is written into.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            default_blog_url: default_blog_url(),
            scroll_pause_secs: default_scroll_pause_secs(),
            scrolls_before_check: default_scrolls_before_check(),
            output_dir: default_output_dir(),
        }
    }
}

/// Rendering engine session settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EngineConfig {
    /// WebDriver endpoint of an already-running driver.
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,
    /// Run the browser without a visible window.
    #[serde(default = "default_headless")]
    pub headless: bool,
    /// Browser viewport, `WIDTHxHEIGHT`.
    #[serde(default = "default_window_size")]
    pub window_size: String,
    /// Fixed browser identity; a pool entry is picked when unset.
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            webdriver_url: default_webdriver_url(),
            headless: default_headless(),
            window_size: default_window_size(),
            user_agent: None,
        }
    }
}

/// Audit-log client settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuditConfig {
    /// Base URL of the audit-log API.
    pub api_url: String,
    /// API key sent as `x-api-key`; omitted header when unset.
    #[serde(default)]
    pub api_key: Option<String>,
}

/// Defaults for the `github_stats` binary, so it can run unprompted.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GitHubConfig {
    pub username: String,
    pub repository: String,
    #[serde(default)]
    pub token: Option<String>,
}

fn default_blog_url() -> String {
    "https://rschu.me".to_string()
}

fn default_scroll_pause_secs() -> u64 {
    2
}

fn default_scrolls_before_check() -> u32 {
    2
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_webdriver_url() -> String {
    "http://127.0.0.1:9515".to_string()
}

fn default_headless() -> bool {
    true
}

fn default_window_size() -> String {
    "1920x1080".to_string()
}

impl Config {
    /// Load and validate configuration from a YAML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        let config = if raw.trim().is_empty() {
            Config::default()
        } else {
            serde_yaml::from_str(&raw)?
        };
        config.validate()?;
        info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Check cross-field constraints a plain parse cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.scraper.scrolls_before_check == 0 {
            return Err(ConfigError::Validation(
                "scraper.scrolls_before_check must be at least 1".to_string(),
            ));
        }
        if !is_valid_url(&self.scraper.default_blog_url) {
            return Err(ConfigError::Validation(format!(
                "scraper.default_blog_url '{}' is not a valid URL",
                self.scraper.default_blog_url
            )));
        }
        Ok(())
    }
}
