use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::store::DEFAULT_QUOTE_CONTEXT;
use crate::tui::ThemeConfig;

/// Environment variable that overrides `api_url`.
pub const API_URL_ENV: &str = "PROCRASTINATOR_API_URL";

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Base URL of the backend, without the `/api` suffix.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Fallback log filter when `PROCRASTINATOR_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub quote: QuoteConfig,

    #[serde(default)]
    pub theme: ThemeConfig,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_url: default_api_url(),
            request_timeout_secs: default_request_timeout_secs(),
            log_level: default_log_level(),
            quote: QuoteConfig::default(),
            theme: ThemeConfig::default(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct QuoteConfig {
    /// Extra context sent along with every quote request.
    #[serde(default = "default_quote_context")]
    pub context: String,
}

impl Default for QuoteConfig {
    fn default() -> Self {
        QuoteConfig {
            context: default_quote_context(),
        }
    }
}

fn default_api_url() -> String {
    "http://localhost:8001".to_string()
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_quote_context() -> String {
    DEFAULT_QUOTE_CONTEXT.to_string()
}

impl Config {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    /// Apply environment overrides. `lookup` is `std::env::var` in production.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(API_URL_ENV).filter(|u| !u.trim().is_empty()) {
            self.api_url = url;
        }
        self.normalize();
    }

    /// Apply a `--api-url` flag, which wins over file and environment.
    pub fn apply_cli(&mut self, api_url: Option<&str>) {
        if let Some(url) = api_url {
            self.api_url = url.to_string();
        }
        self.normalize();
    }

    fn normalize(&mut self) {
        self.api_url = self.api_url.trim().trim_end_matches('/').to_string();
    }
}

/// Returns the base config directory: ~/.procrastinator/
pub fn base_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("could not determine home directory")?;
    Ok(home.join(".procrastinator"))
}

pub fn config_path() -> Result<PathBuf> {
    Ok(base_dir()?.join("config.toml"))
}

pub fn log_path() -> Result<PathBuf> {
    Ok(base_dir()?.join("procrastinator.log"))
}

pub fn ensure_dirs() -> Result<()> {
    let base = base_dir()?;
    fs::create_dir_all(&base).context("failed to create ~/.procrastinator/")?;
    Ok(())
}

/// Load config from ~/.procrastinator/config.toml (defaults if it doesn't
/// exist), then apply environment overrides.
pub fn load() -> Result<Config> {
    let mut config = load_from(&config_path()?)?;
    config.apply_env(|key| std::env::var(key).ok());
    Ok(config)
}

pub fn load_from(path: &Path) -> Result<Config> {
    if path.exists() {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let config: Config =
            toml::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))?;
        Ok(config)
    } else {
        Ok(Config::default())
    }
}
