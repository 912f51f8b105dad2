use crate::model::Platform;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;

pub const DEFAULT_PAGE_SIZE: usize = 10;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Overrides `api_base_url` from the config file
pub const ENV_API_URL: &str = "UEM_API_URL";
/// Overrides `api_token` from the config file
pub const ENV_API_TOKEN: &str = "UEM_API_TOKEN";
/// Overrides `log_level` from the config file
pub const ENV_LOG_LEVEL: &str = "UEM_CONSOLE_LOG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub api_base_url: String,
    #[serde(default)]
    pub api_token: Option<String>,
    #[serde(default)]
    pub default_platform: Platform,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,
    /// Where exports are written; `~/uem-console-exports` when unset
    #[serde(default)]
    pub export_dir: Option<String>,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8080/api".to_string(),
            api_token: None,
            default_platform: Platform::default(),
            page_size: DEFAULT_PAGE_SIZE,
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            export_dir: None,
            log_level: default_log_level(),
        }
    }
}

impl Config {
    pub fn config_dir() -> Option<PathBuf> {
        let home = env::var("HOME").ok()?;
        Some(PathBuf::from(home).join(".uem-console"))
    }

    pub fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("config.json"))
    }

    pub fn log_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("uem-console.log"))
    }

    /// Load the saved config, `None` on first run or if it can't be parsed
    pub fn load() -> Option<Config> {
        let config_path = Self::config_path()?;
        if !config_path.exists() {
            return None;
        }

        let contents = fs::read_to_string(&config_path).ok()?;
        Self::parse(&contents)
    }

    fn parse(contents: &str) -> Option<Config> {
        let mut config: Config = serde_json::from_str(contents).ok()?;
        if config.page_size == 0 {
            config.page_size = DEFAULT_PAGE_SIZE;
        }
        Some(config)
    }

    /// Apply `UEM_API_URL` / `UEM_API_TOKEN` on top of the file values
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(env::var(ENV_API_URL).ok(), env::var(ENV_API_TOKEN).ok())
    }

    fn with_overrides(mut self, url: Option<String>, token: Option<String>) -> Self {
        if let Some(url) = url.filter(|u| !u.trim().is_empty()) {
            self.api_base_url = url.trim().to_string();
        }
        if let Some(token) = token.filter(|t| !t.trim().is_empty()) {
            self.api_token = Some(token.trim().to_string());
        }
        self
    }

    /// Effective log level: `UEM_CONSOLE_LOG` wins over the config value
    pub fn log_level_filter(&self) -> log::LevelFilter {
        let level = env::var(ENV_LOG_LEVEL).unwrap_or_else(|_| self.log_level.clone());
        parse_level(&level)
    }

    pub fn export_path(&self) -> PathBuf {
        match &self.export_dir {
            Some(dir) if !dir.trim().is_empty() => PathBuf::from(dir.trim()),
            _ => crate::services::default_export_dir(),
        }
    }

    /// Save the config to disk
    pub fn save(&self) -> anyhow::Result<()> {
        let config_dir = Self::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        // Create config directory if it doesn't exist
        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)?;
        }

        let config_path = Self::config_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config path"))?;

        let contents = serde_json::to_string_pretty(self)?;
        fs::write(&config_path, contents)?;

        Ok(())
    }
}

fn parse_level(level: &str) -> log::LevelFilter {
    level
        .trim()
        .parse()
        .unwrap_or(log::LevelFilter::Info)
}
