//! Configuration loading from TOML files

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;
use threadline_core::HttpConfig;
use threadline_hn::api::DEFAULT_BASE_URL;
use threadline_hn::config::DEFAULT_OUTPUT;
use threadline_hn::paginate::DEFAULT_PAGE_SIZE;

/// Settings file for threadline
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub http: HttpSection,
    pub output: OutputConfig,
    pub bios: BiosConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub page_size: u32,
    /// Pause between page requests
    pub page_delay_ms: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            page_delay_ms: 0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpSection {
    pub user_agent: String,
    /// Whole-request timeout; unset means wait indefinitely
    pub timeout_secs: Option<u64>,
    pub connect_timeout_secs: u64,
}

impl Default for HttpSection {
    fn default() -> Self {
        let defaults = HttpConfig::default();
        Self {
            user_agent: defaults.user_agent,
            timeout_secs: None,
            connect_timeout_secs: defaults.connect_timeout.as_secs(),
        }
    }
}

impl HttpSection {
    pub fn to_http_config(&self) -> HttpConfig {
        HttpConfig {
            user_agent: self.user_agent.clone(),
            timeout: self.timeout_secs.map(Duration::from_secs),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub path: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_OUTPUT),
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Default)]
#[serde(default)]
pub struct BiosConfig {
    /// Cap on simultaneous profile requests; unset = unbounded
    pub max_concurrency: Option<usize>,
}

impl Config {
    /// Load configuration from default locations
    ///
    /// Search order:
    /// 1. ./threadline.toml (current directory)
    /// 2. ~/.config/threadline/config.toml
    ///
    /// If no config file found, returns default config.
    pub fn load() -> Result<Self> {
        let local_config = PathBuf::from("threadline.toml");
        if local_config.exists() {
            return Self::from_file(&local_config);
        }

        if let Some(dirs) = directories::ProjectDirs::from("", "", "threadline") {
            let user_config = dirs.config_dir().join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        log::debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Load configuration from a specific file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Pipeline settings for one thread, before CLI overrides
    pub fn pipeline(&self, thread_id: &str) -> threadline_hn::Config {
        let mut config = threadline_hn::Config::new(thread_id);
        config.output_path = self.output.path.clone();
        config.base_url = self.api.base_url.clone();
        config.page_size = self.api.page_size;
        config.page_delay = Duration::from_millis(self.api.page_delay_ms);
        config.max_concurrency = self.bios.max_concurrency;
        config.http = self.http.to_http_config();
        config
    }
}
