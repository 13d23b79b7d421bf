//! Configuration management for the sitedesk client and CLI
//!
//! Sources, lowest priority first: built-in defaults, an optional JSON or
//! TOML file, then `SITEDESK_*` environment variables. The backend address
//! comes from `SITEDESK_BASE_URL` and falls back to the local development
//! server.

use config::{Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::error::{DeskError, Result};
use crate::storage::FileStoreConfig;

/// Local development backend
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

const ENV_PREFIX: &str = "SITEDESK";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub base_url: String,
    /// Client-side request timeout in seconds, 0 for none
    #[serde(default)]
    pub timeout: u64,
    #[serde(default = "default_true")]
    pub use_proxy: bool,
    /// Extend the session expiry on every successful authenticated call
    #[serde(default = "default_true")]
    pub sliding_session: bool,
    #[serde(default)]
    pub verbose: bool,
    #[serde(default = "default_storage_dir")]
    pub storage_dir: PathBuf,
    /// Obfuscation key for the on-disk session file
    #[serde(default)]
    pub storage_key: Option<String>,
}

fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: 0,
            use_proxy: true,
            sliding_session: true,
            verbose: false,
            storage_dir: default_storage_dir(),
            storage_key: None,
        }
    }
}

impl Config {
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }

    /// Load from the default config file location plus environment
    pub fn load() -> Result<Self> {
        Self::from_file_and_env(Some(default_config_path()))
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        Self::from_file_and_env(Some(path))
    }

    pub fn from_file_and_env<P: AsRef<Path>>(config_file: Option<P>) -> Result<Self> {
        let defaults = Self::default();
        let mut builder = config::Config::builder()
            .set_default("base_url", defaults.base_url)?
            .set_default("timeout", 0_i64)?
            .set_default("use_proxy", defaults.use_proxy)?
            .set_default("sliding_session", defaults.sliding_session)?
            .set_default("verbose", defaults.verbose)?
            .set_default(
                "storage_dir",
                defaults.storage_dir.to_string_lossy().to_string(),
            )?;

        if let Some(config_path) = config_file {
            if config_path.as_ref().exists() {
                builder = builder.add_source(File::from(config_path.as_ref()));
            }
        }
        builder = builder.add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true));

        let config: Self = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub async fn save(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let content = serde_json::to_string_pretty(self)?;
        fs::write(config_path, content).await?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        let base_url = self.base_url.trim();
        if base_url.is_empty() {
            return Err(DeskError::invalid_endpoint("Base URL cannot be empty"));
        }
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(DeskError::invalid_endpoint(format!(
                "Base URL must start with http:// or https://, got '{}'",
                base_url
            )));
        }
        Ok(())
    }

    /// Join the base URL and an endpoint path
    pub fn endpoint_url(&self, endpoint: &str) -> String {
        let endpoint = endpoint.strip_prefix('/').unwrap_or(endpoint);
        format!("{}/{}", self.base_url.trim().trim_end_matches('/'), endpoint)
    }

    /// `tracing` filter directive; `--verbose` or `verbose` in config enables debug
    pub fn log_filter(&self, verbose_flag: bool) -> String {
        let level = if verbose_flag || self.verbose {
            "debug"
        } else {
            "info"
        };
        format!("sitedesk={}", level)
    }

    pub fn session_store(&self) -> FileStoreConfig {
        FileStoreConfig {
            path: self.storage_dir.join("session.json"),
            encryption_key: self.storage_key.clone(),
        }
    }
}

/// Builder for Config
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    base_url: Option<String>,
    timeout: Option<u64>,
    use_proxy: Option<bool>,
    sliding_session: Option<bool>,
    verbose: Option<bool>,
    storage_dir: Option<PathBuf>,
    config_file: Option<PathBuf>,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn base_url<S: Into<String>>(mut self, base_url: S) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn timeout(mut self, timeout: u64) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn use_proxy(mut self, use_proxy: bool) -> Self {
        self.use_proxy = Some(use_proxy);
        self
    }

    pub fn sliding_session(mut self, enabled: bool) -> Self {
        self.sliding_session = Some(enabled);
        self
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = Some(verbose);
        self
    }

    pub fn storage_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.storage_dir = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn config_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_file = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn build(self) -> Result<Config> {
        let mut config = Config::from_file_and_env(self.config_file.as_deref())?;

        if let Some(base_url) = self.base_url {
            config.base_url = base_url;
        }
        if let Some(timeout) = self.timeout {
            config.timeout = timeout;
        }
        if let Some(use_proxy) = self.use_proxy {
            config.use_proxy = use_proxy;
        }
        if let Some(sliding_session) = self.sliding_session {
            config.sliding_session = sliding_session;
        }
        if let Some(verbose) = self.verbose {
            config.verbose = verbose;
        }
        if let Some(storage_dir) = self.storage_dir {
            config.storage_dir = storage_dir;
        }

        config.validate()?;
        Ok(config)
    }
}

pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("sitedesk")
}

pub fn default_config_path() -> PathBuf {
    default_config_dir().join("config.json")
}

pub fn default_storage_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("sitedesk")
}
