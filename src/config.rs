//! Server configuration.
//!
//! Loaded once at startup from a YAML (or JSON) file and shared read-only
//! afterwards.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, bail};
use serde::Deserialize;

/// Environment variable naming the configuration file.
pub const CONFIG_ENV: &str = "MINIWEB_CONFIG";
/// Configuration file used when `MINIWEB_CONFIG` is not set.
pub const DEFAULT_CONFIG_PATH: &str = "config.yaml";

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// TCP port, bound on all interfaces
    pub port: u16,

    /// Directory static content is served from
    #[serde(alias = "root")]
    pub root_directory: PathBuf,

    /// Directory for the date-stamped request logs
    #[serde(default = "default_log_directory")]
    pub log_directory: PathBuf,

    #[serde(default = "default_timeout_secs")]
    pub read_timeout_secs: u64,

    #[serde(default = "default_timeout_secs")]
    pub write_timeout_secs: u64,

    /// Answer 404 for any path containing a `..` segment
    #[serde(default)]
    pub reject_traversal: bool,
}

fn default_log_directory() -> PathBuf {
    PathBuf::from("logs")
}

fn default_timeout_secs() -> u64 {
    5
}

impl Config {
    /// Loads the file named by `MINIWEB_CONFIG`, or `config.yaml`.
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var(CONFIG_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::from_file(path)
    }

    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_yaml(&text)
            .with_context(|| format!("invalid config file {}", path.display()))
    }

    /// Parses and validates a configuration document.
    pub fn from_yaml(text: &str) -> anyhow::Result<Self> {
        let cfg: Config = serde_yaml::from_str(text).context("malformed configuration")?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.port == 0 {
            bail!("port must be between 1 and 65535");
        }
        if !self.root_directory.is_dir() {
            bail!(
                "root directory {} does not exist or is not a directory",
                self.root_directory.display()
            );
        }
        if self.read_timeout_secs == 0 || self.write_timeout_secs == 0 {
            bail!("timeouts must be at least one second");
        }
        Ok(())
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.read_timeout_secs)
    }

    pub fn write_timeout(&self) -> Duration {
        Duration::from_secs(self.write_timeout_secs)
    }

    pub fn listen_addr(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}
