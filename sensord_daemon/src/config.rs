//! Daemon configuration.
//!
//! Loaded once from a TOML file at startup and passed by reference into
//! every component; nothing reads ambient global state.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Location probed when `--config` is not given.
pub const DEFAULT_CONFIG_PATH: &str = "/etc/sensord/sensord.toml";

#[derive(Debug, Clone, Deserialize)]
pub struct SensordConfig {
    pub store: StoreConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    pub sensors: SensorsConfig,
    pub content: ContentConfig,
}

/// Persistent-store connection parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    pub host: String,
    pub port: u16,
    /// Store (database) name.
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Tracing filter directive, e.g. `sensord=info`.
    #[serde(default = "default_filter")]
    pub filter: String,
    /// Log file path; logs go to stderr when unset.
    #[serde(default)]
    pub file: Option<PathBuf>,
}

fn default_filter() -> String {
    "sensord=info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_filter(),
            file: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SensorsConfig {
    /// Working directory for sensor modules, created at startup if absent.
    pub modules_path: PathBuf,
    /// Directory holding the system-provided sensors.
    pub system_path: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContentConfig {
    /// Root directory under which content packs are installed.
    pub pack_root: PathBuf,
}

impl SensordConfig {
    /// Load and deserialize the config file. Any failure here is fatal to
    /// startup; nothing has been acquired yet.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config = toml::from_str(&raw)
            .with_context(|| format!("malformed config file {}", path.display()))?;
        Ok(config)
    }
}
