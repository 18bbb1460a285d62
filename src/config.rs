/// Application configuration
///
/// Read from `config.json` in the application data directory:
/// - Linux: ~/.local/share/file-catalog/config.json
/// - macOS: ~/Library/Application Support/file-catalog/config.json
/// - Windows: %APPDATA%\file-catalog\config.json
///
/// Every key is optional; missing keys fall back to the defaults below.

use serde::Deserialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing_subscriber::{fmt, EnvFilter};

const APP_DIR: &str = "file-catalog";
const CONFIG_FILE: &str = "config.json";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", .path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Directory holding one catalog file per tab
    pub catalog_dir: PathBuf,
    /// Label of the tab opened at start-up
    pub default_tab_label: String,
    /// Reopen catalogs left over from the previous session as tabs
    pub restore_catalogs: bool,
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            catalog_dir: app_data_dir().join("catalogs"),
            default_tab_label: "Default".to_string(),
            restore_catalogs: true,
            logging: LoggingConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load the config from the data directory, or defaults if the file
    /// doesn't exist
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&app_data_dir().join(CONFIG_FILE))
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::ReadFile {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: "pretty".into(),
        }
    }
}

impl LoggingConfig {
    /// Install the global tracing subscriber. `RUST_LOG` wins over `level`.
    pub fn init(&self) {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.level));

        match self.format.as_str() {
            "json" => fmt().json().with_env_filter(filter).init(),
            _ => fmt().with_env_filter(filter).init(),
        }
    }
}

/// Get the per-user application data directory
fn app_data_dir() -> PathBuf {
    dirs::data_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}
