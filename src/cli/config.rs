//! Configuration file
//!
//! ```json
//! {
//!   "data_file": "./data/movies.json",
//!   "log_level": "info",
//!   "http": { "host": "0.0.0.0", "port": 1234, "cors_origins": ["http://localhost:8080"] }
//! }
//! ```
//!
//! Every key is optional. Precedence, lowest first: defaults, config file,
//! `PORT` / command-line flags.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::args::CommonArgs;
use super::errors::{CliError, CliResult};
use crate::http_server::HttpServerConfig;
use crate::observability::Severity;

/// Config file looked up in the working directory when `--config` is absent
pub const DEFAULT_CONFIG_PATH: &str = "./moviestore.json";

/// Configuration file structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Backing JSON file (default: ./data/movies.json)
    #[serde(default = "default_data_file")]
    pub data_file: PathBuf,

    /// Minimum log severity (default: "info")
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub http: HttpServerConfig,
}

fn default_data_file() -> PathBuf {
    PathBuf::from("./data/movies.json")
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_file: default_data_file(),
            log_level: default_log_level(),
            http: HttpServerConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            CliError::config_error(format!("Failed to read config {}: {}", path.display(), e))
        })?;

        serde_json::from_str(&content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))
    }

    /// Build the effective configuration for a command.
    ///
    /// An explicit `--config` must exist; the default path is optional.
    pub fn resolve(common: &CommonArgs, port: Option<u16>) -> CliResult<Self> {
        let mut config = match &common.config {
            Some(path) => Self::load(path)?,
            None if Path::new(DEFAULT_CONFIG_PATH).exists() => {
                Self::load(Path::new(DEFAULT_CONFIG_PATH))?
            }
            None => Self::default(),
        };

        if let Some(data_file) = &common.data_file {
            config.data_file = data_file.clone();
        }
        if let Some(port) = port {
            config.http.port = port;
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject values the server cannot run with
    pub fn validate(&self) -> CliResult<()> {
        if self.data_file.as_os_str().is_empty() {
            return Err(CliError::config_error("data_file must not be empty"));
        }

        if self.http.port == 0 {
            return Err(CliError::config_error("http.port must be > 0"));
        }

        self.severity()?;
        Ok(())
    }

    /// Parsed `log_level`
    pub fn severity(&self) -> CliResult<Severity> {
        self.log_level
            .parse()
            .map_err(|e: String| CliError::config_error(format!("Invalid log_level: {}", e)))
    }
}
