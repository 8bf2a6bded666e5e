//! Dashboard configuration file and environment variable handling.
//!
//! Settings come from an optional TOML file, then environment overrides:
//!
//! ```toml
//! [forecast]
//! base_url = "http://localhost:8000"
//! endpoint = "/predict"
//! timeout_secs = 20
//!
//! [server]
//! host = "0.0.0.0"
//! port = 8080
//! ```

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::ConfigError;

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(default)]
    pub forecast: ForecastSettings,
    #[serde(default)]
    pub server: ServerSettings,
}

/// Prediction service settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// HTTP server bind settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_endpoint() -> String {
    "/predict".to_string()
}

fn default_timeout_secs() -> u64 {
    20
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ForecastSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            endpoint: default_endpoint(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ForecastSettings {
    /// Full URL of the predict endpoint.
    pub fn predict_url(&self) -> String {
        let base = self.base_url.trim_end_matches('/');
        let endpoint = self.endpoint.trim_start_matches('/');
        format!("{}/{}", base, endpoint)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl DashboardConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Arguments
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    /// * `Ok(DashboardConfig)` if successful
    /// * `Err(ConfigError)` if the file cannot be read or parsed
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io {
            path: path.as_ref().display().to_string(),
            message: e.to_string(),
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load configuration from the default location.
    ///
    /// Searches for `geodash.toml` in:
    /// 1. Current directory
    /// 2. `backend/` directory
    /// 3. Parent directory
    ///
    /// Falls back to defaults when no file exists.
    pub fn from_default_location() -> Result<Self, ConfigError> {
        let search_paths = [
            PathBuf::from("geodash.toml"),
            PathBuf::from("backend/geodash.toml"),
            PathBuf::from("../geodash.toml"),
        ];

        match search_paths.iter().find(|path| path.exists()) {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Apply environment variable overrides.
    ///
    /// # Environment Variables
    /// - `PREDICTION_SERVICE_URL`: prediction service base URL
    /// - `PREDICTION_TIMEOUT_SECS`: request timeout in seconds
    /// - `HOST`: server host
    /// - `PORT`: server port
    pub fn apply_env(mut self) -> Result<Self, ConfigError> {
        if let Ok(url) = env::var("PREDICTION_SERVICE_URL") {
            self.forecast.base_url = url;
        }
        if let Ok(timeout) = env::var("PREDICTION_TIMEOUT_SECS") {
            self.forecast.timeout_secs = timeout.parse().map_err(|_| {
                ConfigError::Invalid("PREDICTION_TIMEOUT_SECS must be a whole number".to_string())
            })?;
        }
        if let Ok(host) = env::var("HOST") {
            self.server.host = host;
        }
        if let Ok(port) = env::var("PORT") {
            self.server.port = port
                .parse()
                .map_err(|_| ConfigError::Invalid("PORT must be a valid port number".to_string()))?;
        }
        Ok(self)
    }

    /// Default location, then environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_default_location()?.apply_env()
    }
}
