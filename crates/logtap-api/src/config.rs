//! Service settings: optional TOML file, then environment overrides.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Names the TOML file to load before env overrides.
pub const CONFIG_ENV: &str = "LOGTAP_CONFIG";

const HOST_ENV: &str = "LOGTAP_HOST";
const PORT_ENV: &str = "LOGTAP_PORT";
const LOG_DIRECTORY_ENV: &str = "LOGTAP_LOG_DIRECTORY";
const API_KEY_ENV: &str = "LOGTAP_API_KEY";
const REQUEST_TIMEOUT_ENV: &str = "LOGTAP_REQUEST_TIMEOUT_SECS";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub host: String,
    pub port: u16,

    // files are only ever served from here
    pub log_directory: PathBuf,

    // empty or missing disables authentication
    pub api_key: Option<String>,

    pub request_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            log_directory: PathBuf::from("/var/log"),
            api_key: None,
            request_timeout_secs: 30,
        }
    }
}

impl Settings {
    /// Load from the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with(|key| std::env::var(key).ok())
    }

    /// Load using `env` as the variable lookup.
    pub fn load_with(env: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut settings = match env(CONFIG_ENV).filter(|p| !p.is_empty()) {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        settings.apply_env(env)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    fn apply_env(&mut self, env: impl Fn(&str) -> Option<String>) -> Result<(), ConfigError> {
        if let Some(host) = env(HOST_ENV) {
            self.host = host;
        }
        if let Some(port) = env(PORT_ENV) {
            self.port = parse_env(PORT_ENV, &port)?;
        }
        if let Some(dir) = env(LOG_DIRECTORY_ENV) {
            self.log_directory = PathBuf::from(dir);
        }
        if let Some(key) = env(API_KEY_ENV) {
            self.api_key = Some(key);
        }
        if let Some(secs) = env(REQUEST_TIMEOUT_ENV) {
            self.request_timeout_secs = parse_env(REQUEST_TIMEOUT_ENV, &secs)?;
        }
        Ok(())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "request_timeout_secs",
                value: "0".to_string(),
            });
        }
        Ok(())
    }

    /// The configured key, or `None` when authentication is off.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|k| !k.is_empty())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_env<T: std::str::FromStr>(key: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key,
        value: value.to_string(),
    })
}
