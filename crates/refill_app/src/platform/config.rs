use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use log::LevelFilter;
use refill_engine::ClientSettings;
use refill_logging::refill_warn;
use serde::Deserialize;

use super::logging::LogDestination;

pub const CONFIG_FILENAME: &str = "refill.ron";
/// Overrides `base_url` when set.
pub const ENV_API_URL: &str = "REFILL_API_URL";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {message}")]
    Read { path: PathBuf, message: String },
    #[error("invalid config {path:?}: {message}")]
    Parse { path: PathBuf, message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Extraction service base URL; the fixed `refill` path is appended.
    pub base_url: String,
    pub state_dir: PathBuf,
    pub log_destination: LogDestination,
    pub log_level: String,
    pub request_timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        let client = ClientSettings::default();
        Self {
            base_url: client.base_url,
            state_dir: PathBuf::from(".refill"),
            log_destination: LogDestination::default(),
            log_level: "info".to_string(),
            request_timeout_secs: client.request_timeout.as_secs(),
        }
    }
}

impl AppConfig {
    /// Reads `path`; a missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Self::default());
            }
            Err(err) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    message: err.to_string(),
                })
            }
        };
        ron::from_str(&content).map_err(|err| ConfigError::Parse {
            path: path.to_path_buf(),
            message: err.to_string(),
        })
    }

    /// Loads `{dir}/refill.ron` and applies the `REFILL_API_URL` override.
    pub fn load_from_dir(dir: &Path) -> Result<Self, ConfigError> {
        let config = Self::load(&dir.join(CONFIG_FILENAME))?;
        Ok(config.with_api_url_override(std::env::var(ENV_API_URL).ok()))
    }

    pub fn with_api_url_override(mut self, api_url: Option<String>) -> Self {
        if let Some(url) = api_url.map(|url| url.trim().to_string()) {
            if !url.is_empty() {
                self.base_url = url;
            }
        }
        self
    }

    /// A zero `request_timeout_secs` would fail every submission, so it means the default.
    pub fn client_settings(&self) -> ClientSettings {
        let defaults = ClientSettings::default();
        let request_timeout = if self.request_timeout_secs == 0 {
            refill_warn!(
                "request_timeout_secs = 0 is not usable, using {}s",
                defaults.request_timeout.as_secs()
            );
            defaults.request_timeout
        } else {
            Duration::from_secs(self.request_timeout_secs)
        };
        ClientSettings {
            base_url: self.base_url.clone(),
            request_timeout,
            ..defaults
        }
    }

    pub fn level_filter(&self) -> LevelFilter {
        LevelFilter::from_str(&self.log_level).unwrap_or_else(|_| {
            refill_warn!("Unknown log level {:?}, using info", self.log_level);
            LevelFilter::Info
        })
    }
}
