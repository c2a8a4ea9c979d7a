use std::fs;
use std::io;
use std::path::Path;
use std::time::Duration;

use jobpulse_core::{DashboardSettings, DEFAULT_SOURCES};
use jobpulse_engine::{ApiSettings, EngineSettings, PollSettings};
use log::LevelFilter;
use serde::Deserialize;
use thiserror::Error;

use super::logging::LogDestination;

pub const CONFIG_FILENAME: &str = "jobpulse.ron";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read { path: String, source: io::Error },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        source: ron::error::SpannedError,
    },
    #[error("invalid setting: {0}")]
    Invalid(String),
}

/// Settings read from `jobpulse.ron`. Every field is optional in the file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api_base: String,
    pub sources: Vec<String>,
    pub poll_interval_ms: u64,
    /// `None` polls until the backend reports a terminal status.
    pub max_poll_attempts: Option<u32>,
    pub status_display_ms: u64,
    pub request_timeout_ms: u64,
    pub log_level: String,
    pub log_destination: LogDestination,
}

impl Default for AppConfig {
    fn default() -> Self {
        let poll = PollSettings::default();
        let api = ApiSettings::default();
        let dashboard = DashboardSettings::default();
        Self {
            api_base: api.base_url,
            sources: DEFAULT_SOURCES.iter().map(|s| s.to_string()).collect(),
            poll_interval_ms: poll.interval.as_millis() as u64,
            max_poll_attempts: poll.max_attempts,
            status_display_ms: dashboard.status_display.as_millis() as u64,
            request_timeout_ms: api.request_timeout.as_millis() as u64,
            log_level: "info".to_string(),
            log_destination: LogDestination::File,
        }
    }
}

impl AppConfig {
    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            api: ApiSettings {
                base_url: self.api_base.clone(),
                request_timeout: Duration::from_millis(self.request_timeout_ms),
                ..ApiSettings::default()
            },
            poll: PollSettings {
                interval: Duration::from_millis(self.poll_interval_ms),
                max_attempts: self.max_poll_attempts,
            },
        }
    }

    pub fn dashboard_settings(&self) -> DashboardSettings {
        DashboardSettings {
            sources: self.sources.clone(),
            status_display: Duration::from_millis(self.status_display_ms),
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        pulse_logging::level_from_name(&self.log_level).unwrap_or(LevelFilter::Info)
    }

    fn validate(self) -> Result<Self, ConfigError> {
        if self.sources.iter().all(|s| s.trim().is_empty()) {
            return Err(ConfigError::Invalid("sources must name at least one source".into()));
        }
        if self.poll_interval_ms == 0 {
            return Err(ConfigError::Invalid("poll_interval_ms must be positive".into()));
        }
        if self.max_poll_attempts == Some(0) {
            return Err(ConfigError::Invalid("max_poll_attempts must be positive".into()));
        }
        Ok(self)
    }
}

/// Loads the config file. A missing file yields the defaults.
pub fn load(path: &Path) -> Result<AppConfig, ConfigError> {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(AppConfig::default()),
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.display().to_string(),
                source,
            })
        }
    };

    let config: AppConfig = ron::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.display().to_string(),
        source,
    })?;
    config.validate()
}
