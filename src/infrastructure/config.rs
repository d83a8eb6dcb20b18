//! Configuration infrastructure
//!
//! Settings are layered, later sources winning:
//! 1. Built-in defaults (`AppConfig::default()`)
//! 2. Optional config file (TOML, JSON or YAML, picked by extension)
//! 3. Environment variables, e.g. `LIVECHAT_REPLAY_REPLAY__SLEEP_INTERVAL_MS=500`
//! 4. Command line overrides, applied by the binary

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::info;

pub use crate::infrastructure::http_client::HttpClientConfig;

pub const ENV_PREFIX: &str = "LIVECHAT_REPLAY";

pub const DEFAULT_REPLAY_ENDPOINT: &str = "https://www.youtube.com/live_chat_replay?continuation=";

/// Upper bound for the base retry delay
pub const MAX_RETRY_DELAY_MS: u64 = 60_000;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load config: {source}")]
    Load {
        #[from]
        source: config::ConfigError,
    },

    #[error("Configuration validation failed: {message}")]
    Validation { message: String },
}

/// Complete application configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub replay: ReplayConfig,
    pub http: HttpClientConfig,
    pub logging: LoggingConfig,
}

/// Replay pagination settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplayConfig {
    /// URL prefix the continuation token is appended to
    pub replay_endpoint: String,

    /// Pause after every page, keeps the upstream from throttling us
    pub sleep_interval_ms: u64,

    /// Stop after this many fetched pages
    pub max_pages: Option<u32>,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            replay_endpoint: DEFAULT_REPLAY_ENDPOINT.to_string(),
            sleep_interval_ms: 1000,
            max_pages: None,
        }
    }
}

impl ReplayConfig {
    pub fn sleep_interval(&self) -> Duration {
        Duration::from_millis(self.sleep_interval_ms)
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: "error", "warn", "info", "debug", "trace"
    pub level: String,

    /// Enable JSON formatted logs
    pub json_format: bool,

    /// Also write logs to a file in `log_dir`
    pub file_output: bool,

    /// Directory for log files, defaults to the user data dir
    pub log_dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            json_format: false,
            file_output: false,
            log_dir: None,
        }
    }
}

impl AppConfig {
    /// Load defaults, then `path` if given, then the environment
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder =
            config::Config::builder().add_source(config::Config::try_from(&Self::default())?);

        if let Some(path) = path {
            info!("Loading configuration from {:?}", path);
            builder = builder.add_source(config::File::from(path).required(true));
        }

        let settings = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Self = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.replay.replay_endpoint.starts_with("http") {
            return Err(validation("replay_endpoint must be an http(s) URL"));
        }

        if self.replay.max_pages == Some(0) {
            return Err(validation("max_pages must be greater than 0"));
        }

        if self.http.user_agent.trim().is_empty() {
            return Err(validation("user_agent must not be empty"));
        }

        if self.http.max_attempts == 0 {
            return Err(validation("max_attempts must be greater than 0"));
        }

        if self.http.timeout_seconds == 0 {
            return Err(validation("timeout_seconds must be greater than 0"));
        }

        if self.http.retry_delay_ms > MAX_RETRY_DELAY_MS {
            return Err(validation("retry_delay_ms must be at most 60000"));
        }

        Ok(())
    }
}

fn validation(message: &str) -> ConfigError {
    ConfigError::Validation {
        message: message.to_string(),
    }
}
