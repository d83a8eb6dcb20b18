//! Logging system configuration and initialization
//!
//! Console logs go to stderr so stdout stays free for progress lines.
//! An optional file layer writes through a non-blocking appender, and
//! `RUST_LOG` overrides the configured level when set:
//! ```bash
//! RUST_LOG="livechat_replay=debug,reqwest=debug" livechat-replay -u ... -o chat.csv
//! ```

use anyhow::{Context, Result};
use chrono::Local;
use std::path::PathBuf;
use std::sync::OnceLock;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::{
    EnvFilter, Layer, Registry,
    fmt::{self, time::FormatTime},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

pub use crate::infrastructure::config::LoggingConfig;

pub const LOG_FILE_NAME: &str = "livechat-replay.log";

// Keeps the file writer alive until the process exits
static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Local wall-clock timestamps with millisecond precision
struct LocalTimeFormatter;

impl FormatTime for LocalTimeFormatter {
    fn format_time(&self, w: &mut fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(w, "{}", Local::now().format("%Y-%m-%d %H:%M:%S%.3f"))
    }
}

/// Directory for log files when none is configured
pub fn default_log_directory() -> PathBuf {
    dirs::data_local_dir()
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_default()
        .join("livechat-replay")
        .join("logs")
}

/// Filter used when `RUST_LOG` is not set
fn build_filter(level: &str) -> Result<EnvFilter> {
    let level = level.to_lowercase();
    let mut filter = EnvFilter::try_new(&level)
        .with_context(|| format!("Invalid log level: {level}"))?;

    // HTTP client internals stay quiet unless trace is requested
    if !level.contains("trace") {
        for directive in ["reqwest=warn", "hyper=warn", "hyper_util=warn", "rustls=warn"] {
            filter = filter.add_directive(directive.parse()?);
        }
    }
    Ok(filter)
}

/// Initialize logging with custom configuration
pub fn init_logging_with_config(config: &LoggingConfig) -> Result<()> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => build_filter(&config.level)?,
    };

    let console_layer = fmt::Layer::new()
        .with_writer(std::io::stderr)
        .with_timer(LocalTimeFormatter)
        .with_target(false)
        .boxed();

    let file_layer = if config.file_output {
        let log_dir = config.log_dir.clone().unwrap_or_else(default_log_directory);
        std::fs::create_dir_all(&log_dir)
            .with_context(|| format!("Failed to create log directory {}", log_dir.display()))?;

        let (file_writer, guard) = non_blocking(rolling::never(&log_dir, LOG_FILE_NAME));
        let _ = LOG_GUARD.set(guard);

        let layer = fmt::Layer::new()
            .with_writer(file_writer)
            .with_timer(LocalTimeFormatter)
            .with_ansi(false);
        Some(if config.json_format {
            layer.json().with_target(true).with_line_number(true).boxed()
        } else {
            layer.with_target(false).boxed()
        })
    } else {
        None
    };

    Registry::default()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .context("Logging system already initialized")?;

    info!("Logging system initialized");
    info!("Log level: {}", config.level);
    if config.file_output {
        info!("JSON format: {}", config.json_format);
    }
    Ok(())
}

/// Log build and platform information for diagnostics
pub fn log_system_info() {
    info!(
        version = env!("CARGO_PKG_VERSION"),
        os = std::env::consts::OS,
        arch = std::env::consts::ARCH,
        "livechat-replay starting"
    );
}
