use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing::info;
use url::Url;

use livechat_replay::application::{
    CsvMessageSink, ProgressReporter, ReplayDriver, ReplayOptions,
};
use livechat_replay::infrastructure::{
    AppConfig, HttpClient, init_logging_with_config, log_system_info,
};

/// Download the chat replay of a past live broadcast into a CSV file
#[derive(Debug, Parser)]
#[command(name = "livechat-replay", version, about)]
struct Cli {
    /// Full watch-page URL of the video
    #[arg(short, long)]
    url: String,

    /// Path to save live chats in CSV format
    #[arg(short, long)]
    output: PathBuf,

    /// Run quietly
    #[arg(short, long)]
    quiet: bool,

    /// Configuration file (TOML, JSON or YAML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Pause between page fetches in milliseconds
    #[arg(long)]
    sleep_interval_ms: Option<u64>,

    /// User-Agent header sent with every request
    #[arg(long)]
    user_agent: Option<String>,

    /// Stop after this many fetched pages
    #[arg(long)]
    max_pages: Option<u32>,

    /// Tries per page before giving up
    #[arg(long)]
    max_attempts: Option<u32>,

    /// Log level: error, warn, info, debug, trace
    #[arg(long)]
    log_level: Option<String>,
}

impl Cli {
    fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(ms) = self.sleep_interval_ms {
            config.replay.sleep_interval_ms = ms;
        }
        if let Some(max) = self.max_pages {
            config.replay.max_pages = Some(max);
        }
        if let Some(ua) = &self.user_agent {
            config.http.user_agent.clone_from(ua);
        }
        if let Some(attempts) = self.max_attempts {
            config.http.max_attempts = attempts;
        }
        if let Some(level) = &self.log_level {
            config.logging.level.clone_from(level);
        }
    }
}

fn validate_watch_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw).with_context(|| format!("Invalid URL: {raw}"))?;
    if !matches!(url.scheme(), "http" | "https") {
        bail!("URL must use http or https: {raw}");
    }
    Ok(url)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    cli.apply_overrides(&mut config);
    config.validate().context("Invalid configuration")?;

    init_logging_with_config(&config.logging)?;
    log_system_info();

    let url = validate_watch_url(&cli.url)?;

    let client = HttpClient::new(config.http.clone())?;
    let progress = ProgressReporter::stdout(cli.quiet);
    let driver = ReplayDriver::new(client, ReplayOptions::from_config(&config))?
        .with_progress(progress.clone());
    let mut sink = CsvMessageSink::create(&cli.output, progress)
        .with_context(|| format!("Failed to create {}", cli.output.display()))?;

    let summary = driver.run(url.as_str(), &mut sink).await?;

    info!(
        pages = summary.pages_fetched,
        messages = summary.messages_decoded,
        lines_written = sink.lines_written(),
        output = %cli.output.display(),
        "Replay saved"
    );
    Ok(())
}
