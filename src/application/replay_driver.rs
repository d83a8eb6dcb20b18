//! Replay driver - walks the continuation chain page by page
//!
//! ```text
//! INITIAL ──▶ FETCHING ──(no token / page cap)──▶ TERMINATED
//!                │  ▲
//!                └──┘ fetch → token → decode (pages ≥ 2) → deliver → sleep
//! ```
//!
//! Pages are only discoverable one at a time through their tokens, so the
//! loop is strictly sequential. Any error aborts the whole replay; batches
//! delivered before the failure stay with the sink.

use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::application::message_sink::MessageSink;
use crate::application::progress::ProgressReporter;
use crate::domain::{ContinuationToken, PagePhase};
use crate::infrastructure::config::{AppConfig, DEFAULT_REPLAY_ENDPOINT};
use crate::infrastructure::http_client::PageFetcher;
use crate::infrastructure::parsing::{
    EmbeddedDataLocator, InitialDataLocator, MessageDecoder, RegexTokenExtractor, TokenExtractor,
};
use crate::infrastructure::replay_error::{ReplayError, ReplayResult};

/// Knobs of a single replay run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplayOptions {
    /// Prefix the continuation token is appended to
    pub replay_endpoint: String,
    pub sleep_interval: Duration,
    pub max_pages: Option<u32>,
}

impl Default for ReplayOptions {
    fn default() -> Self {
        Self {
            replay_endpoint: DEFAULT_REPLAY_ENDPOINT.to_string(),
            sleep_interval: Duration::from_secs(1),
            max_pages: None,
        }
    }
}

impl ReplayOptions {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            replay_endpoint: config.replay.replay_endpoint.clone(),
            sleep_interval: config.replay.sleep_interval(),
            max_pages: config.replay.max_pages,
        }
    }

    /// URL of the page named by `token`
    pub fn next_url(&self, token: &ContinuationToken) -> String {
        format!("{}{}", self.replay_endpoint, token)
    }
}

/// Outcome of a completed replay
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    pub pages_fetched: u32,
    pub batches_delivered: u32,
    pub messages_decoded: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum DriverState {
    Initial,
    Fetching { url: String },
    Terminated,
}

pub struct ReplayDriver<F: PageFetcher> {
    fetcher: F,
    extractor: Box<dyn TokenExtractor + Send + Sync>,
    locator: Box<dyn EmbeddedDataLocator + Send + Sync>,
    decoder: MessageDecoder,
    options: ReplayOptions,
    progress: ProgressReporter,
}

impl<F: PageFetcher> ReplayDriver<F> {
    /// Driver with the pattern-based extractor and line-scanning locator
    pub fn new(fetcher: F, options: ReplayOptions) -> ReplayResult<Self> {
        let extractor = RegexTokenExtractor::new().map_err(|e| {
            ReplayError::configuration(format!("Failed to compile token patterns: {e}"))
        })?;
        Ok(Self::with_parsers(
            fetcher,
            Box::new(extractor),
            Box::new(InitialDataLocator::new()),
            options,
        ))
    }

    pub fn with_parsers(
        fetcher: F,
        extractor: Box<dyn TokenExtractor + Send + Sync>,
        locator: Box<dyn EmbeddedDataLocator + Send + Sync>,
        options: ReplayOptions,
    ) -> Self {
        Self {
            fetcher,
            extractor,
            locator,
            decoder: MessageDecoder::new(),
            options,
            progress: ProgressReporter::silent(),
        }
    }

    /// Report page progress to `progress`; drivers start out silent
    pub fn with_progress(mut self, progress: ProgressReporter) -> Self {
        self.progress = progress;
        self
    }

    /// Walk the whole replay starting at the watch page `start_url`
    pub async fn run<S: MessageSink>(
        &self,
        start_url: &str,
        sink: &mut S,
    ) -> ReplayResult<ReplaySummary> {
        let mut summary = ReplaySummary::default();
        let mut state = DriverState::Initial;

        loop {
            state = match state {
                DriverState::Initial => {
                    info!(url = start_url, "Starting chat replay download");
                    DriverState::Fetching {
                        url: start_url.to_string(),
                    }
                }
                DriverState::Fetching { url } => self.step(&url, sink, &mut summary).await?,
                DriverState::Terminated => break,
            };
        }

        info!(
            pages = summary.pages_fetched,
            batches = summary.batches_delivered,
            messages = summary.messages_decoded,
            "Chat replay download finished"
        );
        Ok(summary)
    }

    /// One FETCHING iteration
    async fn step<S: MessageSink>(
        &self,
        url: &str,
        sink: &mut S,
        summary: &mut ReplaySummary,
    ) -> ReplayResult<DriverState> {
        let phase = PagePhase::for_page_index(summary.pages_fetched);
        let body = self.fetcher.fetch(url).await?;
        let token = self.extractor.extract(&body, phase);
        summary.pages_fetched += 1;

        let Some(token) = token else {
            debug!(page = summary.pages_fetched, "No continuation token on page");
            self.progress
                .line(format_args!("No more continuation param found"))?;
            return Ok(DriverState::Terminated);
        };

        let next_url = self.options.next_url(&token);
        self.progress
            .line(format_args!("[+] downloading page {}", summary.pages_fetched))?;

        if !phase.is_initial() {
            let blob = self.locator.locate(&body)?;
            let batch = self.decoder.decode(&blob)?;
            summary.messages_decoded += batch.len();
            sink.deliver(&batch)?;
            summary.batches_delivered += 1;
            debug!(page = summary.pages_fetched, messages = batch.len(), "Batch delivered");
        }

        if self
            .options
            .max_pages
            .is_some_and(|max| summary.pages_fetched >= max)
        {
            warn!(
                pages = summary.pages_fetched,
                "Page limit reached, stopping before the end of the replay"
            );
            return Ok(DriverState::Terminated);
        }

        if !self.options.sleep_interval.is_zero() {
            sleep(self.options.sleep_interval).await;
        }
        Ok(DriverState::Fetching { url: next_url })
    }
}
