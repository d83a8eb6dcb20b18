//! livechat-replay - chat transcript downloader for past live broadcasts
//!
//! Fetches the watch page, follows the chain of replay continuation pages,
//! decodes the chat items embedded in each page and hands every page's
//! batch to a [`MessageSink`](application::MessageSink).

pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::{
    CsvMessageSink, MessageSink, ProgressReporter, ReplayDriver, ReplayOptions, ReplaySummary,
};
pub use domain::{ChatMessage, ContinuationToken, MessageKind, PagePhase};
pub use infrastructure::{AppConfig, HttpClient, PageFetcher, ReplayError, ReplayResult};
