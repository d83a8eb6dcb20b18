//! Application layer module
//!
//! Orchestrates fetching, parsing and delivery of a chat replay.

pub mod message_sink;
pub mod progress;
pub mod replay_driver;

pub use message_sink::{CollectingSink, CsvMessageSink, MessageSink};
pub use progress::ProgressReporter;
pub use replay_driver::{ReplayDriver, ReplayOptions, ReplaySummary};
