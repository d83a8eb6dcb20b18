//! Replay page parsing infrastructure
//!
//! Extraction from raw page markup sits behind two traits so the matching
//! technique (textual patterns today, a structured parser later) can change
//! without touching the driver or the decoder.

pub mod embedded_data;
pub mod message_decoder;
pub mod token_extractor;

pub use embedded_data::InitialDataLocator;
pub use message_decoder::MessageDecoder;
pub use token_extractor::RegexTokenExtractor;

use crate::domain::{ContinuationToken, PagePhase};
use crate::infrastructure::replay_error::ReplayResult;

/// Finds the continuation token of a page
pub trait TokenExtractor {
    /// Returns the first token matching the shape expected for `phase`, or
    /// `None` when the page ends the replay.
    fn extract(&self, body: &str, phase: PagePhase) -> Option<ContinuationToken>;
}

/// Finds and parses the embedded data blob of a page
pub trait EmbeddedDataLocator {
    fn locate(&self, body: &str) -> ReplayResult<serde_json::Value>;
}
