//! Continuation token extraction from raw page markup
//!
//! The watch page and the replay pages carry the token in two different
//! shapes. The pattern is picked by page phase, so a replay page never
//! yields a token from a stale "Live chat replay" block and vice versa.

use regex::Regex;
use tracing::debug;

use super::TokenExtractor;
use crate::domain::{ContinuationToken, PagePhase};

/// Token shape on the watch page
pub const INITIAL_TOKEN_PATTERN: &str = r#"Live chat replay"(?:.*?)continuation":"(.*?)""#;

/// Token shape on replay endpoint pages
pub const CONTINUATION_TOKEN_PATTERN: &str =
    r#"liveChatReplayContinuationData"(?:.*?)continuation":"(.*?)""#;

/// Pattern-based token extractor, both patterns compiled once
#[derive(Debug, Clone)]
pub struct RegexTokenExtractor {
    initial: Regex,
    continuation: Regex,
}

impl RegexTokenExtractor {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            initial: Regex::new(INITIAL_TOKEN_PATTERN)?,
            continuation: Regex::new(CONTINUATION_TOKEN_PATTERN)?,
        })
    }

    fn pattern_for(&self, phase: PagePhase) -> &Regex {
        match phase {
            PagePhase::Initial => &self.initial,
            PagePhase::Continuation => &self.continuation,
        }
    }
}

impl TokenExtractor for RegexTokenExtractor {
    fn extract(&self, body: &str, phase: PagePhase) -> Option<ContinuationToken> {
        let token = self
            .pattern_for(phase)
            .captures(body)
            .and_then(|caps| caps.get(1))
            .map(|m| ContinuationToken::new(m.as_str()));

        debug!(?phase, found = token.is_some(), "Continuation token lookup");
        token
    }
}
