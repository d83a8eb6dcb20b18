//! Chat message value type produced by the replay decoder

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which upstream renderer a message was decoded from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    /// Paid (superchat-style) message
    PaidMessage,
    /// Plain text message
    TextMessage,
}

/// One chat message recovered from a replay page.
///
/// `timestamp` is kept exactly as the upstream renders it (e.g. `"1:23"`),
/// it is an offset into the broadcast and not a parsed instant. `text` may be
/// empty for messages that carried no text runs (sticker-only, emoji-only).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    timestamp: String,
    text: String,
    kind: MessageKind,
}

impl ChatMessage {
    pub fn new(timestamp: impl Into<String>, text: impl Into<String>, kind: MessageKind) -> Self {
        Self {
            timestamp: timestamp.into(),
            text: text.into(),
            kind,
        }
    }

    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn kind(&self) -> MessageKind {
        self.kind
    }

    pub fn is_paid(&self) -> bool {
        self.kind == MessageKind::PaidMessage
    }

    /// True when the message has no visible text once surrounding whitespace is removed
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

impl fmt::Display for ChatMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_paid() {
            write!(f, "[{}] ($) {}", self.timestamp, self.text)
        } else {
            write!(f, "[{}] {}", self.timestamp, self.text)
        }
    }
}
