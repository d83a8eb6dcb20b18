//! Continuation token and page phase
//!
//! A replay is served as a chain of pages. Each page carries an opaque token
//! naming the next one, and the first page (the watch page) embeds its token
//! in a different shape than every page after it.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque handle identifying the next replay page
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContinuationToken(String);

impl ContinuationToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl AsRef<str> for ContinuationToken {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContinuationToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Rendering phase of a fetched page, decides which token shape to look for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PagePhase {
    /// The user-supplied watch page
    Initial,
    /// Any page fetched from the replay endpoint
    Continuation,
}

impl PagePhase {
    /// Phase of the page at `index`, counting fetched pages from zero
    pub const fn for_page_index(index: u32) -> Self {
        if index == 0 {
            Self::Initial
        } else {
            Self::Continuation
        }
    }

    pub const fn is_initial(self) -> bool {
        matches!(self, Self::Initial)
    }
}
