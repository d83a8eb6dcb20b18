//! Error types for the replay pipeline
//!
//! Every failure kind here is fatal for the replay: the driver stops at the
//! first error and whatever was already delivered to the sink stays valid.
//! A missing continuation token or a page without `continuationContents`
//! are normal outcomes and never surface as errors.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReplayError {
    #[error("Network request failed for {url}: {message}")]
    Network {
        url: String,
        message: String,
        status: Option<u16>,
    },

    #[error("Malformed page: {reason}")]
    MalformedPage { reason: String },

    #[error("Required field '{field}' not found in chat item")]
    Decode {
        field: String,
        context: Option<String>,
    },

    #[error("Failed to write messages: {message}")]
    Sink { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl ReplayError {
    /// Transport-level failure, no response status available
    pub fn transport(url: &str, message: impl Into<String>) -> Self {
        Self::Network {
            url: url.to_string(),
            message: message.into(),
            status: None,
        }
    }

    /// Response arrived with a non-success status
    pub fn http_status(url: &str, status: u16) -> Self {
        Self::Network {
            url: url.to_string(),
            message: format!("HTTP status {status}"),
            status: Some(status),
        }
    }

    pub fn malformed_page(reason: impl Into<String>) -> Self {
        Self::MalformedPage {
            reason: reason.into(),
        }
    }

    /// Create a decode error naming the missing field, with optional context
    pub fn missing_field(field: &str, context: Option<&str>) -> Self {
        Self::Decode {
            field: field.to_string(),
            context: context.map(ToString::to_string),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Only fetching a page is safe to repeat, so only network errors qualify
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Network { .. })
    }
}

impl From<csv::Error> for ReplayError {
    fn from(err: csv::Error) -> Self {
        Self::Sink {
            message: err.to_string(),
        }
    }
}

impl From<std::io::Error> for ReplayError {
    fn from(err: std::io::Error) -> Self {
        Self::Sink {
            message: err.to_string(),
        }
    }
}

pub type ReplayResult<T> = Result<T, ReplayError>;
