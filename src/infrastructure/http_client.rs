//! HTTP page fetcher for the replay endpoint
//!
//! One GET per page with the configured identification header. The upstream
//! serves different markup to clients it does not recognize, so the default
//! user agent is a regular desktop browser string.

use async_trait::async_trait;
use reqwest::{
    Client,
    header::{HeaderMap, HeaderValue, USER_AGENT},
};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::infrastructure::replay_error::{ReplayError, ReplayResult};

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_6) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/14.0.1 Safari/605.1.15";

/// Fetches the raw body of one page
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> ReplayResult<String>;
}

/// HTTP client configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpClientConfig {
    pub user_agent: String,
    pub timeout_seconds: u64,
    /// Total tries per page; 1 disables retry
    pub max_attempts: u32,
    /// Base delay between tries, multiplied by the attempt number
    pub retry_delay_ms: u64,
}

impl HttpClientConfig {
    /// Pause after failed try number `attempt`, grows linearly
    pub fn retry_delay(&self, attempt: u32) -> Duration {
        Duration::from_millis(self.retry_delay_ms.saturating_mul(u64::from(attempt)))
    }
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_seconds: 30,
            max_attempts: 1,
            retry_delay_ms: 1000,
        }
    }
}

/// reqwest-backed page fetcher
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    config: HttpClientConfig,
}

impl HttpClient {
    /// Create a new HTTP client with the given configuration
    pub fn new(config: HttpClientConfig) -> ReplayResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent)
                .map_err(|e| ReplayError::configuration(format!("Invalid user agent: {e}")))?,
        );

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .default_headers(headers)
            .gzip(true)
            .brotli(true)
            .build()
            .map_err(|e| ReplayError::configuration(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    /// Single GET, no retry
    async fn fetch_once(&self, url: &str) -> ReplayResult<String> {
        debug!("Fetching URL: {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ReplayError::transport(url, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ReplayError::http_status(url, status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| ReplayError::transport(url, format!("Failed to read response body: {e}")))?;

        debug!("Successfully fetched: {} ({} chars)", url, body.len());
        Ok(body)
    }
}

#[async_trait]
impl PageFetcher for HttpClient {
    async fn fetch(&self, url: &str) -> ReplayResult<String> {
        let max_attempts = self.config.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            match self.fetch_once(url).await {
                Ok(body) => return Ok(body),
                Err(e) if e.is_retryable() && attempt < max_attempts => {
                    warn!("Attempt {} failed for {}: {}. Retrying...", attempt, url, e);
                    sleep(self.config.retry_delay(attempt)).await;
                    attempt += 1;
                }
                Err(e) => {
                    if max_attempts > 1 {
                        info!("Giving up on {} after {} attempts", url, attempt);
                    }
                    return Err(e);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_http_client_creation() {
        let client = HttpClient::new(HttpClientConfig::default());
        assert!(client.is_ok());
    }

    #[test]
    fn test_default_config_has_single_attempt() {
        let config = HttpClientConfig::default();
        assert_eq!(config.max_attempts, 1);
        assert!(config.user_agent.starts_with("Mozilla/5.0"));
    }

    #[test]
    fn test_retry_delay_is_linear_and_saturates() {
        let config = HttpClientConfig::default();
        assert_eq!(config.retry_delay(1), Duration::from_millis(1000));
        assert_eq!(config.retry_delay(3), Duration::from_millis(3000));

        let huge = HttpClientConfig {
            retry_delay_ms: u64::MAX,
            ..Default::default()
        };
        assert_eq!(huge.retry_delay(2), Duration::from_millis(u64::MAX));
    }

    #[test]
    fn test_invalid_user_agent_is_configuration_error() {
        let config = HttpClientConfig {
            user_agent: "bad\nagent".to_string(),
            ..Default::default()
        };
        let err = HttpClient::new(config).unwrap_err();
        assert!(matches!(err, ReplayError::Configuration { .. }));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_network_error() {
        let config = HttpClientConfig {
            timeout_seconds: 2,
            ..Default::default()
        };
        let client = HttpClient::new(config).unwrap();

        // Nothing listens on the loopback discard port
        let err = client.fetch("http://127.0.0.1:9/live_chat_replay").await.unwrap_err();
        assert!(matches!(err, ReplayError::Network { status: None, .. }));
    }
}
