//! Infrastructure layer for HTTP access, page parsing, configuration and logging

pub mod config;
pub mod http_client;
pub mod logging;
pub mod parsing;
pub mod replay_error;

// Re-export commonly used items
pub use config::{AppConfig, ConfigError, LoggingConfig, ReplayConfig};
pub use http_client::{HttpClient, HttpClientConfig, PageFetcher};
pub use logging::{init_logging_with_config, log_system_info};
pub use parsing::{
    EmbeddedDataLocator, InitialDataLocator, MessageDecoder, RegexTokenExtractor, TokenExtractor,
};
pub use replay_error::{ReplayError, ReplayResult};
