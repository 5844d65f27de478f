//! Configuration
//!
//! Layered settings for the resolver: built-in defaults, an optional TOML/YAML/JSON file,
//! then `REGISTRY_RESOLVER__*` environment variables.

pub mod facade;
pub mod merge;
pub mod sources;

use crate::agent::domain::is_http_url;
use crate::cache::DEFAULT_COUNT_TTL;
use crate::concurrency::DEFAULT_WORKER_LIMIT;
use crate::error::ResolverError;
use crate::fetch::HttpSourceConfig;
use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub use facade::ConfigLoader;

/// Environment variable prefix for configuration overrides.
pub const ENV_PREFIX: &str = "REGISTRY_RESOLVER";

/// Top-level resolver configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResolverConfig {
    #[serde(default)]
    pub count_cache: CountCacheConfig,

    #[serde(default)]
    pub fetch: FetchConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Registry count cache settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountCacheConfig {
    /// Seconds a fetched count stays fresh
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
}

/// Metadata document fetch settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Maximum concurrent document fetches per page
    #[serde(default = "default_worker_limit")]
    pub worker_limit: usize,

    /// Per-request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Maximum accepted document size in bytes
    #[serde(default = "default_max_response_bytes")]
    pub max_response_bytes: usize,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Gateway base URL used to rewrite `ipfs://` token URIs; unset leaves them unfetchable
    #[serde(default)]
    pub ipfs_gateway: Option<String>,
}

fn default_ttl_secs() -> u64 {
    DEFAULT_COUNT_TTL.as_secs()
}

fn default_worker_limit() -> usize {
    DEFAULT_WORKER_LIMIT
}

fn default_timeout_ms() -> u64 {
    10_000
}

fn default_max_response_bytes() -> usize {
    1024 * 1024
}

fn default_user_agent() -> String {
    format!("registry-resolver/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for CountCacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl_secs(),
        }
    }
}

impl CountCacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            worker_limit: default_worker_limit(),
            timeout_ms: default_timeout_ms(),
            max_response_bytes: default_max_response_bytes(),
            user_agent: default_user_agent(),
            ipfs_gateway: None,
        }
    }
}

impl FetchConfig {
    /// HTTP client limits derived from this config.
    pub fn http_source_config(&self) -> HttpSourceConfig {
        HttpSourceConfig {
            timeout: Duration::from_millis(self.timeout_ms),
            max_response_bytes: self.max_response_bytes,
            user_agent: self.user_agent.clone(),
        }
    }
}

impl ResolverConfig {
    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ResolverError> {
        let fetch = &self.fetch;
        if fetch.worker_limit == 0 {
            return Err(ResolverError::ConfigError(
                "fetch.worker_limit must be at least 1".to_string(),
            ));
        }
        if fetch.timeout_ms == 0 {
            return Err(ResolverError::ConfigError(
                "fetch.timeout_ms must be greater than 0".to_string(),
            ));
        }
        if fetch.max_response_bytes == 0 {
            return Err(ResolverError::ConfigError(
                "fetch.max_response_bytes must be greater than 0".to_string(),
            ));
        }
        if let Some(gateway) = &fetch.ipfs_gateway {
            if !is_http_url(gateway) {
                return Err(ResolverError::ConfigError(format!(
                    "Invalid fetch.ipfs_gateway URL: {}",
                    gateway
                )));
            }
        }
        Ok(())
    }
}
