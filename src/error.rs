//! Error types for registry resolution.

use thiserror::Error;

/// Errors surfaced to callers of the resolver.
///
/// Only [`ResolverError::Upstream`] is produced by page resolution itself; per-entry failures
/// are converted into documents instead of errors.
#[derive(Debug, Error)]
pub enum ResolverError {
    /// The chain collaborator could not serve a count or batch read.
    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The HTTP client could not be constructed.
    #[error("HTTP client error: {0}")]
    HttpClient(String),
}

impl From<config::ConfigError> for ResolverError {
    fn from(err: config::ConfigError) -> Self {
        ResolverError::ConfigError(err.to_string())
    }
}

/// Failure fetching a single metadata document.
///
/// The `Display` text is embedded verbatim into the entry's error document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("timeout")]
    Timeout,

    #[error("{0}")]
    Transport(String),

    #[error("response body exceeds {limit} bytes")]
    BodyTooLarge { limit: usize },
}
