//! ConfigLoader facade delegating to the merge service.

use super::merge::service::MergeService;
use super::ResolverConfig;
use crate::error::ResolverError;
use std::path::Path;

/// Configuration loader facade.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from defaults and environment, then validate it.
    pub fn load() -> Result<ResolverConfig, ResolverError> {
        let config = MergeService::load()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file with environment overlay, then validate it.
    pub fn load_from_file(path: &Path) -> Result<ResolverConfig, ResolverError> {
        let config = MergeService::load_from_file(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Create default configuration.
    pub fn default() -> ResolverConfig {
        ResolverConfig::default()
    }
}
