//! MergeService: orchestrates sources and deserializes to ResolverConfig.

use crate::config::sources::{environment, file};
use crate::config::ResolverConfig;
use config::{Config, ConfigError};
use std::path::Path;

/// Merge service for config composition.
pub struct MergeService;

impl MergeService {
    /// Load config from serde defaults overlaid by the environment.
    pub fn load() -> Result<ResolverConfig, ConfigError> {
        let builder = Config::builder();
        let builder = environment::add_to_builder(builder)?;

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Load config from a specific file with environment overlay.
    /// Precedence: defaults (lowest) -> file -> environment (highest).
    pub fn load_from_file(path: &Path) -> Result<ResolverConfig, ConfigError> {
        let builder = Config::builder();
        let builder = file::add_to_builder(builder, path)?;
        let builder = environment::add_to_builder(builder)?;

        let config = builder.build()?;
        config.try_deserialize()
    }
}
