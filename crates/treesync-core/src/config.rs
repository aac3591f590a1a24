//! Layered TOML configuration
//!
//! A run's settings come from up to four files (global, project, local and an
//! explicit `--config` path). They are discovered, merged by precedence and
//! validated once, before either tree is touched.

mod discovery;
mod merge;
mod patterns;
mod types;
mod validation;

#[cfg(test)]
mod integration_tests;

use std::path::Path;

pub use discovery::{ConfigDiscovery, ConfigFiles};
pub use merge::ConfigMerger;
pub use patterns::PatternMatcher;
pub use types::Config;
pub use validation::ConfigValidator;

use crate::error::Result;

/// Coordinates discovery, parsing, merging, and validation
pub struct ConfigManager;

impl ConfigManager {
    /// Discover, merge and validate configuration for the current directory
    ///
    /// # Errors
    ///
    /// Returns an error if an explicit path does not exist, or if any
    /// discovered file is unreadable or invalid.
    pub fn load(cli_config_path: Option<&Path>) -> Result<Config> {
        let config_files = ConfigDiscovery::discover(cli_config_path)?;
        Self::load_files(&config_files)
    }

    /// Merge and validate an already discovered set of files
    ///
    /// # Errors
    ///
    /// Returns an error if config files are invalid or cannot be read.
    pub fn load_files(files: &ConfigFiles) -> Result<Config> {
        let merged = ConfigMerger::merge(files)?;
        ConfigValidator::validate(&merged)?;
        Ok(merged)
    }
}
