//! Layering of configuration files
//!
//! Files are applied from lowest to highest precedence. Pattern lists
//! accumulate across layers; a scalar from a higher layer replaces a lower
//! one only when the higher layer actually sets it.

use std::fs;
use std::path::Path;

use anyhow::Context;

use super::discovery::ConfigFiles;
use super::types::Config;
use crate::error::Result;

/// Configuration merger
pub struct ConfigMerger;

impl ConfigMerger {
    /// Merge every discovered file into one configuration
    ///
    /// Layers, lowest first: global, `.treesync.toml`,
    /// `.treesync.local.toml`, then the file named on the command line.
    ///
    /// # Errors
    ///
    /// Returns an error if any file cannot be read or parsed.
    pub fn merge(files: &ConfigFiles) -> Result<Config> {
        let layers = [&files.global, &files.project, &files.local, &files.cli];

        layers
            .into_iter()
            .flatten()
            .try_fold(Config::default(), |merged, path| -> Result<Config> {
                Ok(Self::overlay(merged, Self::read_layer(path)?))
            })
    }

    fn read_layer(path: &Path) -> Result<Config> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&text)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    fn overlay(mut base: Config, layer: Config) -> Config {
        base.ignore.extend(layer.ignore);
        base.include.extend(layer.include);
        base.dry_run = layer.dry_run.or(base.dry_run);
        base.on_missing = layer.on_missing.or(base.on_missing);
        base.on_outdated = layer.on_outdated.or(base.on_outdated);
        base
    }
}
