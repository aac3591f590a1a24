//! Configuration file discovery from multiple locations

use std::path::{Path, PathBuf};

use crate::error::Result;

/// Project config file name
pub const PROJECT_CONFIG: &str = ".treesync.toml";

/// Uncommitted per-checkout overrides
pub const LOCAL_CONFIG: &str = ".treesync.local.toml";

/// Configuration file locations in order of precedence
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigFiles {
    /// Config from CLI flag (highest precedence)
    pub cli: Option<PathBuf>,
    /// Local overrides (.treesync.local.toml)
    pub local: Option<PathBuf>,
    /// Project config (.treesync.toml)
    pub project: Option<PathBuf>,
    /// Global config in the platform config directory
    pub global: Option<PathBuf>,
}

/// Config file discovery
pub struct ConfigDiscovery;

impl ConfigDiscovery {
    /// Discover all available configuration files
    ///
    /// # Errors
    ///
    /// Returns an error if an explicitly requested config file does not exist.
    pub fn discover(cli_path: Option<&Path>) -> Result<ConfigFiles> {
        let cli = match cli_path {
            Some(path) if path.is_file() => Some(path.to_path_buf()),
            Some(path) => anyhow::bail!("Config file not found: {}", path.display()),
            None => None,
        };

        let cwd = std::env::current_dir().ok();

        Ok(ConfigFiles {
            cli,
            local: cwd.as_deref().and_then(|dir| Self::find_upwards(dir, LOCAL_CONFIG)),
            project: cwd.as_deref().and_then(|dir| Self::find_upwards(dir, PROJECT_CONFIG)),
            global: Self::find_global_config(),
        })
    }

    /// Find a config file in `start` or any of its ancestors
    pub fn find_upwards(start: &Path, name: &str) -> Option<PathBuf> {
        start
            .ancestors()
            .map(|dir| dir.join(name))
            .find(|candidate| candidate.is_file())
    }

    /// Find global config in the platform config directory
    fn find_global_config() -> Option<PathBuf> {
        let global_config = dirs::config_dir()?.join("treesync").join("config.toml");
        global_config.is_file().then_some(global_config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_discover_cli_config() {
        let tmp = TempDir::new().unwrap();
        let cli_config = tmp.path().join("custom.toml");
        fs::write(&cli_config, "# config").unwrap();

        let files = ConfigDiscovery::discover(Some(&cli_config)).unwrap();

        assert_eq!(files.cli, Some(cli_config));
    }

    #[test]
    fn test_discover_cli_config_nonexistent() {
        let tmp = TempDir::new().unwrap();
        let cli_config = tmp.path().join("nonexistent.toml");

        let result = ConfigDiscovery::discover(Some(&cli_config));

        assert!(result.is_err());
    }

    #[test]
    fn test_find_upwards() {
        let tmp = TempDir::new().unwrap();
        let nested = tmp.path().join("a").join("b");
        fs::create_dir_all(&nested).unwrap();
        fs::write(tmp.path().join(PROJECT_CONFIG), "").unwrap();

        let found = ConfigDiscovery::find_upwards(&nested, PROJECT_CONFIG);

        assert_eq!(found, Some(tmp.path().join(PROJECT_CONFIG)));
    }

    #[test]
    fn test_find_upwards_prefers_nearest() {
        let tmp = TempDir::new().unwrap();
        let nested = tmp.path().join("a");
        fs::create_dir_all(&nested).unwrap();
        fs::write(tmp.path().join(PROJECT_CONFIG), "").unwrap();
        fs::write(nested.join(PROJECT_CONFIG), "").unwrap();

        let found = ConfigDiscovery::find_upwards(&nested, PROJECT_CONFIG);

        assert_eq!(found, Some(nested.join(PROJECT_CONFIG)));
    }
}
