//! Integration tests for configuration module

use std::fs;
use tempfile::TempDir;

use super::{ConfigFiles, ConfigManager};
use crate::decision::{Decision, DecisionProvider, Discrepancy, MissingPolicy};

#[test]
fn test_full_config_workflow() {
    let tmp = TempDir::new().unwrap();
    let config_file = tmp.path().join("config.toml");

    fs::write(
        &config_file,
        r#"
ignore = ["*.tmp", ".git/"]
include = ["keep.tmp"]
dry_run = false
on_missing = "copy"
"#,
    )
    .unwrap();

    let files = ConfigFiles {
        cli: Some(config_file),
        ..ConfigFiles::default()
    };
    let config = ConfigManager::load_files(&files).unwrap();

    assert_eq!(config.ignore.len(), 2);
    assert_eq!(config.include.len(), 1);
    assert!(!config.is_dry_run());
    assert_eq!(config.on_missing, Some(MissingPolicy::Copy));
    assert!(config.on_outdated.is_none());

    let missing = Discrepancy::Missing {
        relative: "a.txt".into(),
        source: tmp.path().join("a.txt"),
        source_dir: tmp.path().to_path_buf(),
        target_dir: tmp.path().join("other"),
        is_dir: false,
    };
    assert_eq!(config.policy().decide(&missing).unwrap(), Decision::Copy);
}

#[test]
fn test_invalid_config_validation() {
    let tmp = TempDir::new().unwrap();
    let config_file = tmp.path().join("config.toml");

    fs::write(&config_file, r#"include = [""]"#).unwrap();

    let files = ConfigFiles {
        cli: Some(config_file),
        ..ConfigFiles::default()
    };
    let result = ConfigManager::load_files(&files);

    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("cannot be empty"));
}

#[test]
fn test_load_with_explicit_missing_file() {
    let tmp = TempDir::new().unwrap();

    let result = ConfigManager::load(Some(&tmp.path().join("absent.toml")));

    assert!(result.is_err());
}

#[test]
fn test_unknown_policy_value() {
    let tmp = TempDir::new().unwrap();
    let config_file = tmp.path().join("config.toml");
    fs::write(&config_file, r#"on_outdated = "merge""#).unwrap();

    let files = ConfigFiles {
        cli: Some(config_file),
        ..ConfigFiles::default()
    };

    assert!(ConfigManager::load_files(&files).is_err());
}
