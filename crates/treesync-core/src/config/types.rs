//! Configuration types and structures

use serde::{Deserialize, Serialize};

use crate::decision::{AutoPolicy, MissingPolicy, OutdatedPolicy};

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Patterns to ignore (never visited in either tree)
    #[serde(default)]
    pub ignore: Vec<String>,

    /// Patterns to explicitly include (override ignores)
    #[serde(default)]
    pub include: Vec<String>,

    /// Dry run mode (report without touching either tree)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dry_run: Option<bool>,

    /// Standing answer for entries missing on one side
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_missing: Option<MissingPolicy>,

    /// Standing answer for divergent files with a newer side
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_outdated: Option<OutdatedPolicy>,
}

impl Config {
    /// Non-interactive answers configured for this run
    #[must_use]
    pub const fn policy(&self) -> AutoPolicy {
        AutoPolicy {
            on_missing: self.on_missing,
            on_outdated: self.on_outdated,
        }
    }

    /// Whether the run should leave both trees untouched
    #[must_use]
    pub fn is_dry_run(&self) -> bool {
        self.dry_run == Some(true)
    }
}
