//! Checks applied to a merged configuration before any sync work

use super::patterns::PatternMatcher;
use super::types::Config;
use crate::error::Result;

/// Configuration validator
pub struct ConfigValidator;

impl ConfigValidator {
    /// Reject blank patterns and patterns that do not compile
    ///
    /// # Errors
    ///
    /// Returns an error describing the first problem found.
    pub fn validate(config: &Config) -> Result<()> {
        for (kind, patterns) in [("Ignore", &config.ignore), ("Include", &config.include)] {
            if let Some(position) = patterns.iter().position(|p| p.trim().is_empty()) {
                anyhow::bail!("{kind} patterns cannot be empty (entry {})", position + 1);
            }
        }

        PatternMatcher::with_patterns(&config.ignore, &config.include)?;
        Ok(())
    }
}
