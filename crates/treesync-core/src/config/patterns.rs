//! Ignore and include filters for tree entries

use std::path::Path;

use anyhow::Context;
use ignore::gitignore::{Gitignore, GitignoreBuilder};

use crate::error::Result;

/// Filters entries by their path relative to a sync root
///
/// Patterns use gitignore syntax. Include patterns are applied after ignore
/// patterns and re-admit anything they match.
#[derive(Debug, Default)]
pub struct PatternMatcher {
    rules: Option<Gitignore>,
}

impl PatternMatcher {
    /// Compile ignore and include patterns into a matcher
    ///
    /// With no patterns at all every entry is admitted.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first pattern that does not compile.
    pub fn with_patterns(ignore: &[String], include: &[String]) -> Result<Self> {
        if ignore.is_empty() && include.is_empty() {
            return Ok(Self::default());
        }

        let mut rules = GitignoreBuilder::new("");
        add_rules(&mut rules, ignore, "ignore", "")?;
        add_rules(&mut rules, include, "include", "!")?;

        Ok(Self {
            rules: Some(rules.build().context("Failed to compile sync filters")?),
        })
    }

    /// Whether the engine should visit `relative`
    #[must_use]
    pub fn should_include(&self, relative: &Path, is_dir: bool) -> bool {
        match &self.rules {
            Some(rules) => !rules.matched(relative, is_dir).is_ignore(),
            None => true,
        }
    }
}

fn add_rules(
    rules: &mut GitignoreBuilder,
    patterns: &[String],
    kind: &str,
    prefix: &str,
) -> Result<()> {
    for pattern in patterns {
        rules
            .add_line(None, &format!("{prefix}{pattern}"))
            .with_context(|| format!("Invalid {kind} pattern: '{pattern}'"))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matcher(ignore: &[&str], include: &[&str]) -> PatternMatcher {
        let owned = |list: &[&str]| list.iter().map(ToString::to_string).collect::<Vec<_>>();
        PatternMatcher::with_patterns(&owned(ignore), &owned(include)).unwrap()
    }

    #[test]
    fn test_everything_admitted_without_patterns() {
        let m = matcher(&[], &[]);

        assert!(m.should_include(Path::new("photos/2024/beach.jpg"), false));
        assert!(m.should_include(Path::new(".cache"), true));
    }

    #[test]
    fn test_glob_matches_at_any_depth() {
        let m = matcher(&["*.swp"], &[]);

        assert!(!m.should_include(Path::new(".notes.txt.swp"), false));
        assert!(!m.should_include(Path::new("src/deep/main.rs.swp"), false));
        assert!(m.should_include(Path::new("src/deep/main.rs"), false));
    }

    #[test]
    fn test_include_readmits_ignored_file() {
        let m = matcher(&["*.log"], &["audit.log"]);

        assert!(!m.should_include(Path::new("server.log"), false));
        assert!(m.should_include(Path::new("audit.log"), false));
        assert!(m.should_include(Path::new("var/audit.log"), false));
    }

    #[test]
    fn test_trailing_slash_only_matches_directories() {
        let m = matcher(&["node_modules/"], &[]);

        assert!(!m.should_include(Path::new("web/node_modules"), true));
        assert!(m.should_include(Path::new("node_modules"), false));
    }

    #[test]
    fn test_anchored_pattern() {
        let m = matcher(&["/build"], &[]);

        assert!(!m.should_include(Path::new("build"), true));
        assert!(m.should_include(Path::new("tools/build"), true));
    }

    #[test]
    fn test_invalid_pattern_is_named() {
        let err = PatternMatcher::with_patterns(&[], &["{unclosed".to_string()]).unwrap_err();

        assert!(err.to_string().contains("Invalid include pattern: '{unclosed'"));
    }
}
