//! Diff generation with color-coded output

use std::fmt::Write;
use std::fs;
use std::path::Path;

use anyhow::Context;
use similar::{ChangeTag, TextDiff};

use crate::error::Result;

/// Lines of unchanged context around each hunk
const DIFF_CONTEXT_LINES: usize = 3;

/// Diff generator for showing what an update would change
pub struct DiffGenerator;

impl DiffGenerator {
    /// Generate a color-coded diff turning `older` into `newer`
    ///
    /// Files that are not valid UTF-8 produce a one-line notice instead of a
    /// diff.
    ///
    /// # Errors
    ///
    /// Returns an error if either file cannot be read.
    pub fn generate(newer: &Path, older: &Path) -> Result<String> {
        let newer_bytes =
            fs::read(newer).with_context(|| format!("Failed to read file: {}", newer.display()))?;
        let older_bytes =
            fs::read(older).with_context(|| format!("Failed to read file: {}", older.display()))?;

        match (
            std::str::from_utf8(&newer_bytes),
            std::str::from_utf8(&older_bytes),
        ) {
            (Ok(newer_text), Ok(older_text)) => Ok(Self::generate_from_content(
                newer_text, older_text, newer, older,
            )),
            _ => Ok(format!(
                "Binary files {} and {} differ\n",
                older.display(),
                newer.display()
            )),
        }
    }

    /// Generate a colored diff from string contents
    #[must_use]
    pub fn generate_from_content(
        newer_content: &str,
        older_content: &str,
        newer_path: &Path,
        older_path: &Path,
    ) -> String {
        let diff = TextDiff::from_lines(older_content, newer_content);

        let mut output = String::new();
        let _ = writeln!(output, "\x1b[1m--- {}\x1b[0m", older_path.display());
        let _ = writeln!(output, "\x1b[1m+++ {}\x1b[0m", newer_path.display());

        for (idx, group) in diff.grouped_ops(DIFF_CONTEXT_LINES).iter().enumerate() {
            if idx > 0 {
                output.push_str("...\n");
            }

            for op in group {
                for change in diff.iter_changes(op) {
                    let (sign, color) = match change.tag() {
                        ChangeTag::Delete => ("-", "\x1b[31m"),
                        ChangeTag::Insert => ("+", "\x1b[32m"),
                        ChangeTag::Equal => (" ", "\x1b[0m"),
                    };
                    let newline = if change.value().ends_with('\n') { "" } else { "\n" };

                    let _ = write!(output, "{color}{sign}{}{newline}\x1b[0m", change.value());
                }
            }
        }

        output
    }
}
