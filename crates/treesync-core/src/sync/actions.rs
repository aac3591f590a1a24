//! Entry pair classification

use std::fs::{self, Metadata};
use std::io;
use std::path::{Path, PathBuf};

use anyhow::Context;

use super::executor::is_symlink;
use crate::comparison::{ContentComparator, Newer, TimestampComparator};
use crate::error::Result;

/// How an entry in the listed tree relates to its counterpart
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryState {
    /// Present only in the tree being listed
    OnlyInA {
        /// Whether the entry is a directory
        is_dir: bool,
        /// Size in bytes for files, zero for directories
        size: u64,
    },
    /// Present only in the opposite tree
    OnlyInB,
    /// Two regular files with the same bytes
    BothPresentIdentical,
    /// Two regular files with different bytes
    BothPresentDivergent {
        /// Which side has the later modification time
        newer: Newer,
        /// Size of the listed side's file
        size_a: u64,
        /// Size of the opposite side's file
        size_b: u64,
    },
    /// Two directories
    BothPresentDirectories,
    /// Present on both sides but not as two files or two directories
    KindMismatch,
    /// A symlink in the listed tree whose target does not exist
    BrokenLink,
}

impl EntryState {
    /// Whether the pair needs a decision or a logged verdict
    #[must_use]
    pub const fn is_conflict(&self) -> bool {
        matches!(
            self,
            Self::BothPresentDivergent { .. } | Self::KindMismatch | Self::BrokenLink
        )
    }
}

/// The same relative name looked up in both trees
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryPair {
    /// Path relative to the pass root
    pub relative: PathBuf,
    /// Directory holding the entry in the listed tree
    pub dir_a: PathBuf,
    /// Matching directory in the opposite tree
    pub dir_b: PathBuf,
    /// Full path in the listed tree
    pub path_a: PathBuf,
    /// Full path in the opposite tree
    pub path_b: PathBuf,
}

impl EntryPair {
    /// Pair up `name` inside two matching directories
    #[must_use]
    pub fn new(relative: PathBuf, dir_a: &Path, dir_b: &Path) -> Self {
        let name = relative.file_name().map(PathBuf::from).unwrap_or_default();
        Self {
            path_a: dir_a.join(&name),
            path_b: dir_b.join(&name),
            dir_a: dir_a.to_path_buf(),
            dir_b: dir_b.to_path_buf(),
            relative,
        }
    }

    /// Classify the pair
    ///
    /// Symlinks are followed. A listed entry that is a dangling symlink
    /// classifies as [`EntryState::BrokenLink`]. Files with different bytes
    /// are timestamped so the newer side is known.
    ///
    /// # Errors
    ///
    /// Returns an error if metadata cannot be read for a path that exists,
    /// or if neither path exists.
    pub fn classify(&self) -> Result<EntryState> {
        let meta_a = lookup(&self.path_a)?;
        let meta_b = lookup(&self.path_b)?;

        let state = match (meta_a, meta_b) {
            (None, None) if is_symlink(&self.path_a) => EntryState::BrokenLink,
            (None, None) => anyhow::bail!(
                "Entry vanished from both trees: {}",
                self.relative.display()
            ),
            (Some(a), None) => EntryState::OnlyInA {
                is_dir: a.is_dir(),
                size: if a.is_dir() { 0 } else { a.len() },
            },
            (None, Some(_)) => EntryState::OnlyInB,
            (Some(a), Some(b)) if a.is_dir() && b.is_dir() => EntryState::BothPresentDirectories,
            (Some(a), Some(b)) if !(a.is_file() && b.is_file()) => EntryState::KindMismatch,
            (Some(a), Some(b)) => {
                if ContentComparator::same_content(&self.path_a, &self.path_b) {
                    EntryState::BothPresentIdentical
                } else {
                    EntryState::BothPresentDivergent {
                        newer: TimestampComparator::newer_of(&self.path_a, &self.path_b)?,
                        size_a: a.len(),
                        size_b: b.len(),
                    }
                }
            }
        };

        Ok(state)
    }
}

fn lookup(path: &Path) -> Result<Option<Metadata>> {
    match fs::metadata(path) {
        Ok(metadata) => Ok(Some(metadata)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e).with_context(|| format!("Failed to read metadata for: {}", path.display())),
    }
}
