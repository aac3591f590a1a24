//! Bidirectional synchronization engine
//!
//! A run is two passes of the same [`TreeDiffEngine`]: first with dir1 as the
//! listed tree, then with dir2. Each pass hands missing entries and divergent
//! files to the injected [`DecisionProvider`](crate::decision::DecisionProvider)
//! through the [`ConflictResolver`], and the [`TreeMutator`] carries out the
//! answers. [`SyncOrchestrator`] merges both passes into a [`SyncSummary`]
//! oriented from dir1's point of view.

mod actions;
mod engine;
mod executor;
mod orchestrator;
mod reporting;
mod resolver;

use std::ops::{Add, AddAssign};

use tracing::warn;

pub use actions::{EntryPair, EntryState};
pub use engine::TreeDiffEngine;
pub use executor::TreeMutator;
pub use orchestrator::SyncOrchestrator;
pub use reporting::SyncReporter;
pub use resolver::ConflictResolver;

/// Files and bytes copied by a tree copy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DirectoryStats {
    /// Regular files copied
    pub file_count: u64,
    /// Sum of their sizes in bytes
    pub total_bytes: u64,
}

impl DirectoryStats {
    /// Stats for one file of `bytes` bytes
    #[must_use]
    pub const fn single_file(bytes: u64) -> Self {
        Self {
            file_count: 1,
            total_bytes: bytes,
        }
    }
}

impl Add for DirectoryStats {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            file_count: self.file_count + other.file_count,
            total_bytes: self.total_bytes + other.total_bytes,
        }
    }
}

impl AddAssign for DirectoryStats {
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

/// Transfer counters for a single pass, oriented from the listed tree
///
/// "dir1" is the tree the pass lists and "dir2" the opposite one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncStats {
    /// Bytes copied from the listed tree to the opposite one
    pub bytes_dir1_to_dir2: u64,
    /// Bytes copied from the opposite tree to the listed one
    pub bytes_dir2_to_dir1: u64,
    /// Files copied from the listed tree to the opposite one
    pub files_dir1_to_dir2: u64,
    /// Files copied from the opposite tree to the listed one
    pub files_dir2_to_dir1: u64,
}

impl SyncStats {
    /// Count a copy from the listed tree to the opposite one
    pub const fn record_forward(&mut self, files: u64, bytes: u64) {
        self.files_dir1_to_dir2 += files;
        self.bytes_dir1_to_dir2 += bytes;
    }

    /// Count a copy from the opposite tree to the listed one
    pub const fn record_backward(&mut self, files: u64, bytes: u64) {
        self.files_dir2_to_dir1 += files;
        self.bytes_dir2_to_dir1 += bytes;
    }

    /// The same counters seen from the opposite tree
    #[must_use]
    pub const fn mirrored(self) -> Self {
        Self {
            bytes_dir1_to_dir2: self.bytes_dir2_to_dir1,
            bytes_dir2_to_dir1: self.bytes_dir1_to_dir2,
            files_dir1_to_dir2: self.files_dir2_to_dir1,
            files_dir2_to_dir1: self.files_dir1_to_dir2,
        }
    }
}

impl Add for SyncStats {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            bytes_dir1_to_dir2: self.bytes_dir1_to_dir2 + other.bytes_dir1_to_dir2,
            bytes_dir2_to_dir1: self.bytes_dir2_to_dir1 + other.bytes_dir2_to_dir1,
            files_dir1_to_dir2: self.files_dir1_to_dir2 + other.files_dir1_to_dir2,
            files_dir2_to_dir1: self.files_dir2_to_dir1 + other.files_dir2_to_dir1,
        }
    }
}

/// Outcome of one pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PassResult {
    /// Transfers, oriented from the listed tree
    pub stats: SyncStats,
    /// Entries removed
    pub deleted: usize,
    /// Questions answered with skip or reject
    pub declined: usize,
    /// Pairs left alone without asking
    pub unresolved: usize,
    /// Failures that did not stop the pass
    pub errors: Vec<String>,
}

impl PassResult {
    /// Log a non-fatal failure and keep it for the summary
    pub fn record_error(&mut self, message: String) {
        warn!("{message}");
        self.errors.push(message);
    }
}

/// Files and bytes moved in one direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Transfer {
    /// Files copied
    pub files: u64,
    /// Bytes copied
    pub bytes: u64,
}

impl Transfer {
    /// Whole kilobytes transferred, rounded down
    #[must_use]
    pub const fn kilobytes(&self) -> u64 {
        self.bytes / 1024
    }
}

/// Net result of a full run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncSummary {
    /// Copies from the first directory into the second
    pub dir1_to_dir2: Transfer,
    /// Copies from the second directory into the first
    pub dir2_to_dir1: Transfer,
    /// Entries removed across both passes
    pub deleted: usize,
    /// Questions answered with skip or reject
    pub declined: usize,
    /// Pairs left alone without asking
    pub unresolved: usize,
    /// Failures that did not stop the run
    pub errors: Vec<String>,
}

impl SyncSummary {
    /// Merge the dir1-rooted pass with the dir2-rooted pass
    ///
    /// The second pass is oriented from dir2, so its counters are mirrored
    /// before they are added.
    #[must_use]
    pub fn merge(first: PassResult, second: PassResult) -> Self {
        let net = first.stats + second.stats.mirrored();
        let mut errors = first.errors;
        errors.extend(second.errors);

        Self {
            dir1_to_dir2: Transfer {
                files: net.files_dir1_to_dir2,
                bytes: net.bytes_dir1_to_dir2,
            },
            dir2_to_dir1: Transfer {
                files: net.files_dir2_to_dir1,
                bytes: net.bytes_dir2_to_dir1,
            },
            deleted: first.deleted + second.deleted,
            declined: first.declined + second.declined,
            unresolved: first.unresolved + second.unresolved,
            errors,
        }
    }

    /// Whether nothing failed
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.errors.is_empty()
    }
}
