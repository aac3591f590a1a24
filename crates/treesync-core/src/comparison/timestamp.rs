//! File timestamp comparison for determining recency

use std::cmp::Ordering;
use std::fs;
use std::path::Path;
use std::time::SystemTime;

use anyhow::Context;

use crate::error::Result;

/// Which side of an entry pair was modified more recently
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Newer {
    /// The entry in the tree being listed
    A,
    /// The entry in the opposite tree
    B,
    /// Both modification times are equal
    Neither,
}

impl From<Ordering> for Newer {
    fn from(ordering: Ordering) -> Self {
        match ordering {
            Ordering::Greater => Self::A,
            Ordering::Less => Self::B,
            Ordering::Equal => Self::Neither,
        }
    }
}

/// Timestamp comparator
pub struct TimestampComparator;

impl TimestampComparator {
    /// Determine which of two files is strictly newer
    ///
    /// # Errors
    ///
    /// Returns an error if file metadata cannot be read.
    pub fn newer_of(a: &Path, b: &Path) -> Result<Newer> {
        Ok(Self::compare_times(a, b)?.into())
    }

    /// Get the modification time of a file
    ///
    /// # Errors
    ///
    /// Returns an error if file metadata cannot be read or the platform
    /// does not record modification times.
    pub fn get_modified_time(path: &Path) -> Result<SystemTime> {
        let metadata = fs::metadata(path)
            .with_context(|| format!("Failed to read metadata for: {}", path.display()))?;

        metadata
            .modified()
            .with_context(|| format!("Failed to get modification time for: {}", path.display()))
    }

    /// Compare modification times and return ordering
    ///
    /// # Errors
    ///
    /// Returns an error if file metadata cannot be read.
    pub fn compare_times(a: &Path, b: &Path) -> Result<Ordering> {
        let a_time = Self::get_modified_time(a)?;
        let b_time = Self::get_modified_time(b)?;

        Ok(a_time.cmp(&b_time))
    }
}
