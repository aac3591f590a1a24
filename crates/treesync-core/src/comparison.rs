//! File comparison and entry classification inputs
//!
//! This module provides read-only analysis of files:
//! - Byte-exact content equality via lockstep block reads
//! - Which file is newer via modification timestamps
//! - Visual diffs for the interactive "show diff" answer

mod content;
mod diff;
mod timestamp;

pub use content::ContentComparator;
pub use diff::DiffGenerator;
pub use timestamp::{Newer, TimestampComparator};
