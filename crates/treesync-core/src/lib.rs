//! # treesync-core
//!
//! Core library for bidirectional directory tree synchronization.
//!
//! Two trees are walked in lockstep, once rooted at each side. Entries missing
//! on one side and regular files whose contents diverge are turned into
//! [`decision::Discrepancy`] questions for an injected
//! [`decision::DecisionProvider`], and the chosen copies and deletions are
//! accounted per direction.

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Typed errors and the crate-wide `Result` alias
pub mod error;

/// Byte-level content comparison, timestamp ordering, and text diffs
pub mod comparison;

/// Configuration file discovery, merging, and pattern matching
pub mod config;

/// Decision provider abstraction for resolving discrepancies
pub mod decision;

/// Tree diff engine, conflict resolution, and bidirectional orchestration
pub mod sync;
