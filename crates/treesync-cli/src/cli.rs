use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use treesync_core::decision::{MissingPolicy, OutdatedPolicy};

/// Interactive bidirectional directory synchronization
///
/// Compares two directory trees in both directions and asks what to do about
/// every entry that exists on one side only and every file whose contents
/// differ.
#[derive(Parser, Debug)]
#[command(name = "treesync")]
#[command(about, long_about = None, version)]
#[allow(clippy::struct_excessive_bools)]
pub struct Cli {
    /// First directory
    #[arg(value_name = "DIR1")]
    pub dir1: PathBuf,

    /// Second directory
    #[arg(value_name = "DIR2")]
    pub dir2: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Copy every missing entry and apply every update without prompting
    #[arg(long)]
    pub yes_all: bool,

    /// Preview changes without executing (dry-run)
    #[arg(long)]
    pub dry_run: bool,

    /// Answer for entries missing on one side, instead of prompting
    #[arg(long, value_enum, value_name = "ACTION")]
    pub on_missing: Option<MissingMode>,

    /// Answer for files that are newer on one side, instead of prompting
    #[arg(long, value_enum, value_name = "ACTION")]
    pub on_outdated: Option<OutdatedMode>,

    /// Use specific config file
    #[arg(long, value_name = "PATH", conflicts_with = "no_config")]
    pub config: Option<PathBuf>,

    /// Ignore all config files
    #[arg(long, conflicts_with = "config")]
    pub no_config: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum MissingMode {
    /// Copy the entry into the other directory
    Copy,
    /// Delete the entry where it exists
    Delete,
    /// Leave it alone
    Skip,
}

impl From<MissingMode> for MissingPolicy {
    fn from(mode: MissingMode) -> Self {
        match mode {
            MissingMode::Copy => Self::Copy,
            MissingMode::Delete => Self::Delete,
            MissingMode::Skip => Self::Skip,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutdatedMode {
    /// Overwrite the older file
    Update,
    /// Keep both files
    Reject,
}

impl From<OutdatedMode> for OutdatedPolicy {
    fn from(mode: OutdatedMode) -> Self {
        match mode {
            OutdatedMode::Update => Self::Update,
            OutdatedMode::Reject => Self::Reject,
        }
    }
}
