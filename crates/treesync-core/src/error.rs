use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using `anyhow::Error`
pub type Result<T> = anyhow::Result<T>;

/// Errors that end a synchronization run early.
///
/// Everything else (unreadable files, failed copies) is logged and the run
/// carries on with the next entry.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The operator chose to quit at a prompt.
    #[error("sync aborted by operator")]
    Aborted,

    /// The decision input ended before an answer was read.
    #[error("decision input closed before an answer was read")]
    InputClosed,

    /// One root directory is the other, or lies inside it.
    #[error("directories overlap: {} and {}", .first.display(), .second.display())]
    OverlappingRoots {
        /// First root as given on the command line
        first: PathBuf,
        /// Second root as given on the command line
        second: PathBuf,
    },
}

impl SyncError {
    /// Whether this error represents the operator ending the run on purpose.
    #[must_use]
    pub const fn is_abort(&self) -> bool {
        matches!(self, Self::Aborted)
    }
}
