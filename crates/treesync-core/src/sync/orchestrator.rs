//! Bidirectional sync orchestration

use std::path::Path;

use tracing::{info, warn};

use super::engine::TreeDiffEngine;
use super::executor::TreeMutator;
use super::resolver::ConflictResolver;
use super::SyncSummary;
use crate::config::{Config, PatternMatcher};
use crate::decision::DecisionProvider;
use crate::error::{Result, SyncError};

/// Runs the two passes of a synchronization and merges their results
#[derive(Debug)]
pub struct SyncOrchestrator {
    engine: TreeDiffEngine,
    dry_run: bool,
}

impl SyncOrchestrator {
    /// Create an orchestrator from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configured patterns do not compile.
    pub fn new(config: &Config) -> Result<Self> {
        let matcher = PatternMatcher::with_patterns(&config.ignore, &config.include)?;
        let mutator = TreeMutator::new(config.is_dry_run());

        Ok(Self {
            engine: TreeDiffEngine::new(ConflictResolver::new(mutator), matcher),
            dry_run: config.is_dry_run(),
        })
    }

    /// Synchronize `dir1` and `dir2`
    ///
    /// The first pass lists `dir1` against `dir2`, the second lists `dir2`
    /// against `dir1`. The summary's directions always refer to `dir1` and
    /// `dir2` as given here.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::OverlappingRoots`] if one directory contains the
    /// other, and propagates errors from `provider`.
    pub fn run(
        &mut self,
        dir1: &Path,
        dir2: &Path,
        provider: &mut dyn DecisionProvider,
    ) -> Result<SyncSummary> {
        check_roots(dir1, dir2)?;
        self.engine.reset();

        if self.dry_run {
            info!("Dry run: no files will be changed");
        }

        info!("Comparing {} against {}", dir1.display(), dir2.display());
        let first = self.engine.run_pass(dir1, dir2, provider)?;

        info!("Comparing {} against {}", dir2.display(), dir1.display());
        let second = self.engine.run_pass(dir2, dir1, provider)?;

        Ok(SyncSummary::merge(first, second))
    }
}

fn check_roots(dir1: &Path, dir2: &Path) -> Result<()> {
    for dir in [dir1, dir2] {
        if !dir.is_dir() {
            warn!("{} is not a readable directory; nothing will be compared", dir.display());
        }
    }

    let (Ok(first), Ok(second)) = (dunce::canonicalize(dir1), dunce::canonicalize(dir2)) else {
        return Ok(());
    };

    if first.starts_with(&second) || second.starts_with(&first) {
        return Err(SyncError::OverlappingRoots {
            first: dir1.to_path_buf(),
            second: dir2.to_path_buf(),
        }
        .into());
    }

    Ok(())
}
