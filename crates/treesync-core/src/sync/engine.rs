//! One-directional tree walk
//!
//! A pass lists the entries of tree A, looks each one up in tree B and hands
//! the classified pair to the [`ConflictResolver`]. Matching directories are
//! descended into. Entries that exist only in B are never visited here; the
//! mirrored pass picks them up.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::actions::{EntryPair, EntryState};
use super::executor::{is_dir_symlink, sorted_entry_names};
use super::resolver::ConflictResolver;
use super::PassResult;
use crate::config::PatternMatcher;
use crate::decision::DecisionProvider;
use crate::error::Result;

/// Walks one tree against the other
#[derive(Debug, Default)]
pub struct TreeDiffEngine {
    resolver: ConflictResolver,
    matcher: PatternMatcher,
    /// Pairs already handled or left uncompared in this run, by relative path
    settled: HashSet<PathBuf>,
}

impl TreeDiffEngine {
    /// Create an engine
    #[must_use]
    pub fn new(resolver: ConflictResolver, matcher: PatternMatcher) -> Self {
        Self {
            resolver,
            matcher,
            settled: HashSet::new(),
        }
    }

    /// Forget which conflicts were handled, ready for a new run
    pub fn reset(&mut self) {
        self.settled.clear();
    }

    /// Walk `root_a` against `root_b`
    ///
    /// Stats are oriented so that "dir1 to dir2" means from `root_a` to
    /// `root_b`. A root that is not a readable directory makes for an empty
    /// pass.
    ///
    /// # Errors
    ///
    /// Propagates errors from `provider`, which abort the run.
    pub fn run_pass(
        &mut self,
        root_a: &Path,
        root_b: &Path,
        provider: &mut dyn DecisionProvider,
    ) -> Result<PassResult> {
        let mut result = PassResult::default();
        self.diff_dirs(root_a, root_b, Path::new(""), provider, &mut result)?;
        Ok(result)
    }

    fn diff_dirs(
        &mut self,
        dir_a: &Path,
        dir_b: &Path,
        relative: &Path,
        provider: &mut dyn DecisionProvider,
        result: &mut PassResult,
    ) -> Result<()> {
        if !dir_a.is_dir() || !dir_b.is_dir() {
            debug!(
                "Not comparing {} with {}: both must be directories",
                dir_a.display(),
                dir_b.display()
            );
            return Ok(());
        }

        let names = match sorted_entry_names(dir_a) {
            Ok(names) => names,
            Err(e) => {
                result.record_error(format!("{e:#}"));
                return Ok(());
            }
        };

        for name in names {
            let pair = EntryPair::new(relative.join(&name), dir_a, dir_b);

            if !self.matcher.should_include(&pair.relative, pair.path_a.is_dir()) {
                debug!("Ignoring {}", pair.relative.display());
                continue;
            }

            let state = match pair.classify() {
                Ok(state) => state,
                Err(e) => {
                    result.record_error(format!("{e:#}"));
                    continue;
                }
            };

            if state.is_conflict() && !self.settled.insert(pair.relative.clone()) {
                debug!("Already handled {}", pair.relative.display());
                continue;
            }

            self.resolver.resolve(&pair, state, provider, result)?;

            if state == EntryState::BothPresentDirectories {
                if is_dir_symlink(&pair.path_a) || is_dir_symlink(&pair.path_b) {
                    if self.settled.insert(pair.relative.clone()) {
                        warn!("Not following directory symlink {}", pair.relative.display());
                        result.unresolved += 1;
                    }
                    continue;
                }
                self.diff_dirs(&pair.path_a, &pair.path_b, &pair.relative, provider, result)?;
            }
        }

        Ok(())
    }
}
