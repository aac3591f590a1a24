//! Turning classified entry pairs into decisions and mutations

use tracing::{debug, info, warn};

use super::actions::{EntryPair, EntryState};
use super::executor::{is_symlink, TreeMutator};
use super::PassResult;
use crate::comparison::Newer;
use crate::decision::{Decision, DecisionProvider, Discrepancy};
use crate::error::Result;

/// Resolves one entry pair at a time
#[derive(Debug, Clone, Copy, Default)]
pub struct ConflictResolver {
    mutator: TreeMutator,
}

impl ConflictResolver {
    /// Create a resolver that mutates through `mutator`
    #[must_use]
    pub const fn new(mutator: TreeMutator) -> Self {
        Self { mutator }
    }

    /// Act on a classified pair, recording the outcome in `result`
    ///
    /// Only entries missing from the opposite tree and divergent files with a
    /// strictly newer side reach `provider`. Mutation failures are recorded
    /// in `result.errors` and do not stop the pass.
    ///
    /// # Errors
    ///
    /// Propagates errors from `provider`, which abort the run.
    pub fn resolve(
        &self,
        pair: &EntryPair,
        state: EntryState,
        provider: &mut dyn DecisionProvider,
        result: &mut PassResult,
    ) -> Result<()> {
        match state {
            EntryState::OnlyInA { is_dir, size } => {
                self.resolve_missing(pair, is_dir, size, provider, result)
            }
            EntryState::BothPresentDivergent {
                newer,
                size_a,
                size_b,
            } => self.resolve_divergent(pair, newer, size_a, size_b, provider, result),
            EntryState::KindMismatch => {
                warn!(
                    "{} is a directory on one side and not on the other; leaving it",
                    pair.relative.display()
                );
                result.unresolved += 1;
                Ok(())
            }
            EntryState::BrokenLink => {
                warn!("Skipping broken symlink {}", pair.path_a.display());
                result.unresolved += 1;
                Ok(())
            }
            EntryState::OnlyInB
            | EntryState::BothPresentIdentical
            | EntryState::BothPresentDirectories => Ok(()),
        }
    }

    fn resolve_missing(
        &self,
        pair: &EntryPair,
        is_dir: bool,
        size: u64,
        provider: &mut dyn DecisionProvider,
        result: &mut PassResult,
    ) -> Result<()> {
        let discrepancy = Discrepancy::Missing {
            relative: pair.relative.clone(),
            source: pair.path_a.clone(),
            source_dir: pair.dir_a.clone(),
            target_dir: pair.dir_b.clone(),
            is_dir,
        };

        match checked(&discrepancy, provider.decide(&discrepancy)?) {
            Decision::Copy if is_dir => {
                let copied = self.mutator.copy_tree(&pair.path_a, &pair.path_b, &mut result.errors);
                info!(
                    "Copied directory {} ({} files, {} bytes)",
                    pair.relative.display(),
                    copied.file_count,
                    copied.total_bytes
                );
                result.stats.record_forward(copied.file_count, copied.total_bytes);
            }
            Decision::Copy => match self.mutator.copy_file(&pair.path_a, &pair.dir_b) {
                Ok(()) => {
                    info!("Copied {}", pair.relative.display());
                    result.stats.record_forward(1, size);
                }
                Err(e) => result.record_error(format!("{e:#}")),
            },
            Decision::Delete => {
                // A linked directory is removed as a link, never through it
                let removed = if is_dir && !is_symlink(&pair.path_a) {
                    self.mutator.remove_tree(&pair.path_a, &mut result.errors)
                } else {
                    self.mutator.remove_file(&pair.path_a, &mut result.errors)
                };
                if removed {
                    result.deleted += 1;
                }
            }
            _ => {
                debug!("Skipped {}", pair.relative.display());
                result.declined += 1;
            }
        }

        Ok(())
    }

    fn resolve_divergent(
        &self,
        pair: &EntryPair,
        newer: Newer,
        size_a: u64,
        size_b: u64,
        provider: &mut dyn DecisionProvider,
        result: &mut PassResult,
    ) -> Result<()> {
        let (newer_path, older_path, target_dir, size, forward) = match newer {
            Newer::A => (&pair.path_a, &pair.path_b, &pair.dir_b, size_a, true),
            Newer::B => (&pair.path_b, &pair.path_a, &pair.dir_a, size_b, false),
            Newer::Neither => {
                warn!(
                    "{} differs but both copies have the same modification time; leaving both",
                    pair.relative.display()
                );
                result.unresolved += 1;
                return Ok(());
            }
        };

        let discrepancy = Discrepancy::Outdated {
            relative: pair.relative.clone(),
            newer: newer_path.clone(),
            older: older_path.clone(),
        };

        if checked(&discrepancy, provider.decide(&discrepancy)?) != Decision::Update {
            debug!("Kept {} unchanged", pair.relative.display());
            result.declined += 1;
            return Ok(());
        }

        match self.mutator.copy_file(newer_path, target_dir) {
            Ok(()) => {
                info!("Updated {}", older_path.display());
                if forward {
                    result.stats.record_forward(1, size);
                } else {
                    result.stats.record_backward(1, size);
                }
            }
            Err(e) => result.record_error(format!("{e:#}")),
        }

        Ok(())
    }
}

/// Replace an answer that does not fit the question with "leave it"
fn checked(discrepancy: &Discrepancy, decision: Decision) -> Decision {
    if discrepancy.allows(decision) {
        return decision;
    }

    warn!(
        "Ignoring {decision:?} for {}: not a valid answer here",
        discrepancy.relative().display()
    );
    match discrepancy {
        Discrepancy::Missing { .. } => Decision::Skip,
        Discrepancy::Outdated { .. } => Decision::Reject,
    }
}
