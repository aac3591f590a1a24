//! Decision providers
//!
//! The sync engine never talks to a terminal. Every discrepancy it finds is
//! described as a [`Discrepancy`] and handed to a [`DecisionProvider`], which
//! answers with a [`Decision`]. The CLI plugs in an interactive prompter;
//! tests and scripted runs plug in closures or an [`AutoPolicy`].

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// A discrepancy between the two trees that needs a decision
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Discrepancy {
    /// An entry exists in `source_dir` but has no counterpart in `target_dir`
    Missing {
        /// Path relative to the root of the tree being listed
        relative: PathBuf,
        /// Full path of the existing entry
        source: PathBuf,
        /// Directory holding the existing entry
        source_dir: PathBuf,
        /// Directory the entry is missing from
        target_dir: PathBuf,
        /// Whether the existing entry is a directory
        is_dir: bool,
    },
    /// A regular file exists on both sides with different content
    Outdated {
        /// Path relative to the root of the tree being listed
        relative: PathBuf,
        /// The strictly newer file
        newer: PathBuf,
        /// The older file that an update would overwrite
        older: PathBuf,
    },
}

impl Discrepancy {
    /// Path relative to the pass root
    #[must_use]
    pub fn relative(&self) -> &Path {
        match self {
            Self::Missing { relative, .. } | Self::Outdated { relative, .. } => relative,
        }
    }

    /// The decisions that make sense for this discrepancy
    #[must_use]
    pub const fn choices(&self) -> &'static [Decision] {
        match self {
            Self::Missing { .. } => &[Decision::Copy, Decision::Delete, Decision::Skip],
            Self::Outdated { .. } => &[Decision::Update, Decision::Reject],
        }
    }

    /// Whether `decision` is one of [`Self::choices`]
    #[must_use]
    pub fn allows(&self, decision: Decision) -> bool {
        self.choices().contains(&decision)
    }
}

/// An answer to a [`Discrepancy`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Copy the missing entry into the other tree
    Copy,
    /// Delete the entry from the tree that has it
    Delete,
    /// Leave the missing entry alone
    Skip,
    /// Overwrite the older file with the newer one
    Update,
    /// Keep both files as they are
    Reject,
}

/// Something that can answer discrepancy questions
pub trait DecisionProvider {
    /// Decide what to do about `discrepancy`
    ///
    /// # Errors
    ///
    /// An error aborts the whole synchronization run.
    fn decide(&mut self, discrepancy: &Discrepancy) -> Result<Decision>;
}

impl<F> DecisionProvider for F
where
    F: FnMut(&Discrepancy) -> Result<Decision>,
{
    fn decide(&mut self, discrepancy: &Discrepancy) -> Result<Decision> {
        self(discrepancy)
    }
}

/// Standing answer for entries missing on one side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MissingPolicy {
    /// Copy the entry across
    Copy,
    /// Delete the entry where it exists
    Delete,
    /// Leave it alone
    Skip,
}

impl From<MissingPolicy> for Decision {
    fn from(policy: MissingPolicy) -> Self {
        match policy {
            MissingPolicy::Copy => Self::Copy,
            MissingPolicy::Delete => Self::Delete,
            MissingPolicy::Skip => Self::Skip,
        }
    }
}

/// Standing answer for divergent files with a strictly newer side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutdatedPolicy {
    /// Overwrite the older file with the newer one
    Update,
    /// Keep both files
    Reject,
}

impl From<OutdatedPolicy> for Decision {
    fn from(policy: OutdatedPolicy) -> Self {
        match policy {
            OutdatedPolicy::Update => Self::Update,
            OutdatedPolicy::Reject => Self::Reject,
        }
    }
}

/// Non-interactive answers, optionally set per discrepancy kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AutoPolicy {
    /// Answer for missing entries
    pub on_missing: Option<MissingPolicy>,
    /// Answer for outdated files
    pub on_outdated: Option<OutdatedPolicy>,
}

impl AutoPolicy {
    /// Copy every missing entry and apply every update
    #[must_use]
    pub const fn accept_all() -> Self {
        Self {
            on_missing: Some(MissingPolicy::Copy),
            on_outdated: Some(OutdatedPolicy::Update),
        }
    }

    /// Whether both kinds of discrepancy have a standing answer
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.on_missing.is_some() && self.on_outdated.is_some()
    }

    /// The standing answer for `discrepancy`, if one is set
    #[must_use]
    pub fn answer(&self, discrepancy: &Discrepancy) -> Option<Decision> {
        match discrepancy {
            Discrepancy::Missing { .. } => self.on_missing.map(Decision::from),
            Discrepancy::Outdated { .. } => self.on_outdated.map(Decision::from),
        }
    }

    /// Use this policy where it has an answer and ask `fallback` otherwise
    #[must_use]
    pub fn or_ask<P: DecisionProvider>(self, fallback: P) -> PolicyProvider<P> {
        PolicyProvider {
            policy: self,
            fallback,
        }
    }
}

impl DecisionProvider for AutoPolicy {
    /// Unset kinds are left alone
    fn decide(&mut self, discrepancy: &Discrepancy) -> Result<Decision> {
        Ok(self.answer(discrepancy).unwrap_or(match discrepancy {
            Discrepancy::Missing { .. } => Decision::Skip,
            Discrepancy::Outdated { .. } => Decision::Reject,
        }))
    }
}

/// An [`AutoPolicy`] backed by another provider for unset kinds
pub struct PolicyProvider<P> {
    policy: AutoPolicy,
    fallback: P,
}

impl<P: DecisionProvider> DecisionProvider for PolicyProvider<P> {
    fn decide(&mut self, discrepancy: &Discrepancy) -> Result<Decision> {
        match self.policy.answer(discrepancy) {
            Some(decision) => Ok(decision),
            None => self.fallback.decide(discrepancy),
        }
    }
}
