//! Interactive prompting for sync decisions

use std::io::{self, IsTerminal, Read, Write};

use anyhow::{Context, Result};
use dialoguer::console::Term;
use treesync_core::comparison::DiffGenerator;
use treesync_core::decision::{Decision, DecisionProvider, Discrepancy};
use treesync_core::error::SyncError;

/// Session state tracking for "all" choices
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionDecision {
    /// Ask for each discrepancy
    AskEach,
    /// Accept all remaining
    ApproveAll,
    /// Decline all remaining
    SkipAll,
}

/// Where answer keys come from
enum KeySource {
    /// One keypress at a time from the controlling terminal
    Terminal(Term),
    /// First non-whitespace byte of each answer from a stream
    Stream(Box<dyn Read>),
}

/// Asks the operator about each discrepancy on stdout
pub struct ConsolePrompter {
    keys: KeySource,
    missing: SessionDecision,
    outdated: SessionDecision,
}

impl ConsolePrompter {
    /// Prompter reading keypresses when stdin is a terminal, bytes otherwise
    #[must_use]
    pub fn from_stdin() -> Self {
        if io::stdin().is_terminal() {
            Self::with_keys(KeySource::Terminal(Term::stderr()))
        } else {
            Self::with_input(Box::new(io::stdin()))
        }
    }

    /// Prompter reading answers from `input`
    #[must_use]
    pub fn with_input(input: Box<dyn Read>) -> Self {
        Self::with_keys(KeySource::Stream(input))
    }

    const fn with_keys(keys: KeySource) -> Self {
        Self {
            keys,
            missing: SessionDecision::AskEach,
            outdated: SessionDecision::AskEach,
        }
    }

    fn prompt_missing(&mut self, discrepancy: &Discrepancy) -> Result<Decision> {
        match self.missing {
            SessionDecision::ApproveAll => return Ok(Decision::Copy),
            SessionDecision::SkipAll => return Ok(Decision::Skip),
            SessionDecision::AskEach => {}
        }

        println!("\n{}", describe(discrepancy));

        loop {
            print!("Copy, erase or skip? [c/e/s/a/n/q] (copy/erase/skip/copy-all/skip-all/quit): ");
            io::stdout().flush().context("Failed to flush stdout")?;

            match self.next_key()?.to_ascii_lowercase() {
                'c' => return Ok(Decision::Copy),
                'e' => return Ok(Decision::Delete),
                's' => return Ok(Decision::Skip),
                'a' => {
                    self.missing = SessionDecision::ApproveAll;
                    return Ok(Decision::Copy);
                }
                'n' => {
                    self.missing = SessionDecision::SkipAll;
                    return Ok(Decision::Skip);
                }
                'q' => return Err(SyncError::Aborted.into()),
                _ => println!("Invalid key. Press c/e/s/a/n/q"),
            }
        }
    }

    fn prompt_outdated(&mut self, discrepancy: &Discrepancy) -> Result<Decision> {
        match self.outdated {
            SessionDecision::ApproveAll => return Ok(Decision::Update),
            SessionDecision::SkipAll => return Ok(Decision::Reject),
            SessionDecision::AskEach => {}
        }

        println!("\n{}", describe(discrepancy));

        loop {
            print!("Update? [y/n/a/r/d/q] (yes/no/all/reject-all/diff/quit): ");
            io::stdout().flush().context("Failed to flush stdout")?;

            match self.next_key()?.to_ascii_lowercase() {
                'y' => return Ok(Decision::Update),
                'n' => return Ok(Decision::Reject),
                'a' => {
                    self.outdated = SessionDecision::ApproveAll;
                    return Ok(Decision::Update);
                }
                'r' => {
                    self.outdated = SessionDecision::SkipAll;
                    return Ok(Decision::Reject);
                }
                'd' => show_diff(discrepancy),
                'q' => return Err(SyncError::Aborted.into()),
                _ => println!("Invalid key. Press y/n/a/r/d/q"),
            }
        }
    }

    /// Read one answer key and echo it
    fn next_key(&mut self) -> Result<char> {
        let key = match &mut self.keys {
            KeySource::Terminal(term) => loop {
                let key = term.read_char().context("Failed to read user input")?;
                if !key.is_whitespace() {
                    break key;
                }
            },
            KeySource::Stream(input) => read_answer_byte(input.as_mut())?,
        };

        println!("{key}");
        Ok(key)
    }
}

impl DecisionProvider for ConsolePrompter {
    fn decide(&mut self, discrepancy: &Discrepancy) -> Result<Decision> {
        match discrepancy {
            Discrepancy::Missing { .. } => self.prompt_missing(discrepancy),
            Discrepancy::Outdated { .. } => self.prompt_outdated(discrepancy),
        }
    }
}

/// Skip whitespace and return the next byte as a character
fn read_answer_byte(input: &mut dyn Read) -> Result<char> {
    let mut byte = [0u8; 1];
    loop {
        match input.read(&mut byte) {
            Ok(0) => return Err(SyncError::InputClosed.into()),
            Ok(_) if byte[0].is_ascii_whitespace() => {}
            Ok(_) => return Ok(char::from(byte[0])),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e).context("Failed to read user input"),
        }
    }
}

/// Describe the discrepancy in user-friendly terms
fn describe(discrepancy: &Discrepancy) -> String {
    match discrepancy {
        Discrepancy::Missing {
            relative,
            source_dir,
            target_dir,
            is_dir,
            ..
        } => {
            let kind = if *is_dir { "Directory" } else { "File" };
            format!(
                "{kind} {} is in {} but not in {}",
                relative.display(),
                source_dir.display(),
                target_dir.display()
            )
        }
        Discrepancy::Outdated { newer, older, .. } => format!(
            "{} is newer than {}\n  Update the older copy?",
            newer.display(),
            older.display()
        ),
    }
}

fn show_diff(discrepancy: &Discrepancy) {
    let Discrepancy::Outdated { newer, older, .. } = discrepancy else {
        return;
    };

    match DiffGenerator::generate(newer, older) {
        Ok(diff) => println!("\n{diff}"),
        Err(e) => {
            eprintln!("\nWarning: Failed to generate diff: {e:#}");
            eprintln!("Newer: {}", newer.display());
            eprintln!("Older: {}", older.display());
        }
    }
}
