//! Byte-exact file comparison

use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;

use anyhow::Context;
use tracing::warn;

use crate::error::Result;

/// Block size used for lockstep reads
const BLOCK_SIZE: usize = 4096;

/// Compares two regular files byte for byte
pub struct ContentComparator;

impl ContentComparator {
    /// Whether both files hold exactly the same bytes.
    ///
    /// Fails closed: if either file cannot be opened or read the files are
    /// reported as different and a warning is logged. Both paths must name
    /// regular files.
    #[must_use]
    pub fn same_content(a: &Path, b: &Path) -> bool {
        match Self::compare(a, b) {
            Ok(same) => same,
            Err(e) => {
                warn!("Cannot compare {} and {}: {e:#}", a.display(), b.display());
                false
            }
        }
    }

    /// Compare two files block by block
    ///
    /// # Errors
    ///
    /// Returns an error if either file cannot be opened or read.
    pub fn compare(a: &Path, b: &Path) -> Result<bool> {
        let mut file_a =
            File::open(a).with_context(|| format!("Failed to open file: {}", a.display()))?;
        let mut file_b =
            File::open(b).with_context(|| format!("Failed to open file: {}", b.display()))?;

        let mut buf_a = [0u8; BLOCK_SIZE];
        let mut buf_b = [0u8; BLOCK_SIZE];

        loop {
            let len_a = read_block(&mut file_a, &mut buf_a)
                .with_context(|| format!("Failed to read file: {}", a.display()))?;
            let len_b = read_block(&mut file_b, &mut buf_b)
                .with_context(|| format!("Failed to read file: {}", b.display()))?;

            if len_a != len_b || buf_a[..len_a] != buf_b[..len_b] {
                return Ok(false);
            }

            // Both hit end-of-file on the same block
            if len_a == 0 {
                return Ok(true);
            }
        }
    }
}

/// Fill `buf` as far as the reader allows, stopping early only at EOF.
fn read_block(reader: &mut impl Read, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
