//! Sync summary reporting

use std::fmt::Write;

use super::SyncSummary;

/// Sync operation reporter
pub struct SyncReporter;

impl SyncReporter {
    /// Generate the end-of-run summary
    #[must_use]
    pub fn generate_summary(summary: &SyncSummary) -> String {
        let mut output = String::new();

        output.push_str("Synchronization complete.\n");
        let _ = writeln!(
            output,
            "Transferred {} KB and {} files from the first directory to the second",
            summary.dir1_to_dir2.kilobytes(),
            summary.dir1_to_dir2.files
        );
        let _ = writeln!(
            output,
            "Transferred {} KB and {} files from the second directory to the first",
            summary.dir2_to_dir1.kilobytes(),
            summary.dir2_to_dir1.files
        );

        if summary.deleted > 0 {
            let _ = writeln!(output, "Deleted:    {}", summary.deleted);
        }
        if summary.declined > 0 {
            let _ = writeln!(output, "Declined:   {}", summary.declined);
        }
        if summary.unresolved > 0 {
            let _ = writeln!(
                output,
                "Unresolved: {} (left unchanged on both sides)",
                summary.unresolved
            );
        }

        if !summary.is_success() {
            let _ = writeln!(output, "\nErrors ({}):", summary.errors.len());
            for error in &summary.errors {
                let _ = writeln!(output, "  - {error}");
            }
        }

        output
    }
}
