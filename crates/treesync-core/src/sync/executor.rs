//! Filesystem mutations: copying files and trees, removing them
//!
//! Failures here never abort a run. Each one is logged, pushed onto the
//! caller's error list, and the operation carries on with what it can.

use std::ffi::OsString;
use std::fs::{self, File, Permissions};
use std::io;
use std::path::Path;

use anyhow::Context;
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use super::DirectoryStats;
use crate::error::Result;

/// Executes copies and removals, or only reports them in dry-run mode
#[derive(Debug, Clone, Copy, Default)]
pub struct TreeMutator {
    dry_run: bool,
}

impl TreeMutator {
    /// Create a new mutator
    #[must_use]
    pub const fn new(dry_run: bool) -> Self {
        Self { dry_run }
    }

    /// Copy `source` into `dest_dir` under its own file name
    ///
    /// The destination ends up with the source's permission bits. Content is
    /// staged in a temporary file inside `dest_dir` and renamed into place, so
    /// a failed copy leaves any previous destination file untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot be read, the destination cannot
    /// be written, or permissions cannot be applied.
    pub fn copy_file(&self, source: &Path, dest_dir: &Path) -> Result<()> {
        let name = source
            .file_name()
            .with_context(|| format!("No file name in path: {}", source.display()))?;
        let dest = dest_dir.join(name);

        if self.dry_run {
            info!("[dry run] Would copy {} -> {}", source.display(), dest.display());
            return Ok(());
        }

        let mut reader = File::open(source)
            .with_context(|| format!("Failed to open source file: {}", source.display()))?;
        let metadata = reader
            .metadata()
            .with_context(|| format!("Failed to read metadata for: {}", source.display()))?;

        let mut staged = NamedTempFile::new_in(dest_dir)
            .with_context(|| format!("Failed to create file in: {}", dest_dir.display()))?;
        io::copy(&mut reader, staged.as_file_mut()).with_context(|| {
            format!("Failed to copy {} to {}", source.display(), dest.display())
        })?;
        staged
            .as_file()
            .set_permissions(permission_bits(&metadata))
            .with_context(|| format!("Failed to set permissions on: {}", dest.display()))?;
        staged
            .persist(&dest)
            .map_err(|e| e.error)
            .with_context(|| format!("Failed to write destination file: {}", dest.display()))?;

        debug!("Copied {} -> {}", source.display(), dest.display());
        Ok(())
    }

    /// Copy a directory tree, creating `dest` if needed
    ///
    /// Returns how many files and bytes were copied. A source that cannot be
    /// opened yields zeroed stats. Files that fail to copy are reported in
    /// `errors` and not counted.
    pub fn copy_tree(&self, source: &Path, dest: &Path, errors: &mut Vec<String>) -> DirectoryStats {
        let mut stats = DirectoryStats::default();

        let names = match sorted_entry_names(source) {
            Ok(names) => names,
            Err(e) => {
                record(errors, format!("{e:#}"));
                return stats;
            }
        };

        if self.dry_run {
            debug!("[dry run] Would create directory {}", dest.display());
        } else if let Err(e) = create_dir(dest) {
            record(errors, format!("Failed to create directory {}: {e}", dest.display()));
            return stats;
        }

        for name in names {
            let src_path = source.join(&name);
            let metadata = match fs::metadata(&src_path) {
                Ok(metadata) => metadata,
                Err(e) => {
                    record(errors, format!("Failed to read metadata for {}: {e}", src_path.display()));
                    continue;
                }
            };

            if metadata.is_dir() {
                if is_dir_symlink(&src_path) {
                    warn!("Not following directory symlink {}", src_path.display());
                    continue;
                }
                stats += self.copy_tree(&src_path, &dest.join(&name), errors);
            } else {
                match self.copy_file(&src_path, dest) {
                    Ok(()) => stats += DirectoryStats::single_file(metadata.len()),
                    Err(e) => record(errors, format!("{e:#}")),
                }
            }
        }

        stats
    }

    /// Remove a directory tree: files first, then subdirectories, then `path`
    ///
    /// A `path` that is a symlink is removed as a link; its target is left
    /// alone. Returns whether everything was removed.
    pub fn remove_tree(&self, path: &Path, errors: &mut Vec<String>) -> bool {
        if let Err(e) = fs::read_dir(path) {
            record(errors, format!("Failed to open directory for removal {}: {e}", path.display()));
            return false;
        }

        if self.dry_run {
            info!("[dry run] Would remove directory {}", path.display());
            return true;
        }

        let mut complete = true;
        for entry in WalkDir::new(path)
            .follow_root_links(false)
            .contents_first(true) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    record(errors, format!("Failed to walk {}: {e}", path.display()));
                    complete = false;
                    continue;
                }
            };

            let removed = if entry.file_type().is_dir() {
                fs::remove_dir(entry.path())
            } else {
                fs::remove_file(entry.path())
            };
            if let Err(e) = removed {
                record(errors, format!("Failed to remove {}: {e}", entry.path().display()));
                complete = false;
            }
        }

        if complete {
            info!("Removed directory {}", path.display());
        }
        complete
    }

    /// Remove a single file
    ///
    /// Returns whether the file was removed.
    pub fn remove_file(&self, path: &Path, errors: &mut Vec<String>) -> bool {
        if self.dry_run {
            info!("[dry run] Would remove {}", path.display());
            return true;
        }

        match fs::remove_file(path) {
            Ok(()) => {
                info!("Removed {}", path.display());
                true
            }
            Err(e) => {
                record(errors, format!("Failed to remove {}: {e}", path.display()));
                false
            }
        }
    }
}

/// List a directory's entry names, sorted so runs are deterministic
///
/// # Errors
///
/// Returns an error if the directory cannot be opened.
pub fn sorted_entry_names(dir: &Path) -> Result<Vec<OsString>> {
    let entries =
        fs::read_dir(dir).with_context(|| format!("Failed to open directory: {}", dir.display()))?;

    let mut names = Vec::new();
    for entry in entries {
        match entry {
            Ok(entry) => names.push(entry.file_name()),
            Err(e) => warn!("Failed to read entry in {}: {e}", dir.display()),
        }
    }
    names.sort();
    Ok(names)
}

/// Whether `path` itself is a symlink, dangling or not
#[must_use]
pub fn is_symlink(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok_and(|m| m.file_type().is_symlink())
}

/// Whether `path` is a symlink that resolves to a directory
#[must_use]
pub fn is_dir_symlink(path: &Path) -> bool {
    is_symlink(path) && path.is_dir()
}

fn record(errors: &mut Vec<String>, message: String) {
    warn!("{message}");
    errors.push(message);
}

fn create_dir(path: &Path) -> io::Result<()> {
    let mut builder = fs::DirBuilder::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o755);
    }

    match builder.create(path) {
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists && path.is_dir() => Ok(()),
        other => other,
    }
}

#[cfg(unix)]
fn permission_bits(metadata: &fs::Metadata) -> Permissions {
    use std::os::unix::fs::PermissionsExt;
    Permissions::from_mode(metadata.permissions().mode() & 0o777)
}

#[cfg(not(unix))]
fn permission_bits(metadata: &fs::Metadata) -> Permissions {
    metadata.permissions()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn build_tree(root: &Path) {
        fs::create_dir_all(root.join("sub/deeper")).unwrap();
        fs::write(root.join("root.txt"), "root").unwrap();
        fs::write(root.join("sub/nested.txt"), "nested!").unwrap();
        fs::write(root.join("sub/deeper/leaf.bin"), vec![9u8; 5000]).unwrap();
    }

    #[test]
    fn test_copy_file_into_directory() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("note.txt");
        let dest_dir = tmp.path().join("dest");
        fs::create_dir(&dest_dir).unwrap();
        fs::write(&src, "hello").unwrap();

        TreeMutator::new(false).copy_file(&src, &dest_dir).unwrap();

        assert_eq!(fs::read_to_string(dest_dir.join("note.txt")).unwrap(), "hello");
    }

    #[test]
    fn test_copy_file_replaces_existing() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("note.txt");
        let dest_dir = tmp.path().join("dest");
        fs::create_dir(&dest_dir).unwrap();
        fs::write(&src, "new").unwrap();
        fs::write(dest_dir.join("note.txt"), "old and longer").unwrap();

        TreeMutator::new(false).copy_file(&src, &dest_dir).unwrap();

        assert_eq!(fs::read_to_string(dest_dir.join("note.txt")).unwrap(), "new");
        // No staging files left behind
        assert_eq!(fs::read_dir(&dest_dir).unwrap().count(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_copy_file_preserves_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("script.sh");
        let dest_dir = tmp.path().join("dest");
        fs::create_dir(&dest_dir).unwrap();
        fs::write(&src, "#!/bin/sh\n").unwrap();
        fs::set_permissions(&src, Permissions::from_mode(0o751)).unwrap();

        TreeMutator::new(false).copy_file(&src, &dest_dir).unwrap();

        let mode = fs::metadata(dest_dir.join("script.sh")).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o751);
    }

    #[test]
    fn test_copy_file_missing_source() {
        let tmp = TempDir::new().unwrap();
        let result = TreeMutator::new(false).copy_file(&tmp.path().join("absent"), tmp.path());

        assert!(result.is_err());
    }

    #[test]
    fn test_copy_tree_stats_and_content() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("src");
        let dst = tmp.path().join("dst");
        build_tree(&src);

        let mut errors = Vec::new();
        let stats = TreeMutator::new(false).copy_tree(&src, &dst, &mut errors);

        assert!(errors.is_empty());
        assert_eq!(stats, DirectoryStats { file_count: 3, total_bytes: 4 + 7 + 5000 });
        assert_eq!(fs::read_to_string(dst.join("root.txt")).unwrap(), "root");
        assert_eq!(fs::read_to_string(dst.join("sub/nested.txt")).unwrap(), "nested!");
        assert_eq!(fs::read(dst.join("sub/deeper/leaf.bin")).unwrap(), vec![9u8; 5000]);
    }

    #[test]
    fn test_copy_tree_empty_directory() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("src");
        let dst = tmp.path().join("dst");
        fs::create_dir(&src).unwrap();

        let mut errors = Vec::new();
        let stats = TreeMutator::new(false).copy_tree(&src, &dst, &mut errors);

        assert_eq!(stats, DirectoryStats::default());
        assert!(dst.is_dir());
    }

    #[test]
    fn test_copy_tree_unreadable_source() {
        let tmp = TempDir::new().unwrap();
        let mut errors = Vec::new();

        let stats = TreeMutator::new(false).copy_tree(
            &tmp.path().join("absent"),
            &tmp.path().join("dst"),
            &mut errors,
        );

        assert_eq!(stats, DirectoryStats::default());
        assert_eq!(errors.len(), 1);
        assert!(!tmp.path().join("dst").exists());
    }

    #[test]
    fn test_copy_tree_dry_run_counts_without_writing() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("src");
        let dst = tmp.path().join("dst");
        build_tree(&src);

        let mut errors = Vec::new();
        let stats = TreeMutator::new(true).copy_tree(&src, &dst, &mut errors);

        assert_eq!(stats.file_count, 3);
        assert_eq!(stats.total_bytes, 5011);
        assert!(!dst.exists());
    }

    #[test]
    fn test_remove_tree() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("doomed");
        build_tree(&root);

        let mut errors = Vec::new();
        assert!(TreeMutator::new(false).remove_tree(&root, &mut errors));

        assert!(errors.is_empty());
        assert!(!root.exists());
    }

    #[test]
    fn test_remove_tree_missing_directory() {
        let tmp = TempDir::new().unwrap();
        let mut errors = Vec::new();

        assert!(!TreeMutator::new(false).remove_tree(&tmp.path().join("absent"), &mut errors));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_dry_run_removal_keeps_files() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("kept");
        build_tree(&root);
        let file = root.join("root.txt");

        let mutator = TreeMutator::new(true);
        let mut errors = Vec::new();
        assert!(mutator.remove_file(&file, &mut errors));
        assert!(mutator.remove_tree(&root, &mut errors));

        assert!(file.exists());
        assert!(root.join("sub/deeper/leaf.bin").exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_remove_tree_on_link_keeps_target() {
        let tmp = TempDir::new().unwrap();
        let target = tmp.path().join("target");
        build_tree(&target);
        let link = tmp.path().join("link");
        std::os::unix::fs::symlink(&target, &link).unwrap();

        let mut errors = Vec::new();
        assert!(TreeMutator::new(false).remove_tree(&link, &mut errors));

        assert!(errors.is_empty(), "{errors:?}");
        assert!(!is_symlink(&link));
        assert!(target.join("sub/deeper/leaf.bin").exists());
    }

    #[test]
    fn test_sorted_entry_names() {
        let tmp = TempDir::new().unwrap();
        for name in ["b.txt", "c.txt", "a.txt"] {
            fs::write(tmp.path().join(name), "").unwrap();
        }

        let names = sorted_entry_names(tmp.path()).unwrap();

        assert_eq!(names, vec![OsString::from("a.txt"), "b.txt".into(), "c.txt".into()]);
    }
}
