use std::fs::{self, File};
use std::path::Path;
use std::time::{Duration, SystemTime};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn treesync() -> Command {
    let mut cmd = Command::cargo_bin("treesync").unwrap();
    cmd.env_remove("RUST_LOG");
    cmd
}

fn setup_test_dirs() -> (TempDir, TempDir) {
    (TempDir::new().unwrap(), TempDir::new().unwrap())
}

fn create_test_file(dir: &Path, rel_path: &str, content: &str) {
    let path = dir.join(rel_path);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

fn set_mtime(path: &Path, secs: u64) {
    File::options()
        .write(true)
        .open(path)
        .unwrap()
        .set_modified(SystemTime::UNIX_EPOCH + Duration::from_secs(secs))
        .unwrap();
}

#[test]
fn test_help_output() {
    treesync()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Interactive bidirectional directory synchronization",
        ))
        .stdout(predicate::str::contains("--dry-run"))
        .stdout(predicate::str::contains("--on-missing"));
}

#[test]
fn test_version_output() {
    treesync()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("0.1.0"));
}

#[test]
fn test_wrong_argument_count() {
    treesync()
        .arg("only-one")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));

    treesync()
        .args(["a", "b", "c"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_invalid_policy_value() {
    treesync()
        .args(["a", "b", "--on-missing", "merge"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value 'merge'"));
}

#[test]
fn test_yes_all_sync() {
    let (dir1, dir2) = setup_test_dirs();
    create_test_file(dir1.path(), "x.txt", "0123456789");
    create_test_file(dir2.path(), "docs/readme.md", "read me");

    treesync()
        .arg("--no-config")
        .arg("--yes-all")
        .arg(dir1.path())
        .arg(dir2.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Synchronization complete."))
        .stdout(predicate::str::contains(
            "Transferred 0 KB and 1 files from the first directory to the second",
        ))
        .stdout(predicate::str::contains(
            "Transferred 0 KB and 1 files from the second directory to the first",
        ));

    assert_eq!(fs::read_to_string(dir2.path().join("x.txt")).unwrap(), "0123456789");
    assert_eq!(
        fs::read_to_string(dir1.path().join("docs/readme.md")).unwrap(),
        "read me"
    );
}

#[test]
fn test_answers_from_piped_stdin() {
    let (dir1, dir2) = setup_test_dirs();
    create_test_file(dir1.path(), "copy_me.txt", "copy");
    create_test_file(dir1.path(), "erase_me.txt", "erase");
    create_test_file(dir1.path(), "shared.txt", "newer content");
    create_test_file(dir2.path(), "shared.txt", "old");
    set_mtime(&dir1.path().join("shared.txt"), 2_000_000);
    set_mtime(&dir2.path().join("shared.txt"), 1_000_000);

    // Sorted order: copy_me.txt, erase_me.txt, shared.txt
    treesync()
        .arg("--no-config")
        .arg(dir1.path())
        .arg(dir2.path())
        .write_stdin("c\ne\ny\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("[c/e/s/a/n/q]"))
        .stdout(predicate::str::contains("[y/n/a/r/d/q]"))
        .stdout(predicate::str::contains(
            "Transferred 0 KB and 2 files from the first directory to the second",
        ));

    assert!(dir2.path().join("copy_me.txt").exists());
    assert!(!dir1.path().join("erase_me.txt").exists());
    assert!(!dir2.path().join("erase_me.txt").exists());
    assert_eq!(
        fs::read_to_string(dir2.path().join("shared.txt")).unwrap(),
        "newer content"
    );
}

#[test]
fn test_quit_cancels_cleanly() {
    let (dir1, dir2) = setup_test_dirs();
    create_test_file(dir1.path(), "a.txt", "a");
    create_test_file(dir1.path(), "b.txt", "b");

    treesync()
        .arg("--no-config")
        .arg(dir1.path())
        .arg(dir2.path())
        .write_stdin("c q")
        .assert()
        .success()
        .stderr(predicate::str::contains("Sync cancelled by user."));

    assert!(dir2.path().join("a.txt").exists());
    assert!(!dir2.path().join("b.txt").exists());
}

#[test]
fn test_closed_input_fails() {
    let (dir1, dir2) = setup_test_dirs();
    create_test_file(dir1.path(), "a.txt", "a");

    treesync()
        .arg("--no-config")
        .arg(dir1.path())
        .arg(dir2.path())
        .write_stdin("")
        .assert()
        .failure()
        .stderr(predicate::str::contains("input closed"));
}

#[test]
fn test_dry_run_leaves_trees_untouched() {
    let (dir1, dir2) = setup_test_dirs();
    create_test_file(dir1.path(), "x.txt", "0123456789");

    treesync()
        .arg("--no-config")
        .arg("--dry-run")
        .arg("--yes-all")
        .arg(dir1.path())
        .arg(dir2.path())
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Transferred 0 KB and 1 files from the first directory to the second",
        ));

    assert!(!dir2.path().join("x.txt").exists());
}

#[test]
fn test_config_file_policy() {
    let (dir1, dir2) = setup_test_dirs();
    let config_dir = TempDir::new().unwrap();
    let config = config_dir.path().join("treesync.toml");
    fs::write(&config, "ignore = [\"*.log\"]\non_missing = \"copy\"\non_outdated = \"reject\"\n")
        .unwrap();
    create_test_file(dir1.path(), "keep.txt", "keep");
    create_test_file(dir1.path(), "debug.log", "noise");

    treesync()
        .arg("--config")
        .arg(&config)
        .arg(dir1.path())
        .arg(dir2.path())
        .assert()
        .success();

    assert!(dir2.path().join("keep.txt").exists());
    assert!(!dir2.path().join("debug.log").exists());
}

#[test]
fn test_missing_config_file_fails() {
    let (dir1, dir2) = setup_test_dirs();

    treesync()
        .arg("--config")
        .arg(dir1.path().join("absent.toml"))
        .arg(dir1.path())
        .arg(dir2.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load configuration"));
}

#[test]
fn test_overlapping_directories_are_refused() {
    let (dir1, _dir2) = setup_test_dirs();
    fs::create_dir(dir1.path().join("inner")).unwrap();

    treesync()
        .arg("--no-config")
        .arg("--yes-all")
        .arg(dir1.path())
        .arg(dir1.path().join("inner"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("directories overlap"));
}
