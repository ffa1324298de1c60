use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// A throwaway workspace with a `.git` marker so the tab list and relative
/// paths are rooted there.
fn workspace() -> TempDir {
    let temp = tempfile::tempdir().expect("temp workspace");
    fs::create_dir_all(temp.path().join(".git")).expect("git marker");
    temp
}

fn ctxcopy(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("ctxcopy").expect("binary exists");
    cmd.current_dir(dir);
    cmd
}

#[test]
fn copy_prints_labeled_blocks_in_tab_order() {
    let ws = workspace();
    fs::write(ws.path().join("a.txt"), "alpha").unwrap();
    fs::create_dir_all(ws.path().join("sub")).unwrap();
    fs::write(ws.path().join("sub/b.txt"), "beta").unwrap();

    ctxcopy(ws.path())
        .args(["tab", "open", "a.txt", "sub/b.txt"])
        .assert()
        .success();

    ctxcopy(ws.path())
        .args(["copy", "--all", "--print"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "// File 1: /a.txt\n\nalpha\n\n---\n\n// File 2: /sub/b.txt\n\nbeta",
        ));
}

#[test]
fn copy_of_explicit_paths_skips_the_tab_list() {
    let ws = workspace();
    fs::write(ws.path().join("a.txt"), "alpha").unwrap();
    fs::create_dir_all(ws.path().join("sub")).unwrap();
    fs::write(ws.path().join("sub/b.txt"), "beta").unwrap();

    ctxcopy(ws.path())
        .args(["copy", "a.txt", "sub/b.txt", "--print"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "// File 1: /a.txt\n\nalpha\n\n---\n\n// File 2: /sub/b.txt\n\nbeta",
        ));
}

#[test]
fn copy_without_any_tab_cannot_identify_one() {
    let ws = workspace();

    ctxcopy(ws.path())
        .arg("copy")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Could not identify the selected tab.",
        ));

    ctxcopy(ws.path())
        .args(["aggregate", "--active"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Could not identify the selected tab.",
        ));
}

#[test]
fn copy_rejects_mixing_paths_with_tab_selection() {
    let ws = workspace();
    fs::write(ws.path().join("a.txt"), "alpha").unwrap();

    ctxcopy(ws.path())
        .args(["copy", "a.txt", "--tab", "other"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn copy_of_scratch_buffer_uses_its_base_name() {
    let ws = workspace();

    ctxcopy(ws.path())
        .args(["tab", "scratch", "scratch.txt", "--content", "hello"])
        .assert()
        .success();

    ctxcopy(ws.path())
        .args(["copy", "--print"])
        .assert()
        .success()
        .stdout(predicate::str::contains("// File 1: /scratch.txt\n\nhello"));
}

#[test]
fn copying_a_non_text_tab_warns() {
    let ws = workspace();

    ctxcopy(ws.path())
        .args(["tab", "placeholder", "image preview"])
        .assert()
        .success();

    ctxcopy(ws.path())
        .arg("copy")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "The selected tab is not a text file.",
        ));
}

#[test]
fn aggregate_writes_scratch_file_with_header() {
    let ws = workspace();
    fs::write(ws.path().join("a.txt"), "alpha").unwrap();
    let scratch_dir = ws.path().join("scratch");

    ctxcopy(ws.path())
        .args(["tab", "open", "a.txt"])
        .assert()
        .success();

    ctxcopy(ws.path())
        .arg("aggregate")
        .env("CTXCOPY_SCRATCH_DIR", &scratch_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Aggregated 1 file(s) into"));

    let entries: Vec<_> = fs::read_dir(&scratch_dir).unwrap().flatten().collect();
    assert_eq!(entries.len(), 1);
    let content = fs::read_to_string(entries[0].path()).unwrap();
    assert_eq!(
        content,
        "// Aggregated file contents:\n\n// a.txt\n\nalpha\n\n"
    );
}

#[test]
fn empty_batches_report_and_exit_cleanly() {
    let ws = workspace();

    ctxcopy(ws.path())
        .args(["copy", "--all", "--print"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No files to copy."));

    ctxcopy(ws.path())
        .args(["aggregate", "--print"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "No text files found to aggregate.",
        ));
}

#[test]
fn skipped_files_are_announced_when_enabled() {
    let ws = workspace();
    fs::write(ws.path().join("a.txt"), "alpha").unwrap();

    ctxcopy(ws.path())
        .args(["tab", "open", "a.txt", "missing.txt"])
        .assert()
        .success();

    ctxcopy(ws.path())
        .args(["copy", "--all", "--print"])
        .env("CTXCOPY_ANNOUNCE_FAILURES", "1")
        .assert()
        .success()
        .stdout(predicate::str::contains("// File 1: /a.txt"))
        .stderr(predicate::str::contains("Skipped file:missing.txt"));
}
