// E2E tests for the mediasort CLI
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;

mod common;
use common::{assert_no_empty_dirs, collect_files, find_file};

#[test]
fn test_missing_source_dir_fails() {
    let temp_dir = assert_fs::TempDir::new().unwrap();

    let mut cmd = Command::cargo_bin("mediasort").unwrap();
    cmd.arg(temp_dir.path().join("does_not_exist"))
        .arg(temp_dir.path().join("sorted"))
        .assert()
        .failure();
}

#[test]
fn test_full_sort() {
    let temp_dir = assert_fs::TempDir::new().unwrap();
    let source = temp_dir.path().join("source");
    let dest = temp_dir.path().join("sorted");

    fs::create_dir_all(source.join("camera_roll/old")).unwrap();
    fs::write(source.join("camera_roll/.DS_Store"), b"junk").unwrap();
    fs::write(source.join("camera_roll/desktop.ini"), b"junk").unwrap();
    fs::write(source.join("camera_roll/notes.txt"), b"not media").unwrap();
    fs::write(
        source.join("camera_roll/old/IMG_20230615_120000.jpg"),
        b"fake jpeg bytes",
    )
    .unwrap();

    let mut cmd = Command::cargo_bin("mediasort").unwrap();
    cmd.arg(&source)
        .arg(&dest)
        .assert()
        .success()
        .stdout(predicate::str::contains("Sorting complete!"));

    // The dated media file lands under Unknown with the embedded date.
    assert!(
        dest.join("Unknown/2023/06/15/IMG_20230615_120000.jpg")
            .exists()
    );

    // Non-media files go flat into the output root.
    assert!(dest.join("notes.txt").exists());

    // Junk is deleted, never routed anywhere.
    assert!(find_file(&source, ".DS_Store").is_none());
    assert!(find_file(&dest, ".DS_Store").is_none());
    assert!(find_file(&dest, "desktop.ini").is_none());

    // No empty directory survives under the source tree.
    assert_no_empty_dirs(&source);
}

#[test]
fn test_mtime_fallback_keeps_file() {
    let temp_dir = assert_fs::TempDir::new().unwrap();
    let source = temp_dir.path().join("source");
    let dest = temp_dir.path().join("sorted");

    fs::create_dir_all(&source).unwrap();
    // No embedded metadata and no date in the name: mtime decides.
    fs::write(source.join("holiday.jpg"), b"fake jpeg bytes").unwrap();

    let mut cmd = Command::cargo_bin("mediasort").unwrap();
    cmd.arg(&source).arg(&dest).assert().success();

    let placed = find_file(&dest, "holiday.jpg").expect("file must not be dropped");
    assert!(placed.starts_with(dest.join("Unknown")));
}

#[test]
fn test_identical_duplicates_both_kept() {
    let temp_dir = assert_fs::TempDir::new().unwrap();
    let source = temp_dir.path().join("source");
    let dest = temp_dir.path().join("sorted");

    fs::create_dir_all(source.join("a")).unwrap();
    fs::create_dir_all(source.join("b")).unwrap();
    fs::write(source.join("a/beach_2023-06-15.jpg"), b"same content").unwrap();
    fs::write(source.join("b/beach_2023-06-15.jpg"), b"same content").unwrap();

    let mut cmd = Command::cargo_bin("mediasort").unwrap();
    cmd.arg(&source).arg(&dest).assert().success();

    let day_dir = dest.join("Unknown/2023/06/15");
    assert!(day_dir.join("beach_2023-06-15.jpg").exists());
    assert!(day_dir.join("beach_2023-06-15_DUP_1.jpg").exists());
}

#[test]
fn test_three_way_name_collision() {
    let temp_dir = assert_fs::TempDir::new().unwrap();
    let source = temp_dir.path().join("source");
    let dest = temp_dir.path().join("sorted");

    for (dir, content) in [("a", "first"), ("b", "second"), ("c", "third")] {
        fs::create_dir_all(source.join(dir)).unwrap();
        fs::write(source.join(dir).join("shot_2023-06-15.jpg"), content).unwrap();
    }

    let mut cmd = Command::cargo_bin("mediasort").unwrap();
    cmd.arg(&source).arg(&dest).assert().success();

    let day_dir = dest.join("Unknown/2023/06/15");
    assert!(day_dir.join("shot_2023-06-15.jpg").exists());
    assert!(day_dir.join("shot_2023-06-15_DUP_1.jpg").exists());
    assert!(day_dir.join("shot_2023-06-15_DUP_2.jpg").exists());
    // No gaps, no extra generations.
    assert!(!day_dir.join("shot_2023-06-15_DUP_3.jpg").exists());
}

#[test]
fn test_rerun_on_sorted_tree_is_noop() {
    let temp_dir = assert_fs::TempDir::new().unwrap();
    let source = temp_dir.path().join("source");
    let dest = temp_dir.path().join("sorted");

    fs::create_dir_all(source.join("a")).unwrap();
    fs::create_dir_all(source.join("b")).unwrap();
    fs::write(source.join("a/beach_2023-06-15.jpg"), b"same content").unwrap();
    fs::write(source.join("b/beach_2023-06-15.jpg"), b"same content").unwrap();
    fs::write(source.join("a/notes.txt"), b"not media").unwrap();

    let mut cmd = Command::cargo_bin("mediasort").unwrap();
    cmd.arg(&source).arg(&dest).assert().success();

    let before = collect_files(&dest);

    // Sorting the sorted tree into itself must change nothing.
    let mut rerun = Command::cargo_bin("mediasort").unwrap();
    rerun
        .arg(&dest)
        .arg(&dest)
        .assert()
        .success()
        .stdout(predicate::str::contains("0 media files moved"));

    let after = collect_files(&dest);
    assert_eq!(before, after);
}

#[test]
fn test_category_routing() {
    let temp_dir = assert_fs::TempDir::new().unwrap();
    let source = temp_dir.path().join("source");
    let dest = temp_dir.path().join("sorted");

    fs::create_dir_all(source.join("WhatsApp Images")).unwrap();
    fs::write(
        source.join("WhatsApp Images/photo_2023-06-15.jpg"),
        b"fake jpeg bytes",
    )
    .unwrap();

    let mut cmd = Command::cargo_bin("mediasort").unwrap();
    cmd.arg(&source).arg(&dest).assert().success();

    assert!(
        dest.join("Unknown/whatsapp/2023/06/15/photo_2023-06-15.jpg")
            .exists()
    );
}

#[test]
fn test_dry_run_touches_nothing() {
    let temp_dir = assert_fs::TempDir::new().unwrap();
    let source = temp_dir.path().join("source");
    let dest = temp_dir.path().join("sorted");

    fs::create_dir_all(source.join("nested")).unwrap();
    fs::write(source.join("nested/.DS_Store"), b"junk").unwrap();
    fs::write(source.join("nested/pic_2023-06-15.jpg"), b"fake jpeg bytes").unwrap();
    fs::write(source.join("nested/notes.txt"), b"not media").unwrap();

    let before = collect_files(&source);

    let mut cmd = Command::cargo_bin("mediasort").unwrap();
    cmd.arg(&source)
        .arg(&dest)
        .arg("--dry-run")
        .assert()
        .success()
        .stdout(predicate::str::contains("Dry run complete!"));

    assert_eq!(before, collect_files(&source));
    assert!(collect_files(&dest).is_empty());
}

#[test]
fn test_report_lists_moves() {
    let temp_dir = assert_fs::TempDir::new().unwrap();
    let source = temp_dir.path().join("source");
    let dest = temp_dir.path().join("sorted");
    let report = temp_dir.path().join("report.csv");

    fs::create_dir_all(&source).unwrap();
    fs::write(source.join("one_2023-06-15.jpg"), b"one").unwrap();
    fs::write(source.join("two_2023-06-16.jpg"), b"two").unwrap();

    let mut cmd = Command::cargo_bin("mediasort").unwrap();
    cmd.arg(&source)
        .arg(&dest)
        .arg("--report")
        .arg(&report)
        .assert()
        .success();

    let contents = fs::read_to_string(&report).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(
        lines[0],
        "Source,Destination,Folder,Category,Date,Hash,Duplicate,TimestampFixed"
    );
    // One row per performed move.
    assert_eq!(lines.len(), 3);
    assert!(lines[1].contains("Unknown"));
}
