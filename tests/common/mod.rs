use std::fs;
use std::path::{Path, PathBuf};

/// Recursively collect all regular files under `root`, sorted for stable
/// comparisons.
pub fn collect_files(root: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    collect_into(root, &mut files);
    files.sort();
    files
}

fn collect_into(dir: &Path, files: &mut Vec<PathBuf>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_into(&path, files);
        } else if path.is_file() {
            files.push(path);
        }
    }
}

/// Assert that no directory under `root` is empty.
pub fn assert_no_empty_dirs(root: &Path) {
    let Ok(entries) = fs::read_dir(root) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            let count = fs::read_dir(&path).unwrap().count();
            assert!(count > 0, "empty directory left behind: {}", path.display());
            assert_no_empty_dirs(&path);
        }
    }
}

/// Find a file by name anywhere under `root`.
pub fn find_file(root: &Path, name: &str) -> Option<PathBuf> {
    collect_files(root)
        .into_iter()
        .find(|p| p.file_name().is_some_and(|n| n == name))
}
