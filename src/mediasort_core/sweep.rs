use crate::mediasort_core::error::Result;
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

/// Exact junk filenames, compared case-insensitively. OS and viewer
/// artifacts, never user content.
pub const JUNK_FILENAMES: &[&str] = &[
    ".ds_store",
    "desktop.ini",
    "thumbs.db",
    "._thumbs",
    ".nomedia",
    ".picasa",
    ".picasaoriginals",
];

/// Check whether a file matches a junk rule. Junk is deleted outright,
/// never routed to the output.
pub fn is_junk(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    let lower = name.to_lowercase();

    JUNK_FILENAMES.contains(&lower.as_str())
        || lower.starts_with("thumbs.db")
        || lower.ends_with(".thm")
}

/// Remove empty directories under `root`, leaves first, repeating until no
/// empty directory remains. Removing a child can empty its parent, hence the
/// fixed-point loop. The root itself is never removed.
pub fn remove_empty_dirs(root: &Path) -> Result<usize> {
    let mut removed_total = 0;

    loop {
        let mut removed = 0;

        for entry in WalkDir::new(root)
            .contents_first(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            if !entry.file_type().is_dir() || entry.path() == root {
                continue;
            }
            if dir_is_empty(entry.path()) && fs::remove_dir(entry.path()).is_ok() {
                log::debug!("Removed empty directory {}", entry.path().display());
                removed += 1;
            }
        }

        if removed == 0 {
            break;
        }
        removed_total += removed;
    }

    Ok(removed_total)
}

fn dir_is_empty(path: &Path) -> bool {
    fs::read_dir(path)
        .map(|mut entries| entries.next().is_none())
        .unwrap_or(false)
}
