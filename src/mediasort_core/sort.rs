use crate::mediasort_core::collide::{Placement, resolve_collision};
use crate::mediasort_core::error::{MediasortError, Result};
use crate::mediasort_core::media::detect_media_type;
use crate::mediasort_core::metadata::{self, MediaMetadata};
use crate::mediasort_core::report::{CsvReport, FileFailure, MoveRecord, RunSummary};
use crate::mediasort_core::resolve::{FileFacts, resolve_destination};
use crate::mediasort_core::sweep::{is_junk, remove_empty_dirs};
use exiftool::ExifTool;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::{Path, PathBuf};
use time::OffsetDateTime;
use walkdir::WalkDir;

#[derive(Debug, Clone, Default)]
pub struct SortOptions {
    pub dry_run: bool,
    /// Leave date/time tags untouched on relocated files.
    pub keep_timestamps: bool,
    /// Write a CSV report of every performed move.
    pub report: Option<PathBuf>,
}

/// Sequential one-shot sorter: each file is fully processed before the next
/// begins, so the filesystem itself is the only coordination state.
pub struct Sorter {
    source: PathBuf,
    dest: PathBuf,
    options: SortOptions,
    exiftool: Option<ExifTool>,
    fix_timestamps: bool,
}

impl Sorter {
    /// Validate environment preconditions and construct the sorter.
    /// Fails before any file is touched.
    pub fn new(source: PathBuf, dest: PathBuf, options: SortOptions) -> Result<Self> {
        if !source.is_dir() {
            return Err(MediasortError::SourceDirectoryMissing(source));
        }

        fs::create_dir_all(&dest)
            .and_then(|_| {
                // Probe writability up front rather than failing on the first move.
                let probe = dest.join(".mediasort-probe");
                fs::write(&probe, b"")?;
                fs::remove_file(&probe)
            })
            .map_err(|e| MediasortError::OutputDirectoryUnwritable {
                path: dest.clone(),
                reason: e.to_string(),
            })?;

        let exiftool_present = metadata::exiftool_available();
        if !exiftool_present {
            log::warn!(
                "exiftool not found; falling back to filesystem metadata and skipping tag rewrites"
            );
        }
        let exiftool = if exiftool_present {
            ExifTool::new().ok()
        } else {
            None
        };

        let fix_timestamps = exiftool_present && !options.keep_timestamps;

        Ok(Sorter {
            source,
            dest,
            options,
            exiftool,
            fix_timestamps,
        })
    }

    /// Walk the source tree and process every file: junk is deleted, media
    /// runs through the metadata pipeline, everything else moves to the
    /// output root. Per-file errors are recorded and never abort the run.
    pub fn run(&mut self) -> Result<RunSummary> {
        let files: Vec<PathBuf> = WalkDir::new(&self.source)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .map(|e| e.into_path())
            .collect();

        let bar_style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")
            .unwrap();
        let bar = ProgressBar::new(files.len() as u64).with_style(bar_style);
        bar.set_message("Sorting files");

        let mut summary = RunSummary::default();
        let mut report = match &self.options.report {
            Some(path) if !self.options.dry_run => Some(CsvReport::create(path)?),
            _ => None,
        };

        for path in files {
            let outcome = if is_junk(&path) {
                self.delete_junk(&path, &mut summary)
            } else if detect_media_type(&path).is_some() {
                self.process_media(&path, &mut summary, report.as_mut())
            } else {
                self.process_leftover(&path, &mut summary)
            };

            if let Err(e) = outcome {
                log::error!("Skipping {}: {}", path.display(), e);
                summary.failures.push(FileFailure {
                    path,
                    reason: e.to_string(),
                });
            }
            bar.inc(1);
        }

        bar.finish_with_message("Sorting complete");

        if let Some(report) = report {
            report.finish()?;
        }

        if self.options.dry_run {
            log::info!("Dry run: skipping empty-directory sweep");
        } else {
            summary.empty_dirs_removed = remove_empty_dirs(&self.source)?;
        }

        Ok(summary)
    }

    fn delete_junk(&self, path: &Path, summary: &mut RunSummary) -> Result<()> {
        if self.options.dry_run {
            log::info!("Would delete junk file {}", path.display());
        } else {
            fs::remove_file(path)?;
            log::debug!("Deleted junk file {}", path.display());
        }
        summary.junk_deleted += 1;
        Ok(())
    }

    fn process_media(
        &mut self,
        path: &Path,
        summary: &mut RunSummary,
        report: Option<&mut CsvReport>,
    ) -> Result<()> {
        let meta = self.read_metadata(path, summary);

        let modified_at = fs::metadata(path)?
            .modified()
            .map(OffsetDateTime::from)?
            .to_offset(metadata::local_offset());
        let facts = FileFacts::gather(path, &self.source, modified_at);
        let destination = resolve_destination(meta.as_ref(), &facts);

        let dest_dir = self.dest.join(destination.relative_dir());
        if !self.options.dry_run {
            fs::create_dir_all(&dest_dir)?;
        }
        let candidate = dest_dir.join(&destination.filename);

        let (target, duplicate, content_hash) = match resolve_collision(path, &candidate)? {
            Placement::AlreadyPlaced => {
                log::debug!("{} already in place", path.display());
                summary.already_placed += 1;
                return Ok(());
            }
            Placement::Direct(target) => (target, false, None),
            Placement::Duplicate {
                path: target,
                identical,
                hash,
            } => {
                log::info!(
                    "Destination taken for {} (identical content: {}), keeping both",
                    path.display(),
                    identical
                );
                (target, true, Some(hash))
            }
        };

        if self.options.dry_run {
            log::info!("Would move {} -> {}", path.display(), target.display());
            summary.media_moved += 1;
            if duplicate {
                summary.duplicates += 1;
            }
            return Ok(());
        }

        move_file(path, &target)?;
        log::debug!("Moved {} -> {}", path.display(), target.display());

        let mut timestamp_fixed = false;
        if self.fix_timestamps {
            match metadata::write_timestamps(&target, destination.timestamp) {
                Ok(()) => timestamp_fixed = true,
                Err(e) => {
                    log::warn!("{}", e);
                    summary.metadata_write_failures += 1;
                }
            }
        }

        summary.media_moved += 1;
        if duplicate {
            summary.duplicates += 1;
        }

        if let Some(report) = report {
            let date = destination
                .timestamp
                .format(metadata::EXIF_DATE_FORMAT)
                .map_err(|e| MediasortError::InvalidDateFormat(e.to_string()))?;
            report.record(&MoveRecord {
                source: path,
                destination: &target,
                folder: &destination.folder,
                category: destination.category.as_deref(),
                date,
                hash: content_hash,
                duplicate,
                timestamp_fixed,
            })?;
        }

        Ok(())
    }

    /// Non-media files move unchanged to the flat output root.
    fn process_leftover(&mut self, path: &Path, summary: &mut RunSummary) -> Result<()> {
        let filename = path.file_name().unwrap_or_default();
        let candidate = self.dest.join(filename);

        let placement = resolve_collision(path, &candidate)?;
        let Some(target) = placement.target().map(Path::to_path_buf) else {
            summary.already_placed += 1;
            return Ok(());
        };

        if self.options.dry_run {
            log::info!(
                "Would move leftover {} -> {}",
                path.display(),
                target.display()
            );
            summary.leftovers_moved += 1;
            return Ok(());
        }

        move_file(path, &target)?;
        log::debug!("Moved leftover {} -> {}", path.display(), target.display());
        summary.leftovers_moved += 1;
        Ok(())
    }

    fn read_metadata(&mut self, path: &Path, summary: &mut RunSummary) -> Option<MediaMetadata> {
        let exiftool = self.exiftool.as_mut()?;
        match metadata::read_metadata(exiftool, path) {
            Ok(meta) => Some(meta),
            Err(e) => {
                log::warn!("{}; falling back to filesystem metadata", e);
                summary.metadata_unreadable += 1;
                None
            }
        }
    }
}

/// Move a file, preferring an atomic rename. When rename fails (typically
/// across filesystems), stage a copy next to the destination and rename it
/// into place before removing the source; the staged copy is cleaned up on
/// failure so source and destination never coexist ambiguously.
pub fn move_file(source: &Path, dest: &Path) -> Result<()> {
    if fs::rename(source, dest).is_ok() {
        return Ok(());
    }

    let staged = dest.with_file_name(format!(
        "{}.part",
        dest.file_name().unwrap_or_default().to_string_lossy()
    ));

    if let Err(e) = fs::copy(source, &staged).and_then(|_| fs::rename(&staged, dest)) {
        let _ = fs::remove_file(&staged);
        return Err(MediasortError::MoveFailed {
            src_path: source.to_path_buf(),
            destination: dest.to_path_buf(),
            reason: e.to_string(),
        });
    }

    // The content has landed at the destination; a source that cannot be
    // unlinked is logged, not reported as a failed move.
    if let Err(e) = fs::remove_file(source) {
        log::warn!(
            "Moved {} to {} but could not remove the source: {}",
            source.display(),
            dest.display(),
            e
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_file() {
        let temp = assert_fs::TempDir::new().unwrap();
        let source = temp.path().join("a.txt");
        let dest_dir = temp.path().join("nested");
        fs::create_dir_all(&dest_dir).unwrap();
        fs::write(&source, b"payload").unwrap();

        let dest = dest_dir.join("b.txt");
        move_file(&source, &dest).unwrap();

        assert!(!source.exists());
        assert_eq!(fs::read(&dest).unwrap(), b"payload");
    }

    #[test]
    fn test_move_file_missing_source() {
        let temp = assert_fs::TempDir::new().unwrap();
        let result = move_file(&temp.path().join("ghost.txt"), &temp.path().join("out.txt"));
        assert!(result.is_err());
        assert!(!temp.path().join("out.txt").exists());
        assert!(!temp.path().join("out.txt.part").exists());
    }

    #[test]
    fn test_sorter_rejects_missing_source() {
        let temp = assert_fs::TempDir::new().unwrap();
        let result = Sorter::new(
            temp.path().join("does_not_exist"),
            temp.path().join("out"),
            SortOptions::default(),
        );
        assert!(matches!(
            result,
            Err(MediasortError::SourceDirectoryMissing(_))
        ));
    }
}
