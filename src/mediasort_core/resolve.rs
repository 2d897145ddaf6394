use crate::mediasort_core::metadata::{MediaMetadata, camera_folder, local_offset};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use time::{Date, Month, OffsetDateTime};

/// Keywords that route a file into a category subfolder between the camera
/// folder and the year.
pub const CATEGORY_KEYWORDS: &[&str] = &[
    "whatsapp",
    "screenshot",
    "scan",
    "instagram",
    "facebook",
    "messenger",
    "snapchat",
    "tiktok",
    "wechat",
    "telegram",
];

static FILENAME_DATE_PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();

fn filename_date_patterns() -> &'static [Regex] {
    FILENAME_DATE_PATTERNS.get_or_init(|| {
        [
            r"(?P<y>20\d{2})[-_.](?P<m>\d{2})[-_.](?P<d>\d{2})",
            r"(?P<d>\d{2})[-_.](?P<m>\d{2})[-_.](?P<y>20\d{2})",
            r"(?P<y>20\d{2})(?P<m>\d{2})(?P<d>\d{2})",
            r"(?P<d>\d{2})(?P<m>\d{2})(?P<y>20\d{2})",
            r"(?:IMG|VID)[-_]?(?P<y>20\d{2})(?P<m>\d{2})(?P<d>\d{2})",
        ]
        .iter()
        .map(|p| Regex::new(p).expect("filename date pattern"))
        .collect()
    })
}

/// Filesystem-derived facts about a file, gathered by the caller so that
/// destination resolution itself touches no state.
#[derive(Debug, Clone)]
pub struct FileFacts {
    /// Original basename.
    pub filename: String,
    /// Original extension, lowercase, without the dot. Empty if none.
    pub extension: String,
    /// Lowercased directory names between the source root and the file.
    pub relative_dirs: Vec<String>,
    /// Modification time, already in local time.
    pub modified_at: OffsetDateTime,
}

impl FileFacts {
    pub fn gather(path: &Path, root: &Path, modified_at: OffsetDateTime) -> Self {
        let filename = path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();

        let extension = path
            .extension()
            .unwrap_or_default()
            .to_string_lossy()
            .to_lowercase();

        let relative_dirs = path
            .parent()
            .and_then(|parent| parent.strip_prefix(root).ok())
            .map(|rel| {
                rel.components()
                    .map(|c| c.as_os_str().to_string_lossy().to_lowercase())
                    .collect()
            })
            .unwrap_or_default();

        FileFacts {
            filename,
            extension,
            relative_dirs,
            modified_at,
        }
    }
}

/// Resolved destination for one media file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination {
    pub folder: String,
    pub category: Option<String>,
    pub filename: String,
    /// Canonical timestamp: also the value written back into the date tags.
    pub timestamp: OffsetDateTime,
}

impl Destination {
    /// Directory part relative to the output root:
    /// `folder[/category]/YYYY/MM/DD`.
    pub fn relative_dir(&self) -> PathBuf {
        let date = self.timestamp.date();
        let mut dir = PathBuf::from(&self.folder);
        if let Some(category) = &self.category {
            dir.push(category);
        }
        dir.push(format!("{:04}", date.year()));
        dir.push(format!("{:02}", u8::from(date.month())));
        dir.push(format!("{:02}", date.day()));
        dir
    }

    pub fn relative_path(&self) -> PathBuf {
        self.relative_dir().join(&self.filename)
    }
}

/// Derive the destination for a file from its metadata and fallback facts.
///
/// Timestamp fallback chain: capture time, then a date embedded in the
/// filename, then the modification time. Identical inputs always yield an
/// identical destination.
pub fn resolve_destination(meta: Option<&MediaMetadata>, facts: &FileFacts) -> Destination {
    let stem = Path::new(&facts.filename)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(&facts.filename);

    let timestamp = meta
        .and_then(|m| m.capture_time)
        .or_else(|| {
            date_from_filename(stem).map(|d| d.midnight().assume_offset(local_offset()))
        })
        .unwrap_or(facts.modified_at);

    Destination {
        folder: camera_folder(meta),
        category: detect_category(facts),
        filename: canonical_filename(meta, facts),
        timestamp,
    }
}

/// Extract a calendar date embedded in a filename stem. Patterns that match
/// but produce an invalid date fall through to the next pattern.
pub fn date_from_filename(stem: &str) -> Option<Date> {
    for re in filename_date_patterns() {
        let Some(caps) = re.captures(stem) else {
            continue;
        };
        let (Ok(year), Ok(month), Ok(day)) = (
            caps["y"].parse::<i32>(),
            caps["m"].parse::<u8>(),
            caps["d"].parse::<u8>(),
        ) else {
            continue;
        };
        let Ok(month) = Month::try_from(month) else {
            continue;
        };
        if let Ok(date) = Date::from_calendar_date(year, month, day) {
            return Some(date);
        }
    }
    None
}

fn detect_category(facts: &FileFacts) -> Option<String> {
    let name = facts.filename.to_lowercase();
    for keyword in CATEGORY_KEYWORDS {
        if name.contains(keyword) || facts.relative_dirs.iter().any(|d| d.contains(keyword)) {
            return Some((*keyword).to_string());
        }
    }
    None
}

/// Embedded title when present, original basename otherwise. The original
/// extension is appended when the title does not already carry it.
fn canonical_filename(meta: Option<&MediaMetadata>, facts: &FileFacts) -> String {
    let Some(title) = meta.and_then(|m| m.title.as_deref()) else {
        return facts.filename.clone();
    };

    if facts.extension.is_empty() {
        return title.to_string();
    }

    let suffix = format!(".{}", facts.extension);
    if title.to_lowercase().ends_with(&suffix) {
        title.to_string()
    } else {
        format!("{}{}", title, suffix)
    }
}
