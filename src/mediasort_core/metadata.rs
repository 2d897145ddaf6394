use crate::mediasort_core::error::{MediasortError, Result};
use exiftool::ExifTool;
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;
use std::process::Command;
use time::{OffsetDateTime, PrimitiveDateTime, UtcOffset};

/// Date format used in EXIF tag values.
pub const EXIF_DATE_FORMAT: &[time::format_description::FormatItem] =
    time::macros::format_description!("[year]:[month]:[day] [hour]:[minute]:[second]");

const EXIF_OFFSET_FORMAT: &[time::format_description::FormatItem] =
    time::macros::format_description!("[offset_hour]:[offset_minute]");

/// Folder name used when no camera make/model survives sanitization.
pub const UNKNOWN_FOLDER: &str = "Unknown";

/// Date/time tags unified on relocated files. Downstream tools sort by
/// whichever of these they prefer, so all of them get the same value.
pub const DATE_TAGS: &[&str] = &[
    "DateTimeOriginal",
    "CreateDate",
    "ModifyDate",
    "FileModifyDate",
];

/// Raw tag record from exiftool. String-typed fields that some formats emit
/// as numbers use flexible Value types.
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "PascalCase")]
struct RawExifInfo {
    #[serde(rename = "MIMEType", default)]
    #[allow(dead_code)]
    mime_type: String,
    #[serde(default)]
    date_time_original: String,
    #[serde(default)]
    create_date: String,
    #[serde(default)]
    modify_date: String,
    #[serde(default)]
    offset_time_original: Option<String>,
    #[serde(default)]
    offset_time: Option<String>,
    #[serde(default)]
    make: Option<String>,
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    image_description: Option<Value>,
    #[serde(default)]
    document_name: Option<Value>,
}

/// Normalized metadata record for one media file. Partial records are valid.
#[derive(Debug, Clone, Default)]
pub struct MediaMetadata {
    pub capture_time: Option<OffsetDateTime>,
    pub camera_make: Option<String>,
    pub camera_model: Option<String>,
    /// Embedded title used for canonical renaming, already cleaned.
    pub title: Option<String>,
}

/// Read and normalize metadata for a media file.
pub fn read_metadata(exiftool: &mut ExifTool, path: &Path) -> Result<MediaMetadata> {
    let raw: RawExifInfo =
        exiftool
            .read_metadata(path, &[])
            .map_err(|e| MediasortError::MetadataUnreadable {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
    Ok(normalize(raw))
}

/// Capture time precedence: DateTimeOriginal, then CreateDate, then ModifyDate.
fn normalize(raw: RawExifInfo) -> MediaMetadata {
    let capture_time = parse_exif_date(&raw.date_time_original, raw.offset_time_original.as_deref())
        .or_else(|_| parse_exif_date(&raw.create_date, raw.offset_time.as_deref()))
        .or_else(|_| parse_exif_date(&raw.modify_date, raw.offset_time.as_deref()))
        .ok();

    let title = raw
        .image_description
        .as_ref()
        .and_then(value_to_string)
        .and_then(|s| clean_title(&s))
        .or_else(|| {
            raw.document_name
                .as_ref()
                .and_then(value_to_string)
                .and_then(|s| clean_title(&s))
        });

    MediaMetadata {
        capture_time,
        camera_make: non_empty(raw.make),
        camera_model: non_empty(raw.model),
        title,
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn value_to_string(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Parse an EXIF date string with optional timezone offset. Some writers
/// append the offset (and subseconds) directly to the date string.
pub fn parse_exif_date(date_str: &str, offset_str: Option<&str>) -> Result<OffsetDateTime> {
    let trimmed = date_str.trim();
    if trimmed.is_empty() {
        return Err(MediasortError::InvalidDateFormat("empty date".to_string()));
    }

    let (stamp, trailing) = if trimmed.len() > 19 && trimmed.is_char_boundary(19) {
        trimmed.split_at(19)
    } else {
        (trimmed, "")
    };

    let date_time = PrimitiveDateTime::parse(stamp, EXIF_DATE_FORMAT)
        .map_err(|e| MediasortError::InvalidDateFormat(e.to_string()))?;

    let offset = match offset_str {
        Some(o) if !o.is_empty() => {
            UtcOffset::parse(o, EXIF_OFFSET_FORMAT).unwrap_or_else(|_| local_offset())
        }
        _ if !trailing.is_empty() => {
            UtcOffset::parse(trailing, EXIF_OFFSET_FORMAT).unwrap_or_else(|_| local_offset())
        }
        _ => local_offset(),
    };

    Ok(date_time.assume_offset(offset))
}

/// Get the local timezone offset, falling back to UTC if unavailable.
pub fn local_offset() -> UtcOffset {
    OffsetDateTime::now_local()
        .map(|dt| dt.offset())
        .unwrap_or(UtcOffset::UTC)
}

/// Clean an embedded title for use as a filename: printable characters only,
/// reserved filesystem characters stripped.
pub fn clean_title(raw: &str) -> Option<String> {
    let cleaned: String = raw
        .chars()
        .filter(|c| !c.is_control())
        .filter(|c| !matches!(c, '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*'))
        .collect();
    let cleaned = cleaned.trim_matches([' ', '.']).to_string();
    if cleaned.is_empty() { None } else { Some(cleaned) }
}

/// Sanitize a camera make/model string into a filesystem-safe folder segment.
pub fn sanitize_folder(raw: &str) -> Option<String> {
    let mut cleaned: String = raw
        .chars()
        .filter(|c| (' '..='~').contains(c))
        .filter(|c| !matches!(c, '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*'))
        .collect();
    cleaned = cleaned.split_whitespace().collect::<Vec<_>>().join("_");
    while cleaned.contains("__") {
        cleaned = cleaned.replace("__", "_");
    }
    let cleaned = cleaned.trim_matches(['_', '.']).to_string();
    if cleaned.is_empty() { None } else { Some(cleaned) }
}

/// Build the camera folder segment from sanitized make and model. A model
/// string that already carries the make is not doubled.
pub fn camera_folder(meta: Option<&MediaMetadata>) -> String {
    let Some(meta) = meta else {
        return UNKNOWN_FOLDER.to_string();
    };

    let make = meta.camera_make.as_deref().and_then(sanitize_folder);
    let model = meta.camera_model.as_deref().and_then(sanitize_folder);

    match (make, model) {
        (Some(make), Some(model)) => {
            if model.to_lowercase().starts_with(&make.to_lowercase()) {
                model
            } else {
                format!("{}_{}", make, model)
            }
        }
        (None, Some(model)) => model,
        (Some(make), None) => make,
        (None, None) => UNKNOWN_FOLDER.to_string(),
    }
}

/// Arguments for the exiftool invocation that unifies all date/time tags.
pub fn timestamp_write_args(timestamp: OffsetDateTime) -> Result<Vec<String>> {
    let stamp = timestamp
        .format(EXIF_DATE_FORMAT)
        .map_err(|e| MediasortError::InvalidDateFormat(e.to_string()))?;

    let mut args: Vec<String> = DATE_TAGS
        .iter()
        .map(|tag| format!("-{}={}", tag, stamp))
        .collect();
    args.push("-overwrite_original".to_string());
    Ok(args)
}

/// Rewrite all known date/time tags on a relocated file to one value.
pub fn write_timestamps(path: &Path, timestamp: OffsetDateTime) -> Result<()> {
    let args = timestamp_write_args(timestamp)?;

    let output = Command::new("exiftool")
        .args(&args)
        .arg(path)
        .output()
        .map_err(|e| MediasortError::MetadataWriteFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

    if !output.status.success() {
        return Err(MediasortError::MetadataWriteFailed {
            path: path.to_path_buf(),
            reason: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(())
}

/// Probe for the exiftool binary. Called once at startup; the run degrades
/// to filesystem-only metadata when the probe fails.
pub fn exiftool_available() -> bool {
    match Command::new("exiftool").arg("-ver").output() {
        Ok(out) if out.status.success() => {
            log::debug!(
                "found exiftool version {}",
                String::from_utf8_lossy(&out.stdout).trim()
            );
            true
        }
        _ => false,
    }
}
