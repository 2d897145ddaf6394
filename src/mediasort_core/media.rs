use std::path::Path;

/// Image file extensions (lowercase).
const IMAGE_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "gif", "bmp", "tiff", "tif", "webp", "heic", "heif", "avif",
    // RAW formats
    "raw", "cr2", "cr3", "nef", "orf", "arw", "dng", "sr2", "raf", "rw2", "pef",
];

/// Video file extensions (lowercase).
const VIDEO_EXTENSIONS: &[&str] = &[
    "mp4", "mov", "m4v", "avi", "mkv", "webm", "mts", "m2ts", "3gp", "mpg", "wmv", "flv",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaType {
    Image,
    Video,
}

impl MediaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Image => "image",
            MediaType::Video => "video",
        }
    }
}

impl std::fmt::Display for MediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Detect media type from a file extension. Files without a recognized
/// extension are routed to the catch-all output instead.
pub fn detect_media_type(path: &Path) -> Option<MediaType> {
    let ext = path.extension().and_then(|e| e.to_str())?;
    let ext_lower = ext.to_lowercase();

    if IMAGE_EXTENSIONS.contains(&ext_lower.as_str()) {
        return Some(MediaType::Image);
    }

    if VIDEO_EXTENSIONS.contains(&ext_lower.as_str()) {
        return Some(MediaType::Video);
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_image_extensions() {
        assert_eq!(detect_media_type(Path::new("photo.jpg")), Some(MediaType::Image));
        assert_eq!(detect_media_type(Path::new("photo.HEIC")), Some(MediaType::Image));
        assert_eq!(detect_media_type(Path::new("photo.cr2")), Some(MediaType::Image));
        assert_eq!(detect_media_type(Path::new("photo.DNG")), Some(MediaType::Image));
    }

    #[test]
    fn test_detect_video_extensions() {
        assert_eq!(detect_media_type(Path::new("clip.mp4")), Some(MediaType::Video));
        assert_eq!(detect_media_type(Path::new("clip.MOV")), Some(MediaType::Video));
        assert_eq!(detect_media_type(Path::new("clip.3gp")), Some(MediaType::Video));
    }

    #[test]
    fn test_detect_non_media() {
        assert_eq!(detect_media_type(Path::new("notes.txt")), None);
        assert_eq!(detect_media_type(Path::new("archive.zip")), None);
        assert_eq!(detect_media_type(Path::new("no_extension")), None);
    }
}
