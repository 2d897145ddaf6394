use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MediasortError {
    // I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Directory walker error: {0}")]
    Walkdir(#[from] walkdir::Error),

    // Startup errors
    #[error("Source directory missing or not a directory: {0}")]
    SourceDirectoryMissing(PathBuf),

    #[error("Output directory is not writable: {path}: {reason}")]
    OutputDirectoryUnwritable { path: PathBuf, reason: String },

    // Metadata errors
    #[error("Failed to read metadata from {path}: {reason}")]
    MetadataUnreadable { path: PathBuf, reason: String },

    #[error("Failed to rewrite metadata on {path}: {reason}")]
    MetadataWriteFailed { path: PathBuf, reason: String },

    #[error("Date parsing error: {0}")]
    InvalidDateFormat(String),

    // Per-file move errors
    #[error("Failed to move {src_path} to {destination}: {reason}")]
    MoveFailed {
        src_path: PathBuf,
        destination: PathBuf,
        reason: String,
    },
}

/// Result type for mediasort operations.
pub type Result<T> = std::result::Result<T, MediasortError>;
