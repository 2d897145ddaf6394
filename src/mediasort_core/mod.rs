pub mod cli;
pub mod collide;
pub mod error;
pub mod media;
pub mod metadata;
pub mod report;
pub mod resolve;
pub mod sort;
pub mod sweep;

pub use cli::Cli;
pub use collide::{Placement, resolve_collision};
pub use error::{MediasortError, Result};
pub use media::{MediaType, detect_media_type};
pub use metadata::{MediaMetadata, exiftool_available};
pub use report::{FileFailure, RunSummary};
pub use resolve::{Destination, FileFacts, resolve_destination};
pub use sort::{SortOptions, Sorter, move_file};
pub use sweep::{is_junk, remove_empty_dirs};
