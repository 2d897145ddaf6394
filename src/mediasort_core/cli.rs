use clap::Parser;
use simplelog::LevelFilter;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Sort photos and videos into a camera/date folder hierarchy")]
pub struct Cli {
    /// Directory containing media to sort
    #[arg(required = true)]
    pub source_dir: PathBuf,

    /// Output directory for the sorted hierarchy and non-media leftovers
    #[arg(required = true)]
    pub output_dir: PathBuf,

    /// Show what would be done without touching any file
    #[arg(long)]
    pub dry_run: bool,

    /// Leave date/time tags untouched on relocated files
    #[arg(long)]
    pub keep_timestamps: bool,

    /// Write a CSV report of every move to this path
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Enable file logging to mediasort.log
    #[arg(long = "log")]
    pub log: bool,

    /// Log level for file logging (debug, info, warn, error)
    #[arg(long, default_value_t = LevelFilter::Debug)]
    pub log_level: LevelFilter,
}
