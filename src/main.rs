use anyhow::Result;
use clap::Parser;
use mediasort::mediasort_core::{Cli, SortOptions, Sorter};
use simplelog::{CombinedLogger, Config, LevelFilter, SharedLogger, TermLogger, WriteLogger};
use std::fs::File;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize loggers
    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        LevelFilter::Warn,
        Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )];

    if cli.log {
        loggers.push(WriteLogger::new(
            cli.log_level,
            Config::default(),
            File::create("mediasort.log")?,
        ));
    }

    CombinedLogger::init(loggers)?;

    let options = SortOptions {
        dry_run: cli.dry_run,
        keep_timestamps: cli.keep_timestamps,
        report: cli.report,
    };

    let mut sorter = Sorter::new(cli.source_dir, cli.output_dir, options)?;
    let summary = sorter.run()?;

    if cli.dry_run {
        println!("\nDry run complete!");
    } else {
        println!("\nSorting complete!");
    }
    println!("  {} media files moved", summary.media_moved);
    if summary.duplicates > 0 {
        println!("  {} duplicates kept with _DUP suffixes", summary.duplicates);
    }
    if summary.already_placed > 0 {
        println!("  {} files already in place", summary.already_placed);
    }
    println!("  {} non-media files moved", summary.leftovers_moved);
    println!("  {} junk files deleted", summary.junk_deleted);
    println!("  {} empty directories removed", summary.empty_dirs_removed);
    if summary.metadata_unreadable > 0 {
        println!(
            "  {} files had unreadable metadata",
            summary.metadata_unreadable
        );
    }
    if summary.metadata_write_failures > 0 {
        println!(
            "  {} files kept inconsistent date tags",
            summary.metadata_write_failures
        );
    }

    if !summary.failures.is_empty() {
        println!(
            "\n{} files failed and were left in place:",
            summary.failures.len()
        );
        for failure in &summary.failures {
            println!("  {}: {}", failure.path.display(), failure.reason);
        }
    }

    Ok(())
}
