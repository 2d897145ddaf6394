use crate::mediasort_core::error::Result;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// A file that could not be processed; left in its original location.
#[derive(Debug, Clone)]
pub struct FileFailure {
    pub path: PathBuf,
    pub reason: String,
}

/// Counters and failures accumulated over one run.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub media_moved: usize,
    pub duplicates: usize,
    pub already_placed: usize,
    pub leftovers_moved: usize,
    pub junk_deleted: usize,
    pub empty_dirs_removed: usize,
    pub metadata_unreadable: usize,
    pub metadata_write_failures: usize,
    pub failures: Vec<FileFailure>,
}

/// One row of the CSV move report.
#[derive(Debug)]
pub struct MoveRecord<'a> {
    pub source: &'a Path,
    pub destination: &'a Path,
    pub folder: &'a str,
    pub category: Option<&'a str>,
    pub date: String,
    pub hash: Option<String>,
    pub duplicate: bool,
    pub timestamp_fixed: bool,
}

/// Append-only CSV log of performed moves. Observability only; nothing
/// reads it back.
pub struct CsvReport {
    out: BufWriter<File>,
}

impl CsvReport {
    pub fn create(path: &Path) -> Result<Self> {
        let file = File::create(path)?;
        let mut out = BufWriter::new(file);
        writeln!(
            out,
            "Source,Destination,Folder,Category,Date,Hash,Duplicate,TimestampFixed"
        )?;
        Ok(CsvReport { out })
    }

    pub fn record(&mut self, record: &MoveRecord) -> Result<()> {
        writeln!(
            self.out,
            "{},{},{},{},{},{},{},{}",
            csv_field(&record.source.to_string_lossy()),
            csv_field(&record.destination.to_string_lossy()),
            csv_field(record.folder),
            csv_field(record.category.unwrap_or("")),
            csv_field(&record.date),
            csv_field(record.hash.as_deref().unwrap_or("")),
            if record.duplicate { "YES" } else { "NO" },
            if record.timestamp_fixed { "YES" } else { "NO" },
        )?;
        Ok(())
    }

    pub fn finish(mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_field_escaping() {
        assert_eq!(csv_field("plain"), "plain");
        assert_eq!(csv_field("a,b"), "\"a,b\"");
        assert_eq!(csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn test_report_rows() {
        let temp = assert_fs::TempDir::new().unwrap();
        let report_path = temp.path().join("report.csv");

        let mut report = CsvReport::create(&report_path).unwrap();
        report
            .record(&MoveRecord {
                source: Path::new("/in/a.jpg"),
                destination: Path::new("/out/Canon/2023/06/15/a.jpg"),
                folder: "Canon",
                category: None,
                date: "2023:06:15 10:30:00".to_string(),
                hash: None,
                duplicate: false,
                timestamp_fixed: true,
            })
            .unwrap();
        report.finish().unwrap();

        let contents = std::fs::read_to_string(&report_path).unwrap();
        let mut lines = contents.lines();
        assert_eq!(
            lines.next().unwrap(),
            "Source,Destination,Folder,Category,Date,Hash,Duplicate,TimestampFixed"
        );
        assert_eq!(
            lines.next().unwrap(),
            "/in/a.jpg,/out/Canon/2023/06/15/a.jpg,Canon,,2023:06:15 10:30:00,,NO,YES"
        );
    }
}
