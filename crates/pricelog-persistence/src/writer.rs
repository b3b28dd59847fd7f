//! JSON Lines writer for full upstream records.
//!
//! Uses JSON Lines format for robustness:
//! - Each line is a complete JSON object
//! - Partial file corruption only affects individual lines
//! - Can be read even if write was interrupted
//! - A line torn by a crash is closed off before the next append, so the
//!   records written after a restart stay on lines of their own
//!
//! The file is never rewritten into a JSON array; readers must parse it
//! line by line.

use crate::error::PersistenceResult;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufReader, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use tracing::warn;

/// Open `path` for appending, creating it if missing.
///
/// If the file ends without a newline (a write cut short by a crash), a
/// newline is written first so the next record starts on a fresh line.
pub(crate) fn open_append(path: &Path) -> io::Result<File> {
    let mut file = OpenOptions::new()
        .create(true)
        .read(true)
        .append(true)
        .open(path)?;

    if file.metadata()?.len() > 0 {
        let mut last = [0u8; 1];
        file.seek(SeekFrom::End(-1))?;
        file.read_exact(&mut last)?;
        if last[0] != b'\n' {
            warn!(path = %path.display(), "Closing off partial last line");
            file.write_all(b"\n")?;
        }
    }
    Ok(file)
}

/// One line of a token's full-info log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FullInfoRecord {
    pub datetime: String,
    pub data: Value,
}

/// Append-only JSON Lines file.
#[derive(Debug, Clone)]
pub struct JsonLinesWriter {
    path: PathBuf,
}

impl JsonLinesWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Serialize `record` and append it as one line.
    pub fn append<T: Serialize>(&self, record: &T) -> PersistenceResult<()> {
        // Open in append mode - won't truncate existing data
        let file = open_append(&self.path)?;
        let mut writer = BufWriter::new(file);

        let json = serde_json::to_string(record)?;
        writeln!(writer, "{json}")?;
        writer.flush()?;

        Ok(())
    }
}

/// Read every complete record of a JSON Lines file.
///
/// Lines torn by a crash mid-write do not parse; they are skipped with a
/// warning and the records around them are still returned.
pub fn read_json_lines<T>(path: &Path) -> PersistenceResult<Vec<T>>
where
    T: for<'de> Deserialize<'de>,
{
    let reader = BufReader::new(File::open(path)?);
    let mut records = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str(&line) {
            Ok(record) => records.push(record),
            Err(e) => warn!(
                path = %path.display(),
                line = i + 1,
                error = %e,
                "Skipping unreadable line"
            ),
        }
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn make_test_record(id: i64) -> FullInfoRecord {
        FullInfoRecord {
            datetime: format!("2024-10-01T12:{id:02}:00.000000Z"),
            data: json!({"id": "A", "price": id}),
        }
    }

    #[test]
    fn test_write_and_read() {
        let temp_dir = TempDir::new().unwrap();
        let writer = JsonLinesWriter::new(temp_dir.path().join("a.json"));

        for i in 0..5 {
            writer.append(&make_test_record(i)).unwrap();
        }

        let records: Vec<FullInfoRecord> = read_json_lines(writer.path()).unwrap();
        assert_eq!(records.len(), 5);
        assert_eq!(records[0], make_test_record(0));
        assert_eq!(records[4].data["price"], json!(4));
    }

    #[test]
    fn test_append_mode() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("a.json");

        // First writer
        {
            let writer = JsonLinesWriter::new(&path);
            for i in 0..3 {
                writer.append(&make_test_record(i)).unwrap();
            }
        }

        // Second writer (should append, not overwrite)
        {
            let writer = JsonLinesWriter::new(&path);
            for i in 3..6 {
                writer.append(&make_test_record(i)).unwrap();
            }
        }

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 6, "Should have 6 records total from 2 writers");
        assert!(!content.trim_start().starts_with('['));
    }

    #[test]
    fn test_line_format() {
        let temp_dir = TempDir::new().unwrap();
        let writer = JsonLinesWriter::new(temp_dir.path().join("a.json"));
        writer
            .append(&FullInfoRecord {
                datetime: "ts".to_string(),
                data: json!({"price": 1.23}),
            })
            .unwrap();

        let content = std::fs::read_to_string(writer.path()).unwrap();
        assert_eq!(content, "{\"datetime\":\"ts\",\"data\":{\"price\":1.23}}\n");
    }

    #[test]
    fn test_truncated_last_line_skipped() {
        let temp_dir = TempDir::new().unwrap();
        let writer = JsonLinesWriter::new(temp_dir.path().join("a.json"));
        writer.append(&make_test_record(1)).unwrap();

        let mut file = OpenOptions::new().append(true).open(writer.path()).unwrap();
        write!(file, "{{\"datetime\":\"2024-").unwrap();

        let records: Vec<FullInfoRecord> = read_json_lines(writer.path()).unwrap();
        assert_eq!(records, vec![make_test_record(1)]);
    }

    #[test]
    fn test_append_after_torn_line_starts_new_line() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("a.json");
        JsonLinesWriter::new(&path).append(&make_test_record(1)).unwrap();

        // Crash mid-write, then a restarted writer appends the next record.
        let mut file = OpenOptions::new().append(true).open(&path).unwrap();
        write!(file, "{{\"datetime\":\"2024-").unwrap();
        drop(file);
        JsonLinesWriter::new(&path).append(&make_test_record(2)).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "{\"datetime\":\"2024-");
        let last: FullInfoRecord = serde_json::from_str(lines[2]).unwrap();
        assert_eq!(last, make_test_record(2));

        let records: Vec<FullInfoRecord> = read_json_lines(&path).unwrap();
        assert_eq!(records, vec![make_test_record(1), make_test_record(2)]);
    }
}
