//! Append-only CSV table.
//!
//! The header is written only when the file is new or empty, so reopening
//! an existing table never duplicates it. Each append opens the file in
//! append mode, writes one record and flushes. A row left unterminated by
//! a crash is closed off before the next record is written.

use crate::error::PersistenceResult;
use crate::writer::open_append;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// A CSV file that only ever grows.
#[derive(Debug, Clone)]
pub struct CsvTable {
    path: PathBuf,
    header: Vec<String>,
}

impl CsvTable {
    pub fn new(path: impl Into<PathBuf>, header: Vec<String>) -> Self {
        Self {
            path: path.into(),
            header,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn header(&self) -> &[String] {
        &self.header
    }

    /// True when the file is missing or has zero length.
    fn needs_header(&self) -> PersistenceResult<bool> {
        match fs::metadata(&self.path) {
            Ok(meta) => Ok(meta.len() == 0),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(true),
            Err(e) => Err(e.into()),
        }
    }

    /// Append one record, writing the header first if the file is new.
    ///
    /// Returns `true` if the header was written by this call.
    pub fn append<I, S>(&self, record: I) -> PersistenceResult<bool>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<[u8]>,
    {
        let write_header = self.needs_header()?;

        let file = open_append(&self.path)?;

        let mut wtr = csv::WriterBuilder::new()
            .has_headers(false)
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(file);

        if write_header {
            wtr.write_record(&self.header)?;
        }
        wtr.write_record(record)?;
        wtr.flush()?;

        Ok(write_header)
    }

    /// Read the header currently on disk, if the file exists and has one.
    pub fn existing_header(&self) -> PersistenceResult<Option<Vec<String>>> {
        if self.needs_header()? {
            return Ok(None);
        }
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(&self.path)?;

        match rdr.records().next() {
            Some(record) => Ok(Some(record?.iter().map(str::to_string).collect())),
            None => Ok(None),
        }
    }
}
