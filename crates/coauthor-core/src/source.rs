//! Row sources.
//!
//! A `RowSource` is anything that can hand over the full paper table.
//! Sources are read completely before a graph is built, so a read error
//! never leaves a half-built graph behind.

use crate::error::{Result, SourceError};
use crate::row::Row;
use csv::{ReaderBuilder, Trim};
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Column names every tabular source must provide.
pub const REQUIRED_COLUMNS: [&str; 3] = ["author_name", "coauthors", "paper_title"];

/// Supplies the rows a graph is built from.
pub trait RowSource: Send + Sync {
    /// Reads every row, in table order.
    fn rows(&self) -> Result<Vec<Row>>;

    /// Short human-readable description used in logs.
    fn describe(&self) -> String;
}

/// Reads rows from a CSV file with a header line.
#[derive(Debug, Clone)]
pub struct CsvSource {
    path: PathBuf,
}

impl CsvSource {
    /// Creates a source for the given file. The file is not opened until
    /// `rows` is called.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the underlying file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RowSource for CsvSource {
    fn rows(&self) -> Result<Vec<Row>> {
        let file = File::open(&self.path).map_err(|source| SourceError::Io {
            path: self.path.clone(),
            source,
        })?;

        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .trim(Trim::Headers)
            .from_reader(file);

        let headers = reader.headers()?.clone();
        for column in REQUIRED_COLUMNS {
            if !headers.iter().any(|h| h == column) {
                return Err(SourceError::MissingColumn(column));
            }
        }

        let mut rows = Vec::new();
        for record in reader.deserialize() {
            let row: Row = record?;
            rows.push(row);
        }

        debug!("Read {} rows from {}", rows.len(), self.path.display());
        Ok(rows)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Rows held in memory. Used by tests and by callers that already parsed
/// their table some other way.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    rows: Vec<Row>,
}

impl MemorySource {
    pub fn new(rows: Vec<Row>) -> Self {
        Self { rows }
    }
}

impl RowSource for MemorySource {
    fn rows(&self) -> Result<Vec<Row>> {
        Ok(self.rows.clone())
    }

    fn describe(&self) -> String {
        format!("<memory: {} rows>", self.rows.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_csv(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_reads_csv_rows() {
        let file = write_csv(
            "author_name,coauthors,paper_title\n\
             Alice,\"Bob, Carol\",P1\n\
             Bob,Alice,P2\n",
        );

        let rows = CsvSource::new(file.path()).rows().unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], Row::new("Alice", "Bob, Carol", "P1"));
        assert_eq!(rows[1].coauthors, "Alice");
    }

    #[test]
    fn test_extra_columns_are_ignored() {
        let file = write_csv(
            "id,author_name,coauthors,paper_title,year\n\
             1,Alice,Bob,P1,2021\n",
        );

        let rows = CsvSource::new(file.path()).rows().unwrap();
        assert_eq!(rows, vec![Row::new("Alice", "Bob", "P1")]);
    }

    #[test]
    fn test_missing_column() {
        let file = write_csv("author_name,paper_title\nAlice,P1\n");

        let err = CsvSource::new(file.path()).rows().unwrap_err();
        assert!(matches!(err, SourceError::MissingColumn("coauthors")));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = CsvSource::new(dir.path().join("nope.csv"))
            .rows()
            .unwrap_err();
        assert!(matches!(err, SourceError::Io { .. }));
    }

    #[test]
    fn test_ragged_row_is_an_error() {
        let file = write_csv("author_name,coauthors,paper_title\nAlice,Bob\n");
        let err = CsvSource::new(file.path()).rows().unwrap_err();
        assert!(matches!(err, SourceError::Csv(_)));
    }

    #[test]
    fn test_memory_source() {
        let source = MemorySource::new(vec![Row::new("A", "", "T")]);
        assert_eq!(source.rows().unwrap().len(), 1);
        assert_eq!(source.describe(), "<memory: 1 rows>");
    }
}
