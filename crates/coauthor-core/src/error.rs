//! Errors raised while reading rows.

use std::path::PathBuf;
use thiserror::Error;

/// Failure to read the paper table.
///
/// Any of these aborts the whole query: a graph is never built from
/// a partially read source.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("cannot open data file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed row data: {0}")]
    Csv(#[from] csv::Error),

    #[error("data file is missing required column '{0}'")]
    MissingColumn(&'static str),
}

pub type Result<T> = std::result::Result<T, SourceError>;
