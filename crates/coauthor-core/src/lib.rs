//! Coauthor Core - rows, names and row sources
//!
//! This crate holds everything that happens before a graph exists:
//! the row model read from a paper table, the author name normalizer
//! that turns free text into graph keys, and the sources rows come from.
//!
//! # Example
//!
//! ```
//! use coauthor_core::{normalize, MemorySource, Row, RowSource};
//!
//! let source = MemorySource::new(vec![Row::new("Alice", "Bob, Carol", "P1")]);
//! let rows = source.rows().unwrap();
//!
//! assert_eq!(rows.len(), 1);
//! assert_eq!(normalize("  Dr. ALICE   Smith "), "dr alice smith");
//! ```

mod error;
mod normalize;
mod row;
mod source;

pub use error::{Result, SourceError};
pub use normalize::{normalize, split_coauthors};
pub use row::Row;
pub use source::{CsvSource, MemorySource, RowSource};
