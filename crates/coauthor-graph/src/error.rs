//! Errors raised by graph queries.

use coauthor_core::SourceError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GraphError {
    /// The row source could not be read. No graph was built.
    #[error("data source error: {0}")]
    DataSource(#[from] SourceError),

    /// The requested author is not a node of the graph.
    #[error("author '{0}' not found in graph")]
    UnknownAuthor(String),

    /// Both authors exist but live in different components.
    #[error("no path between '{from}' and '{to}'")]
    NoPath { from: String, to: String },

    /// The graph has no nodes at all.
    #[error("graph contains no authors")]
    EmptyGraph,

    /// An exhaustive search ran out of its step or time allowance.
    #[error("search budget exceeded after {steps} steps")]
    SearchBudgetExceeded { steps: u64 },
}

pub type Result<T> = std::result::Result<T, GraphError>;
