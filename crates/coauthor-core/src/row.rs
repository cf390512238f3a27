//! The row model.

use serde::{Deserialize, Serialize};

/// One line of the paper table.
///
/// Fields hold raw text exactly as it came from the source. Nothing is
/// normalized here; that happens when the graph is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    /// The main author of the paper.
    pub author_name: String,

    /// Comma-separated co-author names, free text.
    #[serde(default)]
    pub coauthors: String,

    /// Title of the paper.
    #[serde(default)]
    pub paper_title: String,
}

impl Row {
    /// Creates a row from raw strings.
    pub fn new(
        author_name: impl Into<String>,
        coauthors: impl Into<String>,
        paper_title: impl Into<String>,
    ) -> Self {
        Self {
            author_name: author_name.into(),
            coauthors: coauthors.into(),
            paper_title: paper_title.into(),
        }
    }
}
