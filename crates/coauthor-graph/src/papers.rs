//! Author to paper index.

use coauthor_core::normalize;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Paper titles credited to each author, in row order.
///
/// Titles are not deduplicated: an author credited twice on the same
/// title lists it twice.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuthorPapers {
    by_author: BTreeMap<String, Vec<String>>,
}

impl AuthorPapers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a title to an author's list.
    pub fn push(&mut self, key: &str, title: &str) {
        self.by_author
            .entry(key.to_string())
            .or_default()
            .push(title.to_string());
    }

    /// Titles for an exact author key. Empty if the author has none.
    pub fn get(&self, key: &str) -> &[String] {
        self.by_author.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Titles for a raw author name.
    pub fn lookup(&self, raw: &str) -> &[String] {
        self.get(&normalize(raw))
    }

    /// Number of authors with at least one title.
    pub fn len(&self) -> usize {
        self.by_author.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_author.is_empty()
    }
}
