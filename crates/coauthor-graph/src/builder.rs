//! Graph builder for constructing the collaboration graph from rows.
//!
//! Each row links its main author to every distinct co-author. Co-authors
//! of the same row are not linked to each other, so the graph is the union
//! of one star per row.

use crate::error::Result;
use crate::graph::CollabGraph;
use crate::papers::AuthorPapers;
use coauthor_core::{normalize, split_coauthors, Row, RowSource};
use tracing::{debug, warn};

/// Builds a CollabGraph and its paper index from rows.
pub struct GraphBuilder {
    graph: CollabGraph,
    papers: AuthorPapers,
    rows_added: usize,
    rows_skipped: usize,
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self {
            graph: CollabGraph::new(),
            papers: AuthorPapers::new(),
            rows_added: 0,
            rows_skipped: 0,
        }
    }

    /// Adds one row.
    ///
    /// A row whose main author normalizes to nothing is skipped entirely;
    /// without a subject there is nobody to link the co-authors to.
    pub fn add_row(&mut self, row: &Row) {
        let main = normalize(&row.author_name);
        if main.is_empty() {
            debug!("Skipping row without main author: {:?}", row.paper_title);
            self.rows_skipped += 1;
            return;
        }

        let mut coauthors: Vec<String> = Vec::new();
        for name in split_coauthors(&row.coauthors) {
            if name != main && !coauthors.contains(&name) {
                coauthors.push(name);
            }
        }

        let title = row.paper_title.trim();
        let main_id = self.graph.add_author(&main);
        self.papers.push(&main, title);

        for coauthor in &coauthors {
            let co_id = self.graph.add_author(coauthor);
            self.papers.push(coauthor, title);
            self.graph.add_collaboration(main_id, co_id);
        }

        self.rows_added += 1;
    }

    /// Adds every row in order.
    pub fn add_rows<'a>(&mut self, rows: impl IntoIterator<Item = &'a Row>) {
        for row in rows {
            self.add_row(row);
        }
    }

    /// Finishes building and returns the graph and paper index.
    pub fn build(mut self) -> (CollabGraph, AuthorPapers) {
        let removed = self.graph.remove_self_loops();
        if removed > 0 {
            warn!("Removed {} self-loop edges after build", removed);
        }
        debug_assert!(self.graph.invariants_hold());

        debug!(
            "Built graph: {} authors, {} edges from {} rows ({} skipped)",
            self.graph.node_count(),
            self.graph.edge_count(),
            self.rows_added,
            self.rows_skipped
        );

        (self.graph, self.papers)
    }
}

/// Builds a graph from rows already in memory.
pub fn build(rows: &[Row]) -> (CollabGraph, AuthorPapers) {
    let mut builder = GraphBuilder::new();
    builder.add_rows(rows);
    builder.build()
}

/// Reads a row source completely and builds a graph from it.
///
/// A read failure returns `GraphError::DataSource` and no graph.
pub fn build_from_source(source: &dyn RowSource) -> Result<(CollabGraph, AuthorPapers)> {
    let rows = source.rows()?;
    debug!("Building graph from {}", source.describe());
    Ok(build(&rows))
}
