//! Coauthor Graph - collaboration graph and analytics
//!
//! This crate turns paper rows into an undirected weighted graph of
//! authors and answers queries over it: cheapest paths, collaborator
//! rankings, the most collaborative author, exhaustive longest paths and a
//! summary for visualization.
//!
//! # Architecture
//!
//! The graph uses petgraph internally with a key index for lookups. All
//! query functions take raw author names and normalize them with the same
//! normalizer the builder uses, so callers never handle keys themselves.
//!
//! # Example
//!
//! ```
//! use coauthor_core::Row;
//! use coauthor_graph::{build, most_collaborative, shortest_path};
//!
//! let rows = vec![
//!     Row::new("Alice", "Bob, Carol", "P1"),
//!     Row::new("Bob", "Alice", "P2"),
//! ];
//! let (graph, _papers) = build(&rows);
//!
//! let route = shortest_path(&graph, "Alice", "Carol").unwrap();
//! assert_eq!(route.path, vec!["alice", "carol"]);
//!
//! let top = most_collaborative(&graph).unwrap();
//! assert_eq!((top.author.as_str(), top.degree), ("alice", 2));
//! ```

mod builder;
mod edge;
mod error;
mod graph;
mod order_tree;
mod papers;
mod paths;
mod ranking;
mod summary;

pub use builder::{build, build_from_source, GraphBuilder};
pub use edge::GraphEdge;
pub use error::{GraphError, Result};
pub use graph::{CollabGraph, GraphStats, NodeId};
pub use order_tree::{neighbor_tree, SortedNameTree};
pub use papers::AuthorPapers;
pub use paths::{
    longest_path, longest_path_with_budget, shortest_path, shortest_paths_from, Distance, Route,
    SearchBudget,
};
pub use ranking::{
    collaborator_count, most_collaborative, rank_neighbors, Collaborator, RankedNeighbor,
};
pub use summary::{summarize, Category, GraphSummary, NodeSummary, THRESHOLD_FACTOR};
