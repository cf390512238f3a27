//! Collaboration rankings.
//!
//! Orders an author's collaborators by how often they worked together,
//! and finds the author with the most distinct collaborators.

use crate::error::{GraphError, Result};
use crate::graph::CollabGraph;
use serde::{Deserialize, Serialize};

/// A collaborator and the number of rows shared with them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedNeighbor {
    pub author: String,
    pub weight: u32,
}

/// An author and their number of distinct collaborators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collaborator {
    pub author: String,
    pub degree: usize,
}

/// Ranks an author's collaborators, heaviest first.
///
/// Equal weights are ordered by collaborator key.
pub fn rank_neighbors(graph: &CollabGraph, author: &str) -> Result<Vec<RankedNeighbor>> {
    let id = graph.resolve(author)?;

    let mut ranked: Vec<RankedNeighbor> = graph
        .neighbors(id)
        .into_iter()
        .map(|(other, weight)| RankedNeighbor {
            author: graph.name(other).to_string(),
            weight,
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.weight
            .cmp(&a.weight)
            .then_with(|| a.author.cmp(&b.author))
    });

    Ok(ranked)
}

/// Finds the author with the most distinct collaborators.
///
/// Degree counts collaborators, not papers. Ties go to the smallest key.
pub fn most_collaborative(graph: &CollabGraph) -> Result<Collaborator> {
    let mut best: Option<Collaborator> = None;

    for (key, id) in graph.authors() {
        let degree = graph.degree(id);
        if best.as_ref().map_or(true, |b| degree > b.degree) {
            best = Some(Collaborator {
                author: key.to_string(),
                degree,
            });
        }
    }

    best.ok_or(GraphError::EmptyGraph)
}

/// Number of distinct collaborators of one author.
pub fn collaborator_count(graph: &CollabGraph, author: &str) -> Result<usize> {
    let id = graph.resolve(author)?;
    Ok(graph.degree(id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::build;
    use coauthor_core::Row;

    fn sample() -> CollabGraph {
        build(&[
            Row::new("Alice", "Bob, Carol", "P1"),
            Row::new("Bob", "Alice", "P2"),
        ])
        .0
    }

    #[test]
    fn test_end_to_end_most_collaborative() {
        let top = most_collaborative(&sample()).unwrap();
        assert_eq!(
            top,
            Collaborator {
                author: "alice".to_string(),
                degree: 2
            }
        );
    }

    #[test]
    fn test_rank_by_weight_then_key() {
        let graph = build(&[
            Row::new("hub", "zed, amy, kim", "P1"),
            Row::new("hub", "kim", "P2"),
        ])
        .0;

        let ranked = rank_neighbors(&graph, "HUB").unwrap();
        let order: Vec<(&str, u32)> = ranked
            .iter()
            .map(|r| (r.author.as_str(), r.weight))
            .collect();
        assert_eq!(order, vec![("kim", 2), ("amy", 1), ("zed", 1)]);
    }

    #[test]
    fn test_rank_isolated_author_is_empty() {
        let graph = build(&[Row::new("solo", "", "P")]).0;
        assert!(rank_neighbors(&graph, "solo").unwrap().is_empty());
    }

    #[test]
    fn test_most_collaborative_ties_by_key() {
        let graph = build(&[Row::new("m", "x", "P"), Row::new("b", "y", "P")]).0;
        // Every node has degree 1; "b" is the smallest key.
        assert_eq!(most_collaborative(&graph).unwrap().author, "b");
    }

    #[test]
    fn test_empty_graph() {
        let graph = CollabGraph::new();
        assert!(matches!(
            most_collaborative(&graph),
            Err(GraphError::EmptyGraph)
        ));
    }

    #[test]
    fn test_collaborator_count() {
        let graph = sample();
        assert_eq!(collaborator_count(&graph, "alice").unwrap(), 2);
        assert_eq!(collaborator_count(&graph, "carol").unwrap(), 1);
        assert!(matches!(
            collaborator_count(&graph, "nobody"),
            Err(GraphError::UnknownAuthor(_))
        ));
    }
}
