//! Graph summary for visualization.
//!
//! Classifies every author as a high or low collaborator against the
//! average total edge weight and attaches the sizes a renderer needs.
//! Nothing here produces markup; callers decide how to draw a category.

use crate::edge::GraphEdge;
use crate::graph::CollabGraph;
use crate::papers::AuthorPapers;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Authors above `average * THRESHOLD_FACTOR` are classified high.
pub const THRESHOLD_FACTOR: f64 = 1.2;

/// Whether an author collaborates noticeably more than average.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    High,
    Low,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::High => "high",
            Category::Low => "low",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One author, ready to draw.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeSummary {
    pub id: String,
    pub total_weight: u64,
    pub degree: usize,
    pub size: f64,
    pub category: Category,
    pub papers: Vec<String>,
}

/// The whole graph, ready to draw.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphSummary {
    pub nodes: Vec<NodeSummary>,
    pub edges: Vec<GraphEdge>,
    pub average_weight: f64,
    pub threshold: f64,
}

impl GraphSummary {
    /// Number of authors classified high.
    pub fn high_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| n.category == Category::High)
            .count()
    }
}

/// Summarizes the graph for a renderer.
///
/// High authors get `20 + 2 * degree`, low authors `10 + 1.5 * degree`.
/// Nodes come out in key order and each edge appears once.
pub fn summarize(graph: &CollabGraph, papers: &AuthorPapers) -> GraphSummary {
    let totals: Vec<(&str, u64, usize)> = graph
        .authors()
        .map(|(key, id)| (key, graph.total_weight(id), graph.degree(id)))
        .collect();

    let sum: u64 = totals.iter().map(|(_, total, _)| total).sum();
    let average_weight = if totals.is_empty() {
        0.0
    } else {
        sum as f64 / totals.len() as f64
    };
    let threshold = average_weight * THRESHOLD_FACTOR;

    let nodes = totals
        .into_iter()
        .map(|(key, total_weight, degree)| {
            let (size, category) = if total_weight as f64 > threshold {
                (20.0 + degree as f64 * 2.0, Category::High)
            } else {
                (10.0 + degree as f64 * 1.5, Category::Low)
            };
            NodeSummary {
                id: key.to_string(),
                total_weight,
                degree,
                size,
                category,
                papers: papers.get(key).to_vec(),
            }
        })
        .collect();

    GraphSummary {
        nodes,
        edges: graph.export_edges(),
        average_weight,
        threshold,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::build;
    use coauthor_core::Row;

    #[test]
    fn test_empty_graph() {
        let summary = summarize(&CollabGraph::new(), &AuthorPapers::new());
        assert!(summary.nodes.is_empty());
        assert!(summary.edges.is_empty());
        assert_eq!(summary.average_weight, 0.0);
        assert_eq!(summary.threshold, 0.0);
    }

    #[test]
    fn test_uniform_weights_are_all_low() {
        // A cycle: every author has total weight 2.
        let (graph, papers) = build(&[
            Row::new("a", "b", "P1"),
            Row::new("b", "c", "P2"),
            Row::new("c", "a", "P3"),
        ]);

        let summary = summarize(&graph, &papers);
        assert_eq!(summary.average_weight, 2.0);
        assert_eq!(summary.high_count(), 0);
        for node in &summary.nodes {
            assert_eq!(node.category, Category::Low);
            assert_eq!(node.size, 13.0);
        }
    }

    #[test]
    fn test_hub_is_high() {
        let (graph, papers) = build(&[Row::new("Hub", "a, b, c, d", "P1")]);

        let summary = summarize(&graph, &papers);
        // Totals: hub 4, leaves 1 each. Average 8 / 5 = 1.6, threshold 1.92.
        assert!((summary.threshold - 1.92).abs() < 1e-9);

        let hub = summary.nodes.iter().find(|n| n.id == "hub").unwrap();
        assert_eq!(hub.category, Category::High);
        assert_eq!(hub.size, 28.0);
        assert_eq!(hub.papers, vec!["P1"]);

        let leaf = summary.nodes.iter().find(|n| n.id == "a").unwrap();
        assert_eq!(leaf.category, Category::Low);
        assert_eq!(leaf.size, 11.5);
    }

    #[test]
    fn test_edges_emitted_once_with_weight() {
        let (graph, papers) = build(&[
            Row::new("Alice", "Bob, Carol", "P1"),
            Row::new("Bob", "Alice", "P2"),
        ]);

        let summary = summarize(&graph, &papers);
        assert_eq!(summary.nodes.len(), 3);
        assert_eq!(
            summary.edges,
            vec![
                GraphEdge::new("alice", "bob", 2),
                GraphEdge::new("alice", "carol", 1),
            ]
        );
    }

    #[test]
    fn test_serializes_category_lowercase() {
        let (graph, papers) = build(&[Row::new("a", "b", "P")]);
        let json = serde_json::to_value(summarize(&graph, &papers)).unwrap();
        assert_eq!(json["nodes"][0]["category"], "low");
        assert_eq!(json["edges"][0]["weight"], 1);
    }
}
