//! Core graph data structure.
//!
//! The CollabGraph wraps a petgraph undirected graph and adds a key index
//! for lookups by author. It's the central data structure every query
//! works against.

use crate::edge::GraphEdge;
use crate::error::{GraphError, Result};
use coauthor_core::normalize;
use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Unique identifier for a node in the graph.
pub type NodeId = NodeIndex;

/// The collaboration graph.
///
/// Nodes are normalized author keys, edge weights count the rows that
/// link two authors. Each undirected edge is stored once, so the weight
/// seen from either endpoint is the same value.
#[derive(Debug, Clone, Default)]
pub struct CollabGraph {
    /// The underlying petgraph graph.
    pub(crate) graph: UnGraph<String, u32>,

    /// Maps author keys to graph node indexes, in key order.
    index: BTreeMap<String, NodeId>,
}

impl CollabGraph {
    /// Creates a new empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the node for an author key, creating it if needed.
    ///
    /// The key is expected to be normalized already.
    pub fn add_author(&mut self, key: &str) -> NodeId {
        if let Some(&id) = self.index.get(key) {
            return id;
        }
        let id = self.graph.add_node(key.to_string());
        self.index.insert(key.to_string(), id);
        id
    }

    /// Adds one collaboration between two authors.
    ///
    /// Creates the edge with weight 1 or bumps the existing weight.
    /// Returns the new weight, or `None` when both ends are the same
    /// node (self-loops are never stored).
    pub fn add_collaboration(&mut self, a: NodeId, b: NodeId) -> Option<u32> {
        if a == b {
            return None;
        }
        match self.graph.find_edge(a, b) {
            Some(edge) => {
                let weight = self.graph.edge_weight_mut(edge)?;
                *weight += 1;
                Some(*weight)
            }
            None => {
                self.graph.add_edge(a, b, 1);
                Some(1)
            }
        }
    }

    /// Gets the node index for an exact author key.
    pub fn get_index(&self, key: &str) -> Option<NodeId> {
        self.index.get(key).copied()
    }

    /// Looks up a raw author name, normalizing it first.
    ///
    /// This is the entry point every query uses, so user input and
    /// build-time keys always go through the same normalizer.
    pub fn resolve(&self, raw: &str) -> Result<NodeId> {
        self.get_index(&normalize(raw))
            .ok_or_else(|| GraphError::UnknownAuthor(raw.trim().to_string()))
    }

    /// Returns true if the raw name resolves to a node.
    pub fn contains(&self, raw: &str) -> bool {
        self.resolve(raw).is_ok()
    }

    /// Gets the author key of a node.
    ///
    /// Unknown indexes map to the empty string.
    pub fn name(&self, id: NodeId) -> &str {
        self.graph.node_weight(id).map(String::as_str).unwrap_or("")
    }

    /// Weight of the edge between two nodes, 0 when they are not linked.
    pub fn weight_between(&self, a: NodeId, b: NodeId) -> u32 {
        self.graph
            .find_edge(a, b)
            .and_then(|edge| self.graph.edge_weight(edge))
            .copied()
            .unwrap_or(0)
    }

    /// Weight of the edge between two authors given by key.
    pub fn weight(&self, a: &str, b: &str) -> u32 {
        match (self.get_index(a), self.get_index(b)) {
            (Some(a), Some(b)) => self.weight_between(a, b),
            _ => 0,
        }
    }

    /// Neighbors of a node with their edge weights, sorted by author key.
    pub fn neighbors(&self, id: NodeId) -> Vec<(NodeId, u32)> {
        let mut neighbors: Vec<(NodeId, u32)> = self
            .graph
            .edges(id)
            .map(|edge| {
                let other = if edge.source() == id {
                    edge.target()
                } else {
                    edge.source()
                };
                (other, *edge.weight())
            })
            .collect();
        neighbors.sort_by(|a, b| self.name(a.0).cmp(self.name(b.0)));
        neighbors
    }

    /// Neighbor keys of a node, sorted.
    pub fn neighbor_names(&self, id: NodeId) -> Vec<&str> {
        self.neighbors(id)
            .into_iter()
            .map(|(other, _)| self.name(other))
            .collect()
    }

    /// Number of distinct collaborators.
    pub fn degree(&self, id: NodeId) -> usize {
        self.graph.edges(id).count()
    }

    /// Sum of incident edge weights.
    pub fn total_weight(&self, id: NodeId) -> u64 {
        self.graph.edges(id).map(|edge| u64::from(*edge.weight())).sum()
    }

    /// Returns the number of nodes.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Returns the number of undirected edges.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Returns true if the graph has no nodes.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Iterates over authors and their node indexes in key order.
    pub fn authors(&self) -> impl Iterator<Item = (&str, NodeId)> + '_ {
        self.index.iter().map(|(key, id)| (key.as_str(), *id))
    }

    /// Returns every edge once, sorted by endpoints.
    pub fn export_edges(&self) -> Vec<GraphEdge> {
        let mut edges: Vec<GraphEdge> = self
            .graph
            .edge_references()
            .map(|edge| {
                GraphEdge::new(
                    self.name(edge.source()),
                    self.name(edge.target()),
                    *edge.weight(),
                )
            })
            .collect();
        edges.sort();
        edges
    }

    /// Removes any edge whose endpoints coincide. Returns how many went.
    pub(crate) fn remove_self_loops(&mut self) -> usize {
        let before = self.graph.edge_count();
        self.graph.retain_edges(|g, edge| match g.edge_endpoints(edge) {
            Some((a, b)) => a != b,
            None => true,
        });
        before - self.graph.edge_count()
    }

    /// Checks the structural invariants: no self-loops, at most one edge
    /// per pair, every weight at least 1, index and graph in sync.
    pub fn invariants_hold(&self) -> bool {
        let mut seen = std::collections::HashSet::new();
        for edge in self.graph.edge_references() {
            let (a, b) = (edge.source(), edge.target());
            if a == b || *edge.weight() == 0 {
                return false;
            }
            let pair = if a < b { (a, b) } else { (b, a) };
            if !seen.insert(pair) {
                return false;
            }
        }
        self.index.len() == self.graph.node_count()
            && self
                .index
                .iter()
                .all(|(key, id)| self.graph.node_weight(*id) == Some(key))
    }
}

/// Graph statistics for the info endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphStats {
    pub node_count: usize,
    pub edge_count: usize,
    pub isolated: usize,
}

impl CollabGraph {
    /// Returns graph statistics.
    pub fn stats(&self) -> GraphStats {
        GraphStats {
            node_count: self.node_count(),
            edge_count: self.edge_count(),
            isolated: self
                .authors()
                .filter(|(_, id)| self.degree(*id) == 0)
                .count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> (CollabGraph, NodeId, NodeId, NodeId) {
        let mut graph = CollabGraph::new();
        let a = graph.add_author("alice");
        let b = graph.add_author("bob");
        let c = graph.add_author("carol");
        graph.add_collaboration(a, b);
        graph.add_collaboration(b, a);
        graph.add_collaboration(a, c);
        (graph, a, b, c)
    }

    #[test]
    fn test_add_author_is_idempotent() {
        let mut graph = CollabGraph::new();
        let first = graph.add_author("alice");
        let second = graph.add_author("alice");
        assert_eq!(first, second);
        assert_eq!(graph.node_count(), 1);
    }

    #[test]
    fn test_weights_are_symmetric() {
        let (graph, a, b, c) = triangle();
        assert_eq!(graph.weight_between(a, b), 2);
        assert_eq!(graph.weight_between(b, a), 2);
        assert_eq!(graph.weight("carol", "alice"), 1);
        assert_eq!(graph.weight_between(b, c), 0);
        assert_eq!(graph.edge_count(), 2);
    }

    #[test]
    fn test_self_loop_rejected() {
        let mut graph = CollabGraph::new();
        let a = graph.add_author("alice");
        assert_eq!(graph.add_collaboration(a, a), None);
        assert_eq!(graph.edge_count(), 0);
        assert_eq!(graph.degree(a), 0);
    }

    #[test]
    fn test_neighbors_sorted_by_key() {
        let mut graph = CollabGraph::new();
        let hub = graph.add_author("hub");
        for name in ["zoe", "adam", "mia"] {
            let id = graph.add_author(name);
            graph.add_collaboration(id, hub);
        }
        assert_eq!(graph.neighbor_names(hub), vec!["adam", "mia", "zoe"]);
        assert_eq!(graph.degree(hub), 3);
        assert_eq!(graph.total_weight(hub), 3);
    }

    #[test]
    fn test_resolve_normalizes() {
        let (graph, a, _, _) = triangle();
        assert_eq!(graph.resolve("  ALICE ").unwrap(), a);
        assert!(graph.contains("'Bob'"));
        assert!(matches!(
            graph.resolve("dave"),
            Err(GraphError::UnknownAuthor(name)) if name == "dave"
        ));
    }

    #[test]
    fn test_export_edges_once() {
        let (graph, _, _, _) = triangle();
        let edges = graph.export_edges();
        assert_eq!(
            edges,
            vec![
                GraphEdge::new("alice", "bob", 2),
                GraphEdge::new("alice", "carol", 1),
            ]
        );
    }

    #[test]
    fn test_stats_and_invariants() {
        let (mut graph, _, _, _) = triangle();
        graph.add_author("dave");
        assert!(graph.invariants_hold());
        assert_eq!(
            graph.stats(),
            GraphStats {
                node_count: 4,
                edge_count: 2,
                isolated: 1
            }
        );
        assert_eq!(graph.remove_self_loops(), 0);
    }
}
