//! Edge export type.

use serde::{Deserialize, Serialize};

/// An undirected collaboration edge for export and visualization.
///
/// `source` is always the lexically smaller key, so each edge has
/// exactly one representation.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GraphEdge {
    pub source: String,
    pub target: String,
    /// Number of rows linking the two authors.
    pub weight: u32,
}

impl GraphEdge {
    /// Creates an edge, ordering the endpoints.
    pub fn new(a: impl Into<String>, b: impl Into<String>, weight: u32) -> Self {
        let (a, b) = (a.into(), b.into());
        let (source, target) = if a <= b { (a, b) } else { (b, a) };
        Self {
            source,
            target,
            weight,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints_are_ordered() {
        let edge = GraphEdge::new("zed", "amy", 3);
        assert_eq!(edge.source, "amy");
        assert_eq!(edge.target, "zed");
        assert_eq!(edge, GraphEdge::new("amy", "zed", 3));
    }
}
