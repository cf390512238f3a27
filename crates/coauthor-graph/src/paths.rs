//! Path queries over the collaboration graph.
//!
//! Shortest paths use Dijkstra with edge weights taken literally as costs:
//! two authors who wrote many papers together are *farther* apart than two
//! who wrote one. Callers that want collaboration strength as closeness
//! need a different metric.
//!
//! The longest simple path is found by exhaustive search. It is exponential
//! in the worst case; use `longest_path_with_budget` when the graph is not
//! known to be small.

use crate::error::{GraphError, Result};
use crate::graph::{CollabGraph, NodeId};
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::{BTreeMap, BinaryHeap};
use std::fmt;
use std::time::{Duration, Instant};
use tracing::debug;

/// How often the deadline is checked during exhaustive search.
const DEADLINE_CHECK_INTERVAL: u64 = 256;

/// Distance from a source, or the sentinel for "cannot be reached".
///
/// Orders every finite distance before `Unreachable`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Distance {
    Finite(u64),
    Unreachable,
}

impl Distance {
    /// The finite value, if any.
    pub fn value(&self) -> Option<u64> {
        match self {
            Distance::Finite(d) => Some(*d),
            Distance::Unreachable => None,
        }
    }

    pub fn is_reachable(&self) -> bool {
        matches!(self, Distance::Finite(_))
    }
}

impl fmt::Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Distance::Finite(d) => write!(f, "{}", d),
            Distance::Unreachable => write!(f, "∞"),
        }
    }
}

/// A path from a source author and its summed edge weight.
///
/// Unreachable targets carry an empty path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    pub path: Vec<String>,
    pub distance: Distance,
}

impl Route {
    fn unreachable() -> Self {
        Self {
            path: Vec::new(),
            distance: Distance::Unreachable,
        }
    }
}

/// Finds the cheapest path between two authors.
///
/// Both names are normalized before lookup. Equal tentative distances are
/// settled in author-key order, which makes the chosen path reproducible.
pub fn shortest_path(graph: &CollabGraph, source: &str, target: &str) -> Result<Route> {
    let from = graph.resolve(source)?;
    let to = graph.resolve(target)?;

    let search = dijkstra(graph, from, Some(to));
    let route = search.route_to(graph, to);

    if !route.distance.is_reachable() {
        return Err(GraphError::NoPath {
            from: graph.name(from).to_string(),
            to: graph.name(to).to_string(),
        });
    }

    debug!(
        "Shortest path {} -> {}: {} hops, cost {}",
        graph.name(from),
        graph.name(to),
        route.path.len().saturating_sub(1),
        route.distance
    );
    Ok(route)
}

/// Finds the cheapest path from one author to every author.
///
/// Every node gets an entry. Nodes in other components map to an empty
/// path with `Distance::Unreachable`; the source maps to itself at 0.
pub fn shortest_paths_from(graph: &CollabGraph, source: &str) -> Result<BTreeMap<String, Route>> {
    let from = graph.resolve(source)?;
    let search = dijkstra(graph, from, None);

    Ok(graph
        .authors()
        .map(|(key, id)| (key.to_string(), search.route_to(graph, id)))
        .collect())
}

/// Finds the longest simple path starting at `start`, by node count.
///
/// Runs without limits. See `longest_path_with_budget`.
pub fn longest_path(graph: &CollabGraph, start: &str) -> Result<Vec<String>> {
    longest_path_with_budget(graph, start, SearchBudget::unlimited())
}

/// Finds the longest simple path starting at `start` within a budget.
///
/// Explores every simple path by depth-first search, trying neighbors in
/// key order. The first path reaching the greatest node count wins. An
/// isolated author yields a path of just itself.
pub fn longest_path_with_budget(
    graph: &CollabGraph,
    start: &str,
    budget: SearchBudget,
) -> Result<Vec<String>> {
    let start = graph.resolve(start)?;
    let began = Instant::now();

    // Neighbor lists are fixed for the whole search.
    let adjacency: Vec<Vec<NodeId>> = (0..graph.node_count())
        .map(|i| {
            graph
                .neighbors(NodeId::new(i))
                .into_iter()
                .map(|(id, _)| id)
                .collect()
        })
        .collect();

    let mut on_path = vec![false; graph.node_count()];
    let mut path: Vec<NodeId> = vec![start];
    let mut best: Vec<NodeId> = path.clone();
    // Each frame is a node on the current path and the next neighbor to try.
    let mut frames: Vec<(NodeId, usize)> = vec![(start, 0)];
    let mut steps: u64 = 0;
    on_path[start.index()] = true;

    while let Some(frame) = frames.last_mut() {
        let (node, cursor) = *frame;
        let Some(&next) = adjacency[node.index()].get(cursor) else {
            frames.pop();
            path.pop();
            on_path[node.index()] = false;
            continue;
        };
        frame.1 += 1;

        if on_path[next.index()] {
            continue;
        }

        steps += 1;
        budget.check(steps, began)?;

        on_path[next.index()] = true;
        path.push(next);
        if path.len() > best.len() {
            best = path.clone();
        }
        frames.push((next, 0));
    }

    debug!(
        "Longest path from {}: {} nodes after {} steps",
        graph.name(start),
        best.len(),
        steps
    );

    Ok(best
        .into_iter()
        .map(|id| graph.name(id).to_string())
        .collect())
}

/// Limits for exhaustive searches.
#[derive(Debug, Clone, Copy, Default)]
pub struct SearchBudget {
    max_steps: Option<u64>,
    timeout: Option<Duration>,
}

impl SearchBudget {
    /// No limits at all.
    pub fn unlimited() -> Self {
        Self::default()
    }

    /// Stops after this many path extensions.
    pub fn with_max_steps(mut self, steps: u64) -> Self {
        self.max_steps = Some(steps);
        self
    }

    /// Stops once this much wall-clock time has passed.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    fn check(&self, steps: u64, began: Instant) -> Result<()> {
        if self.max_steps.is_some_and(|max| steps > max) {
            return Err(GraphError::SearchBudgetExceeded { steps });
        }
        if let Some(timeout) = self.timeout {
            if steps % DEADLINE_CHECK_INTERVAL == 0 && began.elapsed() > timeout {
                return Err(GraphError::SearchBudgetExceeded { steps });
            }
        }
        Ok(())
    }
}

/// Settled distances and predecessors of one Dijkstra run.
struct Search {
    dist: Vec<Option<u64>>,
    prev: Vec<Option<NodeId>>,
}

impl Search {
    fn route_to(&self, graph: &CollabGraph, target: NodeId) -> Route {
        let Some(distance) = self.dist[target.index()] else {
            return Route::unreachable();
        };

        let mut path = vec![graph.name(target).to_string()];
        let mut current = target;
        while let Some(previous) = self.prev[current.index()] {
            path.push(graph.name(previous).to_string());
            current = previous;
        }
        path.reverse();

        Route {
            path,
            distance: Distance::Finite(distance),
        }
    }
}

/// Single-source Dijkstra, stopping early once `target` is settled.
fn dijkstra(graph: &CollabGraph, source: NodeId, target: Option<NodeId>) -> Search {
    let n = graph.node_count();
    let mut dist: Vec<Option<u64>> = vec![None; n];
    let mut prev: Vec<Option<NodeId>> = vec![None; n];
    let mut settled = vec![false; n];
    // Min-heap on (cost, key); the key breaks cost ties.
    let mut heap = BinaryHeap::new();

    dist[source.index()] = Some(0);
    heap.push(Reverse((0u64, graph.name(source), source)));

    while let Some(Reverse((cost, _, node))) = heap.pop() {
        if settled[node.index()] {
            continue;
        }
        settled[node.index()] = true;

        if Some(node) == target {
            break;
        }

        for (next, weight) in graph.neighbors(node) {
            if settled[next.index()] {
                continue;
            }
            let candidate = cost + u64::from(weight);
            if dist[next.index()].map_or(true, |known| candidate < known) {
                dist[next.index()] = Some(candidate);
                prev[next.index()] = Some(node);
                heap.push(Reverse((candidate, graph.name(next), next)));
            }
        }
    }

    Search { dist, prev }
}
