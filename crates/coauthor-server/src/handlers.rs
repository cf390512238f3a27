//! Request handlers for protocol methods.
//!
//! Each handler implements one method. The `query` method dispatches on
//! an action name to one graph query and turns the answer, or the reason
//! there is none, into a `QueryOutcome`.

use crate::cache::{CacheError, GraphCache, GraphSnapshot};
use crate::protocol::{QueryOutcome, QueryParams, Response, DATA_SOURCE_ERROR, INTERNAL_ERROR};
use coauthor_graph::{
    collaborator_count, longest_path_with_budget, most_collaborative, neighbor_tree,
    rank_neighbors, shortest_path, shortest_paths_from, summarize, GraphError, SearchBudget,
};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeSet;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

/// State shared by every connection.
pub struct ServerState {
    pub cache: GraphCache,
    /// Limits applied to every longest-path query.
    pub search_budget: SearchBudget,
}

pub type SharedState = Arc<ServerState>;

/// Separator between authors in a rendered path.
const ARROW: &str = " → ";

/// The query actions a client can ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    ShortestPath,
    PriorityQueue,
    CreateBst,
    ShortestPathsAll,
    CountCollaborators,
    MostCollaborativeAuthor,
    LongestPath,
}

impl FromStr for Action {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "shortest_path" => Ok(Self::ShortestPath),
            "priority_queue" => Ok(Self::PriorityQueue),
            "create_bst" => Ok(Self::CreateBst),
            "shortest_paths_all" => Ok(Self::ShortestPathsAll),
            "count_collaborators" => Ok(Self::CountCollaborators),
            "most_collaborative_author" => Ok(Self::MostCollaborativeAuthor),
            "longest_path" => Ok(Self::LongestPath),
            other => Err(format!("invalid action: {}", other)),
        }
    }
}

fn cache_error(id: Option<Value>, error: CacheError) -> Response {
    let code = match error {
        CacheError::Graph(_) => DATA_SOURCE_ERROR,
        CacheError::Task(_) => INTERNAL_ERROR,
    };
    Response::error(id, code, error.to_string())
}

/// Handles the graph.info method.
pub async fn handle_info(state: &ServerState, id: Option<Value>) -> Response {
    let snapshot = match state.cache.snapshot().await {
        Ok(s) => s,
        Err(e) => return cache_error(id, e),
    };

    #[derive(Serialize)]
    struct InfoResult {
        #[serde(rename = "nodeCount")]
        node_count: usize,
        #[serde(rename = "edgeCount")]
        edge_count: usize,
        isolated: usize,
        cached: bool,
        version: &'static str,
    }

    let stats = snapshot.graph.stats();
    Response::success(
        id,
        InfoResult {
            node_count: stats.node_count,
            edge_count: stats.edge_count,
            isolated: stats.isolated,
            cached: state.cache.is_enabled(),
            version: env!("CARGO_PKG_VERSION"),
        },
    )
}

/// Handles the graph.data method.
pub async fn handle_graph_data(state: &ServerState, id: Option<Value>) -> Response {
    match state.cache.snapshot().await {
        Ok(snapshot) => Response::success(id, summarize(&snapshot.graph, &snapshot.papers)),
        Err(e) => cache_error(id, e),
    }
}

/// Handles the graph.refresh method.
pub async fn handle_refresh(state: &ServerState, id: Option<Value>) -> Response {
    match state.cache.refresh().await {
        Ok(snapshot) => Response::success(
            id,
            serde_json::json!({
                "nodeCount": snapshot.graph.node_count(),
                "edgeCount": snapshot.graph.edge_count()
            }),
        ),
        Err(e) => cache_error(id, e),
    }
}

/// Handles the query method.
///
/// The action runs on the blocking pool; an exhaustive longest-path
/// search can take up to the whole search budget.
pub async fn handle_query(
    state: &ServerState,
    id: Option<Value>,
    params: QueryParams,
) -> Response {
    let start = Instant::now();
    let snapshot = match state.cache.snapshot().await {
        Ok(s) => s,
        Err(e) => return cache_error(id, e),
    };

    let action = params.action.clone();
    let budget = state.search_budget;
    let task = tokio::task::spawn_blocking(move || run_action(&snapshot, &params, budget));
    let outcome = match task.await {
        Ok(outcome) => outcome,
        Err(e) => return cache_error(id, CacheError::Task(e)),
    };

    debug!(
        "Query {} finished in {}ms: {:?}",
        action,
        start.elapsed().as_millis(),
        outcome.status
    );

    Response::success(id, outcome)
}

/// Runs one action against a snapshot.
pub fn run_action(
    snapshot: &GraphSnapshot,
    params: &QueryParams,
    budget: SearchBudget,
) -> QueryOutcome {
    let action = match params.action.parse::<Action>() {
        Ok(action) => action,
        Err(message) => return QueryOutcome::failure(message),
    };

    let author_a = params.author_a.trim();
    let author_b = params.author_b.trim();

    let needs_a = action != Action::MostCollaborativeAuthor;
    if action == Action::ShortestPath && (author_a.is_empty() || author_b.is_empty()) {
        return QueryOutcome::failure("Both author names are required.");
    }
    if needs_a && author_a.is_empty() {
        return QueryOutcome::failure("Author name is required.");
    }

    let result = match action {
        Action::ShortestPath => shortest_path_outcome(snapshot, author_a, author_b),
        Action::PriorityQueue => priority_queue_outcome(snapshot, author_a),
        Action::CreateBst => bst_outcome(snapshot, author_a, &params.remove),
        Action::ShortestPathsAll => all_paths_outcome(snapshot, author_a),
        Action::CountCollaborators => count_outcome(snapshot, author_a),
        Action::MostCollaborativeAuthor => most_collaborative_outcome(snapshot),
        Action::LongestPath => longest_path_outcome(snapshot, author_a, budget),
    };

    result.unwrap_or_else(|e| QueryOutcome::failure(e.to_string()))
}

type Outcome = Result<QueryOutcome, GraphError>;

fn shortest_path_outcome(snapshot: &GraphSnapshot, a: &str, b: &str) -> Outcome {
    let route = shortest_path(&snapshot.graph, a, b)?;
    Ok(QueryOutcome::success(
        format!(
            "Shortest path: {} (length: {})",
            route.path.join(ARROW),
            route.distance
        ),
        route.path.clone(),
    )
    .with_data(route))
}

fn priority_queue_outcome(snapshot: &GraphSnapshot, a: &str) -> Outcome {
    let ranked = rank_neighbors(&snapshot.graph, a)?;
    let key = snapshot.graph.name(snapshot.graph.resolve(a)?).to_string();

    let lines: Vec<String> = ranked
        .iter()
        .map(|r| format!("{}: {}", r.author, r.weight))
        .collect();
    let highlight = std::iter::once(key)
        .chain(ranked.iter().map(|r| r.author.clone()))
        .collect();

    Ok(
        QueryOutcome::success(format!("Priority queue:\n{}", lines.join("\n")), highlight)
            .with_data(ranked),
    )
}

fn bst_outcome(snapshot: &GraphSnapshot, a: &str, remove: &[String]) -> Outcome {
    let mut tree = neighbor_tree(&snapshot.graph, a)?;
    for key in remove {
        tree.remove(&coauthor_core::normalize(key));
    }
    let keys = tree.inorder();

    Ok(
        QueryOutcome::success(format!("BST nodes: {}", keys.join(", ")), keys.clone())
            .with_data(keys),
    )
}

fn all_paths_outcome(snapshot: &GraphSnapshot, a: &str) -> Outcome {
    let routes = shortest_paths_from(&snapshot.graph, a)?;

    let mut lines = Vec::new();
    let mut highlight = BTreeSet::new();
    for (target, route) in &routes {
        if route.path.is_empty() {
            continue;
        }
        lines.push(format!(
            "{}: {} (length: {})",
            target,
            route.path.join(ARROW),
            route.distance
        ));
        highlight.extend(route.path.iter().cloned());
    }

    Ok(QueryOutcome::success(
        format!("All shortest paths:\n{}", lines.join("\n")),
        highlight.into_iter().collect(),
    )
    .with_data(routes))
}

fn count_outcome(snapshot: &GraphSnapshot, a: &str) -> Outcome {
    let count = collaborator_count(&snapshot.graph, a)?;
    let key = snapshot.graph.name(snapshot.graph.resolve(a)?);

    Ok(QueryOutcome::success(
        format!("{} collaborated with {} authors in total.", key, count),
        Vec::new(),
    )
    .with_data(count))
}

fn most_collaborative_outcome(snapshot: &GraphSnapshot) -> Outcome {
    let top = most_collaborative(&snapshot.graph)?;

    Ok(QueryOutcome::success(
        format!(
            "Most collaborative author: {} ({} collaborations)",
            top.author, top.degree
        ),
        vec![top.author.clone()],
    )
    .with_data(top))
}

fn longest_path_outcome(snapshot: &GraphSnapshot, a: &str, budget: SearchBudget) -> Outcome {
    let path = longest_path_with_budget(&snapshot.graph, a, budget)?;

    Ok(
        QueryOutcome::success(format!("Longest path: {}", path.join(ARROW)), path.clone())
            .with_data(path),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::Status;
    use coauthor_core::{MemorySource, Row};
    use std::time::Duration;

    fn snapshot() -> GraphSnapshot {
        let source = MemorySource::new(vec![
            Row::new("Alice", "Bob, Carol", "P1"),
            Row::new("Bob", "Alice", "P2"),
            Row::new("Dave", "", "P3"),
        ]);
        GraphSnapshot::load(&source).unwrap()
    }

    fn params(action: &str, a: &str, b: &str) -> QueryParams {
        QueryParams {
            action: action.to_string(),
            author_a: a.to_string(),
            author_b: b.to_string(),
            remove: Vec::new(),
        }
    }

    fn run(action: &str, a: &str, b: &str) -> QueryOutcome {
        run_action(&snapshot(), &params(action, a, b), SearchBudget::unlimited())
    }

    #[test]
    fn test_shortest_path() {
        let outcome = run("shortest_path", "Alice", "CAROL");
        assert_eq!(outcome.status, Status::Success);
        assert_eq!(outcome.result, "Shortest path: alice → carol (length: 1)");
        assert_eq!(outcome.highlight_nodes, vec!["alice", "carol"]);
    }

    #[test]
    fn test_shortest_path_requires_both() {
        let outcome = run("shortest_path", "Alice", " ");
        assert_eq!(outcome.status, Status::Error);
        assert_eq!(outcome.result, "Both author names are required.");
    }

    #[test]
    fn test_no_path_is_an_error_outcome() {
        let outcome = run("shortest_path", "Alice", "Dave");
        assert_eq!(outcome.status, Status::Error);
        assert!(outcome.result.contains("no path"));
    }

    #[test]
    fn test_priority_queue() {
        let outcome = run("priority_queue", "alice", "");
        assert_eq!(outcome.result, "Priority queue:\nbob: 2\ncarol: 1");
        assert_eq!(outcome.highlight_nodes, vec!["alice", "bob", "carol"]);
    }

    #[test]
    fn test_create_bst_with_removal() {
        let mut p = params("create_bst", "Alice", "");
        p.remove = vec!["BOB".to_string(), "zed".to_string()];
        let outcome = run_action(&snapshot(), &p, SearchBudget::unlimited());
        assert_eq!(outcome.result, "BST nodes: carol");
        assert_eq!(outcome.highlight_nodes, vec!["carol"]);
    }

    #[test]
    fn test_all_paths_skip_unreachable() {
        let outcome = run("shortest_paths_all", "bob", "");
        assert_eq!(
            outcome.result,
            "All shortest paths:\n\
             alice: bob → alice (length: 2)\n\
             bob: bob (length: 0)\n\
             carol: bob → alice → carol (length: 3)"
        );
        assert_eq!(outcome.highlight_nodes, vec!["alice", "bob", "carol"]);
    }

    #[test]
    fn test_count_and_most_collaborative() {
        let count = run("count_collaborators", "Alice", "");
        assert_eq!(count.result, "alice collaborated with 2 authors in total.");

        let top = run("most_collaborative_author", "", "");
        assert_eq!(top.result, "Most collaborative author: alice (2 collaborations)");
        assert_eq!(top.highlight_nodes, vec!["alice"]);
    }

    #[test]
    fn test_longest_path() {
        let outcome = run("longest_path", "carol", "");
        assert_eq!(outcome.result, "Longest path: carol → alice → bob");
    }

    #[test]
    fn test_longest_path_budget() {
        let budget = SearchBudget::unlimited().with_max_steps(1);
        let outcome = run_action(&snapshot(), &params("longest_path", "carol", ""), budget);
        assert_eq!(outcome.status, Status::Error);
        assert!(outcome.result.contains("budget"));
    }

    #[test]
    fn test_unknown_author_and_action() {
        let unknown = run("priority_queue", "Zed", "");
        assert_eq!(unknown.status, Status::Error);
        assert_eq!(unknown.result, "author 'Zed' not found in graph");

        let invalid = run("fly", "alice", "");
        assert_eq!(invalid.result, "invalid action: fly");

        let missing = run("longest_path", "", "");
        assert_eq!(missing.result, "Author name is required.");
    }

    fn state(
        source: impl coauthor_core::RowSource + 'static,
        budget: SearchBudget,
    ) -> ServerState {
        ServerState {
            cache: GraphCache::cached(Arc::new(source)),
            search_budget: budget,
        }
    }

    #[tokio::test]
    async fn test_data_source_error_is_rpc_error() {
        let dir = tempfile::tempdir().unwrap();
        let source = coauthor_core::CsvSource::new(dir.path().join("missing.csv"));
        let state = state(source, SearchBudget::unlimited());

        let response =
            handle_query(&state, None, params("most_collaborative_author", "", "")).await;
        assert_eq!(response.error.map(|e| e.code), Some(DATA_SOURCE_ERROR));
    }

    #[tokio::test]
    async fn test_long_search_leaves_runtime_responsive() {
        // Every author wrote with every other, so the search cannot finish.
        let names: Vec<String> = (0..14).map(|i| format!("author {}", i)).collect();
        let rows = names
            .iter()
            .map(|name| Row::new(name.clone(), names.join(", "), "p"))
            .collect();
        let budget = SearchBudget::unlimited().with_timeout(Duration::from_millis(500));
        let state = state(MemorySource::new(rows), budget);
        state.cache.snapshot().await.unwrap();

        let spawned = Instant::now();
        let sleeper = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            spawned.elapsed()
        });

        let response = handle_query(&state, None, params("longest_path", "author 0", "")).await;
        let woke_after = sleeper.await.unwrap();
        assert!(woke_after < Duration::from_millis(400), "{:?}", woke_after);

        let outcome: QueryOutcome = serde_json::from_value(response.result.unwrap()).unwrap();
        assert_eq!(outcome.status, Status::Error);
        assert!(outcome.result.contains("budget"));
    }
}
