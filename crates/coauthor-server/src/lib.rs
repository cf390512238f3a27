//! Coauthor Server - WebSocket query service for the co-authorship graph
//!
//! Clients send JSON-RPC 2.0 requests as text frames:
//!
//! - `graph.info`: node, edge and isolated-author counts
//! - `graph.data`: the graph summary used for visualization
//! - `graph.refresh`: rebuild the cached snapshot from the data file
//! - `query`: `{action, author_a, author_b, remove}` runs one graph query
//!
//! `action` names the query (`shortest_path`, `priority_queue`,
//! `create_bst`, `shortest_paths_all`, `count_collaborators`,
//! `most_collaborative_author`, `longest_path`). `remove` lists author
//! names to delete from the tree built by `create_bst` before it is
//! reported. The answer carries a status, a readable message and the
//! authors to highlight.
//!
//! Each connection runs on its own task. Snapshot builds and queries run
//! on the blocking pool against an immutable snapshot from `GraphCache`.

mod cache;
mod handlers;
mod protocol;
mod server;

pub use cache::{CacheError, GraphCache, GraphSnapshot};
pub use handlers::{run_action, Action, ServerState, SharedState};
pub use protocol::{QueryOutcome, QueryParams, Request, Response, RpcError, Status};
pub use server::{QueryServer, ServerConfig, ServerError, DEFAULT_PORT};
