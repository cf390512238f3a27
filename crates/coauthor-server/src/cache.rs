//! Graph snapshots.
//!
//! Every query runs against an immutable `GraphSnapshot`. Without caching
//! a new snapshot is built from the row source per request. With caching,
//! one snapshot is shared until `refresh` builds a replacement and swaps
//! the pointer; readers still holding the old one keep using it untouched.
//! Reading and building run on the blocking pool, off the async workers.

use coauthor_core::RowSource;
use coauthor_graph::{build_from_source, AuthorPapers, CollabGraph, GraphError};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;
use tokio::task::JoinError;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum CacheError {
    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error("graph build task failed: {0}")]
    Task(#[from] JoinError),
}

pub type Result<T> = std::result::Result<T, CacheError>;

/// A built graph and its paper index.
#[derive(Debug)]
pub struct GraphSnapshot {
    pub graph: CollabGraph,
    pub papers: AuthorPapers,
}

impl GraphSnapshot {
    /// Reads the source and builds a snapshot from it.
    pub fn load(source: &dyn RowSource) -> coauthor_graph::Result<Self> {
        let (graph, papers) = build_from_source(source)?;
        Ok(Self { graph, papers })
    }
}

/// Hands out graph snapshots, rebuilding or reusing them.
pub struct GraphCache {
    source: Arc<dyn RowSource>,
    enabled: bool,
    current: RwLock<Option<Arc<GraphSnapshot>>>,
}

impl GraphCache {
    /// Creates a cache that rebuilds on every request.
    pub fn uncached(source: Arc<dyn RowSource>) -> Self {
        Self {
            source,
            enabled: false,
            current: RwLock::new(None),
        }
    }

    /// Creates a cache that reuses one snapshot until refreshed.
    pub fn cached(source: Arc<dyn RowSource>) -> Self {
        Self {
            source,
            enabled: true,
            current: RwLock::new(None),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Returns a snapshot to query.
    pub async fn snapshot(&self) -> Result<Arc<GraphSnapshot>> {
        if !self.enabled {
            debug!("Rebuilding graph from {}", self.source.describe());
            return self.load().await;
        }

        if let Some(snapshot) = self.current.read().await.as_ref() {
            return Ok(Arc::clone(snapshot));
        }

        self.refresh().await
    }

    /// Builds a fresh snapshot and swaps it in.
    ///
    /// The build happens before the write lock is taken. If the source
    /// fails, the previous snapshot stays in place.
    pub async fn refresh(&self) -> Result<Arc<GraphSnapshot>> {
        let snapshot = self.load().await?;

        if self.enabled {
            *self.current.write().await = Some(Arc::clone(&snapshot));
            info!(
                "Graph snapshot refreshed: {} authors, {} edges",
                snapshot.graph.node_count(),
                snapshot.graph.edge_count()
            );
        }

        Ok(snapshot)
    }

    async fn load(&self) -> Result<Arc<GraphSnapshot>> {
        let source = Arc::clone(&self.source);
        let snapshot =
            tokio::task::spawn_blocking(move || GraphSnapshot::load(source.as_ref())).await??;
        Ok(Arc::new(snapshot))
    }
}
