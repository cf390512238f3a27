//! WebSocket server implementation.
//!
//! Handles client connections and routes messages to handlers.

use crate::cache::GraphCache;
use crate::handlers::{
    handle_graph_data, handle_info, handle_query, handle_refresh, ServerState, SharedState,
};
use crate::protocol::{QueryParams, Request, Response};
use coauthor_core::RowSource;
use coauthor_graph::SearchBudget;
use futures_util::{SinkExt, StreamExt};
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::{accept_async, tungstenite::Message};
use tracing::{debug, error, info, warn};

pub const DEFAULT_PORT: u16 = 7431;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("websocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("failed to encode response: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to.
    pub addr: SocketAddr,
    /// Reuse one graph snapshot across requests instead of rebuilding.
    pub cache: bool,
    /// Limits applied to every longest-path query.
    pub search_budget: SearchBudget,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from((Ipv4Addr::LOCALHOST, DEFAULT_PORT)),
            cache: false,
            search_budget: SearchBudget::unlimited().with_timeout(Duration::from_secs(10)),
        }
    }
}

/// The co-author query server.
pub struct QueryServer {
    addr: SocketAddr,
    state: SharedState,
}

impl QueryServer {
    /// Creates a new server reading rows from `source`.
    pub fn new(source: Arc<dyn RowSource>, config: ServerConfig) -> Self {
        let cache = if config.cache {
            GraphCache::cached(source)
        } else {
            GraphCache::uncached(source)
        };

        Self {
            addr: config.addr,
            state: Arc::new(ServerState {
                cache,
                search_budget: config.search_budget,
            }),
        }
    }

    /// Runs the server, accepting connections forever.
    pub async fn run(&self) -> Result<(), ServerError> {
        let addr = self.addr;
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| ServerError::Bind { addr, source })?;
        info!("Coauthor server listening on {}", addr);

        loop {
            match listener.accept().await {
                Ok((stream, peer)) => {
                    debug!("New connection from {}", peer);
                    let state = Arc::clone(&self.state);
                    tokio::spawn(async move {
                        if let Err(e) = serve_client(stream, peer, state).await {
                            error!("Connection error from {}: {}", peer, e);
                        }
                    });
                }
                Err(e) => {
                    error!("Accept error: {}", e);
                }
            }
        }
    }
}

/// Answers one client's requests until it closes the socket.
///
/// Requests on one connection are answered in order. Binary frames and
/// pongs are ignored.
async fn serve_client(
    stream: TcpStream,
    peer: SocketAddr,
    state: SharedState,
) -> Result<(), ServerError> {
    let (mut sink, mut frames) = accept_async(stream).await?.split();
    info!("WebSocket connection established with {}", peer);

    while let Some(frame) = frames.next().await {
        let reply = match frame {
            Ok(Message::Text(text)) => {
                let response = process_message(&text, &state).await;
                Message::Text(serde_json::to_string(&response)?)
            }
            Ok(Message::Ping(payload)) => Message::Pong(payload),
            Ok(Message::Close(_)) => {
                debug!("Client {} disconnected", peer);
                break;
            }
            Ok(_) => continue,
            Err(e) => {
                warn!("Message error from {}: {}", peer, e);
                break;
            }
        };
        sink.send(reply).await?;
    }

    info!("Connection closed: {}", peer);
    Ok(())
}

/// Decodes one JSON-RPC request and routes it by method.
pub(crate) async fn process_message(text: &str, state: &ServerState) -> Response {
    let request: Request = match serde_json::from_str(text) {
        Ok(r) => r,
        Err(_) => return Response::parse_error(),
    };

    let id = request.id;
    debug!("Processing method: {}", request.method);

    match request.method.as_str() {
        "graph.info" => handle_info(state, id).await,
        "graph.data" => handle_graph_data(state, id).await,
        "graph.refresh" => handle_refresh(state, id).await,
        "query" => match serde_json::from_value::<QueryParams>(request.params) {
            Ok(params) => handle_query(state, id, params).await,
            Err(e) => Response::invalid_params(id, e.to_string()),
        },
        method => Response::method_not_found(id, method),
    }
}
