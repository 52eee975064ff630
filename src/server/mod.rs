//! HTTP boundary: stateless JSON routes dispatching to the search client,
//! the chat gateway, and the template generators.

mod routes;

pub use routes::build_router;

use crate::chat::ChatGateway;
use crate::client::{ArxivClient, GeminiClient, GenerativeBackend};
use crate::{Config, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

/// Shared per-process state. Everything here is immutable after startup;
/// concurrent requests share it without locking.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub arxiv: ArxivClient,
    pub gateway: Arc<ChatGateway>,
}

impl AppState {
    /// Wire the production components together from configuration.
    pub fn new(config: Arc<Config>) -> Result<Self> {
        let arxiv = ArxivClient::new(&config)?;
        let backend: Arc<dyn GenerativeBackend> = Arc::new(GeminiClient::new(&config)?);
        let gateway = Arc::new(ChatGateway::new(backend, config.models.clone()));

        Ok(Self {
            config,
            arxiv,
            gateway,
        })
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .finish()
    }
}

/// Bind and serve until the process is stopped.
pub async fn serve(state: AppState, addr: SocketAddr) -> Result<()> {
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| crate::Error::Service(format!("Failed to bind {addr}: {e}")))?;

    info!("ResearchForge AI listening on {}", addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| crate::Error::Service(format!("Server error: {e}")))?;

    Ok(())
}
