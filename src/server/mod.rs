// Copyforge - HTTP Server Module
// Proxy endpoint that keeps provider credentials on the server

mod handlers;
mod middleware;

pub use handlers::{
    create_router, handle_generate, handle_index, handle_not_found, health_check, GenerateRequest,
};
pub use middleware::{security_headers, SECURITY_HEADERS};

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;

use crate::config::ServerConfig;
use crate::fallback::FallbackOrchestrator;

/// Main server structure. Shared read-only across requests.
pub struct CopyServer {
    /// Fallback chain with its provider handles
    orchestrator: FallbackOrchestrator,
    /// Server configuration
    config: ServerConfig,
}

impl CopyServer {
    pub fn new(orchestrator: FallbackOrchestrator, config: ServerConfig) -> Self {
        Self {
            orchestrator,
            config,
        }
    }

    /// Start the HTTP server
    pub async fn serve(self) -> Result<()> {
        let addr: SocketAddr = self
            .config
            .bind_address
            .parse()
            .with_context(|| format!("Invalid bind address: {}", self.config.bind_address))?;

        tracing::info!(
            primary = self.orchestrator.has_primary(),
            secondary = self.orchestrator.has_secondary(),
            "Model tiers configured"
        );

        let app = create_router(Arc::new(self));

        tracing::info!("Starting copyforge server on {}", addr);

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .with_context(|| format!("Failed to bind {}", addr))?;
        axum::serve(listener, app).await?;

        Ok(())
    }

    /// Get reference to the fallback orchestrator
    pub fn orchestrator(&self) -> &FallbackOrchestrator {
        &self.orchestrator
    }

    /// Get server configuration
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }
}
