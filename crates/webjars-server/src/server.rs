use std::net::SocketAddr;

use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;

use crate::handler::{webjar_handler, ServerState};

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 8080)),
        }
    }
}

/// Build the Axum router with all routes.
pub fn build_router(state: ServerState) -> Router {
    Router::new()
        .route("/webjars/{*path}", get(webjar_handler))
        .route("/health", get(health_handler))
        .with_state(state)
}

/// Bind and start serving in the background.
pub async fn start(config: ServerConfig, state: ServerState) -> Result<ServerHandle, std::io::Error> {
    let router = build_router(state);
    let listener = TcpListener::bind(config.bind).await?;
    let local_addr = listener.local_addr()?;

    tracing::info!(addr = %local_addr, "webjars server started");

    let server = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, router).await {
            tracing::error!(error = %e, "webjars server stopped");
        }
    });

    Ok(ServerHandle {
        addr: local_addr,
        server,
    })
}

/// Bind and serve until Ctrl-C.
pub async fn run(config: ServerConfig, state: ServerState) -> Result<(), std::io::Error> {
    let router = build_router(state);
    let listener = TcpListener::bind(config.bind).await?;
    tracing::info!(addr = %listener.local_addr()?, "webjars server listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
            tracing::info!("shutting down");
        })
        .await
}

/// Handle returned by `start()`; aborts the server when dropped.
pub struct ServerHandle {
    pub addr: SocketAddr,
    server: tokio::task::JoinHandle<()>,
}

impl ServerHandle {
    pub fn port(&self) -> u16 {
        self.addr.port()
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for ServerHandle {
    fn drop(&mut self) {
        self.server.abort();
    }
}

async fn health_handler() -> impl IntoResponse {
    "ok"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_binds_loopback() {
        let config = ServerConfig::default();
        assert!(config.bind.ip().is_loopback());
        assert_eq!(config.bind.port(), 8080);
    }
}
