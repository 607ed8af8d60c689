//! `webjars serve` — run the HTTP server over the built graph.

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use webjars_graph::{DirectoryStore, ResourceStore, StoreChain};
use webjars_server::{ServerConfig, ServerState};

use crate::manifest::WebjarsManifest;

pub fn run(project_dir: &Path, manifest: &WebjarsManifest, bind: Option<SocketAddr>) -> Result<()> {
    let state = state(project_dir, manifest)?;
    let config = ServerConfig {
        bind: bind.unwrap_or(manifest.server.bind),
    };

    let runtime = tokio::runtime::Runtime::new().context("starting async runtime")?;
    runtime
        .block_on(webjars_server::run(config.clone(), state))
        .with_context(|| format!("serving on {}", config.bind))
}

/// Graph plus stores: archives serve the graph, and also back plain files
/// ahead of the static directory.
fn state(project_dir: &Path, manifest: &WebjarsManifest) -> Result<ServerState> {
    let graph = super::load_graph(project_dir, manifest)?;
    let archives = super::archive_store(project_dir, manifest)?;
    tracing::info!(
        webjars = graph.len(),
        resources = archives.len(),
        "loaded dependency graph"
    );

    let mut fallback: Vec<Box<dyn ResourceStore>> = vec![Box::new(archives.clone())];
    if let Some(dir) = manifest.static_dir(project_dir) {
        fallback.push(Box::new(DirectoryStore::new(dir)));
    }

    Ok(ServerState::new(
        graph,
        Arc::new(archives),
        Arc::new(StoreChain::new(fallback)),
    ))
}
