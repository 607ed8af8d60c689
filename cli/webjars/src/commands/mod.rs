//! CLI command implementations.

pub mod assemble;
pub mod build;
pub mod init;
pub mod serve;
pub mod tree;

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use webjars_graph::{ArchiveStore, DependencyGraph, MediaType, WebJarResource};

use crate::manifest::WebjarsManifest;

/// Load the graph written by `webjars build`.
pub(crate) fn load_graph(project_dir: &Path, manifest: &WebjarsManifest) -> Result<DependencyGraph> {
    let path = manifest.manifest_file(project_dir);
    if !path.is_file() {
        anyhow::bail!("{} not found (run `webjars build` first)", path.display());
    }
    DependencyGraph::load(&path).with_context(|| format!("loading {}", path.display()))
}

/// Index every archive in the project's repository.
pub(crate) fn archive_store(project_dir: &Path, manifest: &WebjarsManifest) -> Result<ArchiveStore> {
    let dir = manifest.repository_dir(project_dir);
    if !dir.is_dir() {
        return Ok(ArchiveStore::default());
    }
    ArchiveStore::scan(&dir).with_context(|| format!("indexing archives under {}", dir.display()))
}

/// Explicit `--type`, else the target's extension, else scripts.
pub(crate) fn media_type_for(target: &str, requested: Option<MediaType>) -> MediaType {
    requested
        .or_else(|| MediaType::from_path(target))
        .unwrap_or(MediaType::Js)
}

/// Look up a target given either as an artifact id or as a request path.
pub(crate) fn find<'g>(
    graph: &'g DependencyGraph,
    target: &str,
    media_type: MediaType,
) -> Result<WebJarResource<'g>> {
    let found = if target.contains('/') {
        graph.find_by_path(target, media_type)?
    } else {
        graph.find_by_id(target, media_type)?
    };
    found.ok_or_else(|| anyhow!("'{target}' is not in the dependency graph"))
}
