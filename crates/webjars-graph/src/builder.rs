//! Dependency graph construction.
//!
//! Turns a project's root WebJars into a map from each root to its
//! dependencies, inspecting every distinct archive only once per build.

use std::collections::HashMap;

use indexmap::IndexMap;
use tracing::{debug, info, trace};

use crate::error::{Result, WebJarError};
use crate::inspect::{self, ArchiveReader};
use crate::manifest::ManifestEntry;
use crate::repository::{ArtifactResolver, ResolvedArtifact};

/// A root archive and the entries it depends on.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphNode {
    /// The root archive's entry.
    pub entry: ManifestEntry,
    /// Its resolved dependencies, root excluded.
    pub dependencies: Vec<ManifestEntry>,
}

/// Built graph, keyed by root id, in build order.
pub type DependencyMap = IndexMap<String, GraphNode>;

/// Builds a [`DependencyMap`] from root artifacts.
pub struct GraphBuilder<'a> {
    resolver: &'a dyn ArtifactResolver,
    reader: &'a dyn ArchiveReader,
    /// Entries built during the current run, keyed by artifact name.
    cache: HashMap<String, ManifestEntry>,
}

impl<'a> GraphBuilder<'a> {
    pub fn new(resolver: &'a dyn ArtifactResolver, reader: &'a dyn ArchiveReader) -> Self {
        GraphBuilder {
            resolver,
            reader,
            cache: HashMap::new(),
        }
    }

    /// Build the graph for the given roots.
    ///
    /// Roots outside the `org.webjars` group are skipped. Any resolution or
    /// inspection failure aborts the whole build.
    pub fn build(&mut self, roots: &[ResolvedArtifact]) -> Result<DependencyMap> {
        let result = self.build_all(roots);
        self.cache.clear();
        result
    }

    fn build_all(&mut self, roots: &[ResolvedArtifact]) -> Result<DependencyMap> {
        let mut graph = DependencyMap::new();

        for root in roots {
            if !root.id.is_webjar() {
                trace!(id = %root.id, "skipping non-webjar artifact");
                continue;
            }

            let node = self.build_node(root).map_err(|e| WebJarError::BuildFailed {
                id: root.id.to_string(),
                source: Box::new(e),
            })?;
            graph.insert(node.entry.id.clone(), node);
        }

        info!(roots = graph.len(), inspected = self.cache.len(), "built dependency graph");
        Ok(graph)
    }

    fn build_node(&mut self, root: &ResolvedArtifact) -> Result<GraphNode> {
        let closure = self.resolver.resolve_transitively(root)?;

        let mut dependencies = Vec::new();
        for artifact in &closure {
            if artifact.id.name() == root.id.name() {
                continue;
            }
            dependencies.push(self.entry_for(artifact)?);
        }

        let entry = self.entry_for(root)?;
        debug!(id = %entry.id, dependencies = dependencies.len(), "built graph node");
        Ok(GraphNode {
            entry,
            dependencies,
        })
    }

    fn entry_for(&mut self, artifact: &ResolvedArtifact) -> Result<ManifestEntry> {
        if let Some(entry) = self.cache.get(artifact.id.name()) {
            trace!(id = %artifact.id, "entry cache hit");
            return Ok(entry.clone());
        }

        let entry = inspect::inspect(self.reader, &artifact.path, &artifact.id.to_string())?;
        self.cache
            .insert(artifact.id.name().to_string(), entry.clone());
        Ok(entry)
    }
}
