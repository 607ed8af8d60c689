//! Resolved WebJar resources.
//!
//! A [`WebJarResource`] is built per request from one graph entry. Its
//! dependencies are resolved eagerly, depth first, against the same graph and
//! for the same media type. Shared dependencies are not deduplicated: every
//! path that reaches an entry contributes its content again.

use crate::error::{Result, WebJarError};
use crate::graph::DependencyGraph;
use crate::manifest::{ManifestEntry, MediaType};
use crate::store::ResourceStore;

/// One entry of the graph together with its resolved dependency tree.
#[derive(Debug, Clone)]
pub struct WebJarResource<'g> {
    entry: &'g ManifestEntry,
    media_type: MediaType,
    dependencies: Vec<WebJarResource<'g>>,
}

impl<'g> WebJarResource<'g> {
    /// Resolve `entry` and everything it depends on.
    pub(crate) fn resolve(
        graph: &'g DependencyGraph,
        entry: &'g ManifestEntry,
        media_type: MediaType,
    ) -> Result<Self> {
        let mut resolving = Vec::new();
        Self::resolve_with(graph, entry, media_type, &mut resolving)
    }

    fn resolve_with(
        graph: &'g DependencyGraph,
        entry: &'g ManifestEntry,
        media_type: MediaType,
        resolving: &mut Vec<&'g str>,
    ) -> Result<Self> {
        if resolving.iter().any(|id| id.eq_ignore_ascii_case(&entry.id)) {
            let mut chain: Vec<&str> = resolving.clone();
            chain.push(&entry.id);
            return Err(WebJarError::CyclicDependency {
                chain: chain.join(" -> "),
            });
        }
        resolving.push(&entry.id);

        let mut dependencies = Vec::with_capacity(entry.dependencies.len());
        for dependency_id in &entry.dependencies {
            let dependency =
                graph
                    .entry(dependency_id)
                    .ok_or_else(|| WebJarError::DependencyNotFound {
                        id: entry.id.clone(),
                        dependency: dependency_id.clone(),
                    })?;
            dependencies.push(Self::resolve_with(graph, dependency, media_type, resolving)?);
        }

        resolving.pop();
        Ok(WebJarResource {
            entry,
            media_type,
            dependencies,
        })
    }

    /// Concatenate the content of every dependency (recursively, in
    /// declared order) followed by this entry's own files.
    pub fn read(&self, store: &dyn ResourceStore) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        self.read_into(store, &mut buffer)?;
        Ok(buffer)
    }

    fn read_into(&self, store: &dyn ResourceStore, buffer: &mut Vec<u8>) -> Result<()> {
        for dependency in &self.dependencies {
            dependency.read_into(store, buffer)?;
        }
        for file in self.files() {
            buffer.extend_from_slice(&store.load(file)?);
        }
        Ok(())
    }

    /// `{name}.{js|css}`.
    pub fn filename(&self) -> String {
        format!("{}.{}", self.entry.name, self.media_type.extension())
    }

    pub fn id(&self) -> &'g str {
        &self.entry.id
    }

    pub fn name(&self) -> &'g str {
        &self.entry.name
    }

    pub fn version(&self) -> &'g str {
        &self.entry.version
    }

    pub fn js_files(&self) -> &'g [String] {
        &self.entry.js
    }

    pub fn css_files(&self) -> &'g [String] {
        &self.entry.css
    }

    /// Own files of the requested media type.
    pub fn files(&self) -> &'g [String] {
        self.entry.files(self.media_type)
    }

    pub fn dependencies(&self) -> &[WebJarResource<'g>] {
        &self.dependencies
    }

    pub fn media_type(&self) -> MediaType {
        self.media_type
    }

    /// The underlying graph entry.
    pub fn entry(&self) -> &'g ManifestEntry {
        self.entry
    }
}
