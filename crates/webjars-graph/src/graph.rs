//! In-memory dependency graph.
//!
//! Loaded once from a manifest and never mutated afterwards, so a single
//! instance can be shared by every request handler without locking.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use indexmap::IndexMap;
use tracing::{debug, info};

use crate::error::{Result, WebJarError};
use crate::id::ArtifactId;
use crate::manifest::{Manifest, ManifestEncoding, ManifestEntry, MediaType, RESOURCE_ROOT};
use crate::resource::WebJarResource;

#[derive(Debug)]
enum Lookup {
    /// Linear scan, first case-insensitive match wins.
    Array(Vec<ManifestEntry>),
    /// Direct access; table keys are lowercased ids.
    Indexed {
        index: HashMap<String, String>,
        table: IndexMap<String, ManifestEntry>,
    },
}

/// A parsed, read-only WebJars dependency graph.
#[derive(Debug)]
pub struct DependencyGraph {
    lookup: Lookup,
}

impl DependencyGraph {
    /// Build a graph from a parsed manifest.
    pub fn from_manifest(manifest: Manifest) -> Self {
        let lookup = match manifest {
            Manifest::Array(entries) => Lookup::Array(entries),
            Manifest::Indexed(indexed) => Lookup::Indexed {
                index: indexed.index.into_iter().collect(),
                table: indexed
                    .table
                    .into_values()
                    .map(|entry| (entry.id.to_ascii_lowercase(), entry))
                    .collect(),
            },
        };
        DependencyGraph { lookup }
    }

    /// Parse a manifest document in either encoding.
    pub fn from_json_str(input: &str) -> Result<Self> {
        Ok(Self::from_manifest(Manifest::parse(input)?))
    }

    /// Parse a manifest from a reader.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut input = String::new();
        reader.read_to_string(&mut input)?;
        Self::from_json_str(&input)
    }

    /// Load a manifest file.
    pub fn load(path: &Path) -> Result<Self> {
        let input = std::fs::read_to_string(path)?;
        let graph = Self::from_json_str(&input)?;
        info!(
            path = %path.display(),
            encoding = ?graph.encoding(),
            entries = graph.len(),
            "loaded dependency graph"
        );
        Ok(graph)
    }

    pub fn encoding(&self) -> ManifestEncoding {
        match self.lookup {
            Lookup::Array(_) => ManifestEncoding::Array,
            Lookup::Indexed { .. } => ManifestEncoding::Indexed,
        }
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        match &self.lookup {
            Lookup::Array(entries) => entries.len(),
            Lookup::Indexed { table, .. } => table.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Entries in manifest order.
    pub fn entries(&self) -> Box<dyn Iterator<Item = &ManifestEntry> + '_> {
        match &self.lookup {
            Lookup::Array(entries) => Box::new(entries.iter()),
            Lookup::Indexed { table, .. } => Box::new(table.values()),
        }
    }

    /// Look up an entry by id, ignoring case.
    pub fn entry(&self, id: &str) -> Option<&ManifestEntry> {
        match &self.lookup {
            Lookup::Array(entries) => entries.iter().find(|e| e.id.eq_ignore_ascii_case(id)),
            Lookup::Indexed { table, .. } => table.get(&id.to_ascii_lowercase()),
        }
    }

    /// Resolve the entry with the given id into a resource tree.
    ///
    /// Returns `Ok(None)` when no entry has the id. Fails when any
    /// transitive dependency is missing or the dependencies form a cycle.
    pub fn find_by_id(&self, id: &str, media_type: MediaType) -> Result<Option<WebJarResource<'_>>> {
        match self.entry(id) {
            Some(entry) => {
                debug!(id, %media_type, "resolving webjar");
                WebJarResource::resolve(self, entry, media_type).map(Some)
            }
            None => {
                debug!(id, "webjar not in graph");
                Ok(None)
            }
        }
    }

    /// Resolve a request path such as `/webjars/jquery/1.6.2/jquery.js`.
    ///
    /// For array manifests the id is derived from the path; paths that do
    /// not follow the `/webjars/{name}/{version}/...` convention yield
    /// `Ok(None)`. For indexed manifests a path missing from the index is a
    /// [`WebJarError::PathNotFound`].
    pub fn find_by_path(&self, path: &str, media_type: MediaType) -> Result<Option<WebJarResource<'_>>> {
        let relative = path.strip_prefix('/').unwrap_or(path);

        match &self.lookup {
            Lookup::Array(_) => match webjar_id(relative) {
                Some(id) => self.find_by_id(&id.to_string(), media_type),
                None => Ok(None),
            },
            Lookup::Indexed { index, .. } => {
                let relative = relative.strip_suffix('/').unwrap_or(relative);
                let key = format!("{RESOURCE_ROOT}{relative}");
                let id = index
                    .get(&key)
                    .ok_or(WebJarError::PathNotFound { path: key.clone() })?;
                self.find_by_id(id, media_type)
            }
        }
    }
}

/// Derive `org.webjars:{name}:jar:{version}` from `webjars/{name}/{version}/...`.
fn webjar_id(relative: &str) -> Option<ArtifactId> {
    let mut parts = relative.split('/');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(root), Some(name), Some(version))
            if root.eq_ignore_ascii_case("webjars") && !name.is_empty() && !version.is_empty() =>
        {
            Some(ArtifactId::webjar(name, version))
        }
        _ => None,
    }
}
