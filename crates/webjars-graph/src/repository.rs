//! Artifact resolution against a local repository.
//!
//! The `ArtifactResolver` trait abstracts over how archives and their
//! transitive dependencies are located. `LocalRepository` is a filesystem
//! backend laid out like a Maven repository:
//!
//! ```text
//! <root>/
//!   org/webjars/
//!     <name>/
//!       <version>/
//!         <name>-<version>.jar         — the archive
//!         <name>-<version>.deps.toml   — optional dependency descriptor
//! ```
//!
//! A descriptor lists immediate dependencies by id:
//!
//! ```text
//! dependencies = ["org.webjars:jquery:jar:1.6.2"]
//! ```

use std::collections::{HashSet, VecDeque};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::{Result, WebJarError};
use crate::id::ArtifactId;

/// An artifact together with the archive file that holds it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedArtifact {
    /// Artifact coordinates.
    pub id: ArtifactId,
    /// Local path of the archive.
    pub path: PathBuf,
}

impl ResolvedArtifact {
    pub fn new(id: ArtifactId, path: impl Into<PathBuf>) -> Self {
        ResolvedArtifact {
            id,
            path: path.into(),
        }
    }
}

/// Resolves the transitive dependency closure of an artifact.
pub trait ArtifactResolver {
    /// Every artifact reachable from `root`, including `root` itself.
    fn resolve_transitively(&self, root: &ResolvedArtifact) -> Result<Vec<ResolvedArtifact>>;
}

/// Dependency descriptor stored next to an archive.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DependencyDescriptor {
    /// Immediate dependency ids.
    #[serde(default)]
    pub dependencies: Vec<String>,
}

impl DependencyDescriptor {
    /// Load a descriptor; a missing file means no dependencies.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Ok(DependencyDescriptor::default());
        }
        let content = std::fs::read_to_string(path)?;
        let descriptor: DependencyDescriptor =
            toml::from_str(&content).map_err(|e| WebJarError::InvalidDescriptor {
                path: path.to_path_buf(),
                detail: e.to_string(),
            })?;
        Ok(descriptor)
    }
}

/// A local filesystem repository.
#[derive(Debug, Clone)]
pub struct LocalRepository {
    root: PathBuf,
}

impl LocalRepository {
    /// Create a repository rooted at the given directory.
    pub fn new(root: PathBuf) -> Self {
        LocalRepository { root }
    }

    /// Get the root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn artifact_dir(&self, id: &ArtifactId) -> PathBuf {
        let mut dir = self.root.clone();
        for part in id.group().split('.') {
            dir.push(part);
        }
        dir.join(id.name()).join(id.version())
    }

    /// Path of an artifact's archive (which may not exist).
    pub fn archive_path(&self, id: &ArtifactId) -> PathBuf {
        self.artifact_dir(id)
            .join(format!("{}-{}.{}", id.name(), id.version(), id.packaging()))
    }

    /// Path of an artifact's dependency descriptor (which may not exist).
    pub fn descriptor_path(&self, id: &ArtifactId) -> PathBuf {
        self.artifact_dir(id)
            .join(format!("{}-{}.deps.toml", id.name(), id.version()))
    }

    /// Locate an artifact's archive.
    pub fn locate(&self, id: &ArtifactId) -> Result<ResolvedArtifact> {
        let path = self.archive_path(id);
        if !path.is_file() {
            return Err(WebJarError::ArtifactNotFound {
                id: id.to_string(),
                path,
            });
        }
        Ok(ResolvedArtifact::new(id.clone(), path))
    }

    /// Immediate dependencies declared for an artifact.
    pub fn dependencies_of(&self, id: &ArtifactId) -> Result<Vec<ArtifactId>> {
        let descriptor = DependencyDescriptor::load(&self.descriptor_path(id))?;
        descriptor
            .dependencies
            .iter()
            .map(|dep| ArtifactId::parse(dep))
            .collect()
    }

    /// Store an archive and its descriptor in the repository layout.
    pub fn install(&self, id: &ArtifactId, archive: &[u8], dependencies: &[&str]) -> Result<ResolvedArtifact> {
        std::fs::create_dir_all(self.artifact_dir(id))?;
        let path = self.archive_path(id);
        std::fs::write(&path, archive)?;

        if !dependencies.is_empty() {
            let descriptor = DependencyDescriptor {
                dependencies: dependencies.iter().map(|d| d.to_string()).collect(),
            };
            let content = toml::to_string(&descriptor).map_err(|e| WebJarError::InvalidDescriptor {
                path: self.descriptor_path(id),
                detail: e.to_string(),
            })?;
            std::fs::write(self.descriptor_path(id), content)?;
        }
        Ok(ResolvedArtifact::new(id.clone(), path))
    }
}

impl ArtifactResolver for LocalRepository {
    fn resolve_transitively(&self, root: &ResolvedArtifact) -> Result<Vec<ResolvedArtifact>> {
        let mut seen: HashSet<String> = HashSet::new();
        let mut queue: VecDeque<ArtifactId> = VecDeque::new();
        let mut resolved = Vec::new();

        seen.insert(root.id.to_string().to_ascii_lowercase());
        resolved.push(root.clone());
        queue.extend(self.dependencies_of(&root.id)?);

        while let Some(id) = queue.pop_front() {
            if !seen.insert(id.to_string().to_ascii_lowercase()) {
                trace!(%id, "already resolved");
                continue;
            }
            let artifact = self.locate(&id)?;
            queue.extend(self.dependencies_of(&id)?);
            resolved.push(artifact);
        }

        debug!(root = %root.id, count = resolved.len(), "resolved transitive closure");
        Ok(resolved)
    }
}
