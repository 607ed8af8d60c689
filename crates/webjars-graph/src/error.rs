//! Graph error types.

use std::path::PathBuf;

/// Errors that can occur while building, loading or serving a dependency graph.
#[derive(Debug, thiserror::Error)]
pub enum WebJarError {
    /// Identifier is not `group:name:packaging:version`.
    #[error("invalid artifact id '{id}': {detail}")]
    IdFormat { id: String, detail: String },

    /// Archive could not be opened, enumerated or read.
    #[error("cannot read archive {path}: {detail}")]
    ArchiveRead { path: PathBuf, detail: String },

    /// Indexed manifest has no entry for the requested path.
    #[error("no webjar provides path '{path}'")]
    PathNotFound { path: String },

    /// A declared dependency is absent from the graph.
    #[error("dependency '{dependency}' of '{id}' not found in graph")]
    DependencyNotFound { id: String, dependency: String },

    /// Manifest is malformed or has an unknown shape.
    #[error("invalid dependency graph: {detail}")]
    GraphParse { detail: String },

    /// Resolution re-entered an entry that is still being resolved.
    #[error("cyclic dependency: {chain}")]
    CyclicDependency { chain: String },

    /// Artifact is not present in the local repository.
    #[error("artifact '{id}' not found at {path}")]
    ArtifactNotFound { id: String, path: PathBuf },

    /// Dependency descriptor next to an archive is invalid.
    #[error("invalid dependency descriptor {path}: {detail}")]
    InvalidDescriptor { path: PathBuf, detail: String },

    /// Building the graph for a root artifact failed.
    #[error("cannot build dependency graph for '{id}'")]
    BuildFailed {
        id: String,
        #[source]
        source: Box<WebJarError>,
    },

    /// No resource store provides the path.
    #[error("resource not found: {path}")]
    ResourceNotFound { path: String },

    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl WebJarError {
    /// Whether this error means "no such resource" rather than a fault.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            WebJarError::PathNotFound { .. } | WebJarError::ResourceNotFound { .. }
        )
    }
}

/// Result type alias for graph operations.
pub type Result<T> = std::result::Result<T, WebJarError>;
