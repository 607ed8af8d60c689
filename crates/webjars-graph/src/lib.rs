//! WebJars dependency graph.
//!
//! Builds, persists and serves the dependency graph of WebJars (front-end
//! libraries packaged as jar archives), and assembles a library's scripts or
//! stylesheets together with those of everything it depends on.
//!
//! # Architecture
//!
//! Build time:
//! - **Repository** — locates archives and their transitive dependencies
//! - **Inspector** — lists the scripts and stylesheets inside an archive
//! - **Builder** — maps each root archive to its dependency entries
//! - **Serializer** — writes the manifest as an entry list or as an
//!   `{index, table}` object
//!
//! Serve time:
//! - **Graph** — parses a manifest and answers id and path lookups
//! - **Resource** — per-request dependency tree, concatenated on read
//! - **Store** — loads file bytes from archives or directories

pub mod builder;
pub mod error;
pub mod graph;
pub mod id;
pub mod inspect;
pub mod integrity;
pub mod manifest;
pub mod repository;
pub mod resource;
pub mod serializer;
pub mod store;
pub mod tree;

// Re-exports for convenience.
pub use builder::{DependencyMap, GraphBuilder, GraphNode};
pub use error::{Result, WebJarError};
pub use graph::DependencyGraph;
pub use id::{ArtifactId, WEBJARS_GROUP};
pub use inspect::{inspect, inspect_entries, ArchiveReader, ZipArchiveReader};
pub use integrity::ContentHash;
pub use manifest::{Manifest, ManifestEncoding, ManifestEntry, MediaType, RESOURCE_ROOT};
pub use repository::{ArtifactResolver, LocalRepository, ResolvedArtifact};
pub use resource::WebJarResource;
pub use serializer::{to_manifest, write_manifest, write_manifest_file};
pub use store::{ArchiveStore, DirectoryStore, MemoryStore, ResourceStore, StoreChain};
pub use tree::format_tree;
