//! Manifest writing.
//!
//! Renders a built [`DependencyMap`] in one of the two manifest encodings.
//! The whole document is rendered before the destination is touched, so a
//! failure never leaves a partial manifest behind.

use std::io::Write;
use std::path::Path;

use indexmap::map::Entry;
use tracing::{info, warn};

use crate::builder::{DependencyMap, GraphNode};
use crate::error::{Result, WebJarError};
use crate::manifest::{IndexedManifest, Manifest, ManifestEncoding, ManifestEntry, RESOURCE_ROOT};

/// Convert a built graph to a manifest in the requested encoding.
pub fn to_manifest(graph: &DependencyMap, encoding: ManifestEncoding) -> Manifest {
    let entries = graph.values().map(entry_for);

    match encoding {
        ManifestEncoding::Array => Manifest::Array(entries.collect()),
        ManifestEncoding::Indexed => {
            let mut indexed = IndexedManifest::default();
            for entry in entries {
                for file in entry.css.iter().chain(entry.js.iter()) {
                    match indexed.index.entry(format!("{RESOURCE_ROOT}{file}")) {
                        Entry::Vacant(slot) => {
                            slot.insert(entry.id.clone());
                        }
                        // First webjar to list a file keeps it, as ArchiveStore does.
                        Entry::Occupied(slot) if *slot.get() != entry.id => {
                            warn!(
                                path = %slot.key(),
                                kept = %slot.get(),
                                ignored = %entry.id,
                                "file listed by more than one webjar"
                            );
                        }
                        Entry::Occupied(_) => {}
                    }
                }
                indexed.table.insert(entry.id.clone(), entry);
            }
            Manifest::Indexed(indexed)
        }
    }
}

fn entry_for(node: &GraphNode) -> ManifestEntry {
    ManifestEntry {
        dependencies: node.dependencies.iter().map(|d| d.id.clone()).collect(),
        ..node.entry.clone()
    }
}

/// Write a manifest to `writer`. The writer is consumed and dropped on
/// every path; nothing is written unless rendering succeeded.
pub fn write_manifest<W: Write>(
    graph: &DependencyMap,
    encoding: ManifestEncoding,
    mut writer: W,
) -> Result<()> {
    let json = to_manifest(graph, encoding).to_json()?;
    writer.write_all(json.as_bytes())?;
    writer.flush()?;
    Ok(())
}

/// Write a manifest file, replacing any existing one atomically.
pub fn write_manifest_file(
    graph: &DependencyMap,
    encoding: ManifestEncoding,
    path: &Path,
) -> Result<()> {
    let json = to_manifest(graph, encoding).to_json()?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(json.as_bytes())?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| WebJarError::Io(e.error))?;

    info!(path = %path.display(), ?encoding, entries = graph.len(), "wrote dependency graph");
    Ok(())
}
