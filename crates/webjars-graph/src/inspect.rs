//! Archive inspection.
//!
//! Lists the scripts and stylesheets packaged in a WebJar and pairs them
//! with the name and version carried by the artifact id.

use std::fs::File;
use std::path::Path;

use tracing::debug;
use zip::ZipArchive;

use crate::error::{Result, WebJarError};
use crate::id::ArtifactId;
use crate::manifest::{ManifestEntry, RESOURCE_ROOT};

/// Lists the entry names of an archive on disk.
pub trait ArchiveReader {
    /// Every entry name, in the archive's own order.
    fn entry_names(&self, archive: &Path) -> Result<Vec<String>>;
}

/// Reads jar/zip archives with the `zip` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZipArchiveReader;

impl ArchiveReader for ZipArchiveReader {
    fn entry_names(&self, archive: &Path) -> Result<Vec<String>> {
        let read_err = |detail: String| WebJarError::ArchiveRead {
            path: archive.to_path_buf(),
            detail,
        };

        let file = File::open(archive).map_err(|e| read_err(e.to_string()))?;
        let mut zip = ZipArchive::new(file).map_err(|e| read_err(e.to_string()))?;

        let mut names = Vec::with_capacity(zip.len());
        for i in 0..zip.len() {
            let entry = zip.by_index(i).map_err(|e| read_err(e.to_string()))?;
            if !entry.is_dir() {
                names.push(entry.name().to_string());
            }
        }
        Ok(names)
    }
}

/// Inspect an archive and build its manifest entry (without dependencies).
pub fn inspect(reader: &dyn ArchiveReader, archive: &Path, id: &str) -> Result<ManifestEntry> {
    let artifact = ArtifactId::parse(id)?;
    let names = reader.entry_names(archive)?;
    debug!(id, archive = %archive.display(), entries = names.len(), "inspecting archive");
    Ok(classify(&artifact, id, names))
}

/// Build a manifest entry from an already enumerated list of entry names.
pub fn inspect_entries<I, S>(names: I, id: &str) -> Result<ManifestEntry>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let artifact = ArtifactId::parse(id)?;
    Ok(classify(&artifact, id, names.into_iter().map(Into::into)))
}

fn classify(artifact: &ArtifactId, id: &str, names: impl IntoIterator<Item = String>) -> ManifestEntry {
    let mut css = Vec::new();
    let mut js = Vec::new();

    for name in names {
        if name.ends_with('/') {
            continue;
        }
        let lower = name.to_ascii_lowercase();
        let relative = name.strip_prefix(RESOURCE_ROOT).unwrap_or(&name).to_string();
        if lower.ends_with(".css") {
            css.push(relative);
        } else if lower.ends_with(".js") {
            js.push(relative);
        }
    }

    ManifestEntry {
        id: id.to_string(),
        name: artifact.name().to_string(),
        version: artifact.version().to_string(),
        css,
        js,
        dependencies: Vec::new(),
    }
}
