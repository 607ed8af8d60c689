//! Resource stores: where the bytes of a WebJar file come from at serve time.
//!
//! Paths are relative to the web resource root, i.e. the part of an archive
//! entry name after `META-INF/resources/`. Full entry names, as listed by
//! manifests that record them unstripped, are accepted too.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::{Component, Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;
use zip::ZipArchive;

use crate::error::{Result, WebJarError};
use crate::manifest::RESOURCE_ROOT;

/// Loads file content by path.
pub trait ResourceStore: Send + Sync {
    /// Full content of the file at `path`.
    fn load(&self, path: &str) -> Result<Vec<u8>>;
}

/// `path` relative to the web resource root.
fn resource_path(path: &str) -> &str {
    let path = path.trim_start_matches('/');
    path.strip_prefix(RESOURCE_ROOT).unwrap_or(path)
}

/// Serves files from a directory tree.
#[derive(Debug, Clone)]
pub struct DirectoryStore {
    root: PathBuf,
}

impl DirectoryStore {
    pub fn new(root: PathBuf) -> Self {
        DirectoryStore { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ResourceStore for DirectoryStore {
    fn load(&self, path: &str) -> Result<Vec<u8>> {
        let relative = Path::new(resource_path(path));
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes {
            return Err(WebJarError::ResourceNotFound {
                path: path.to_string(),
            });
        }

        let full = self.root.join(relative);
        if !full.is_file() {
            return Err(WebJarError::ResourceNotFound {
                path: path.to_string(),
            });
        }
        Ok(std::fs::read(full)?)
    }
}

/// Serves `META-INF/resources/*` entries out of a set of jar archives.
///
/// The entry listing is indexed once at construction; content is read from
/// the archive on every load.
#[derive(Debug, Clone, Default)]
pub struct ArchiveStore {
    /// Resource path → archive providing it.
    entries: HashMap<String, PathBuf>,
}

impl ArchiveStore {
    /// Index the given archives. When two archives provide the same path,
    /// the first one wins.
    pub fn open<I, P>(archives: I) -> Result<Self>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut store = ArchiveStore::default();
        for archive in archives {
            store.add_archive(archive.as_ref())?;
        }
        Ok(store)
    }

    /// Index every `*.jar` below a directory.
    pub fn scan(dir: &Path) -> Result<Self> {
        let mut jars = Vec::new();
        for entry in WalkDir::new(dir).sort_by_file_name() {
            let entry = entry.map_err(|e| WebJarError::ArchiveRead {
                path: dir.to_path_buf(),
                detail: e.to_string(),
            })?;
            let is_jar = entry
                .path()
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("jar"));
            if entry.file_type().is_file() && is_jar {
                jars.push(entry.into_path());
            }
        }
        debug!(dir = %dir.display(), archives = jars.len(), "scanned for webjar archives");
        Self::open(jars)
    }

    fn add_archive(&mut self, archive: &Path) -> Result<()> {
        let file = File::open(archive).map_err(|e| archive_err(archive, e))?;
        let mut zip = ZipArchive::new(file).map_err(|e| archive_err(archive, e))?;

        for i in 0..zip.len() {
            let entry = zip.by_index(i).map_err(|e| archive_err(archive, e))?;
            if entry.is_dir() {
                continue;
            }
            let Some(path) = entry.name().strip_prefix(RESOURCE_ROOT) else {
                continue;
            };
            if let Some(existing) = self.entries.get(path) {
                warn!(
                    path,
                    kept = %existing.display(),
                    ignored = %archive.display(),
                    "resource provided by more than one archive"
                );
                continue;
            }
            self.entries.insert(path.to_string(), archive.to_path_buf());
        }
        Ok(())
    }

    /// Number of indexed resources.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ResourceStore for ArchiveStore {
    fn load(&self, path: &str) -> Result<Vec<u8>> {
        let path = resource_path(path);
        let archive = self
            .entries
            .get(path)
            .ok_or_else(|| WebJarError::ResourceNotFound {
                path: path.to_string(),
            })?;

        let file = File::open(archive).map_err(|e| archive_err(archive, e))?;
        let mut zip = ZipArchive::new(file).map_err(|e| archive_err(archive, e))?;
        let mut entry = zip
            .by_name(&format!("{RESOURCE_ROOT}{path}"))
            .map_err(|e| archive_err(archive, e))?;

        let mut content = Vec::with_capacity(entry.size() as usize);
        entry.read_to_end(&mut content)?;
        Ok(content)
    }
}

fn archive_err(archive: &Path, err: impl std::fmt::Display) -> WebJarError {
    WebJarError::ArchiveRead {
        path: archive.to_path_buf(),
        detail: err.to_string(),
    }
}

/// Serves files from memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    files: HashMap<String, Vec<u8>>,
}

impl MemoryStore {
    pub fn insert(&mut self, path: impl Into<String>, content: impl Into<Vec<u8>>) {
        self.files.insert(path.into(), content.into());
    }

    pub fn with(mut self, path: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        self.insert(path, content);
        self
    }
}

impl ResourceStore for MemoryStore {
    fn load(&self, path: &str) -> Result<Vec<u8>> {
        self.files
            .get(resource_path(path))
            .cloned()
            .ok_or_else(|| WebJarError::ResourceNotFound {
                path: path.to_string(),
            })
    }
}

/// Tries each store in turn.
pub struct StoreChain {
    stores: Vec<Box<dyn ResourceStore>>,
}

impl StoreChain {
    pub fn new(stores: Vec<Box<dyn ResourceStore>>) -> Self {
        StoreChain { stores }
    }
}

impl ResourceStore for StoreChain {
    fn load(&self, path: &str) -> Result<Vec<u8>> {
        for store in &self.stores {
            match store.load(path) {
                Err(WebJarError::ResourceNotFound { .. }) => continue,
                other => return other,
            }
        }
        Err(WebJarError::ResourceNotFound {
            path: path.to_string(),
        })
    }
}
