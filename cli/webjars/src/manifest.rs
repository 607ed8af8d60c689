//! `webjars.toml` parsing and project configuration.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use webjars_graph::ManifestEncoding;

pub const MANIFEST_FILE: &str = "webjars.toml";

/// The top-level configuration of a webjars project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebjarsManifest {
    /// Project metadata (required).
    pub project: ProjectConfig,
    #[serde(default)]
    pub repository: RepositoryConfig,
    #[serde(default)]
    pub manifest: ManifestConfig,
    #[serde(default)]
    pub server: ServerSection,
}

/// Project metadata section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    pub name: String,
    /// Root artifact ids the graph is built from.
    #[serde(default)]
    pub dependencies: Vec<String>,
}

/// Where archives are installed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryConfig {
    #[serde(default = "default_repository")]
    pub path: PathBuf,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        RepositoryConfig {
            path: default_repository(),
        }
    }
}

fn default_repository() -> PathBuf {
    PathBuf::from("repository")
}

/// Where the built graph is written, and in which shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestConfig {
    #[serde(default = "default_manifest_path")]
    pub path: PathBuf,
    #[serde(default)]
    pub encoding: ManifestEncoding,
}

impl Default for ManifestConfig {
    fn default() -> Self {
        ManifestConfig {
            path: default_manifest_path(),
            encoding: ManifestEncoding::default(),
        }
    }
}

fn default_manifest_path() -> PathBuf {
    PathBuf::from("target/webjars.json")
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ServerSection {
    #[serde(default = "default_bind")]
    pub bind: SocketAddr,
    /// Directory of plain files served when the graph has no answer.
    #[serde(default)]
    pub static_dir: Option<PathBuf>,
}

impl Default for ServerSection {
    fn default() -> Self {
        ServerSection {
            bind: default_bind(),
            static_dir: None,
        }
    }
}

fn default_bind() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 8080))
}

impl WebjarsManifest {
    /// Search upward from `start_dir` for a `webjars.toml` file, parse and
    /// return it along with the directory it was found in.
    pub fn find_and_load(start_dir: &Path) -> Result<Option<(Self, PathBuf)>> {
        let mut dir = start_dir.to_path_buf();
        loop {
            let candidate = dir.join(MANIFEST_FILE);
            if candidate.is_file() {
                let content = std::fs::read_to_string(&candidate)
                    .with_context(|| format!("reading {}", candidate.display()))?;
                let manifest: WebjarsManifest = toml::from_str(&content)
                    .with_context(|| format!("parsing {}", candidate.display()))?;
                return Ok(Some((manifest, dir)));
            }
            if !dir.pop() {
                break;
            }
        }
        Ok(None)
    }

    /// Parse a manifest from a TOML string.
    #[cfg(test)]
    pub fn from_str(s: &str) -> Result<Self> {
        toml::from_str(s).context("parsing webjars.toml")
    }

    pub fn repository_dir(&self, project_dir: &Path) -> PathBuf {
        project_dir.join(&self.repository.path)
    }

    pub fn manifest_file(&self, project_dir: &Path) -> PathBuf {
        project_dir.join(&self.manifest.path)
    }

    pub fn static_dir(&self, project_dir: &Path) -> Option<PathBuf> {
        self.server.static_dir.as_ref().map(|dir| project_dir.join(dir))
    }

    /// Generate the default template for `webjars init`.
    pub fn template(name: &str) -> String {
        format!(
            r#"[project]
name = "{name}"
dependencies = []

[repository]
path = "repository"

[manifest]
path = "target/webjars.json"
encoding = "array"

[server]
bind = "127.0.0.1:8080"
static-dir = "public"
"#
        )
    }
}
