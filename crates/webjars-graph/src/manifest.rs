//! Persisted dependency graph manifests.
//!
//! Two JSON encodings exist. The array form is a list of entries:
//!
//! ```text
//! [
//!   {
//!     "id": "org.webjars:jquery-ui:jar:1.8.0",
//!     "name": "jquery-ui",
//!     "version": "1.8.0",
//!     "css": ["webjars/jquery-ui/1.8.0/jquery.ui.css"],
//!     "js": ["webjars/jquery-ui/1.8.0/jquery.ui.js"],
//!     "dependencies": ["org.webjars:jquery:jar:1.10.2"]
//!   }
//! ]
//! ```
//!
//! The indexed form wraps the same entries in a `table` keyed by id and adds
//! an `index` from resource path (prefixed with [`RESOURCE_ROOT`]) to id.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{Result, WebJarError};
use crate::id::ArtifactId;

/// Root of web resources inside a WebJar archive.
pub const RESOURCE_ROOT: &str = "META-INF/resources/";

/// Which of an entry's file lists a request is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    /// JavaScript files.
    Js,
    /// Stylesheets.
    Css,
}

impl MediaType {
    /// File extension, lowercase, without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            MediaType::Js => "js",
            MediaType::Css => "css",
        }
    }

    /// HTTP content type of assembled output.
    pub fn content_type(&self) -> &'static str {
        match self {
            MediaType::Js => "application/javascript",
            MediaType::Css => "text/css",
        }
    }

    /// Media type for an extension, ignoring case.
    pub fn from_extension(ext: &str) -> Option<Self> {
        if ext.eq_ignore_ascii_case("js") {
            Some(MediaType::Js)
        } else if ext.eq_ignore_ascii_case("css") {
            Some(MediaType::Css)
        } else {
            None
        }
    }

    /// Media type of a path, judged by the text after its last dot.
    pub fn from_path(path: &str) -> Option<Self> {
        let file = path.rsplit('/').next().unwrap_or(path);
        let (_, ext) = file.rsplit_once('.')?;
        MediaType::from_extension(ext)
    }
}

impl std::fmt::Display for MediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

impl std::str::FromStr for MediaType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        MediaType::from_extension(s).ok_or_else(|| format!("unknown media type '{s}' (expected js or css)"))
    }
}

/// The descriptive record of one archive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    /// `group:name:packaging:version`.
    pub id: String,
    /// Second id segment.
    pub name: String,
    /// Fourth id segment.
    pub version: String,
    /// Stylesheets, in archive listing order.
    #[serde(default)]
    pub css: Vec<String>,
    /// Scripts, in archive listing order.
    #[serde(default)]
    pub js: Vec<String>,
    /// Ids of immediate dependencies, in declared order.
    #[serde(default)]
    pub dependencies: Vec<String>,
}

impl ManifestEntry {
    /// Files of the given media type.
    pub fn files(&self, media_type: MediaType) -> &[String] {
        match media_type {
            MediaType::Js => &self.js,
            MediaType::Css => &self.css,
        }
    }
}

/// The indexed manifest shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndexedManifest {
    /// `META-INF/resources/<path>` → id.
    pub index: IndexMap<String, String>,
    /// id → entry.
    pub table: IndexMap<String, ManifestEntry>,
}

/// Manifest encoding selector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ManifestEncoding {
    /// Flat list of entries.
    #[default]
    Array,
    /// `{index, table}` object.
    Indexed,
}

impl std::str::FromStr for ManifestEncoding {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "array" => Ok(ManifestEncoding::Array),
            "indexed" => Ok(ManifestEncoding::Indexed),
            other => Err(format!("unknown manifest encoding '{other}' (expected array or indexed)")),
        }
    }
}

/// A persisted manifest in either encoding.
#[derive(Debug, Clone, PartialEq)]
pub enum Manifest {
    Array(Vec<ManifestEntry>),
    Indexed(IndexedManifest),
}

impl Manifest {
    /// Parse a manifest, detecting its encoding from the top-level shape.
    pub fn parse(input: &str) -> Result<Self> {
        let value: serde_json::Value =
            serde_json::from_str(input).map_err(|e| WebJarError::GraphParse {
                detail: format!("not valid JSON: {e}"),
            })?;
        Self::from_value(value)
    }

    /// Interpret an already-parsed JSON document.
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        match value {
            serde_json::Value::Array(_) => {
                let entries: Vec<ManifestEntry> =
                    serde_json::from_value(value).map_err(|e| WebJarError::GraphParse {
                        detail: format!("invalid entry list: {e}"),
                    })?;
                validate(&entries)?;
                Ok(Manifest::Array(entries))
            }
            serde_json::Value::Object(ref map) => {
                for key in ["index", "table"] {
                    if !map.contains_key(key) {
                        return Err(WebJarError::GraphParse {
                            detail: format!("indexed manifest is missing '{key}'"),
                        });
                    }
                }
                let indexed: IndexedManifest =
                    serde_json::from_value(value).map_err(|e| WebJarError::GraphParse {
                        detail: format!("invalid indexed manifest: {e}"),
                    })?;
                validate(indexed.table.values())?;
                Ok(Manifest::Indexed(indexed))
            }
            other => Err(WebJarError::GraphParse {
                detail: format!("expected an array or an object, found {}", json_kind(&other)),
            }),
        }
    }

    pub fn encoding(&self) -> ManifestEncoding {
        match self {
            Manifest::Array(_) => ManifestEncoding::Array,
            Manifest::Indexed(_) => ManifestEncoding::Indexed,
        }
    }

    /// Entries in manifest order.
    pub fn entries(&self) -> Vec<&ManifestEntry> {
        match self {
            Manifest::Array(entries) => entries.iter().collect(),
            Manifest::Indexed(indexed) => indexed.table.values().collect(),
        }
    }

    /// Render as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        let json = match self {
            Manifest::Array(entries) => serde_json::to_string_pretty(entries)?,
            Manifest::Indexed(indexed) => serde_json::to_string_pretty(indexed)?,
        };
        Ok(json)
    }
}

/// Every id must parse, and an entry's name and version must be the ones
/// its id carries.
fn validate<'a>(entries: impl IntoIterator<Item = &'a ManifestEntry>) -> Result<()> {
    let invalid = |detail: String| WebJarError::GraphParse { detail };

    for entry in entries {
        let id = ArtifactId::parse(&entry.id).map_err(|e| invalid(e.to_string()))?;
        if id.name() != entry.name || id.version() != entry.version {
            return Err(invalid(format!(
                "entry '{}' names {} v{}, which does not match its id",
                entry.id, entry.name, entry.version
            )));
        }
        for dependency in &entry.dependencies {
            ArtifactId::parse(dependency).map_err(|e| {
                invalid(format!("dependency of '{}': {e}", entry.id))
            })?;
        }
    }
    Ok(())
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
