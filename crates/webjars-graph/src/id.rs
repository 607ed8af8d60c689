//! Artifact identifiers.
//!
//! A WebJar is identified by its Maven coordinates written as
//! `group:name:packaging:version`, e.g. `org.webjars:jquery:jar:1.6.2`.

use std::fmt;
use std::str::FromStr;

use crate::error::{Result, WebJarError};

/// Group id shared by every WebJar.
pub const WEBJARS_GROUP: &str = "org.webjars";

/// Packaging used by the request path convention.
pub const WEBJARS_PACKAGING: &str = "jar";

/// A parsed `group:name:packaging:version` identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArtifactId {
    group: String,
    name: String,
    packaging: String,
    version: String,
}

impl ArtifactId {
    /// Parse an identifier. Exactly four non-empty segments are required.
    pub fn parse(id: &str) -> Result<Self> {
        let segments: Vec<&str> = id.split(':').collect();
        if segments.len() != 4 {
            return Err(WebJarError::IdFormat {
                id: id.to_string(),
                detail: format!("expected 4 colon-delimited segments, found {}", segments.len()),
            });
        }
        if let Some(pos) = segments.iter().position(|s| s.is_empty()) {
            return Err(WebJarError::IdFormat {
                id: id.to_string(),
                detail: format!("segment {} is empty", pos + 1),
            });
        }

        Ok(ArtifactId {
            group: segments[0].to_string(),
            name: segments[1].to_string(),
            packaging: segments[2].to_string(),
            version: segments[3].to_string(),
        })
    }

    /// The id a `/webjars/{name}/{version}/...` request maps to.
    pub fn webjar(name: &str, version: &str) -> Self {
        ArtifactId {
            group: WEBJARS_GROUP.to_string(),
            name: name.to_string(),
            packaging: WEBJARS_PACKAGING.to_string(),
            version: version.to_string(),
        }
    }

    pub fn group(&self) -> &str {
        &self.group
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn packaging(&self) -> &str {
        &self.packaging
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Whether the artifact belongs to the `org.webjars` group.
    pub fn is_webjar(&self) -> bool {
        self.group.eq_ignore_ascii_case(WEBJARS_GROUP)
    }

    /// Case-insensitive comparison against a raw id string.
    pub fn matches(&self, other: &str) -> bool {
        self.to_string().eq_ignore_ascii_case(other)
    }
}

impl FromStr for ArtifactId {
    type Err = WebJarError;

    fn from_str(s: &str) -> Result<Self> {
        ArtifactId::parse(s)
    }
}

impl fmt::Display for ArtifactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}:{}",
            self.group, self.name, self.packaging, self.version
        )
    }
}
