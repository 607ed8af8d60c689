//! `webjars assemble` — write a webjar's content, dependencies first.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use webjars_graph::MediaType;

use crate::manifest::WebjarsManifest;

pub fn run(
    project_dir: &Path,
    manifest: &WebjarsManifest,
    target: &str,
    media_type: Option<MediaType>,
    output: Option<&Path>,
) -> Result<()> {
    let content = assemble(project_dir, manifest, target, media_type)?;

    match output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("creating {}", parent.display()))?;
            }
            std::fs::write(path, &content).with_context(|| format!("writing {}", path.display()))?;
            eprintln!("Wrote {} bytes to {}", content.len(), path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&content)?;
            stdout.flush()?;
        }
    }
    Ok(())
}

fn assemble(
    project_dir: &Path,
    manifest: &WebjarsManifest,
    target: &str,
    media_type: Option<MediaType>,
) -> Result<Vec<u8>> {
    let graph = super::load_graph(project_dir, manifest)?;
    let store = super::archive_store(project_dir, manifest)?;
    let media_type = super::media_type_for(target, media_type);
    let resource = super::find(&graph, target, media_type)?;
    resource
        .read(&store)
        .with_context(|| format!("assembling {}", resource.id()))
}
