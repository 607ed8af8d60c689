//! `webjars tree` — show how a webjar resolves.

use std::path::Path;

use anyhow::Result;
use webjars_graph::{format_tree, MediaType};

use crate::manifest::WebjarsManifest;

pub fn run(
    project_dir: &Path,
    manifest: &WebjarsManifest,
    target: &str,
    media_type: Option<MediaType>,
) -> Result<()> {
    print!("{}", render(project_dir, manifest, target, media_type)?);
    Ok(())
}

fn render(
    project_dir: &Path,
    manifest: &WebjarsManifest,
    target: &str,
    media_type: Option<MediaType>,
) -> Result<String> {
    let graph = super::load_graph(project_dir, manifest)?;
    let media_type = super::media_type_for(target, media_type);
    let resource = super::find(&graph, target, media_type)?;
    Ok(format_tree(&resource))
}
