//! `webjars build` — inspect the configured roots and write the graph.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;
use webjars_graph::{
    ArtifactId, ArtifactResolver, GraphBuilder, LocalRepository, ResolvedArtifact, ZipArchiveReader,
};

use crate::manifest::WebjarsManifest;

pub fn run(project_dir: &Path, manifest: &WebjarsManifest) -> Result<()> {
    let repository = LocalRepository::new(manifest.repository_dir(project_dir));

    let mut roots = Vec::new();
    for dep in &manifest.project.dependencies {
        let root = locate(&repository, dep)?;
        for artifact in repository.resolve_transitively(&root)? {
            add_root(&mut roots, artifact);
        }
    }
    if roots.is_empty() {
        println!("No dependencies listed in webjars.toml; writing an empty graph.");
    }

    let reader = ZipArchiveReader;
    let graph = GraphBuilder::new(&repository, &reader)
        .build(&roots)
        .context("building dependency graph")?;

    let out = manifest.manifest_file(project_dir);
    webjars_graph::write_manifest_file(&graph, manifest.manifest.encoding, &out)
        .with_context(|| format!("writing {}", out.display()))?;

    info!(entries = graph.len(), encoding = ?manifest.manifest.encoding, "graph built");
    println!("Wrote {} webjars to {}", graph.len(), out.display());
    for node in graph.values() {
        println!(
            "  {} v{} ({} js, {} css, {} dependencies)",
            node.entry.name,
            node.entry.version,
            node.entry.js.len(),
            node.entry.css.len(),
            node.dependencies.len()
        );
    }
    Ok(())
}

/// Every artifact of the project becomes a graph entry, transitive ones
/// included, so that each declared dependency can be resolved at serve time.
fn add_root(roots: &mut Vec<ResolvedArtifact>, artifact: ResolvedArtifact) {
    let id = artifact.id.to_string();
    if !roots.iter().any(|r| r.id.matches(&id)) {
        roots.push(artifact);
    }
}

fn locate(repository: &LocalRepository, dep: &str) -> Result<ResolvedArtifact> {
    let id = ArtifactId::parse(dep).with_context(|| format!("invalid dependency '{dep}'"))?;
    Ok(repository.locate(&id)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};
    use webjars_graph::{DependencyGraph, ManifestEncoding};

    fn jar(files: &[(&str, &str)]) -> Vec<u8> {
        let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
        for (name, content) in files {
            zip.start_file(*name, zip::write::SimpleFileOptions::default()).unwrap();
            zip.write_all(content.as_bytes()).unwrap();
        }
        zip.finish().unwrap().into_inner()
    }

    #[test]
    fn build_writes_configured_encoding() {
        let dir = tempfile::tempdir().unwrap();
        let toml = r#"
[project]
name = "demo"
dependencies = ["org.webjars:jquery:jar:1.6.2"]

[manifest]
encoding = "indexed"
"#;
        let manifest = WebjarsManifest::from_str(toml).unwrap();
        let repository = LocalRepository::new(manifest.repository_dir(dir.path()));
        repository
            .install(
                &ArtifactId::parse("org.webjars:jquery:jar:1.6.2").unwrap(),
                &jar(&[("META-INF/resources/webjars/jquery/1.6.2/jquery.js", "$")]),
                &[],
            )
            .unwrap();

        run(dir.path(), &manifest).unwrap();

        let graph = DependencyGraph::load(&dir.path().join("target/webjars.json")).unwrap();
        assert_eq!(graph.encoding(), ManifestEncoding::Indexed);
        assert_eq!(graph.len(), 1);
    }

    #[test]
    fn transitive_dependencies_become_entries() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = WebjarsManifest::from_str(
            "[project]\nname = \"demo\"\ndependencies = [\"org.webjars:app:jar:2.0\"]\n",
        )
        .unwrap();
        let repository = LocalRepository::new(manifest.repository_dir(dir.path()));
        repository
            .install(
                &ArtifactId::parse("org.webjars:lib:jar:1.0").unwrap(),
                &jar(&[("META-INF/resources/webjars/lib/1.0/lib.js", "lib")]),
                &[],
            )
            .unwrap();
        repository
            .install(
                &ArtifactId::parse("org.webjars:app:jar:2.0").unwrap(),
                &jar(&[("META-INF/resources/webjars/app/2.0/app.js", "app")]),
                &["org.webjars:lib:jar:1.0"],
            )
            .unwrap();

        run(dir.path(), &manifest).unwrap();

        let graph = DependencyGraph::load(&dir.path().join("target/webjars.json")).unwrap();
        let ids: Vec<&str> = graph.entries().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["org.webjars:app:jar:2.0", "org.webjars:lib:jar:1.0"]);
        assert_eq!(
            graph.entry("org.webjars:app:jar:2.0").unwrap().dependencies,
            vec!["org.webjars:lib:jar:1.0".to_string()]
        );
    }

    #[test]
    fn build_reports_missing_archive() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = WebjarsManifest::from_str(
            "[project]\nname = \"demo\"\ndependencies = [\"org.webjars:gone:jar:1.0\"]\n",
        )
        .unwrap();

        let err = run(dir.path(), &manifest).unwrap_err();
        assert!(format!("{err:#}").contains("org.webjars:gone:jar:1.0"));
        assert!(!dir.path().join("target/webjars.json").exists());
    }

    #[test]
    fn build_rejects_malformed_id() {
        let dir = tempfile::tempdir().unwrap();
        let manifest =
            WebjarsManifest::from_str("[project]\nname = \"demo\"\ndependencies = [\"jquery\"]\n").unwrap();
        let err = run(dir.path(), &manifest).unwrap_err();
        assert!(err.to_string().contains("invalid dependency 'jquery'"));
    }
}
