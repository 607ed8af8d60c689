//! Build a graph from a local repository, persist it, load it back and
//! assemble resources from the archives.

use std::io::{Cursor, Write};

use webjars_graph::{
    ArchiveStore, ArtifactId, DependencyGraph, GraphBuilder, LocalRepository, Manifest,
    ManifestEncoding, MediaType, WebJarError, ZipArchiveReader,
};
use zip::write::SimpleFileOptions;

fn jar(files: &[(&str, &str)]) -> Vec<u8> {
    let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
    for (name, content) in files {
        zip.start_file(*name, SimpleFileOptions::default()).expect("start entry");
        zip.write_all(content.as_bytes()).expect("write entry");
    }
    zip.finish().expect("finish jar").into_inner()
}

fn id(s: &str) -> ArtifactId {
    ArtifactId::parse(s).expect("valid id")
}

/// jasmine-jquery 1.4.2 → [jasmine 1.3.1, jquery 1.6.2]
fn repository(dir: &std::path::Path) -> LocalRepository {
    let repo = LocalRepository::new(dir.to_path_buf());
    repo.install(
        &id("org.webjars:jquery:jar:1.6.2"),
        &jar(&[
            ("META-INF/resources/webjars/jquery/1.6.2/jquery.js", "/*jquery*/"),
            ("META-INF/resources/webjars/jquery/1.6.2/jquery.css", "/*jquery-css*/"),
        ]),
        &[],
    )
    .expect("install jquery");
    repo.install(
        &id("org.webjars:jasmine:jar:1.3.1"),
        &jar(&[("META-INF/resources/webjars/jasmine/1.3.1/jasmine.js", "/*jasmine*/")]),
        &[],
    )
    .expect("install jasmine");
    repo.install(
        &id("org.webjars:jasmine-jquery:jar:1.4.2"),
        &jar(&[(
            "META-INF/resources/webjars/jasmine-jquery/1.4.2/jasmine-jquery.js",
            "/*jasmine-jquery*/",
        )]),
        &["org.webjars:jasmine:jar:1.3.1", "org.webjars:jquery:jar:1.6.2"],
    )
    .expect("install jasmine-jquery");
    repo
}

fn build_graph(repo: &LocalRepository) -> webjars_graph::DependencyMap {
    let roots = [
        repo.locate(&id("org.webjars:jasmine-jquery:jar:1.4.2")).unwrap(),
        repo.locate(&id("org.webjars:jasmine:jar:1.3.1")).unwrap(),
        repo.locate(&id("org.webjars:jquery:jar:1.6.2")).unwrap(),
    ];
    let reader = ZipArchiveReader;
    GraphBuilder::new(repo, &reader).build(&roots).expect("build graph")
}

#[test]
fn round_trip_preserves_entries_for_both_encodings() {
    let dir = tempfile::tempdir().unwrap();
    let repo = repository(dir.path());
    let built = build_graph(&repo);

    for encoding in [ManifestEncoding::Array, ManifestEncoding::Indexed] {
        let mut out = Vec::new();
        webjars_graph::write_manifest(&built, encoding, &mut out).unwrap();
        let graph = DependencyGraph::from_reader(out.as_slice()).unwrap();
        assert_eq!(graph.encoding(), encoding);
        assert_eq!(graph.len(), 3);

        let expected = webjars_graph::to_manifest(&built, ManifestEncoding::Array);
        for original in expected.entries() {
            let loaded = graph.entry(&original.id).expect("entry survives round trip");
            assert_eq!(loaded, original);
        }
    }
}

#[test]
fn assemble_from_archives() {
    let dir = tempfile::tempdir().unwrap();
    let repo = repository(dir.path());
    let built = build_graph(&repo);
    let store = ArchiveStore::scan(repo.root()).unwrap();

    for encoding in [ManifestEncoding::Array, ManifestEncoding::Indexed] {
        let json = webjars_graph::to_manifest(&built, encoding).to_json().unwrap();
        let graph = DependencyGraph::from_json_str(&json).unwrap();

        let resource = graph
            .find_by_path(
                "/webjars/jasmine-jquery/1.4.2/jasmine-jquery.js",
                MediaType::Js,
            )
            .unwrap()
            .expect("jasmine-jquery resolves");
        let content = String::from_utf8(resource.read(&store).unwrap()).unwrap();
        assert_eq!(content, "/*jasmine*//*jquery*//*jasmine-jquery*/");

        let css = graph
            .find_by_id("org.webjars:jasmine-jquery:jar:1.4.2", MediaType::Css)
            .unwrap()
            .unwrap();
        assert_eq!(css.filename(), "jasmine-jquery.css");
        assert_eq!(String::from_utf8(css.read(&store).unwrap()).unwrap(), "/*jquery-css*/");
    }
}

#[test]
fn manifest_file_is_loadable() {
    let dir = tempfile::tempdir().unwrap();
    let repo = repository(&dir.path().join("repo"));
    let built = build_graph(&repo);
    let path = dir.path().join("out").join("webjars.json");

    webjars_graph::write_manifest_file(&built, ManifestEncoding::Indexed, &path).unwrap();
    let graph = DependencyGraph::load(&path).unwrap();

    let err = graph
        .find_by_path("/webjars/jquery/1.6.2/missing.js", MediaType::Js)
        .unwrap_err();
    assert!(matches!(err, WebJarError::PathNotFound { .. }));

    let manifest = Manifest::parse(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(manifest.encoding(), ManifestEncoding::Indexed);
}

#[test]
fn assemble_manifest_with_full_entry_names() {
    let dir = tempfile::tempdir().unwrap();
    let repo = repository(dir.path());
    let store = ArchiveStore::scan(repo.root()).unwrap();

    let manifest = r#"[
        {"id": "org.webjars:jasmine-jquery:jar:1.4.2", "name": "jasmine-jquery", "version": "1.4.2",
         "css": [],
         "js": ["META-INF/resources/webjars/jasmine-jquery/1.4.2/jasmine-jquery.js"],
         "dependencies": ["org.webjars:jquery:jar:1.6.2"]},
        {"id": "org.webjars:jquery:jar:1.6.2", "name": "jquery", "version": "1.6.2",
         "css": ["META-INF/resources/webjars/jquery/1.6.2/jquery.css"],
         "js": ["META-INF/resources/webjars/jquery/1.6.2/jquery.js"],
         "dependencies": []}
    ]"#;
    let graph = DependencyGraph::from_json_str(manifest).unwrap();

    let resource = graph
        .find_by_path("/webjars/jasmine-jquery/1.4.2/jasmine-jquery.js", MediaType::Js)
        .unwrap()
        .unwrap();
    assert_eq!(
        String::from_utf8(resource.read(&store).unwrap()).unwrap(),
        "/*jquery*//*jasmine-jquery*/"
    );
}

/// app → lib → base. Each root records its whole closure, so a shared
/// descendant is emitted once through its parent and again on its own.
#[test]
fn three_level_chain_repeats_transitive_content() {
    let dir = tempfile::tempdir().unwrap();
    let repo = LocalRepository::new(dir.path().to_path_buf());
    repo.install(
        &id("org.webjars:base:jar:1.0"),
        &jar(&[("META-INF/resources/webjars/base/1.0/base.js", "base;")]),
        &[],
    )
    .unwrap();
    repo.install(
        &id("org.webjars:lib:jar:1.0"),
        &jar(&[("META-INF/resources/webjars/lib/1.0/lib.js", "lib;")]),
        &["org.webjars:base:jar:1.0"],
    )
    .unwrap();
    repo.install(
        &id("org.webjars:app:jar:1.0"),
        &jar(&[("META-INF/resources/webjars/app/1.0/app.js", "app;")]),
        &["org.webjars:lib:jar:1.0"],
    )
    .unwrap();

    let roots = [
        repo.locate(&id("org.webjars:app:jar:1.0")).unwrap(),
        repo.locate(&id("org.webjars:lib:jar:1.0")).unwrap(),
        repo.locate(&id("org.webjars:base:jar:1.0")).unwrap(),
    ];
    let built = GraphBuilder::new(&repo, &ZipArchiveReader).build(&roots).unwrap();

    let app_deps: Vec<&str> = built["org.webjars:app:jar:1.0"]
        .dependencies
        .iter()
        .map(|d| d.id.as_str())
        .collect();
    assert_eq!(app_deps, vec!["org.webjars:lib:jar:1.0", "org.webjars:base:jar:1.0"]);

    let json = webjars_graph::to_manifest(&built, ManifestEncoding::Array).to_json().unwrap();
    let graph = DependencyGraph::from_json_str(&json).unwrap();
    let store = ArchiveStore::scan(repo.root()).unwrap();
    let app = graph
        .find_by_id("org.webjars:app:jar:1.0", MediaType::Js)
        .unwrap()
        .unwrap();
    assert_eq!(app.read(&store).unwrap(), b"base;lib;base;app;");
}
