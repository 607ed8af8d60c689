//! Drive a live server over HTTP.

use std::net::SocketAddr;
use std::sync::Arc;

use reqwest::StatusCode;
use webjars_graph::{DependencyGraph, DirectoryStore, MemoryStore, StoreChain};
use webjars_server::{start, ServerConfig, ServerHandle, ServerState};

fn manifest() -> String {
    serde_json::json!([
        {
            "id": "org.webjars:jasmine-jquery:jar:1.4.2",
            "name": "jasmine-jquery",
            "version": "1.4.2",
            "css": [],
            "js": ["webjars/jasmine-jquery/1.4.2/jasmine-jquery.js"],
            "dependencies": ["org.webjars:jasmine:jar:1.3.1", "org.webjars:jquery:jar:1.6.2"]
        },
        {
            "id": "org.webjars:jasmine:jar:1.3.1",
            "name": "jasmine",
            "version": "1.3.1",
            "css": ["webjars/jasmine/1.3.1/jasmine.css"],
            "js": ["webjars/jasmine/1.3.1/jasmine.js"],
            "dependencies": []
        },
        {
            "id": "org.webjars:jquery:jar:1.6.2",
            "name": "jquery",
            "version": "1.6.2",
            "css": [],
            "js": ["webjars/jquery/1.6.2/jquery.js"],
            "dependencies": []
        },
        {
            "id": "org.webjars:broken:jar:1.0",
            "name": "broken",
            "version": "1.0",
            "css": [],
            "js": ["webjars/broken/1.0/broken.js"],
            "dependencies": ["org.webjars:absent:jar:1.0"]
        }
    ])
    .to_string()
}

async fn server(static_dir: &std::path::Path) -> ServerHandle {
    let graph = DependencyGraph::from_json_str(&manifest()).unwrap();
    let webjars = MemoryStore::default()
        .with("webjars/jasmine-jquery/1.4.2/jasmine-jquery.js", "/*jj*/")
        .with("webjars/jasmine/1.3.1/jasmine.js", "/*jasmine*/")
        .with("webjars/jasmine/1.3.1/jasmine.css", "/*jasmine-css*/")
        .with("webjars/jquery/1.6.2/jquery.js", "/*jquery*/")
        .with("webjars/broken/1.0/broken.js", "/*broken*/");
    let webjars = Arc::new(webjars);
    let fallback = StoreChain::new(vec![
        Box::new(DirectoryStore::new(static_dir.to_path_buf())),
    ]);
    let state = ServerState::new(graph, webjars, Arc::new(fallback));
    let config = ServerConfig {
        bind: SocketAddr::from(([127, 0, 0, 1], 0)),
    };
    start(config, state).await.unwrap()
}

#[tokio::test]
async fn serves_assembled_script_with_etag() {
    let dir = tempfile::tempdir().unwrap();
    let handle = server(dir.path()).await;
    let client = reqwest::Client::new();

    let resp = client
        .get(handle.url("/webjars/jasmine-jquery/1.4.2/jasmine-jquery.js"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers()["content-type"].to_str().unwrap(),
        "application/javascript"
    );
    assert_eq!(resp.headers()["cache-control"], "no-cache");
    let etag = resp.headers()["etag"].to_str().unwrap().to_string();
    assert_eq!(resp.text().await.unwrap(), "/*jasmine*//*jquery*//*jj*/");

    let revalidated = client
        .get(handle.url("/webjars/jasmine-jquery/1.4.2/jasmine-jquery.js"))
        .header("if-none-match", etag)
        .send()
        .await
        .unwrap();
    assert_eq!(revalidated.status(), StatusCode::NOT_MODIFIED);
    assert_eq!(revalidated.headers()["cache-control"], "no-cache");
}

#[tokio::test]
async fn serves_assembled_stylesheet() {
    let dir = tempfile::tempdir().unwrap();
    let handle = server(dir.path()).await;

    let resp = reqwest::get(handle.url("/webjars/jasmine-jquery/1.4.2/jasmine-jquery.css"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()["content-type"].to_str().unwrap(), "text/css");
    assert_eq!(resp.text().await.unwrap(), "/*jasmine-css*/");
}

#[tokio::test]
async fn unknown_paths_use_static_files() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join("webjars/app/1.0")).unwrap();
    std::fs::write(dir.path().join("webjars/app/1.0/app.js"), "app();").unwrap();
    let handle = server(dir.path()).await;

    let found = reqwest::get(handle.url("/webjars/app/1.0/app.js")).await.unwrap();
    assert_eq!(found.status(), StatusCode::OK);
    assert_eq!(found.text().await.unwrap(), "app();");

    let missing = reqwest::get(handle.url("/webjars/nothing/1.0/nothing.js"))
        .await
        .unwrap();
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn broken_graph_is_server_error() {
    let dir = tempfile::tempdir().unwrap();
    let handle = server(dir.path()).await;

    let resp = reqwest::get(handle.url("/webjars/broken/1.0/broken.js")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn health() {
    let dir = tempfile::tempdir().unwrap();
    let handle = server(dir.path()).await;

    let resp = reqwest::get(handle.url("/health")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.text().await.unwrap(), "ok");
}
