//! Request handling for `/webjars/...` paths.
//!
//! Script and stylesheet requests are answered from the dependency graph
//! with the library's content preceded by that of its dependencies. Paths
//! the graph knows nothing about fall through to plain file lookup.

use std::sync::Arc;

use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use mime::Mime;
use tracing::{debug, error, warn};
use webjars_graph::{ContentHash, DependencyGraph, MediaType, ResourceStore, Result, WebJarError};

/// Shared state of every request handler.
#[derive(Clone)]
pub struct ServerState {
    /// Graph loaded at startup.
    pub graph: Arc<DependencyGraph>,
    /// Store the graph's files are read from.
    pub webjars: Arc<dyn ResourceStore>,
    /// Store consulted when the graph has no answer.
    pub fallback: Arc<dyn ResourceStore>,
}

impl ServerState {
    pub fn new(
        graph: DependencyGraph,
        webjars: Arc<dyn ResourceStore>,
        fallback: Arc<dyn ResourceStore>,
    ) -> Self {
        ServerState {
            graph: Arc::new(graph),
            webjars,
            fallback,
        }
    }
}

/// Outcome of resolving one request path.
#[derive(Debug)]
pub enum Lookup {
    /// Concatenated library content.
    Assembled {
        media_type: MediaType,
        body: Vec<u8>,
        hash: ContentHash,
    },
    /// A single file from the fallback store.
    Static { body: Vec<u8>, content_type: Mime },
    /// Nothing provides the path.
    NotFound,
}

/// Resolve a request path. Blocking: reads archives and files.
pub fn lookup(state: &ServerState, path: &str) -> Result<Lookup> {
    if let Some(media_type) = MediaType::from_path(path) {
        match state.graph.find_by_path(path, media_type) {
            Ok(Some(resource)) => {
                let body = resource.read(state.webjars.as_ref())?;
                let hash = ContentHash::compute(&body);
                debug!(id = resource.id(), bytes = body.len(), "assembled webjar");
                return Ok(Lookup::Assembled {
                    media_type,
                    body,
                    hash,
                });
            }
            Ok(None) => debug!(path, "not in graph, falling back to static lookup"),
            Err(WebJarError::PathNotFound { .. }) => return Ok(Lookup::NotFound),
            Err(e) => return Err(e),
        }
    }

    match state.fallback.load(path.trim_start_matches('/')) {
        Ok(body) => Ok(Lookup::Static {
            body,
            content_type: content_type_for(path),
        }),
        Err(e) if e.is_not_found() => Ok(Lookup::NotFound),
        Err(e) => Err(e),
    }
}

fn content_type_for(path: &str) -> Mime {
    let ext = path.rsplit_once('.').map(|(_, ext)| ext.to_ascii_lowercase());
    match ext.as_deref() {
        Some("js") => mime::APPLICATION_JAVASCRIPT,
        Some("css") => mime::TEXT_CSS,
        Some("html") | Some("htm") => mime::TEXT_HTML,
        Some("json") | Some("map") => mime::APPLICATION_JSON,
        Some("svg") => mime::IMAGE_SVG,
        Some("png") => mime::IMAGE_PNG,
        Some("gif") => mime::IMAGE_GIF,
        Some("jpg") | Some("jpeg") => mime::IMAGE_JPEG,
        Some("woff") => mime::FONT_WOFF,
        Some("woff2") => mime::FONT_WOFF2,
        _ => mime::APPLICATION_OCTET_STREAM,
    }
}

/// `GET /webjars/{*path}`.
pub async fn webjar_handler(
    State(state): State<ServerState>,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    let path = uri.path().to_string();
    let task_path = path.clone();
    let result = tokio::task::spawn_blocking(move || lookup(&state, &task_path)).await;

    match result {
        Ok(Ok(Lookup::Assembled {
            media_type,
            body,
            hash,
        })) => {
            let not_modified = headers
                .get(header::IF_NONE_MATCH)
                .and_then(|v| v.to_str().ok())
                .is_some_and(|v| hash.matches_etag(v));
            if not_modified {
                return (
                    StatusCode::NOT_MODIFIED,
                    [
                        (header::ETAG, hash.etag()),
                        (header::CACHE_CONTROL, "no-cache".to_string()),
                    ],
                )
                    .into_response();
            }
            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, media_type.content_type().to_string()),
                    (header::ETAG, hash.etag()),
                    (header::CACHE_CONTROL, "no-cache".to_string()),
                ],
                body,
            )
                .into_response()
        }
        Ok(Ok(Lookup::Static { body, content_type })) => {
            (StatusCode::OK, [(header::CONTENT_TYPE, content_type.to_string())], body).into_response()
        }
        Ok(Ok(Lookup::NotFound)) => {
            debug!(path = %path, "no such resource");
            StatusCode::NOT_FOUND.into_response()
        }
        Ok(Err(e)) => {
            error!(path = %path, error = %e, "cannot serve webjar");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
        Err(e) => {
            warn!(path = %path, error = %e, "lookup task failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
