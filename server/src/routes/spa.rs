//! Static file serving for the single-page app.
//!
//! Requests whose last path segment has a file extension (other than
//! `.html`) are looked up in the dist directory; everything else, and any
//! asset that does not exist, gets `index.html` so the client router can
//! resolve the path.

use std::path::Path;

use axum::Router;
use axum::extract::Request;
use axum::http::Uri;
use axum::middleware;
use tower_http::compression::CompressionLayer;
use tower_http::services::{ServeDir, ServeFile};

const INDEX: &str = "index.html";

/// What a non-API path resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpaTarget {
    /// Serve the file at this path if it exists.
    Asset,
    /// Serve `index.html`.
    Index,
}

#[must_use]
pub fn spa_target(path: &str) -> SpaTarget {
    let last = path.rsplit('/').next().unwrap_or_default();
    if last.contains('.') && !last.ends_with(".html") { SpaTarget::Asset } else { SpaTarget::Index }
}

async fn rewrite_to_index(mut req: Request) -> Request {
    if spa_target(req.uri().path()) == SpaTarget::Index {
        *req.uri_mut() = Uri::from_static("/index.html");
    }
    req
}

/// Router serving `dist_dir` with the SPA fallback.
pub fn router(dist_dir: &Path) -> Router {
    let index = dist_dir.join(INDEX);
    let files = ServeDir::new(dist_dir).fallback(ServeFile::new(index));

    Router::new()
        .fallback_service(files)
        .layer(middleware::map_request(rewrite_to_index))
        .layer(CompressionLayer::new())
}
