//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! This module binds the exhibit API and the live websocket under `/api`,
//! the health check, and the built single-page app from `DIST_DIR` as the
//! fallback for every other path.


pub mod comments;
pub mod live;
pub mod photos;
pub mod positions;
pub mod spa;

use std::path::Path;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::{get, put};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// API routes plus the health check.
fn api_routes(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/api/photos", get(photos::list_photos))
        .route("/api/photos/{photo_id}", get(photos::get_photo))
        .route(
            "/api/photos/{photo_id}/comments",
            get(comments::list_comments).post(comments::create_comment),
        )
        .route("/api/photos/{photo_id}/positions", get(positions::list_positions))
        .route("/api/photos/{photo_id}/live", get(live::handle_live))
        .route("/api/positions/{comment_id}", put(positions::put_position))
        .layer(cors)
        .with_state(state)
}

/// Full application: API routes with the SPA as fallback.
pub fn app(state: AppState, dist_dir: &Path) -> Router {
    api_routes(state)
        .fallback_service(spa::router(dist_dir))
        .layer(TraceLayer::new_for_http())
}

pub(crate) async fn health() -> (StatusCode, &'static str) {
    (StatusCode::OK, "OK")
}
