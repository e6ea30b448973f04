//! Bubble position routes.

#[cfg(test)]
#[path = "positions_test.rs"]
mod positions_test;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use bubbles::comment::BubblePosition;
use serde::Deserialize;
use tracing::error;
use uuid::Uuid;

use crate::services::position::{self, PositionError};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct PutPositionBody {
    pub photo_id: String,
    pub top_pct: f64,
    pub left_pct: f64,
}

/// `GET /api/photos/:photo_id/positions`: persisted bubble positions.
pub async fn list_positions(
    State(state): State<AppState>,
    Path(photo_id): Path<String>,
) -> Result<Json<Vec<BubblePosition>>, StatusCode> {
    let rows = position::list_positions(&state.pool, &photo_id)
        .await
        .map_err(position_error_to_status)?;
    Ok(Json(rows))
}

/// `PUT /api/positions/:comment_id`: insert or replace a bubble position.
pub async fn put_position(
    State(state): State<AppState>,
    Path(comment_id): Path<Uuid>,
    Json(body): Json<PutPositionBody>,
) -> Result<Json<BubblePosition>, (StatusCode, String)> {
    match position::upsert_position(&state.pool, comment_id, &body.photo_id, body.top_pct, body.left_pct).await {
        Ok(row) => Ok(Json(row)),
        Err(e) => {
            let message = e.to_string();
            Err((position_error_to_status(e), message))
        }
    }
}

pub(crate) fn position_error_to_status(err: PositionError) -> StatusCode {
    match err {
        PositionError::OutOfRange { .. } => StatusCode::BAD_REQUEST,
        PositionError::UnknownComment(_) => StatusCode::NOT_FOUND,
        PositionError::PhotoMismatch { .. } => StatusCode::CONFLICT,
        PositionError::Database(e) => {
            error!(error = %e, "position query failed");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}
