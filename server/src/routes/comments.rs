//! Guest comment routes.

#[cfg(test)]
#[path = "comments_test.rs"]
mod comments_test;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use bubbles::comment::Comment;
use serde::Deserialize;
use tracing::error;

use crate::services::comment::{self, CommentError};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct CreateCommentBody {
    pub text: String,
}

/// `GET /api/photos/:photo_id/comments`: comments on a photo, newest first.
pub async fn list_comments(
    State(state): State<AppState>,
    Path(photo_id): Path<String>,
) -> Result<Json<Vec<Comment>>, StatusCode> {
    let comments = comment::list_comments(&state.pool, &photo_id)
        .await
        .map_err(comment_error_to_status)?;
    Ok(Json(comments))
}

/// `POST /api/photos/:photo_id/comments`: leave a comment.
pub async fn create_comment(
    State(state): State<AppState>,
    Path(photo_id): Path<String>,
    Json(body): Json<CreateCommentBody>,
) -> Result<(StatusCode, Json<Comment>), (StatusCode, String)> {
    match comment::create_comment(&state, &photo_id, &body.text).await {
        Ok(created) => Ok((StatusCode::CREATED, Json(created))),
        Err(e) => {
            let message = e.to_string();
            Err((comment_error_to_status(e), message))
        }
    }
}

pub(crate) fn comment_error_to_status(err: CommentError) -> StatusCode {
    match err {
        CommentError::Empty => StatusCode::BAD_REQUEST,
        CommentError::TooLong(_) => StatusCode::PAYLOAD_TOO_LARGE,
        CommentError::Database(e) => {
            error!(error = %e, "comment query failed");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}
