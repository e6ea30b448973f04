//! Comment service: validation, storage and live fan-out of guest comments.
//!
//! DESIGN
//! ======
//! A comment is written once and never edited. After the insert commits,
//! the stored row is pushed to every live listener on the same photo; the
//! push is best-effort and never fails the guest's request.

#[cfg(test)]
#[path = "comment_test.rs"]
mod comment_test;

use bubbles::comment::Comment;
use sqlx::PgPool;
use time::OffsetDateTime;
use tracing::info;
use uuid::Uuid;

use crate::services::feed;
use crate::state::AppState;

/// Longest accepted comment, in characters after trimming.
pub const MAX_COMMENT_CHARS: usize = 1000;

#[derive(Debug, thiserror::Error)]
pub enum CommentError {
    #[error("comment text is empty")]
    Empty,
    #[error("comment is {0} characters; the limit is {MAX_COMMENT_CHARS}")]
    TooLong(usize),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Trim guest input and enforce the length limits.
///
/// # Errors
///
/// Returns [`CommentError::Empty`] for blank text and
/// [`CommentError::TooLong`] above [`MAX_COMMENT_CHARS`].
pub fn validate_text(text: &str) -> Result<&str, CommentError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(CommentError::Empty);
    }
    let chars = text.chars().count();
    if chars > MAX_COMMENT_CHARS {
        return Err(CommentError::TooLong(chars));
    }
    Ok(text)
}

/// Store a guest comment and notify live listeners on its photo.
///
/// # Errors
///
/// Returns a validation error for unacceptable text, or a database error if
/// the insert fails.
pub async fn create_comment(state: &AppState, photo_id: &str, text: &str) -> Result<Comment, CommentError> {
    let text = validate_text(text)?;
    let comment = insert_comment(&state.pool, photo_id, text).await?;
    let delivered = feed::broadcast(state, &comment).await;
    info!(comment_id = %comment.id, %photo_id, delivered, "comment created");
    Ok(comment)
}

async fn insert_comment(pool: &PgPool, photo_id: &str, text: &str) -> Result<Comment, sqlx::Error> {
    let id = Uuid::new_v4();
    let created_at = sqlx::query_scalar::<_, OffsetDateTime>(
        "INSERT INTO comments (id, photo_id, text) VALUES ($1, $2, $3) RETURNING created_at",
    )
    .bind(id)
    .bind(photo_id)
    .bind(text)
    .fetch_one(pool)
    .await?;

    Ok(Comment { id: id.to_string(), photo_id: photo_id.to_owned(), text: text.to_owned(), created_at })
}

/// All comments on a photo, newest first.
///
/// # Errors
///
/// Returns a database error if the query fails.
pub async fn list_comments(pool: &PgPool, photo_id: &str) -> Result<Vec<Comment>, CommentError> {
    let rows = sqlx::query_as::<_, (Uuid, String, String, OffsetDateTime)>(
        "SELECT id, photo_id, text, created_at
         FROM comments
         WHERE photo_id = $1
         ORDER BY created_at DESC, id ASC",
    )
    .bind(photo_id)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|(id, photo_id, text, created_at)| Comment { id: id.to_string(), photo_id, text, created_at })
        .collect())
}
