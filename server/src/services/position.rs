//! Bubble position service: one row per comment, last writer wins.
//!
//! ERROR HANDLING
//! ==============
//! Coordinates are percentages of the canvas and must be finite values in
//! `[0, 100]`; hosts clamp into the narrower safe band before writing. A
//! row for a comment that does not exist is [`PositionError::UnknownComment`].
//! The stored `photo_id` always comes from the comment itself; a write that
//! names another photo is [`PositionError::PhotoMismatch`].

#[cfg(test)]
#[path = "position_test.rs"]
mod position_test;

use bubbles::comment::{BubblePosition, Position};
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

const MIN_PCT: f64 = 0.0;
const MAX_PCT: f64 = 100.0;

#[derive(Debug, thiserror::Error)]
pub enum PositionError {
    #[error("{field} must be a finite percentage in [0, 100], got {value}")]
    OutOfRange { field: &'static str, value: f64 },
    #[error("comment not found: {0}")]
    UnknownComment(Uuid),
    #[error("comment {comment_id} belongs to photo {photo_id}")]
    PhotoMismatch { comment_id: Uuid, photo_id: String },
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

fn check_percent(field: &'static str, value: f64) -> Result<f64, PositionError> {
    if value.is_finite() && (MIN_PCT..=MAX_PCT).contains(&value) {
        Ok(value)
    } else {
        Err(PositionError::OutOfRange { field, value })
    }
}

/// Validate both coordinates of a position write.
///
/// # Errors
///
/// Returns [`PositionError::OutOfRange`] naming the first bad coordinate.
pub fn validate(top_pct: f64, left_pct: f64) -> Result<Position, PositionError> {
    Ok(Position::new(check_percent("top_pct", top_pct)?, check_percent("left_pct", left_pct)?))
}

/// Check that a write targets the photo the comment was posted on.
///
/// # Errors
///
/// Returns [`PositionError::PhotoMismatch`] carrying the comment's photo.
pub fn check_photo(comment_id: Uuid, stored: &str, requested: &str) -> Result<(), PositionError> {
    if stored == requested {
        Ok(())
    } else {
        Err(PositionError::PhotoMismatch { comment_id, photo_id: stored.to_owned() })
    }
}

/// Insert or replace the position of a comment's bubble.
///
/// # Errors
///
/// Returns a validation error, [`PositionError::UnknownComment`] if the
/// comment does not exist, [`PositionError::PhotoMismatch`] if `photo_id`
/// is not the comment's photo, or a database error.
pub async fn upsert_position(
    pool: &PgPool,
    comment_id: Uuid,
    photo_id: &str,
    top_pct: f64,
    left_pct: f64,
) -> Result<BubblePosition, PositionError> {
    let position = validate(top_pct, left_pct)?;

    let stored = sqlx::query_scalar::<_, String>("SELECT photo_id FROM comments WHERE id = $1")
        .bind(comment_id)
        .fetch_optional(pool)
        .await?
        .ok_or(PositionError::UnknownComment(comment_id))?;
    check_photo(comment_id, &stored, photo_id)?;

    // Selecting from comments keeps the row on the comment's own photo and
    // inserts nothing if the comment was deleted since the check.
    let result = sqlx::query(
        "INSERT INTO comment_positions (comment_id, photo_id, top_pct, left_pct)
         SELECT id, photo_id, $2, $3 FROM comments WHERE id = $1
         ON CONFLICT (comment_id) DO UPDATE
         SET top_pct = EXCLUDED.top_pct,
             left_pct = EXCLUDED.left_pct,
             updated_at = now()",
    )
    .bind(comment_id)
    .bind(position.top)
    .bind(position.left)
    .execute(pool)
    .await?;
    if result.rows_affected() == 0 {
        return Err(PositionError::UnknownComment(comment_id));
    }

    debug!(%comment_id, %photo_id, top = position.top, left = position.left, "position stored");
    Ok(BubblePosition::new(comment_id.to_string(), photo_id, position))
}

/// All stored positions on a photo.
///
/// # Errors
///
/// Returns a database error if the query fails.
pub async fn list_positions(pool: &PgPool, photo_id: &str) -> Result<Vec<BubblePosition>, PositionError> {
    let rows = sqlx::query_as::<_, (Uuid, f64, f64)>(
        "SELECT comment_id, top_pct, left_pct FROM comment_positions WHERE photo_id = $1",
    )
    .bind(photo_id)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|(comment_id, top, left)| BubblePosition::new(comment_id.to_string(), photo_id, Position::new(top, left)))
        .collect())
}
