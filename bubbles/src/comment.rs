//! Data model: guest comments and persisted bubble positions.
//!
//! These are the rows exchanged with the remote collaborator. Field names
//! follow the storage columns (`photo_id`, `created_at`, `top_pct`, ...) so
//! the same types serialize for the HTTP API, the live websocket feed, and
//! the database mapping on the server.

#[cfg(test)]
#[path = "comment_test.rs"]
mod comment_test;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Opaque comment identifier assigned by the remote store.
pub type CommentId = String;

/// A guest comment attached to one photo. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    /// Unique identifier, assigned on insert.
    pub id: CommentId,
    /// Photo the comment was left on.
    pub photo_id: String,
    /// Comment body as typed by the guest (already trimmed).
    pub text: String,
    /// Insert time.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Location of a bubble center in percent of the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Vertical offset of the bubble center, percent of canvas height.
    pub top: f64,
    /// Horizontal offset of the bubble center, percent of canvas width.
    pub left: f64,
}

impl Position {
    #[must_use]
    pub fn new(top: f64, left: f64) -> Self {
        Self { top, left }
    }
}

/// Persisted override of a bubble position, keyed by comment id.
///
/// `top_pct` is percent of canvas height, `left_pct` percent of canvas width.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BubblePosition {
    pub comment_id: CommentId,
    pub photo_id: String,
    pub top_pct: f64,
    pub left_pct: f64,
}

impl BubblePosition {
    /// Build a row for `comment_id` on `photo_id` at `position`.
    #[must_use]
    pub fn new(comment_id: impl Into<CommentId>, photo_id: impl Into<String>, position: Position) -> Self {
        Self {
            comment_id: comment_id.into(),
            photo_id: photo_id.into(),
            top_pct: position.top,
            left_pct: position.left,
        }
    }

    /// The coordinates of this row.
    #[must_use]
    pub fn position(&self) -> Position {
        Position::new(self.top_pct, self.left_pct)
    }
}

/// Sort comments newest first, breaking timestamp ties by id for a stable order.
pub fn sort_newest_first(comments: &mut [Comment]) {
    comments.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
}
