//! Remote data collaborator: the persistence and real-time seam.
//!
//! DESIGN
//! ======
//! The host view never talks to storage directly. Everything goes through
//! [`RemoteStore`], implemented in-process by [`crate::memory::MemoryStore`],
//! over HTTP by the CLI, and backed by Postgres on the server.
//!
//! Subscriptions are scoped resources: [`Subscription`] owns the receiving
//! end of the insert feed and an unsubscribe hook that runs exactly once,
//! when the handle is closed or dropped. Replacing or dropping the handle is
//! therefore enough to tear the feed down on every exit path.

#[cfg(test)]
#[path = "remote_test.rs"]
mod remote_test;

use std::fmt;

use tokio::sync::mpsc;

use crate::comment::{BubblePosition, Comment};

#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    /// Transport or backend failure that may succeed when retried.
    #[error("remote unavailable: {0}")]
    Unavailable(String),
    /// The remote refused the request (validation, bad input).
    #[error("rejected by remote: {0}")]
    Rejected(String),
    #[error("not found: {0}")]
    NotFound(String),
    /// The subscription feed or connection was closed.
    #[error("remote connection closed")]
    Closed,
}

impl RemoteError {
    /// Whether repeating the same request could succeed.
    #[must_use]
    pub fn retryable(&self) -> bool {
        matches!(self, Self::Unavailable(_) | Self::Closed)
    }
}

/// Create/read/subscribe operations over comment and position rows keyed by photo.
#[async_trait::async_trait]
pub trait RemoteStore: Send + Sync {
    /// Insert a comment and return the stored row.
    ///
    /// # Errors
    ///
    /// Returns a [`RemoteError`] if the comment could not be stored; the
    /// caller still holds the guest's text and should tell them.
    async fn insert_comment(&self, photo_id: &str, text: &str) -> Result<Comment, RemoteError>;

    /// All comments on a photo, newest first.
    ///
    /// # Errors
    ///
    /// Returns a [`RemoteError`] if the query fails.
    async fn list_comments(&self, photo_id: &str) -> Result<Vec<Comment>, RemoteError>;

    /// All persisted bubble positions on a photo.
    ///
    /// # Errors
    ///
    /// Returns a [`RemoteError`] if the query fails.
    async fn list_positions(&self, photo_id: &str) -> Result<Vec<BubblePosition>, RemoteError>;

    /// Insert or replace the position row for `position.comment_id`. Last writer wins.
    ///
    /// # Errors
    ///
    /// Returns a [`RemoteError`] if the write fails.
    async fn upsert_position(&self, position: &BubblePosition) -> Result<(), RemoteError>;

    /// Start receiving comments inserted on `photo_id` from now on.
    ///
    /// # Errors
    ///
    /// Returns a [`RemoteError`] if the feed cannot be opened.
    async fn subscribe_inserts(&self, photo_id: &str) -> Result<Subscription, RemoteError>;
}

type Unsubscribe = Box<dyn FnOnce() + Send>;

/// Scoped handle on an insert feed. Dropping it unsubscribes.
pub struct Subscription {
    photo_id: String,
    rx: mpsc::Receiver<Comment>,
    unsubscribe: Option<Unsubscribe>,
}

impl Subscription {
    /// Wrap a feed receiver. `unsubscribe` runs once when the handle is closed or dropped.
    pub fn new(
        photo_id: impl Into<String>,
        rx: mpsc::Receiver<Comment>,
        unsubscribe: impl FnOnce() + Send + 'static,
    ) -> Self {
        Self { photo_id: photo_id.into(), rx, unsubscribe: Some(Box::new(unsubscribe)) }
    }

    /// The photo this feed is filtered on.
    #[must_use]
    pub fn photo_id(&self) -> &str {
        &self.photo_id
    }

    /// Wait for the next inserted comment. `None` once the feed has ended.
    pub async fn recv(&mut self) -> Option<Comment> {
        self.rx.recv().await
    }

    /// Unsubscribe now instead of at drop.
    pub fn close(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(unsubscribe) = self.unsubscribe.take() {
            unsubscribe();
        }
        self.rx.close();
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("photo_id", &self.photo_id)
            .field("active", &self.unsubscribe.is_some())
            .finish()
    }
}
