//! In-process remote store.
//!
//! `MemoryStore` keeps comment and position rows in memory and fans inserts
//! out to per-photo subscriber channels, mirroring what the server does with
//! Postgres and websockets. It backs tests and offline demos, and can inject
//! failures to exercise the degraded paths of the host view.

#[cfg(test)]
#[path = "memory_test.rs"]
mod memory_test;

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use time::OffsetDateTime;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::comment::{BubblePosition, Comment, CommentId, sort_newest_first};
use crate::remote::{RemoteError, RemoteStore, Subscription};

const DEFAULT_FEED_CAPACITY: usize = 64;

#[derive(Default)]
struct Inner {
    comments: Vec<Comment>,
    positions: HashMap<CommentId, BubblePosition>,
    /// photo id -> subscription id -> feed sender.
    subscribers: HashMap<String, HashMap<u64, mpsc::Sender<Comment>>>,
    next_comment: u64,
    next_subscription: u64,
    failing_reads: usize,
    failing_writes: usize,
    failing_subscribes: usize,
}

/// Shared in-memory implementation of [`RemoteStore`]. Clones share state.
#[derive(Clone)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
    feed_capacity: usize,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::with_feed_capacity(DEFAULT_FEED_CAPACITY)
    }

    /// Create a store whose subscriber channels buffer `capacity` comments.
    #[must_use]
    pub fn with_feed_capacity(capacity: usize) -> Self {
        Self { inner: Arc::new(Mutex::new(Inner::default())), feed_capacity: capacity.max(1) }
    }

    /// Store an existing comment without notifying subscribers.
    pub fn seed_comment(&self, comment: Comment) {
        self.lock().comments.push(comment);
    }

    /// Snapshot of all stored position rows.
    #[must_use]
    pub fn positions(&self) -> Vec<BubblePosition> {
        self.lock().positions.values().cloned().collect()
    }

    /// Number of live subscriptions on a photo.
    #[must_use]
    pub fn subscriber_count(&self, photo_id: &str) -> usize {
        self.lock().subscribers.get(photo_id).map_or(0, HashMap::len)
    }

    /// Make the next `n` list calls fail with [`RemoteError::Unavailable`].
    pub fn fail_next_reads(&self, n: usize) {
        self.lock().failing_reads = n;
    }

    /// Make the next `n` insert/upsert calls fail with [`RemoteError::Unavailable`].
    pub fn fail_next_writes(&self, n: usize) {
        self.lock().failing_writes = n;
    }

    /// Make the next `n` subscribe calls fail with [`RemoteError::Unavailable`].
    pub fn fail_next_subscribes(&self, n: usize) {
        self.lock().failing_subscribes = n;
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn take_failure(counter: &mut usize, what: &str) -> Result<(), RemoteError> {
    if *counter == 0 {
        return Ok(());
    }
    *counter -= 1;
    Err(RemoteError::Unavailable(format!("injected {what} failure")))
}

#[async_trait::async_trait]
impl RemoteStore for MemoryStore {
    async fn insert_comment(&self, photo_id: &str, text: &str) -> Result<Comment, RemoteError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(RemoteError::Rejected("comment text is empty".into()));
        }

        let mut inner = self.lock();
        take_failure(&mut inner.failing_writes, "write")?;

        inner.next_comment += 1;
        let comment = Comment {
            id: format!("mem-{}", inner.next_comment),
            photo_id: photo_id.to_owned(),
            text: text.to_owned(),
            created_at: OffsetDateTime::now_utc(),
        };
        inner.comments.push(comment.clone());

        if let Some(feeds) = inner.subscribers.get(photo_id) {
            for (subscription, tx) in feeds {
                // Best-effort: a full or closed feed misses this insert.
                if let Err(e) = tx.try_send(comment.clone()) {
                    warn!(subscription, %photo_id, error = %e, "memory store: feed send failed");
                }
            }
        }
        Ok(comment)
    }

    async fn list_comments(&self, photo_id: &str) -> Result<Vec<Comment>, RemoteError> {
        let mut inner = self.lock();
        take_failure(&mut inner.failing_reads, "read")?;
        let mut list: Vec<Comment> = inner.comments.iter().filter(|c| c.photo_id == photo_id).cloned().collect();
        sort_newest_first(&mut list);
        Ok(list)
    }

    async fn list_positions(&self, photo_id: &str) -> Result<Vec<BubblePosition>, RemoteError> {
        let mut inner = self.lock();
        take_failure(&mut inner.failing_reads, "read")?;
        Ok(inner.positions.values().filter(|p| p.photo_id == photo_id).cloned().collect())
    }

    async fn upsert_position(&self, position: &BubblePosition) -> Result<(), RemoteError> {
        let mut inner = self.lock();
        take_failure(&mut inner.failing_writes, "write")?;
        inner.positions.insert(position.comment_id.clone(), position.clone());
        Ok(())
    }

    async fn subscribe_inserts(&self, photo_id: &str) -> Result<Subscription, RemoteError> {
        let (tx, rx) = mpsc::channel(self.feed_capacity);
        let subscription = {
            let mut inner = self.lock();
            take_failure(&mut inner.failing_subscribes, "subscribe")?;
            inner.next_subscription += 1;
            let subscription = inner.next_subscription;
            inner.subscribers.entry(photo_id.to_owned()).or_default().insert(subscription, tx);
            subscription
        };
        debug!(subscription, %photo_id, "memory store: subscribed");

        let inner = Arc::clone(&self.inner);
        let photo = photo_id.to_owned();
        Ok(Subscription::new(photo_id, rx, move || {
            let mut inner = inner.lock().unwrap_or_else(PoisonError::into_inner);
            if let Some(feeds) = inner.subscribers.get_mut(&photo) {
                feeds.remove(&subscription);
                if feeds.is_empty() {
                    inner.subscribers.remove(&photo);
                }
            }
            debug!(subscription, photo_id = %photo, "memory store: unsubscribed");
        }))
    }
}
