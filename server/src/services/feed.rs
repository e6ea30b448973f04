//! Live feed registry: per-photo fan-out of inserted comments.
//!
//! DESIGN
//! ======
//! Each live websocket registers a bounded sender under the photo it
//! watches. Inserts are delivered with `try_send`, so a slow or stalled
//! listener misses comments instead of holding up the guest's request.
//! Listeners recover missed comments by reloading the list.

#[cfg(test)]
#[path = "feed_test.rs"]
mod feed_test;

use bubbles::comment::Comment;
use tokio::sync::mpsc;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::state::AppState;

/// Register a listener on `photo_id`. Returns its id and the receiving end.
pub async fn subscribe(state: &AppState, photo_id: &str) -> (Uuid, mpsc::Receiver<Comment>) {
    let listener_id = Uuid::new_v4();
    let (tx, rx) = mpsc::channel(state.live_channel_capacity);
    let mut feeds = state.feeds.write().await;
    feeds
        .entry(photo_id.to_owned())
        .or_default()
        .insert(listener_id, tx);
    debug!(%listener_id, %photo_id, "feed: listener registered");
    (listener_id, rx)
}

/// Remove a listener. The photo entry is dropped with its last listener.
pub async fn unsubscribe(state: &AppState, photo_id: &str, listener_id: Uuid) {
    let mut feeds = state.feeds.write().await;
    if let Some(listeners) = feeds.get_mut(photo_id) {
        listeners.remove(&listener_id);
        if listeners.is_empty() {
            feeds.remove(photo_id);
        }
    }
    debug!(%listener_id, %photo_id, "feed: listener removed");
}

/// Number of listeners currently watching `photo_id`.
pub async fn listener_count(state: &AppState, photo_id: &str) -> usize {
    state
        .feeds
        .read()
        .await
        .get(photo_id)
        .map_or(0, std::collections::HashMap::len)
}

/// Push a comment to every listener on its photo. Returns how many accepted it.
pub async fn broadcast(state: &AppState, comment: &Comment) -> usize {
    let feeds = state.feeds.read().await;
    let Some(listeners) = feeds.get(&comment.photo_id) else {
        return 0;
    };

    let mut delivered = 0;
    for (listener_id, tx) in listeners {
        // Best-effort: a full or closed channel skips this listener.
        match tx.try_send(comment.clone()) {
            Ok(()) => delivered += 1,
            Err(e) => warn!(%listener_id, comment_id = %comment.id, error = %e, "feed: comment not delivered"),
        }
    }
    delivered
}
