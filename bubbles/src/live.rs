//! Live update listener: the insert feed for the photo currently on display.
//!
//! LIFECYCLE
//! =========
//! 1. `listen(photo)` → drop any previous subscription, subscribe (with retry)
//! 2. `next()` → await inserted comments for that photo
//! 3. `listen(other)` / `close()` / drop → previous subscription released
//!
//! Comments for any other photo are discarded in `next()`, so a notification
//! that was already in flight when the photo changed never reaches the new view.

#[cfg(test)]
#[path = "live_test.rs"]
mod live_test;

use tracing::{info, warn};

use crate::comment::Comment;
use crate::remote::{RemoteError, RemoteStore, Subscription};
use crate::retry::{RetryPolicy, with_retry};

/// Holds at most one insert subscription, bound to one photo.
#[derive(Debug, Default)]
pub struct LiveListener {
    subscription: Option<Subscription>,
    policy: RetryPolicy,
}

impl LiveListener {
    #[must_use]
    pub fn new(policy: RetryPolicy) -> Self {
        Self { subscription: None, policy }
    }

    /// The photo currently listened to.
    #[must_use]
    pub fn photo_id(&self) -> Option<&str> {
        self.subscription.as_ref().map(Subscription::photo_id)
    }

    /// Whether a subscription is held.
    #[must_use]
    pub fn is_listening(&self) -> bool {
        self.subscription.is_some()
    }

    /// Replace the current subscription with one for `photo_id`.
    ///
    /// The old subscription is released before the new one is requested,
    /// including when subscribing fails.
    ///
    /// # Errors
    ///
    /// Returns the last [`RemoteError`] if every attempt to subscribe failed.
    pub async fn listen(&mut self, remote: &dyn RemoteStore, photo_id: &str) -> Result<(), RemoteError> {
        self.close();
        let subscription = with_retry(self.policy, "subscribe_inserts", || remote.subscribe_inserts(photo_id)).await?;
        info!(%photo_id, "live: listening for new comments");
        self.subscription = Some(subscription);
        Ok(())
    }

    /// Release the current subscription, if any.
    pub fn close(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            info!(photo_id = %subscription.photo_id(), "live: stopped listening");
            subscription.close();
        }
    }

    /// Wait for the next comment inserted on the listened photo.
    ///
    /// Returns `None` when not listening or when the feed ended; in the
    /// latter case the subscription is released and `listen` must be called
    /// again to resume.
    pub async fn next(&mut self) -> Option<Comment> {
        let subscription = self.subscription.as_mut()?;
        loop {
            let Some(comment) = subscription.recv().await else {
                warn!(photo_id = %subscription.photo_id(), "live: feed ended");
                self.close();
                return None;
            };
            if comment.photo_id == subscription.photo_id() {
                return Some(comment);
            }
            warn!(
                comment_id = %comment.id,
                expected = %subscription.photo_id(),
                got = %comment.photo_id,
                "live: dropping comment for another photo"
            );
        }
    }
}
