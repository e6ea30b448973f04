//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. It
//! holds the database pool and the live feed registry: for every photo, the
//! websocket connections currently watching it, each with a bounded sender
//! for newly inserted comments.

use std::collections::HashMap;
use std::sync::Arc;

use bubbles::comment::Comment;
use sqlx::PgPool;
use tokio::sync::{RwLock, mpsc};
use uuid::Uuid;

/// `photo_id` -> `listener_id` -> sender for inserted comments.
pub type FeedRegistry = HashMap<String, HashMap<Uuid, mpsc::Sender<Comment>>>;

/// Shared application state. Clone is required by Axum; inner fields are Arc-wrapped or Clone.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub feeds: Arc<RwLock<FeedRegistry>>,
    /// Buffer size of each live listener channel.
    pub live_channel_capacity: usize,
}

impl AppState {
    #[must_use]
    pub fn new(pool: PgPool, live_channel_capacity: usize) -> Self {
        Self { pool, feeds: Arc::new(RwLock::new(HashMap::new())), live_channel_capacity: live_channel_capacity.max(1) }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================
