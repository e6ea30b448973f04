//! Host view: one exhibit canvas composed from the position, drag and remote layers.
//!
//! DESIGN
//! ======
//! `HostView` is owned by a single task. Loads are split into a ticket and
//! apply step so a host can fetch concurrently and still discard results
//! that arrive after the displayed photo changed:
//!
//! ```text
//! switch_photo("l1") -> ticket(epoch 1)
//! switch_photo("k2") -> ticket(epoch 2)
//! apply_comments(ticket(epoch 1), ..) -> false   // stale, ignored
//! ```
//!
//! `load()` runs both fetches in sequence for callers that do not need the
//! split. Live inserts go through `apply_insert`, which de-duplicates by id
//! so a comment delivered by both the initial list and the feed shows once.
//!
//! ERROR HANDLING
//! ==============
//! Read failures never abort the view: a failed comment list leaves the
//! canvas empty with [`LoadState::Failed`], a failed position list leaves
//! the deterministic placements in place. Position writes are retried and
//! then dropped with a warning.

#[cfg(test)]
#[path = "host_test.rs"]
mod host_test;

use std::collections::HashSet;

use time::OffsetDateTime;
use tracing::{debug, info, warn};

use crate::comment::{BubblePosition, Comment, CommentId, Position, sort_newest_first};
use crate::drag::{Action, CanvasRect, DragController, Point, PointerId};
use crate::placement::{FloatAnimation, float_animation, placement_in};
use crate::position::PositionStore;
use crate::remote::RemoteStore;
use crate::retry::{RetryPolicy, persist_position};

/// Progress of the initial comment load for the displayed photo.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadState {
    /// No photo selected yet.
    #[default]
    Idle,
    /// A photo is selected and its comments have not arrived.
    Loading,
    /// Comments loaded (possibly none).
    Ready,
    /// The comment list could not be fetched; the canvas shows no bubbles.
    Failed(String),
}

/// Proof that a fetch was started for a particular photo selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    epoch: u64,
    photo_id: String,
}

impl LoadTicket {
    #[must_use]
    pub fn photo_id(&self) -> &str {
        &self.photo_id
    }
}

/// Everything the host UI needs to draw one bubble.
#[derive(Debug, Clone, PartialEq)]
pub struct BubbleView {
    pub comment_id: CommentId,
    pub text: String,
    pub created_at: OffsetDateTime,
    pub position: Position,
    pub stack_order: u64,
    pub animation: FloatAnimation,
    /// The ambient animation is paused while the bubble is dragged.
    pub paused: bool,
}

/// Host-side state of one canvas.
#[derive(Debug)]
pub struct HostView {
    photo_id: Option<String>,
    epoch: u64,
    state: LoadState,
    comments: Vec<Comment>,
    seen: HashSet<CommentId>,
    positions: PositionStore,
    drag: DragController,
    policy: RetryPolicy,
}

impl HostView {
    /// Create a view with no photo selected.
    #[must_use]
    pub fn new(policy: RetryPolicy) -> Self {
        Self {
            photo_id: None,
            epoch: 0,
            state: LoadState::Idle,
            comments: Vec::new(),
            seen: HashSet::new(),
            positions: PositionStore::new(),
            drag: DragController::new(""),
            policy,
        }
    }

    #[must_use]
    pub fn photo_id(&self) -> Option<&str> {
        self.photo_id.as_deref()
    }

    #[must_use]
    pub fn load_state(&self) -> &LoadState {
        &self.state
    }

    /// Displayed comments, newest first.
    #[must_use]
    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    #[must_use]
    pub fn positions(&self) -> &PositionStore {
        &self.positions
    }

    #[must_use]
    pub fn drag(&self) -> &DragController {
        &self.drag
    }

    /// Display another photo. Drops comments, positions, stacking and any
    /// drag in progress; results fetched for the previous selection become stale.
    pub fn switch_photo(&mut self, photo_id: &str) -> LoadTicket {
        self.epoch += 1;
        self.photo_id = Some(photo_id.to_owned());
        self.state = LoadState::Loading;
        self.comments.clear();
        self.seen.clear();
        self.positions = PositionStore::with_band(self.positions.band());
        self.drag.reset(photo_id);
        info!(%photo_id, epoch = self.epoch, "host: switched photo");
        LoadTicket { epoch: self.epoch, photo_id: photo_id.to_owned() }
    }

    /// Ticket for the current selection, if a photo is displayed.
    #[must_use]
    pub fn ticket(&self) -> Option<LoadTicket> {
        self.photo_id.as_ref().map(|photo_id| LoadTicket { epoch: self.epoch, photo_id: photo_id.clone() })
    }

    fn is_current(&self, ticket: &LoadTicket) -> bool {
        let current = ticket.epoch == self.epoch && self.photo_id.as_deref() == Some(ticket.photo_id.as_str());
        if !current {
            debug!(photo_id = %ticket.photo_id, epoch = ticket.epoch, "host: discarding stale result");
        }
        current
    }

    /// Install the fetched comment list. Returns `false` if the ticket is stale.
    ///
    /// Comments that arrived live before the list are kept.
    pub fn apply_comments(&mut self, ticket: &LoadTicket, comments: Vec<Comment>) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        for comment in comments {
            if comment.photo_id == ticket.photo_id && self.seen.insert(comment.id.clone()) {
                self.comments.push(comment);
            }
        }
        sort_newest_first(&mut self.comments);
        self.positions.ensure_initialized(&self.comments);
        self.state = LoadState::Ready;
        true
    }

    /// Override placements with persisted rows. Returns `false` if the ticket is stale.
    pub fn apply_positions(&mut self, ticket: &LoadTicket, rows: &[BubblePosition]) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        let rows: Vec<BubblePosition> = rows
            .iter()
            .filter(|row| row.photo_id == ticket.photo_id)
            .cloned()
            .collect();
        self.positions.merge_persisted(&rows);
        true
    }

    /// Record that the comment list could not be fetched. Returns `false` if the ticket is stale.
    pub fn fail_load(&mut self, ticket: &LoadTicket, reason: impl Into<String>) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.state = LoadState::Failed(reason.into());
        true
    }

    /// Show a comment delivered by the live feed.
    ///
    /// Returns `false` for comments on another photo and for ids already shown.
    pub fn apply_insert(&mut self, comment: Comment) -> bool {
        if self.photo_id.as_deref() != Some(comment.photo_id.as_str()) {
            return false;
        }
        if !self.seen.insert(comment.id.clone()) {
            debug!(comment_id = %comment.id, "host: duplicate insert ignored");
            return false;
        }
        self.positions.ensure_initialized(std::slice::from_ref(&comment));
        self.comments.insert(0, comment);
        true
    }

    /// Fetch comments then positions for the displayed photo.
    pub async fn load(&mut self, remote: &dyn RemoteStore) {
        let Some(ticket) = self.ticket() else {
            return;
        };

        match remote.list_comments(&ticket.photo_id).await {
            Ok(comments) => {
                info!(photo_id = %ticket.photo_id, count = comments.len(), "host: comments loaded");
                self.apply_comments(&ticket, comments);
            }
            Err(e) => {
                warn!(photo_id = %ticket.photo_id, error = %e, "host: comment load failed");
                self.fail_load(&ticket, e.to_string());
            }
        }

        match remote.list_positions(&ticket.photo_id).await {
            Ok(rows) => {
                self.apply_positions(&ticket, &rows);
            }
            Err(e) => warn!(photo_id = %ticket.photo_id, error = %e, "host: position load failed; using placements"),
        }
    }

    // =========================================================================
    // POINTER INPUT
    // =========================================================================

    pub fn pointer_down(
        &mut self,
        comment_id: &str,
        pointer_id: PointerId,
        pointer: Point,
        canvas: CanvasRect,
    ) -> Vec<Action> {
        if !self.seen.contains(comment_id) {
            return Vec::new();
        }
        self.drag.on_pointer_down(&mut self.positions, comment_id, pointer_id, pointer, canvas)
    }

    pub fn pointer_move(
        &mut self,
        comment_id: &str,
        pointer_id: PointerId,
        pointer: Point,
        canvas: CanvasRect,
    ) -> Vec<Action> {
        self.drag.on_pointer_move(&mut self.positions, comment_id, pointer_id, pointer, canvas)
    }

    pub fn pointer_up(&mut self, comment_id: &str, pointer_id: PointerId) -> Vec<Action> {
        self.drag.on_pointer_up(&self.positions, comment_id, pointer_id)
    }

    pub fn pointer_cancel(&mut self, comment_id: &str, pointer_id: PointerId) -> Vec<Action> {
        self.drag.on_pointer_cancel(&self.positions, comment_id, pointer_id)
    }

    pub fn click(&mut self, comment_id: &str) -> Vec<Action> {
        if !self.seen.contains(comment_id) {
            return Vec::new();
        }
        self.drag.on_click(&mut self.positions, comment_id)
    }

    /// Carry out the `PersistPosition` actions; other actions are left to the UI.
    ///
    /// Returns the number of rows stored.
    pub async fn persist(&self, remote: &dyn RemoteStore, actions: &[Action]) -> usize {
        let mut stored = 0;
        for action in actions {
            let Action::PersistPosition(row) = action else {
                continue;
            };
            if persist_position(remote, row, self.policy).await {
                stored += 1;
            }
        }
        stored
    }

    // =========================================================================
    // RENDER MODEL
    // =========================================================================

    /// Bubbles in display order (newest comment first).
    ///
    /// Empty while the comment list is [`LoadState::Failed`]; live inserts
    /// received meanwhile are kept and shown once a reload succeeds.
    #[must_use]
    pub fn bubbles(&self) -> Vec<BubbleView> {
        if matches!(self.state, LoadState::Failed(_)) {
            return Vec::new();
        }
        self.comments
            .iter()
            .map(|comment| BubbleView {
                comment_id: comment.id.clone(),
                text: comment.text.clone(),
                created_at: comment.created_at,
                position: self
                    .positions
                    .position(&comment.id)
                    .unwrap_or_else(|| placement_in(&comment.id, self.positions.band())),
                stack_order: self.positions.stack_order(&comment.id).unwrap_or_default(),
                animation: float_animation(&comment.id),
                paused: self.drag.is_paused(&comment.id),
            })
            .collect()
    }
}

impl Default for HostView {
    fn default() -> Self {
        Self::new(RetryPolicy::default())
    }
}
