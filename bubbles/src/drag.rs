//! Drag interaction: the pointer gesture state machine for comment bubbles.
//!
//! The host layer forwards raw pointer events together with the canvas
//! bounding box. `DragController` converts them into position updates on the
//! [`PositionStore`] it is handed and returns [`Action`]s for the host to
//! carry out: pointer capture, re-render, and the one position write that
//! ends each gesture.
//!
//! Only one bubble per canvas can be dragged at a time. The controller keeps
//! a single active-drag slot instead of per-bubble flags, so a second
//! pointer-down while a drag is in progress is ignored.

#[cfg(test)]
#[path = "drag_test.rs"]
mod drag_test;

use crate::comment::{BubblePosition, CommentId, Position};
use crate::position::PositionStore;

/// Pointer identifier as reported by the host (e.g. DOM `pointerId`).
pub type PointerId = i32;

/// A point in host (client) pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Bounding box of the canvas in the same pixel coordinates as [`Point`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl CanvasRect {
    #[must_use]
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self { left, top, width, height }
    }

    /// Convert a pointer location to unclamped canvas percentages.
    ///
    /// Returns `None` for a collapsed or non-finite canvas, where no
    /// meaningful percentage exists.
    #[must_use]
    pub fn to_percent(&self, point: Point) -> Option<Position> {
        if !(self.width.is_finite() && self.height.is_finite()) || self.width <= 0.0 || self.height <= 0.0 {
            return None;
        }
        let top = (point.y - self.top) / self.height * 100.0;
        let left = (point.x - self.left) / self.width * 100.0;
        Some(Position::new(top, left))
    }
}

/// Effects the host must apply after an input event.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Route all further events of this pointer to the bubble.
    CapturePointer { comment_id: CommentId, pointer_id: PointerId },
    /// Stop routing this pointer exclusively to the bubble.
    ReleasePointer { comment_id: CommentId, pointer_id: PointerId },
    /// Positions, stacking or the paused bubble changed.
    RenderNeeded,
    /// Write this position to the remote store (gesture finished).
    PersistPosition(BubblePosition),
}

/// Gesture state of the canvas.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DragState {
    /// No gesture in progress; waiting for the next pointer-down.
    #[default]
    Idle,
    /// A bubble follows the pointer that pressed it.
    Dragging {
        /// The bubble being moved.
        comment_id: CommentId,
        /// The pointer that owns the capture.
        pointer_id: PointerId,
    },
}

/// Pointer state machine for one canvas.
#[derive(Debug, Clone)]
pub struct DragController {
    photo_id: String,
    state: DragState,
}

impl DragController {
    /// Create an idle controller for the canvas showing `photo_id`.
    #[must_use]
    pub fn new(photo_id: impl Into<String>) -> Self {
        Self { photo_id: photo_id.into(), state: DragState::Idle }
    }

    /// The photo persisted positions are attributed to.
    #[must_use]
    pub fn photo_id(&self) -> &str {
        &self.photo_id
    }

    /// Current gesture state.
    #[must_use]
    pub fn state(&self) -> &DragState {
        &self.state
    }

    /// The bubble currently being dragged, if any.
    #[must_use]
    pub fn active_drag(&self) -> Option<&str> {
        match &self.state {
            DragState::Idle => None,
            DragState::Dragging { comment_id, .. } => Some(comment_id),
        }
    }

    /// Whether a bubble's ambient animation is paused (it is the drag target).
    #[must_use]
    pub fn is_paused(&self, comment_id: &str) -> bool {
        self.active_drag() == Some(comment_id)
    }

    /// Pointer pressed on a bubble: start dragging it.
    pub fn on_pointer_down(
        &mut self,
        store: &mut PositionStore,
        comment_id: &str,
        pointer_id: PointerId,
        pointer: Point,
        canvas: CanvasRect,
    ) -> Vec<Action> {
        if self.state != DragState::Idle {
            return Vec::new();
        }

        self.state = DragState::Dragging { comment_id: comment_id.to_owned(), pointer_id };
        store.bring_to_front(comment_id);
        if let Some(raw) = canvas.to_percent(pointer) {
            store.set_position(comment_id, raw.top, raw.left);
        }

        vec![
            Action::CapturePointer { comment_id: comment_id.to_owned(), pointer_id },
            Action::RenderNeeded,
        ]
    }

    /// Pointer moved over a bubble: follow it if it owns the capture.
    pub fn on_pointer_move(
        &mut self,
        store: &mut PositionStore,
        comment_id: &str,
        pointer_id: PointerId,
        pointer: Point,
        canvas: CanvasRect,
    ) -> Vec<Action> {
        if !self.owns_capture(comment_id, pointer_id) {
            return Vec::new();
        }
        let Some(raw) = canvas.to_percent(pointer) else {
            return Vec::new();
        };
        store.set_position(comment_id, raw.top, raw.left);
        vec![Action::RenderNeeded]
    }

    /// Pointer released: end the drag and persist the final position.
    pub fn on_pointer_up(&mut self, store: &PositionStore, comment_id: &str, pointer_id: PointerId) -> Vec<Action> {
        self.finish(store, comment_id, pointer_id)
    }

    /// Pointer cancelled by the platform: ends the drag like a release.
    pub fn on_pointer_cancel(
        &mut self,
        store: &PositionStore,
        comment_id: &str,
        pointer_id: PointerId,
    ) -> Vec<Action> {
        self.finish(store, comment_id, pointer_id)
    }

    /// Bubble clicked: raise it without moving it.
    pub fn on_click(&mut self, store: &mut PositionStore, comment_id: &str) -> Vec<Action> {
        store.bring_to_front(comment_id);
        vec![Action::RenderNeeded]
    }

    /// Drop any gesture in progress without persisting (e.g. the photo changed).
    pub fn reset(&mut self, photo_id: impl Into<String>) {
        self.photo_id = photo_id.into();
        self.state = DragState::Idle;
    }

    fn owns_capture(&self, comment_id: &str, pointer_id: PointerId) -> bool {
        matches!(
            &self.state,
            DragState::Dragging { comment_id: active, pointer_id: owner }
                if active == comment_id && *owner == pointer_id
        )
    }

    fn finish(&mut self, store: &PositionStore, comment_id: &str, pointer_id: PointerId) -> Vec<Action> {
        if !self.owns_capture(comment_id, pointer_id) {
            return Vec::new();
        }
        self.state = DragState::Idle;

        let mut actions = vec![Action::ReleasePointer { comment_id: comment_id.to_owned(), pointer_id }];
        if let Some(position) = store.position(comment_id) {
            actions.push(Action::PersistPosition(BubblePosition::new(comment_id, self.photo_id.as_str(), position)));
        }
        actions.push(Action::RenderNeeded);
        actions
    }
}
