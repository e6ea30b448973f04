//! Position state: the authoritative in-memory placement and stacking of bubbles.
//!
//! `PositionStore` holds one [`Position`] and one stack value per displayed
//! comment. Positions start at the deterministic [`placement`] and are
//! overridden by persisted rows and by drags. The stack counter lives on the
//! store instance, so each canvas orders its own bubbles independently.

#[cfg(test)]
#[path = "position_test.rs"]
mod position_test;

use std::collections::HashMap;

use crate::comment::{BubblePosition, Comment, CommentId, Position};
use crate::consts::STACK_ORDER_BASE;
use crate::placement::{SafeBand, placement_in};

/// In-memory positions and stacking order for one canvas.
#[derive(Debug, Clone)]
pub struct PositionStore {
    band: SafeBand,
    positions: HashMap<CommentId, Position>,
    stack: HashMap<CommentId, u64>,
    stack_counter: u64,
}

impl PositionStore {
    /// Create an empty store using the default safe band.
    #[must_use]
    pub fn new() -> Self {
        Self::with_band(SafeBand::default())
    }

    /// Create an empty store clamping into `band`.
    #[must_use]
    pub fn with_band(band: SafeBand) -> Self {
        Self { band, positions: HashMap::new(), stack: HashMap::new(), stack_counter: STACK_ORDER_BASE }
    }

    /// The band positions are clamped into.
    #[must_use]
    pub fn band(&self) -> SafeBand {
        self.band
    }

    /// Give every comment without an entry its placement and the next stack value.
    ///
    /// Existing entries are left untouched, so calling this again with the
    /// same (or a grown) list only initializes the new comments.
    pub fn ensure_initialized(&mut self, comments: &[Comment]) {
        for comment in comments {
            if !self.positions.contains_key(&comment.id) {
                self.positions.insert(comment.id.clone(), placement_in(&comment.id, self.band));
            }
            if !self.stack.contains_key(&comment.id) {
                let z = self.next_stack_value();
                self.stack.insert(comment.id.clone(), z);
            }
        }
    }

    /// Overwrite positions with persisted rows. Comments absent from `rows` keep their position.
    ///
    /// Rows for comments that are not displayed yet are stored as well; when
    /// the comment arrives, [`Self::ensure_initialized`] keeps the persisted value.
    pub fn merge_persisted(&mut self, rows: &[BubblePosition]) {
        for row in rows {
            let position = self.band.clamp_position(row.position());
            self.positions.insert(row.comment_id.clone(), position);
        }
    }

    /// Move a bubble, clamping both coordinates into the band. Memory only.
    pub fn set_position(&mut self, comment_id: &str, top: f64, left: f64) -> Position {
        let position = self.band.clamp_position(Position::new(top, left));
        self.positions.insert(comment_id.to_owned(), position);
        position
    }

    /// Raise a bubble above every other one and return its new stack value.
    pub fn bring_to_front(&mut self, comment_id: &str) -> u64 {
        let z = self.next_stack_value();
        self.stack.insert(comment_id.to_owned(), z);
        z
    }

    /// Current position of a bubble.
    #[must_use]
    pub fn position(&self, comment_id: &str) -> Option<Position> {
        self.positions.get(comment_id).copied()
    }

    /// Current stack value of a bubble.
    #[must_use]
    pub fn stack_order(&self, comment_id: &str) -> Option<u64> {
        self.stack.get(comment_id).copied()
    }

    /// Upper bound of the stack values in use: the highest value issued, or
    /// [`STACK_ORDER_BASE`] before any bubble has been stacked. The next value
    /// issued is always greater.
    #[must_use]
    pub fn top_stack_value(&self) -> u64 {
        self.stack_counter
    }

    /// Comment ids ordered front (highest stack value) to back.
    #[must_use]
    pub fn front_to_back(&self) -> Vec<&str> {
        let mut ids: Vec<(&str, u64)> = self.stack.iter().map(|(id, z)| (id.as_str(), *z)).collect();
        ids.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        ids.into_iter().map(|(id, _)| id).collect()
    }

    /// Number of bubbles with a stack entry, i.e. that have been displayed.
    #[must_use]
    pub fn len(&self) -> usize {
        self.stack.len()
    }

    /// Returns `true` if no bubble has been displayed yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    fn next_stack_value(&mut self) -> u64 {
        self.stack_counter += 1;
        self.stack_counter
    }
}

impl Default for PositionStore {
    fn default() -> Self {
        Self::new()
    }
}
