//! Terminal rendering of the host view.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use bubbles::host::{BubbleView, LoadState};
use time::format_description::well_known::Rfc3339;

/// One line per bubble: stack order, position, timestamp and text.
#[must_use]
pub fn format_bubble(bubble: &BubbleView) -> String {
    let created = bubble.created_at.format(&Rfc3339).unwrap_or_else(|_| "-".to_owned());
    let marker = if bubble.paused { '*' } else { ' ' };
    format!(
        "{marker}[z{:>3}] top {:>6.2}% left {:>6.2}%  {created}  {}  ({})",
        bubble.stack_order, bubble.position.top, bubble.position.left, bubble.text, bubble.comment_id
    )
}

/// Summary line for the load state of a photo.
#[must_use]
pub fn format_load_state(photo_id: &str, state: &LoadState, bubbles: usize) -> String {
    match state {
        LoadState::Idle => "no photo selected".to_owned(),
        LoadState::Loading => format!("{photo_id}: loading..."),
        LoadState::Ready if bubbles == 0 => format!("{photo_id}: no comments yet"),
        LoadState::Ready => format!("{photo_id}: {bubbles} comment(s)"),
        LoadState::Failed(reason) => format!("{photo_id}: comments unavailable ({reason})"),
    }
}
