//! Live comment websocket.
//!
//! DESIGN
//! ======
//! A host display opens one socket per displayed photo. The server only
//! pushes: every comment inserted on that photo is sent as a JSON text
//! message in the same shape as the REST comment list. Inbound messages
//! other than close are ignored.
//!
//! LIFECYCLE
//! =========
//! 1. Upgrade → register a feed listener for the photo
//! 2. Inserted comments → forward to the socket
//! 3. Close, socket error or send failure → unregister

#[cfg(test)]
#[path = "live_test.rs"]
mod live_test;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Path, State};
use axum::response::Response;
use bubbles::comment::Comment;
use tracing::{info, warn};

use crate::services::feed;
use crate::state::AppState;

pub async fn handle_live(
    State(state): State<AppState>,
    Path(photo_id): Path<String>,
    ws: WebSocketUpgrade,
) -> Response {
    ws.on_upgrade(move |socket| run_live(socket, state, photo_id))
}

async fn run_live(mut socket: WebSocket, state: AppState, photo_id: String) {
    let (listener_id, mut rx) = feed::subscribe(&state, &photo_id).await;
    let listeners = feed::listener_count(&state, &photo_id).await;
    info!(%listener_id, %photo_id, listeners, "live: listener connected");

    loop {
        tokio::select! {
            msg = socket.recv() => {
                let Some(Ok(msg)) = msg else { break };
                if matches!(msg, Message::Close(_)) {
                    break;
                }
            }
            comment = rx.recv() => {
                let Some(comment) = comment else { break };
                if send_comment(&mut socket, &comment).await.is_err() {
                    break;
                }
            }
        }
    }

    feed::unsubscribe(&state, &photo_id, listener_id).await;
    info!(%listener_id, %photo_id, "live: listener disconnected");
}

async fn send_comment(socket: &mut WebSocket, comment: &Comment) -> Result<(), axum::Error> {
    let json = match serde_json::to_string(comment) {
        Ok(json) => json,
        Err(e) => {
            warn!(comment_id = %comment.id, error = %e, "live: comment encode failed");
            return Ok(());
        }
    };
    socket.send(Message::Text(json.into())).await
}
