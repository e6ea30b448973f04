//! HTTP + websocket implementation of the remote store.
//!
//! DESIGN
//! ======
//! Reads and writes map one-to-one onto the server's REST routes. An insert
//! subscription is a websocket on `/api/photos/{id}/live`, pumped by a
//! background task into the subscription channel; unsubscribing aborts the
//! task, which drops the socket.
//!
//! ERROR HANDLING
//! ==============
//! Transport failures and 5xx replies are `Unavailable` (retryable), 4xx
//! validation replies are `Rejected`, 404 is `NotFound`.

#[cfg(test)]
#[path = "remote_test.rs"]
mod remote_test;

use bubbles::comment::{BubblePosition, Comment};
use bubbles::remote::{RemoteError, RemoteStore, Subscription};
use futures_util::StreamExt;
use reqwest::Url;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::{debug, warn};

const FEED_CAPACITY: usize = 64;

type LiveStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

#[derive(Serialize)]
struct CreateCommentBody<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct PutPositionBody<'a> {
    photo_id: &'a str,
    top_pct: f64,
    left_pct: f64,
}

/// Remote store backed by a running exhibit server.
#[derive(Debug, Clone)]
pub struct HttpStore {
    base: Url,
    client: reqwest::Client,
}

impl HttpStore {
    /// # Errors
    ///
    /// Returns [`RemoteError::Rejected`] if `base_url` is not an http(s) URL.
    pub fn new(base_url: &str) -> Result<Self, RemoteError> {
        let trimmed = base_url.trim_end_matches('/');
        let base = Url::parse(trimmed).map_err(|e| RemoteError::Rejected(format!("invalid base URL {trimmed}: {e}")))?;
        if !matches!(base.scheme(), "http" | "https") || base.cannot_be_a_base() {
            return Err(RemoteError::Rejected(format!("invalid base URL: {trimmed}")));
        }
        Ok(Self { base, client: reqwest::Client::new() })
    }

    /// URL for `segments` under the base URL. Each segment is percent-encoded,
    /// so ids containing `/`, `?` or `#` stay inside their segment.
    pub(crate) fn endpoint(&self, segments: &[&str]) -> Result<Url, RemoteError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| RemoteError::Rejected(format!("invalid base URL: {}", self.base)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// `GET` an endpoint and decode the JSON reply.
    ///
    /// # Errors
    ///
    /// Returns a [`RemoteError`] classified from the transport error or status.
    pub async fn get_json<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, RemoteError> {
        let response = self.client.get(self.endpoint(segments)?).send().await.map_err(transport)?;
        read_json(response).await
    }

    /// `GET /health`.
    ///
    /// # Errors
    ///
    /// Returns a [`RemoteError`] if the server is unreachable or unhealthy.
    pub async fn health(&self) -> Result<(), RemoteError> {
        let response = self.client.get(self.endpoint(&["health"])?).send().await.map_err(transport)?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.text().await.unwrap_or_default();
        Err(status_to_error(status.as_u16(), body))
    }
}

#[async_trait::async_trait]
impl RemoteStore for HttpStore {
    async fn insert_comment(&self, photo_id: &str, text: &str) -> Result<Comment, RemoteError> {
        let response = self
            .client
            .post(self.endpoint(&["api", "photos", photo_id, "comments"])?)
            .json(&CreateCommentBody { text })
            .send()
            .await
            .map_err(transport)?;
        read_json(response).await
    }

    async fn list_comments(&self, photo_id: &str) -> Result<Vec<Comment>, RemoteError> {
        self.get_json(&["api", "photos", photo_id, "comments"]).await
    }

    async fn list_positions(&self, photo_id: &str) -> Result<Vec<BubblePosition>, RemoteError> {
        self.get_json(&["api", "photos", photo_id, "positions"]).await
    }

    async fn upsert_position(&self, position: &BubblePosition) -> Result<(), RemoteError> {
        let body = PutPositionBody {
            photo_id: &position.photo_id,
            top_pct: position.top_pct,
            left_pct: position.left_pct,
        };
        let response = self
            .client
            .put(self.endpoint(&["api", "positions", &position.comment_id])?)
            .json(&body)
            .send()
            .await
            .map_err(transport)?;
        read_json::<BubblePosition>(response).await.map(|_| ())
    }

    async fn subscribe_inserts(&self, photo_id: &str) -> Result<Subscription, RemoteError> {
        let url = ws_url(self.endpoint(&["api", "photos", photo_id, "live"])?)?;
        let (stream, _) = connect_async(url.as_str())
            .await
            .map_err(|e| RemoteError::Unavailable(format!("websocket connect failed: {e}")))?;

        let (tx, rx) = mpsc::channel(FEED_CAPACITY);
        let task = tokio::spawn(pump_feed(stream, tx, photo_id.to_owned()));
        let abort = task.abort_handle();
        Ok(Subscription::new(photo_id, rx, move || abort.abort()))
    }
}

async fn pump_feed(mut stream: LiveStream, tx: mpsc::Sender<Comment>, photo_id: String) {
    while let Some(message) = stream.next().await {
        match message {
            Ok(Message::Text(text)) => match serde_json::from_str::<Comment>(text.as_str()) {
                Ok(comment) => {
                    if tx.send(comment).await.is_err() {
                        break;
                    }
                }
                Err(e) => warn!(%photo_id, error = %e, "live: undecodable message"),
            },
            Ok(Message::Close(_)) => break,
            Ok(_) => {}
            Err(e) => {
                warn!(%photo_id, error = %e, "live: socket error");
                break;
            }
        }
    }
    debug!(%photo_id, "live: feed ended");
}

async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, RemoteError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(status_to_error(status.as_u16(), body));
    }
    response
        .json::<T>()
        .await
        .map_err(|e| RemoteError::Unavailable(format!("invalid response body: {e}")))
}

fn transport(e: reqwest::Error) -> RemoteError {
    RemoteError::Unavailable(e.to_string())
}

/// Classify a non-success HTTP status.
pub(crate) fn status_to_error(status: u16, body: String) -> RemoteError {
    let detail = if body.trim().is_empty() { format!("HTTP {status}") } else { body };
    match status {
        404 => RemoteError::NotFound(detail),
        400..=499 => RemoteError::Rejected(detail),
        _ => RemoteError::Unavailable(detail),
    }
}

/// Websocket form of an http(s) endpoint.
pub(crate) fn ws_url(mut url: Url) -> Result<Url, RemoteError> {
    let scheme = match url.scheme() {
        "http" => "ws",
        "https" => "wss",
        other => return Err(RemoteError::Rejected(format!("unsupported scheme: {other}"))),
    };
    url.set_scheme(scheme)
        .map_err(|()| RemoteError::Rejected(format!("cannot switch {url} to {scheme}")))?;
    Ok(url)
}
