use super::*;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use time::OffsetDateTime;

fn counting_subscription(photo_id: &str) -> (Subscription, mpsc::Sender<Comment>, Arc<AtomicUsize>) {
    let (tx, rx) = mpsc::channel(4);
    let calls = Arc::new(AtomicUsize::new(0));
    let hook = Arc::clone(&calls);
    let sub = Subscription::new(photo_id, rx, move || {
        hook.fetch_add(1, Ordering::SeqCst);
    });
    (sub, tx, calls)
}

#[test]
fn retryable_classification() {
    assert!(RemoteError::Unavailable("timeout".into()).retryable());
    assert!(RemoteError::Closed.retryable());
    assert!(!RemoteError::Rejected("empty text".into()).retryable());
    assert!(!RemoteError::NotFound("c1".into()).retryable());
}

#[test]
fn error_messages_are_descriptive() {
    assert_eq!(RemoteError::Rejected("empty text".into()).to_string(), "rejected by remote: empty text");
    assert_eq!(RemoteError::Closed.to_string(), "remote connection closed");
}

#[test]
fn drop_runs_unsubscribe_once() {
    let (sub, _tx, calls) = counting_subscription("l1");
    assert_eq!(sub.photo_id(), "l1");
    drop(sub);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn close_runs_unsubscribe_once() {
    let (sub, _tx, calls) = counting_subscription("l1");
    sub.close();
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn recv_delivers_sent_comments() {
    let (mut sub, tx, _calls) = counting_subscription("l1");
    let comment = Comment {
        id: "c1".into(),
        photo_id: "l1".into(),
        text: "hello".into(),
        created_at: OffsetDateTime::UNIX_EPOCH,
    };
    tx.send(comment.clone()).await.unwrap();
    assert_eq!(sub.recv().await, Some(comment));
}

#[tokio::test]
async fn recv_ends_when_sender_dropped() {
    let (mut sub, tx, _calls) = counting_subscription("l1");
    drop(tx);
    assert_eq!(sub.recv().await, None);
}

#[test]
fn debug_shows_photo_and_activity() {
    let (sub, _tx, _calls) = counting_subscription("k3");
    let rendered = format!("{sub:?}");
    assert!(rendered.contains("k3"));
    assert!(rendered.contains("active: true"));
}
