use super::*;
use crate::memory::MemoryStore;
use time::OffsetDateTime;
use tokio::time::{Duration, timeout};

fn fast() -> RetryPolicy {
    RetryPolicy { attempts: 3, base_delay_ms: 1 }
}

async fn next_within(listener: &mut LiveListener) -> Option<Comment> {
    timeout(Duration::from_millis(200), listener.next()).await.ok().flatten()
}

#[tokio::test]
async fn not_listening_yields_none() {
    let mut listener = LiveListener::new(fast());
    assert!(!listener.is_listening());
    assert_eq!(listener.photo_id(), None);
    assert_eq!(listener.next().await, None);
}

#[tokio::test]
async fn delivers_inserts_for_listened_photo() {
    let store = MemoryStore::new();
    let mut listener = LiveListener::new(fast());
    listener.listen(&store, "l1").await.unwrap();
    assert_eq!(listener.photo_id(), Some("l1"));

    let inserted = store.insert_comment("l1", "hello").await.unwrap();
    assert_eq!(next_within(&mut listener).await, Some(inserted));
}

#[tokio::test]
async fn switching_photo_releases_previous_subscription() {
    let store = MemoryStore::new();
    let mut listener = LiveListener::new(fast());

    listener.listen(&store, "l1").await.unwrap();
    assert_eq!(store.subscriber_count("l1"), 1);

    listener.listen(&store, "k2").await.unwrap();
    assert_eq!(store.subscriber_count("l1"), 0);
    assert_eq!(store.subscriber_count("k2"), 1);

    store.insert_comment("l1", "old photo").await.unwrap();
    assert_eq!(next_within(&mut listener).await, None);

    let fresh = store.insert_comment("k2", "new photo").await.unwrap();
    assert_eq!(next_within(&mut listener).await, Some(fresh));
}

#[tokio::test]
async fn close_and_drop_release_subscription() {
    let store = MemoryStore::new();
    let mut listener = LiveListener::new(fast());
    listener.listen(&store, "l1").await.unwrap();

    listener.close();
    assert!(!listener.is_listening());
    assert_eq!(store.subscriber_count("l1"), 0);

    listener.listen(&store, "l1").await.unwrap();
    drop(listener);
    assert_eq!(store.subscriber_count("l1"), 0);
}

#[tokio::test]
async fn subscribe_is_retried() {
    let store = MemoryStore::new();
    store.fail_next_subscribes(2);
    let mut listener = LiveListener::new(fast());

    listener.listen(&store, "l1").await.unwrap();
    assert!(listener.is_listening());
    assert_eq!(store.subscriber_count("l1"), 1);
}

#[tokio::test]
async fn failed_subscribe_leaves_listener_idle() {
    let store = MemoryStore::new();
    let mut listener = LiveListener::new(fast());
    listener.listen(&store, "l1").await.unwrap();

    store.fail_next_subscribes(10);
    assert!(listener.listen(&store, "k1").await.is_err());
    assert!(!listener.is_listening());
    assert_eq!(store.subscriber_count("l1"), 0);
}

#[tokio::test]
async fn comments_for_other_photos_are_filtered() {
    let (tx, rx) = tokio::sync::mpsc::channel(4);
    let mut listener = LiveListener::new(fast());
    listener.subscription = Some(Subscription::new("l1", rx, || {}));

    let stray = Comment {
        id: "x".into(),
        photo_id: "k1".into(),
        text: "stray".into(),
        created_at: OffsetDateTime::UNIX_EPOCH,
    };
    let wanted = Comment { id: "y".into(), photo_id: "l1".into(), ..stray.clone() };
    tx.send(stray).await.unwrap();
    tx.send(wanted.clone()).await.unwrap();

    assert_eq!(next_within(&mut listener).await, Some(wanted));
}

#[tokio::test]
async fn ended_feed_stops_listening() {
    let (tx, rx) = tokio::sync::mpsc::channel::<Comment>(1);
    let mut listener = LiveListener::new(fast());
    listener.subscription = Some(Subscription::new("l1", rx, || {}));
    drop(tx);

    assert_eq!(listener.next().await, None);
    assert!(!listener.is_listening());
}
