use super::*;
use crate::comment::Position;
use time::macros::datetime;
use tokio::time::{Duration, timeout};

async fn recv_within(sub: &mut Subscription) -> Option<Comment> {
    timeout(Duration::from_millis(200), sub.recv()).await.ok().flatten()
}

// =============================================================
// Comments
// =============================================================

#[tokio::test]
async fn insert_trims_and_assigns_ids() {
    let store = MemoryStore::new();
    let a = store.insert_comment("l1", "  hello  ").await.unwrap();
    let b = store.insert_comment("l1", "again").await.unwrap();
    assert_eq!(a.text, "hello");
    assert_eq!(a.photo_id, "l1");
    assert_ne!(a.id, b.id);
}

#[tokio::test]
async fn insert_rejects_blank_text() {
    let store = MemoryStore::new();
    let err = store.insert_comment("l1", "   \n").await.unwrap_err();
    assert!(matches!(err, RemoteError::Rejected(_)));
}

#[tokio::test]
async fn list_filters_by_photo_newest_first() {
    let store = MemoryStore::new();
    store.seed_comment(Comment {
        id: "old".into(),
        photo_id: "l1".into(),
        text: "old".into(),
        created_at: datetime!(2025-08-01 00:00:00 UTC),
    });
    store.seed_comment(Comment {
        id: "other".into(),
        photo_id: "k1".into(),
        text: "other".into(),
        created_at: datetime!(2025-08-02 00:00:00 UTC),
    });
    store.seed_comment(Comment {
        id: "new".into(),
        photo_id: "l1".into(),
        text: "new".into(),
        created_at: datetime!(2025-08-03 00:00:00 UTC),
    });

    let list = store.list_comments("l1").await.unwrap();
    let ids: Vec<&str> = list.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, ["new", "old"]);
}

#[tokio::test]
async fn injected_read_failures_are_consumed() {
    let store = MemoryStore::new();
    store.fail_next_reads(1);
    assert!(matches!(store.list_comments("l1").await, Err(RemoteError::Unavailable(_))));
    assert!(store.list_comments("l1").await.unwrap().is_empty());
}

#[tokio::test]
async fn injected_write_failure_stores_nothing() {
    let store = MemoryStore::new();
    store.fail_next_writes(1);
    assert!(store.insert_comment("l1", "lost").await.is_err());
    assert!(store.list_comments("l1").await.unwrap().is_empty());
}

// =============================================================
// Positions
// =============================================================

#[tokio::test]
async fn upsert_replaces_by_comment_id() {
    let store = MemoryStore::new();
    store.upsert_position(&BubblePosition::new("c1", "l1", Position::new(10.0, 10.0))).await.unwrap();
    store.upsert_position(&BubblePosition::new("c1", "l1", Position::new(20.0, 30.0))).await.unwrap();
    store.upsert_position(&BubblePosition::new("c2", "k1", Position::new(50.0, 50.0))).await.unwrap();

    let rows = store.list_positions("l1").await.unwrap();
    assert_eq!(rows, vec![BubblePosition::new("c1", "l1", Position::new(20.0, 30.0))]);
    assert_eq!(store.positions().len(), 2);
}

// =============================================================
// Subscriptions
// =============================================================

#[tokio::test]
async fn subscribers_receive_inserts_for_their_photo() {
    let store = MemoryStore::new();
    let mut l1 = store.subscribe_inserts("l1").await.unwrap();
    let mut k1 = store.subscribe_inserts("k1").await.unwrap();

    let inserted = store.insert_comment("l1", "hi").await.unwrap();

    assert_eq!(recv_within(&mut l1).await, Some(inserted));
    assert_eq!(recv_within(&mut k1).await, None);
}

#[tokio::test]
async fn dropping_subscription_unregisters() {
    let store = MemoryStore::new();
    let a = store.subscribe_inserts("l1").await.unwrap();
    let b = store.subscribe_inserts("l1").await.unwrap();
    assert_eq!(store.subscriber_count("l1"), 2);

    drop(a);
    assert_eq!(store.subscriber_count("l1"), 1);
    b.close();
    assert_eq!(store.subscriber_count("l1"), 0);

    store.insert_comment("l1", "nobody listening").await.unwrap();
}

#[tokio::test]
async fn full_feed_drops_inserts_without_failing_writer() {
    let store = MemoryStore::with_feed_capacity(1);
    let mut sub = store.subscribe_inserts("l1").await.unwrap();

    let first = store.insert_comment("l1", "one").await.unwrap();
    store.insert_comment("l1", "two").await.unwrap();

    assert_eq!(recv_within(&mut sub).await, Some(first));
    assert_eq!(recv_within(&mut sub).await, None);
    assert_eq!(store.list_comments("l1").await.unwrap().len(), 2);
}

#[tokio::test]
async fn injected_subscribe_failure() {
    let store = MemoryStore::new();
    store.fail_next_subscribes(1);
    assert!(store.subscribe_inserts("l1").await.is_err());
    assert_eq!(store.subscriber_count("l1"), 0);
    assert!(store.subscribe_inserts("l1").await.is_ok());
}
