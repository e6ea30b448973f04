use super::*;
use crate::state::test_helpers;
use tokio::time::{Duration, timeout};

async fn assert_channel_has_comment(rx: &mut mpsc::Receiver<Comment>) -> Comment {
    timeout(Duration::from_millis(200), rx.recv())
        .await
        .expect("comment receive timed out")
        .expect("channel closed")
}

async fn assert_channel_empty(rx: &mut mpsc::Receiver<Comment>) {
    assert!(
        timeout(Duration::from_millis(80), rx.recv()).await.is_err(),
        "expected channel to remain empty"
    );
}

#[tokio::test]
async fn broadcast_reaches_only_listeners_on_same_photo() {
    let state = test_helpers::test_app_state();
    let (_, mut a) = subscribe(&state, "l1").await;
    let (_, mut b) = subscribe(&state, "l1").await;
    let (_, mut other) = subscribe(&state, "k1").await;

    let comment = test_helpers::dummy_comment("l1");
    assert_eq!(broadcast(&state, &comment).await, 2);

    assert_eq!(assert_channel_has_comment(&mut a).await, comment);
    assert_eq!(assert_channel_has_comment(&mut b).await, comment);
    assert_channel_empty(&mut other).await;
}

#[tokio::test]
async fn broadcast_without_listeners_delivers_nothing() {
    let state = test_helpers::test_app_state();
    assert_eq!(broadcast(&state, &test_helpers::dummy_comment("l2")).await, 0);
}

#[tokio::test]
async fn unsubscribe_removes_listener_and_empty_photo() {
    let state = test_helpers::test_app_state();
    let (first, _rx_first) = subscribe(&state, "l1").await;
    let (second, mut rx_second) = subscribe(&state, "l1").await;
    assert_eq!(listener_count(&state, "l1").await, 2);

    unsubscribe(&state, "l1", first).await;
    assert_eq!(listener_count(&state, "l1").await, 1);

    let comment = test_helpers::dummy_comment("l1");
    assert_eq!(broadcast(&state, &comment).await, 1);
    assert_eq!(assert_channel_has_comment(&mut rx_second).await, comment);

    unsubscribe(&state, "l1", second).await;
    assert!(!state.feeds.read().await.contains_key("l1"));
}

#[tokio::test]
async fn full_listener_is_skipped_without_blocking() {
    let state = test_helpers::test_app_state();
    let capacity = state.live_channel_capacity;
    let (_, mut rx) = subscribe(&state, "l1").await;

    for _ in 0..capacity {
        assert_eq!(broadcast(&state, &test_helpers::dummy_comment("l1")).await, 1);
    }
    assert_eq!(broadcast(&state, &test_helpers::dummy_comment("l1")).await, 0);

    for _ in 0..capacity {
        assert_channel_has_comment(&mut rx).await;
    }
    assert_channel_empty(&mut rx).await;
}

#[tokio::test]
async fn dropped_receiver_is_not_counted() {
    let state = test_helpers::test_app_state();
    let (_, rx) = subscribe(&state, "l1").await;
    drop(rx);
    assert_eq!(broadcast(&state, &test_helpers::dummy_comment("l1")).await, 0);
}
