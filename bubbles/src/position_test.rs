use super::*;
use crate::placement::placement;
use time::OffsetDateTime;

fn comment(id: &str) -> Comment {
    Comment { id: id.into(), photo_id: "l1".into(), text: "hi".into(), created_at: OffsetDateTime::UNIX_EPOCH }
}

fn row(id: &str, top: f64, left: f64) -> BubblePosition {
    BubblePosition::new(id, "l1", Position::new(top, left))
}

// =============================================================
// ensure_initialized
// =============================================================

#[test]
fn new_store_is_empty() {
    let store = PositionStore::new();
    assert!(store.is_empty());
    assert_eq!(store.len(), 0);
    assert_eq!(store.top_stack_value(), STACK_ORDER_BASE);
}

#[test]
fn first_stack_value_is_above_base() {
    let mut store = PositionStore::new();
    store.ensure_initialized(&[comment("c1")]);
    let z = store.stack_order("c1").unwrap();
    assert!(z > STACK_ORDER_BASE);
    assert_eq!(store.top_stack_value(), z);
}

#[test]
fn ensure_initialized_assigns_placement() {
    let mut store = PositionStore::new();
    store.ensure_initialized(&[comment("c1")]);
    assert_eq!(store.position("c1"), Some(placement("c1")));
    assert!(store.stack_order("c1").is_some());
}

#[test]
fn ensure_initialized_assigns_increasing_stack_values() {
    let mut store = PositionStore::new();
    store.ensure_initialized(&[comment("c1"), comment("c2"), comment("c3")]);
    let z1 = store.stack_order("c1").unwrap();
    let z2 = store.stack_order("c2").unwrap();
    let z3 = store.stack_order("c3").unwrap();
    assert!(z1 < z2 && z2 < z3);
}

#[test]
fn ensure_initialized_is_idempotent() {
    let mut store = PositionStore::new();
    let comments = [comment("c1"), comment("c2")];
    store.ensure_initialized(&comments);
    let before = store.clone();

    store.ensure_initialized(&comments);

    for id in ["c1", "c2"] {
        assert_eq!(store.position(id), before.position(id));
        assert_eq!(store.stack_order(id), before.stack_order(id));
    }
    assert_eq!(store.top_stack_value(), before.top_stack_value());
    assert_eq!(store.len(), 2);
}

#[test]
fn ensure_initialized_keeps_moved_positions() {
    let mut store = PositionStore::new();
    store.ensure_initialized(&[comment("c1")]);
    store.set_position("c1", 50.0, 50.0);
    store.ensure_initialized(&[comment("c1"), comment("c2")]);
    assert_eq!(store.position("c1"), Some(Position::new(50.0, 50.0)));
    assert_eq!(store.len(), 2);
}

// =============================================================
// merge_persisted
// =============================================================

#[test]
fn merge_persisted_overrides_placement() {
    let mut store = PositionStore::new();
    store.ensure_initialized(&[comment("c1")]);
    store.merge_persisted(&[row("c1", 20.0, 30.0)]);
    assert_eq!(store.position("c1"), Some(Position::new(20.0, 30.0)));
}

#[test]
fn merge_persisted_leaves_unlisted_entries() {
    let mut store = PositionStore::new();
    store.ensure_initialized(&[comment("c1"), comment("c2")]);
    store.set_position("c2", 60.0, 70.0);
    let z2 = store.stack_order("c2");

    store.merge_persisted(&[row("c1", 20.0, 30.0)]);

    assert_eq!(store.position("c2"), Some(Position::new(60.0, 70.0)));
    assert_eq!(store.stack_order("c2"), z2);
}

#[test]
fn merge_persisted_does_not_touch_stack_order() {
    let mut store = PositionStore::new();
    store.ensure_initialized(&[comment("c1")]);
    let z = store.stack_order("c1");
    store.merge_persisted(&[row("c1", 20.0, 30.0)]);
    assert_eq!(store.stack_order("c1"), z);
    assert_eq!(store.top_stack_value(), z.unwrap());
}

#[test]
fn merge_persisted_before_comment_arrives_wins() {
    let mut store = PositionStore::new();
    store.merge_persisted(&[row("c1", 20.0, 30.0)]);
    store.ensure_initialized(&[comment("c1")]);
    assert_eq!(store.position("c1"), Some(Position::new(20.0, 30.0)));
    assert_eq!(store.len(), 1);
}

#[test]
fn merge_persisted_clamps_out_of_band_rows() {
    let mut store = PositionStore::new();
    store.merge_persisted(&[row("c1", 0.0, 100.0)]);
    assert_eq!(store.position("c1"), Some(Position::new(4.0, 96.0)));
}

// =============================================================
// set_position
// =============================================================

#[test]
fn set_position_clamps_into_band() {
    let mut store = PositionStore::new();
    let p = store.set_position("c1", 150.0, -10.0);
    assert_eq!(p, Position::new(96.0, 4.0));
    assert_eq!(store.position("c1"), Some(Position::new(96.0, 4.0)));
}

#[test]
fn set_position_inside_band_is_exact() {
    let mut store = PositionStore::new();
    store.set_position("c1", 42.5, 17.25);
    assert_eq!(store.position("c1"), Some(Position::new(42.5, 17.25)));
}

#[test]
fn set_position_respects_custom_band() {
    let mut store = PositionStore::with_band(SafeBand { min: 8.0, max: 92.0 });
    assert_eq!(store.set_position("c1", 99.0, 1.0), Position::new(92.0, 8.0));
}

// =============================================================
// bring_to_front
// =============================================================

#[test]
fn bring_to_front_exceeds_all_previous_values() {
    let mut store = PositionStore::new();
    store.ensure_initialized(&[comment("c1"), comment("c2"), comment("c3")]);
    let mut last = store.top_stack_value();
    for id in ["c1", "c3", "c1", "c2", "c2"] {
        let z = store.bring_to_front(id);
        assert!(z > last);
        last = z;
    }
    assert_eq!(store.front_to_back()[0], "c2");
}

#[test]
fn bring_to_front_orders_front_to_back() {
    let mut store = PositionStore::new();
    store.ensure_initialized(&[comment("c1"), comment("c2"), comment("c3")]);
    store.bring_to_front("c1");
    assert_eq!(store.front_to_back(), vec!["c1", "c3", "c2"]);
}

#[test]
fn separate_stores_have_independent_counters() {
    let mut a = PositionStore::new();
    let mut b = PositionStore::new();
    a.bring_to_front("c1");
    a.bring_to_front("c1");
    assert_eq!(b.bring_to_front("c1"), STACK_ORDER_BASE + 1);
}
