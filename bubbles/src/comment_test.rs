use super::*;
use time::macros::datetime;

fn comment(id: &str, created_at: OffsetDateTime) -> Comment {
    Comment { id: id.into(), photo_id: "l1".into(), text: format!("text {id}"), created_at }
}

// =============================================================
// Serde
// =============================================================

#[test]
fn comment_uses_storage_field_names() {
    let c = comment("c1", datetime!(2025-08-06 08:15:00 UTC));
    let json = serde_json::to_value(&c).unwrap();
    assert_eq!(json["id"], "c1");
    assert_eq!(json["photo_id"], "l1");
    assert_eq!(json["created_at"], "2025-08-06T08:15:00Z");
}

#[test]
fn comment_parses_offset_timestamps() {
    let json = r#"{"id":"c9","photo_id":"k2","text":"hello","created_at":"2025-08-06T17:15:00+09:00"}"#;
    let c: Comment = serde_json::from_str(json).unwrap();
    assert_eq!(c.created_at, datetime!(2025-08-06 08:15:00 UTC));
    assert_eq!(c.photo_id, "k2");
}

#[test]
fn bubble_position_uses_pct_field_names() {
    let row = BubblePosition::new("c1", "l1", Position::new(12.5, 80.0));
    let json = serde_json::to_value(&row).unwrap();
    assert_eq!(json["comment_id"], "c1");
    assert_eq!(json["top_pct"], 12.5);
    assert_eq!(json["left_pct"], 80.0);
}

#[test]
fn bubble_position_exposes_coordinates() {
    let row = BubblePosition::new("c1", "l1", Position::new(30.0, 40.0));
    assert_eq!(row.position(), Position::new(30.0, 40.0));
}

// =============================================================
// Ordering
// =============================================================

#[test]
fn sort_newest_first_orders_by_timestamp_desc() {
    let mut list = vec![
        comment("a", datetime!(2025-08-06 08:00:00 UTC)),
        comment("b", datetime!(2025-08-06 09:00:00 UTC)),
        comment("c", datetime!(2025-08-06 08:30:00 UTC)),
    ];
    sort_newest_first(&mut list);
    let ids: Vec<&str> = list.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, ["b", "c", "a"]);
}

#[test]
fn sort_newest_first_ties_break_by_id() {
    let ts = datetime!(2025-08-06 08:00:00 UTC);
    let mut list = vec![comment("z", ts), comment("a", ts)];
    sort_newest_first(&mut list);
    assert_eq!(list[0].id, "a");
}
