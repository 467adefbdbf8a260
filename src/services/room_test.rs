#![allow(clippy::float_cmp)]

use frames::{ObjectBody, PartialTransform, ShapeKind, Transform};

use super::*;

fn letter(id: &str) -> DrawableObject {
    DrawableObject::text(id, "ب", Transform::at(100.0, 100.0))
}

fn store_with(board: &str) -> RoomStore {
    let mut store = RoomStore::new();
    store.ensure(board);
    store
}

#[test]
fn ensure_creates_once() {
    let mut store = RoomStore::new();
    assert!(store.snapshot("abc123").is_none());

    store.ensure("abc123");
    store.add("abc123", letter("o1"));
    store.ensure("abc123");

    assert_eq!(store.board_count(), 1);
    assert_eq!(store.snapshot("abc123").unwrap().objects.len(), 1);
}

#[test]
fn new_board_snapshot_is_empty() {
    let store = store_with("b");
    assert!(store.snapshot("b").unwrap().objects.is_empty());
}

#[test]
fn add_is_idempotent_by_id() {
    let mut store = store_with("b");
    assert!(store.add("b", letter("o1")));

    let mut changed = letter("o1");
    changed.transform.left = 999.0;
    assert!(!store.add("b", changed));

    let board = store.board("b").unwrap();
    assert_eq!(board.len(), 1);
    assert_eq!(board.get("o1").unwrap().transform.left, 100.0);
}

#[test]
fn snapshot_preserves_insertion_order() {
    let mut store = store_with("b");
    for id in ["c", "a", "b"] {
        store.add("b", letter(id));
    }
    let ids: Vec<_> = store.snapshot("b").unwrap().objects.into_iter().map(|o| o.id).collect();
    assert_eq!(ids, ["c", "a", "b"]);
}

#[test]
fn mutations_on_unknown_board_are_noops() {
    let mut store = RoomStore::new();
    assert!(!store.add("ghost", letter("o1")));
    assert_eq!(store.update("ghost", &ObjectPatch::transform("o1", PartialTransform::position(1.0, 1.0))), Ok(false));
    assert!(!store.remove("ghost", "o1"));
    assert!(!store.clear("ghost"));
    assert_eq!(store.board_count(), 0);
}

#[test]
fn update_merges_only_present_fields() {
    let mut store = store_with("b");
    store.add("b", letter("o1"));

    let patch = ObjectPatch::transform("o1", PartialTransform::position(200.0, 150.0));
    assert_eq!(store.update("b", &patch), Ok(true));

    let obj = store.board("b").unwrap().get("o1").unwrap();
    assert_eq!(obj.transform.left, 200.0);
    assert_eq!(obj.transform.top, 150.0);
    assert_eq!(obj.transform.scale_x, 1.0);
    let ObjectBody::TextNode(text) = &obj.body else {
        panic!("kind changed");
    };
    assert_eq!(text.content, "ب");
}

#[test]
fn update_leaves_other_objects_unchanged() {
    let mut store = store_with("b");
    store.add("b", letter("o1"));
    store.add("b", DrawableObject::path("p1", vec![[0.0, 0.0], [3.0, 4.0]], Transform::at(10.0, 20.0)));
    store.add("b", DrawableObject::shape("s1", ShapeKind::Ellipse, 40.0, 20.0, Transform::default()));
    let before = store.snapshot("b").unwrap().objects;

    let patch = ObjectPatch::transform("p1", PartialTransform { angle: Some(90.0), ..PartialTransform::default() });
    assert_eq!(store.update("b", &patch), Ok(true));

    let after = store.snapshot("b").unwrap().objects;
    assert_eq!(after.len(), 3);
    assert_eq!(after[0], before[0]);
    assert_eq!(after[2], before[2]);
    assert_eq!(after[1].id, "p1");
    assert_eq!(after[1].transform.angle, 90.0);
}

#[test]
fn update_unknown_id_never_creates() {
    let mut store = store_with("b");
    let patch = ObjectPatch::transform("nope", PartialTransform::position(1.0, 1.0));
    assert_eq!(store.update("b", &patch), Ok(false));
    assert!(store.board("b").unwrap().is_empty());
}

#[test]
fn invalid_patch_leaves_object_untouched() {
    let mut store = store_with("b");
    store.add("b", DrawableObject::shape("s1", ShapeKind::Rect, 10.0, 10.0, Transform::default()));
    let before = store.board("b").unwrap().get("s1").cloned();

    let patch = ObjectPatch {
        id: "s1".into(),
        transform: Some(PartialTransform::position(50.0, 50.0)),
        content: Some("text on a rect".into()),
        ..ObjectPatch::default()
    };
    assert!(store.update("b", &patch).is_err());
    assert_eq!(store.board("b").unwrap().get("s1").cloned(), before);
}

#[test]
fn remove_reports_effect() {
    let mut store = store_with("b");
    store.add("b", letter("o1"));
    assert!(store.remove("b", "o1"));
    assert!(!store.remove("b", "o1"));
    assert!(store.board("b").unwrap().is_empty());
}

#[test]
fn remove_keeps_the_rest_in_order() {
    let mut store = store_with("b");
    for id in ["o1", "o2", "o3"] {
        store.add("b", letter(id));
    }
    let mut expected = store.snapshot("b").unwrap().objects;
    expected.remove(1);

    assert!(store.remove("b", "o2"));

    assert_eq!(store.snapshot("b").unwrap().objects, expected);
}

#[test]
fn clear_empties_but_keeps_board() {
    let mut store = store_with("b");
    store.add("b", letter("o1"));
    store.add("b", letter("o2"));

    assert!(store.clear("b"));
    assert!(store.clear("b"));
    assert!(store.contains("b"));
    assert!(store.snapshot("b").unwrap().objects.is_empty());
}

#[test]
fn boards_are_isolated() {
    let mut store = store_with("one");
    store.ensure("two");
    store.add("one", letter("o1"));
    store.clear("two");
    assert_eq!(store.board("one").unwrap().len(), 1);
    assert!(store.board("two").unwrap().is_empty());
}
