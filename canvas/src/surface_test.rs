use frames::{ShapeKind, Transform};

use super::*;

fn rect(id: &str, left: f64, top: f64) -> DrawableObject {
    DrawableObject::shape(id, ShapeKind::Rect, 50.0, 50.0, Transform::at(left, top))
}

#[test]
fn new_scene_is_empty_with_default_affordances() {
    let scene = Scene::new();
    assert!(scene.is_empty());
    assert_eq!(scene.cursor(), Cursor::Default);
    assert!(!scene.freehand());
    assert!(scene.active().is_none());
}

#[test]
fn add_preserves_stacking_order() {
    let mut scene = Scene::new();
    scene.add(rect("a", 0.0, 0.0), true);
    scene.add(rect("b", 0.0, 0.0), true);
    assert_eq!(scene.ids(), vec!["a".to_owned(), "b".to_owned()]);
}

#[test]
fn hit_test_returns_topmost_object() {
    let mut scene = Scene::new();
    scene.add(rect("bottom", 0.0, 0.0), true);
    scene.add(rect("top", 25.0, 25.0), true);

    assert_eq!(scene.hit_test(Point::new(30.0, 30.0)).as_deref(), Some("top"));
    assert_eq!(scene.hit_test(Point::new(5.0, 5.0)).as_deref(), Some("bottom"));
    assert!(scene.hit_test(Point::new(500.0, 500.0)).is_none());
}

#[test]
fn coords_are_stale_until_set_coords() {
    let mut scene = Scene::new();
    scene.add(rect("a", 0.0, 0.0), true);
    let before = scene.coords("a").unwrap();

    scene.get_mut("a").unwrap().transform.left = 300.0;
    assert_eq!(scene.coords("a"), Some(before));

    scene.set_coords("a");
    assert!(scene.coords("a").unwrap().min_x > 290.0);
}

#[test]
fn select_requires_selectable_object() {
    let mut scene = Scene::new();
    scene.add(rect("locked", 0.0, 0.0), false);
    scene.add(rect("free", 0.0, 0.0), true);

    assert!(!scene.select("locked"));
    assert!(!scene.select("missing"));
    assert!(scene.select("free"));
    assert_eq!(scene.active(), Some("free"));
}

#[test]
fn removing_active_object_drops_selection() {
    let mut scene = Scene::new();
    scene.add(rect("a", 0.0, 0.0), true);
    scene.select("a");

    assert!(scene.remove("a").is_some());
    assert!(scene.active().is_none());
    assert!(scene.remove("a").is_none());
}

#[test]
fn clear_removes_everything() {
    let mut scene = Scene::new();
    scene.add(rect("a", 0.0, 0.0), true);
    scene.add(rect("b", 0.0, 0.0), true);
    scene.select("b");

    scene.clear();
    assert!(scene.is_empty());
    assert!(scene.active().is_none());
}
