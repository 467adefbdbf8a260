use frames::{DrawableObject, Transform};

use super::*;
use crate::surface::Scene;

fn scene_with_two_objects() -> Scene {
    let mut scene = Scene::new();
    scene.add(DrawableObject::text("t", "ب", Transform::at(100.0, 100.0)), true);
    scene.add(DrawableObject::path("p", vec![[0.0, 0.0], [5.0, 5.0]], Transform::default()), true);
    scene
}

#[test]
fn initial_mode_is_select() {
    assert_eq!(ModeMachine::new().mode(), Mode::Select);
    assert_eq!(Mode::default(), Mode::Select);
}

#[test]
fn entering_draw_locks_objects_and_enables_brush() {
    let mut scene = scene_with_two_objects();
    scene.select("t");
    let mut modes = ModeMachine::new();

    assert!(modes.enter(Mode::Draw, &mut scene));

    assert_eq!(modes.mode(), Mode::Draw);
    assert!(scene.active().is_none());
    assert_eq!(scene.is_selectable("t"), Some(false));
    assert_eq!(scene.is_selectable("p"), Some(false));
    assert_eq!(scene.cursor(), Cursor::Crosshair);
    assert!(scene.freehand());
}

#[test]
fn entering_erase_locks_objects_without_brush() {
    let mut scene = scene_with_two_objects();
    let mut modes = ModeMachine::new();

    modes.enter(Mode::Draw, &mut scene);
    modes.enter(Mode::Erase, &mut scene);

    assert_eq!(scene.is_selectable("t"), Some(false));
    assert_eq!(scene.cursor(), Cursor::Crosshair);
    assert!(!scene.freehand());
}

#[test]
fn returning_to_select_restores_affordances() {
    let mut scene = scene_with_two_objects();
    let mut modes = ModeMachine::new();

    modes.enter(Mode::Draw, &mut scene);
    modes.enter(Mode::Select, &mut scene);

    assert_eq!(scene.is_selectable("t"), Some(true));
    assert_eq!(scene.is_selectable("p"), Some(true));
    assert_eq!(scene.cursor(), Cursor::Default);
    assert!(!scene.freehand());
}

#[test]
fn reentering_current_mode_is_idempotent() {
    let mut scene = scene_with_two_objects();
    let mut modes = ModeMachine::new();

    modes.enter(Mode::Erase, &mut scene);
    assert!(!modes.enter(Mode::Erase, &mut scene));

    assert_eq!(modes.mode(), Mode::Erase);
    assert_eq!(scene.is_selectable("t"), Some(false));
    assert_eq!(scene.cursor(), Cursor::Crosshair);
    assert!(!scene.freehand());
}

#[test]
fn reentering_select_keeps_selection() {
    let mut scene = scene_with_two_objects();
    scene.select("p");
    let mut modes = ModeMachine::new();

    assert!(!modes.enter(Mode::Select, &mut scene));
    assert_eq!(scene.active(), Some("p"));
}
