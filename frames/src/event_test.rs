use serde_json::json;

use super::*;
use crate::object::Transform;
use crate::patch::PartialTransform;

#[test]
fn join_board_carries_bare_board_id() {
    let value = serde_json::to_value(ClientEvent::JoinBoard("abc123".into())).expect("serialize");
    assert_eq!(value, json!({"event": "join-board", "data": "abc123"}));
}

#[test]
fn draw_object_uses_camel_case_fields() {
    let event: ClientEvent = serde_json::from_value(json!({
        "event": "draw-object",
        "data": {
            "boardId": "abc123",
            "object": {"id": "o1", "kind": "TextNode", "content": "ب", "transform": {"left": 100, "top": 100}}
        }
    }))
    .expect("deserialize");

    let ClientEvent::DrawObject { board_id, object } = &event else {
        panic!("expected draw-object");
    };
    assert_eq!(board_id, "abc123");
    assert_eq!(object.id, "o1");
    assert_eq!(event.name(), "draw-object");
    assert_eq!(event.board_id(), "abc123");
}

#[test]
fn move_and_remove_use_object_data_and_object_id() {
    let mv = ClientEvent::MoveObject {
        board_id: "b".into(),
        object_data: ObjectPatch::transform("o1", PartialTransform::position(1.0, 2.0)),
    };
    let value = serde_json::to_value(&mv).expect("serialize");
    assert_eq!(value["data"]["boardId"], "b");
    assert_eq!(value["data"]["objectData"]["id"], "o1");

    let rm = ClientEvent::RemoveObject { board_id: "b".into(), object_id: "o1".into() };
    let value = serde_json::to_value(&rm).expect("serialize");
    assert_eq!(value, json!({"event": "remove-object", "data": {"boardId": "b", "objectId": "o1"}}));
}

#[test]
fn board_cleared_has_no_data() {
    let value = serde_json::to_value(ServerEvent::BoardCleared).expect("serialize");
    assert_eq!(value, json!({"event": "board-cleared"}));

    let back: ServerEvent = serde_json::from_value(json!({"event": "board-cleared"})).expect("deserialize");
    assert_eq!(back, ServerEvent::BoardCleared);
}

#[test]
fn init_state_wraps_objects() {
    let event = ServerEvent::InitState(Snapshot {
        objects: vec![DrawableObject::text("o1", "a", Transform::default())],
    });
    let value = serde_json::to_value(&event).expect("serialize");
    assert_eq!(value["event"], "init-state");
    assert_eq!(value["data"]["objects"][0]["id"], "o1");
}

#[test]
fn empty_snapshot_serializes_as_empty_list() {
    let value = serde_json::to_value(ServerEvent::InitState(Snapshot::default())).expect("serialize");
    assert_eq!(value, json!({"event": "init-state", "data": {"objects": []}}));
}

#[test]
fn unknown_event_name_is_rejected() {
    let result = serde_json::from_value::<ClientEvent>(json!({"event": "rename-board", "data": "x"}));
    assert!(result.is_err());
}
